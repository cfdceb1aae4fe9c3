use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth_stack::{synthesize, StackConfig};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the template
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = StackConfig::from_env().context("Failed to load stack configuration")?;
    info!(
        "Synthesizing stack {} for image {}",
        config.resource_name("stack"),
        config.image_uri
    );

    let template = synthesize(&config).context("Failed to synthesize stack")?;
    println!("{}", template.to_json_pretty()?);

    Ok(())
}
