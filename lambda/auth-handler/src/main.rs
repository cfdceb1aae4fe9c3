use aws_config::BehaviorVersion;
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use auth_shared::{AuthHandler, CognitoIdentityProvider};

async fn function_handler(
    handler: Arc<AuthHandler>,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (request, context) = event.into_parts();

    info!(
        "Request {}: {} {}",
        context.request_id,
        request.http_method,
        request.path.as_deref().unwrap_or("<none>")
    );

    let response = handler.handle(&request).await;

    info!("Request {} completed with status {}", context.request_id, response.status_code);
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    info!("Starting auth-handler Lambda function");

    // One client for the lifetime of the execution environment
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let provider = CognitoIdentityProvider::from_env(&config).map_err(|e| {
        error!("Failed to initialize CognitoIdentityProvider: {}", e);
        e
    })?;
    let handler = Arc::new(AuthHandler::new(Arc::new(provider)));

    run(service_fn(move |event| {
        let handler = Arc::clone(&handler);
        async move { function_handler(handler, event).await }
    }))
    .await
}
