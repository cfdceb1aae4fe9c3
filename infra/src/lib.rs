pub mod config;
pub mod errors;
pub mod stack;
pub mod template;

pub use config::*;
pub use errors::*;
pub use stack::synthesize;
pub use template::Template;
