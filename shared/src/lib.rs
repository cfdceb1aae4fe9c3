pub mod models;
pub mod services;
pub mod utils;
pub mod errors;
pub mod config;
pub mod handler;

pub use models::*;
pub use services::*;
pub use utils::*;
pub use errors::*;
pub use config::*;
pub use handler::*;
