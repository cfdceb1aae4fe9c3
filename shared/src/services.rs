pub mod identity_provider;
pub mod cognito_service;

pub use identity_provider::*;
pub use cognito_service::*;
