use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    IdentityProvider(String),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<aws_sdk_cognitoidentityprovider::Error> for AuthError {
    fn from(err: aws_sdk_cognitoidentityprovider::Error) -> Self {
        AuthError::IdentityProvider(
            aws_sdk_cognitoidentityprovider::error::DisplayErrorContext(&err).to_string(),
        )
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::SerializationError(err.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
