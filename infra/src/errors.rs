use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StackResult<T> = Result<T, StackError>;
