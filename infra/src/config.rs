use crate::{StackError, StackResult};

pub const DEFAULT_APP_NAME: &str = "inferior";
pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_STAGE_NAME: &str = "prod";

/// Configuration for synthesizing the stack
#[derive(Debug, Clone)]
pub struct StackConfig {
    pub app_name: String,
    pub environment: String,
    pub stage_name: String,
    /// Container image the function runs, e.g. `<account>.dkr.ecr.<region>.amazonaws.com/auth-lambda:latest`
    pub image_uri: String,
}

impl StackConfig {
    /// Create stack config from environment variables
    pub fn from_env() -> StackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> StackResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let image_uri = non_empty("AUTH_IMAGE_URI")
            .ok_or_else(|| StackError::Configuration("AUTH_IMAGE_URI not set".to_string()))?;

        Ok(Self {
            app_name: non_empty("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            environment: non_empty("ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            stage_name: non_empty("STAGE_NAME").unwrap_or_else(|| DEFAULT_STAGE_NAME.to_string()),
            image_uri,
        })
    }

    /// Create a resource name following the {APP_NAME}-{ENVIRONMENT}-{RESOURCE_NAME} pattern
    pub fn resource_name(&self, resource_name: &str) -> String {
        format!("{}-{}-{}", self.app_name, self.environment, resource_name)
    }
}
