use crate::AuthError;

/// Name of the environment variable carrying the user pool app client id
pub const CLIENT_ID_VAR: &str = "USER_POOL_CLIENT_ID";
/// Name of the environment variable carrying the optional app client secret
pub const CLIENT_SECRET_VAR: &str = "USER_POOL_CLIENT_SECRET";

/// Configuration for the Cognito user pool app client
#[derive(Clone)]
pub struct CognitoConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl CognitoConfig {
    pub fn new(client_id: impl Into<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.filter(|secret| !secret.trim().is_empty()),
        }
    }

    /// Create config from environment variables
    /// USER_POOL_CLIENT_ID comes from the Lambda environment set by the stack
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup(CLIENT_ID_VAR)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AuthError::ConfigurationError(format!("{} not set", CLIENT_ID_VAR)))?;

        Ok(Self::new(client_id, lookup(CLIENT_SECRET_VAR)))
    }

    pub fn has_secret(&self) -> bool {
        self.client_secret.is_some()
    }
}

// Keep the secret out of logs
impl std::fmt::Debug for CognitoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitoConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
