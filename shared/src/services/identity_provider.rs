use async_trait::async_trait;

use crate::{AuthResult, AuthenticationOutcome};

/// Remote identity provider operations the auth handler delegates to.
/// `CognitoIdentityProvider` is the production implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new user, using the email as both username and `email` attribute
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<()>;

    /// Authenticate with username/password and return the issued tokens or challenge
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthenticationOutcome>;

    /// Confirm a registration with the code delivered to the user
    async fn confirm_sign_up(&self, email: &str, code: &str) -> AuthResult<()>;
}
