use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::operation::initiate_auth::InitiateAuthOutput;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use tracing::{debug, info};

use crate::{
    calculate_secret_hash, AuthError, AuthResult, AuthenticationOutcome, AuthenticationTokens,
    CognitoConfig, IdentityProvider,
};

/// Identity provider backed by a Cognito user pool app client
pub struct CognitoIdentityProvider {
    client: CognitoClient,
    config: CognitoConfig,
}

impl CognitoIdentityProvider {
    pub fn new(client: CognitoClient, config: CognitoConfig) -> Self {
        Self { client, config }
    }

    /// Create the provider from a loaded SDK config and environment-provided client settings
    pub fn from_env(sdk_config: &aws_config::SdkConfig) -> AuthResult<Self> {
        let config = CognitoConfig::from_env()?;
        info!(
            "CognitoIdentityProvider initialized for client: {} (secret hash: {})",
            config.client_id,
            config.has_secret()
        );
        Ok(Self::new(CognitoClient::new(sdk_config), config))
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    fn secret_hash(&self, username: &str) -> AuthResult<Option<String>> {
        self.config
            .client_secret
            .as_deref()
            .map(|secret| calculate_secret_hash(secret, &self.config.client_id, username))
            .transpose()
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<()> {
        debug!("Calling SignUp for: {}", email);

        let email_attribute = AttributeType::builder()
            .name("email")
            .value(email)
            .build()
            .map_err(|e| AuthError::InternalError(format!("Failed to build attribute: {}", e)))?;

        let output = self
            .client
            .sign_up()
            .client_id(&self.config.client_id)
            .set_secret_hash(self.secret_hash(email)?)
            .username(email)
            .password(password)
            .user_attributes(email_attribute)
            .send()
            .await
            .map_err(aws_sdk_cognitoidentityprovider::Error::from)?;

        info!(
            "SignUp accepted for: {} (confirmed: {})",
            email,
            output.user_confirmed()
        );
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthenticationOutcome> {
        debug!("Calling InitiateAuth for: {}", email);

        let mut request = self
            .client
            .initiate_auth()
            .client_id(&self.config.client_id)
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .auth_parameters("USERNAME", email)
            .auth_parameters("PASSWORD", password);

        if let Some(secret_hash) = self.secret_hash(email)? {
            request = request.auth_parameters("SECRET_HASH", secret_hash);
        }

        let output = request
            .send()
            .await
            .map_err(aws_sdk_cognitoidentityprovider::Error::from)?;

        Ok(outcome_from_output(&output))
    }

    async fn confirm_sign_up(&self, email: &str, code: &str) -> AuthResult<()> {
        debug!("Calling ConfirmSignUp for: {}", email);

        self.client
            .confirm_sign_up()
            .client_id(&self.config.client_id)
            .set_secret_hash(self.secret_hash(email)?)
            .username(email)
            .confirmation_code(code)
            .send()
            .await
            .map_err(aws_sdk_cognitoidentityprovider::Error::from)?;

        info!("ConfirmSignUp accepted for: {}", email);
        Ok(())
    }
}

fn outcome_from_output(output: &InitiateAuthOutput) -> AuthenticationOutcome {
    let authentication_result = output.authentication_result().map(|result| AuthenticationTokens {
        access_token: result.access_token().map(str::to_string),
        expires_in: result.expires_in(),
        id_token: result.id_token().map(str::to_string),
        refresh_token: result.refresh_token().map(str::to_string),
        token_type: result.token_type().map(str::to_string),
    });

    AuthenticationOutcome {
        authentication_result,
        challenge_name: output.challenge_name().map(|name| name.as_str().to_string()),
        challenge_parameters: output.challenge_parameters().cloned().unwrap_or_default(),
        session: output.session().map(str::to_string),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use aws_sdk_cognitoidentityprovider::types::{AuthenticationResultType, ChallengeNameType};

    /// Client with static credentials and a fixed region; never connects
    pub(crate) fn test_client() -> CognitoClient {
        let config = aws_sdk_cognitoidentityprovider::Config::builder()
            .behavior_version(aws_sdk_cognitoidentityprovider::config::BehaviorVersion::latest())
            .region(aws_sdk_cognitoidentityprovider::config::Region::new("us-east-1"))
            .credentials_provider(aws_sdk_cognitoidentityprovider::config::SharedCredentialsProvider::new(
                aws_sdk_cognitoidentityprovider::config::Credentials::new("test", "test", None, None, "test"),
            ))
            .build();
        CognitoClient::from_conf(config)
    }

    #[test]
    fn test_secret_hash_only_when_secret_configured() {
        let without_secret = CognitoIdentityProvider::new(test_client(), CognitoConfig::new("client-id", None));
        assert_eq!(without_secret.secret_hash("user@example.com").unwrap(), None);

        let with_secret = CognitoIdentityProvider::new(
            test_client(),
            CognitoConfig::new("client-id", Some("client-secret".to_string())),
        );
        assert_eq!(
            with_secret.secret_hash("user@example.com").unwrap().as_deref(),
            Some("NpqglvUHBpz0nyO+qeiUjlRR297+e+uA7UhuwY3pkSE=")
        );
    }

    #[test]
    fn test_outcome_from_token_response() {
        let output = InitiateAuthOutput::builder()
            .authentication_result(
                AuthenticationResultType::builder()
                    .access_token("access")
                    .expires_in(3600)
                    .id_token("id")
                    .refresh_token("refresh")
                    .token_type("Bearer")
                    .build(),
            )
            .build();

        let outcome = outcome_from_output(&output);
        let tokens = outcome.authentication_result.expect("tokens expected");
        assert_eq!(tokens.access_token.as_deref(), Some("access"));
        assert_eq!(tokens.expires_in, 3600);
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh"));
        assert!(outcome.challenge_name.is_none());
        assert!(outcome.challenge_parameters.is_empty());
    }

    #[test]
    fn test_outcome_from_challenge_response() {
        let output = InitiateAuthOutput::builder()
            .challenge_name(ChallengeNameType::NewPasswordRequired)
            .session("session-token")
            .challenge_parameters("USER_ID_FOR_SRP", "user@example.com")
            .build();

        let outcome = outcome_from_output(&output);
        assert!(outcome.authentication_result.is_none());
        assert_eq!(outcome.challenge_name.as_deref(), Some("NEW_PASSWORD_REQUIRED"));
        assert_eq!(outcome.session.as_deref(), Some("session-token"));
        assert_eq!(
            outcome.challenge_parameters.get("USER_ID_FOR_SRP").map(String::as_str),
            Some("user@example.com")
        );
    }
}
