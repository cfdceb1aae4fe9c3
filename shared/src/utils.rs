use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Compute the SECRET_HASH Cognito expects from app clients that have a secret:
/// Base64(HMAC-SHA256(client_secret, username + client_id))
pub fn calculate_secret_hash(client_secret: &str, client_id: &str, username: &str) -> AuthResult<String> {
    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes())
        .map_err(|e| AuthError::InternalError(format!("Invalid client secret key: {}", e)))?;
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
