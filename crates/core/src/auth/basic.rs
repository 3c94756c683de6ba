//! HTTP Basic authentication.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Authenticator that checks `Authorization: Basic <base64(username:password)>`
/// against a single configured credential pair.
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Pull `(username, password)` out of the request.
    ///
    /// A missing header or a non-Basic scheme is `NotAuthenticated`; a Basic
    /// header whose payload can't be decoded is `MalformedHeader`.
    fn extract_credentials(request: &AuthRequest) -> Result<(String, String), AuthError> {
        let header = request
            .header("authorization")
            .ok_or(AuthError::NotAuthenticated)?;

        let encoded = header
            .strip_prefix("Basic ")
            .or_else(|| header.strip_prefix("basic "))
            .ok_or(AuthError::NotAuthenticated)?;

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| AuthError::MalformedHeader)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedHeader)?;

        // The password may itself contain ':'
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedHeader)?;

        Ok((username.to_string(), password.to_string()))
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let (username, password) = Self::extract_credentials(request)?;

        let username_ok = digest_eq(&username, &self.username);
        let password_ok = digest_eq(&password, &self.password);

        if username_ok & password_ok {
            Ok(Identity {
                user_id: username,
                method: "basic".to_string(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    fn method_name(&self) -> &'static str {
        "basic"
    }
}

/// Compare SHA-256 digests so neither content nor length leaks through timing.
fn digest_eq(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    constant_time_eq(&a, &b)
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
