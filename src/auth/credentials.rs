// Credential verification against the fixed service credential pair

use crate::core::errors::AbacusError;
use crate::core::models::Subject;
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use subtle::ConstantTimeEq;

/// Trait for credential verification
///
/// The login flow only sees this seam, so a real backing store can be
/// substituted later without touching the token authority or handlers.
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Check a username/password pair, returning the verified subject
    async fn verify(&self, username: &str, password: &str) -> Result<Subject, AbacusError>;
}

/// Verifier holding the single fixed credential pair
///
/// The password is wrapped in `secrecy::Secret` to keep it out of Debug
/// output, and compared in constant time.
pub struct StaticCredentials {
    username: String,
    password: Secret<String>,
}

impl StaticCredentials {
    /// Create a verifier for one username/password pair
    pub fn new(username: impl Into<String>, password: Secret<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, username: &str, password: &str) -> Result<Subject, AbacusError> {
        let password_matches: bool = password
            .as_bytes()
            .ct_eq(self.password.expose_secret().as_bytes())
            .into();

        if username == self.username && password_matches {
            Ok(Subject::new(username))
        } else {
            Err(AbacusError::InvalidCredentials)
        }
    }
}
