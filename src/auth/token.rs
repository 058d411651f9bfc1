// Token issuance and verification - HMAC-signed claims with fixed TTL

use crate::core::errors::AbacusError;
use crate::core::models::Subject;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Claims embedded in every issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Issues and verifies HS256-signed bearer tokens
///
/// Tokens are self-verifying: signature plus expiry is the whole check,
/// so no server-side session store exists and no revocation is possible
/// before natural expiry.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

impl TokenAuthority {
    /// Create an authority from the shared signing secret and token TTL
    pub fn new(secret: &Secret<String>, ttl_secs: u64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            ttl_secs,
        }
    }

    /// Sign a token for the subject, expiring `ttl_secs` from now
    pub fn issue(&self, subject: &Subject) -> Result<String, AbacusError> {
        let expires_at = Utc::now() + Duration::seconds(self.ttl_secs as i64);
        let claims = Claims {
            sub: subject.as_str().to_string(),
            exp: expires_at.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AbacusError::Signing(e.to_string()))
    }

    /// Validate signature and expiry, returning the embedded subject
    ///
    /// Every structural, signature, or expiry failure collapses to the
    /// same `InvalidToken` error; callers cannot distinguish them.
    pub fn verify(&self, token: &str) -> Result<Subject, AbacusError> {
        let mut validation = Validation::default();
        // No leeway: the expiry instant is compared exactly
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| Subject::new(data.claims.sub))
            .map_err(|_| AbacusError::InvalidToken)
    }
}
