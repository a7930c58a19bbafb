use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::IdentityConfig;

/// Claims read from access tokens issued by the identity server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signing secret not configured")]
    MissingSecret,
    #[error("Invalid access token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Checks bearer tokens presented to guarded routes
#[derive(Clone)]
pub struct TokenValidator {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        // An empty secret would accept tokens signed with an empty key
        let key = if secret.is_empty() {
            None
        } else {
            Some(DecodingKey::from_secret(secret.as_bytes()))
        };

        Self { key, validation }
    }

    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(&config.token_secret, &config.api_name)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let key = self.key.as_ref().ok_or(TokenError::MissingSecret)?;
        let data = decode::<Claims>(token, key, &self.validation)?;
        Ok(data.claims)
    }
}

/// Session expiry as epoch milliseconds: `now_ms + expires_in * 1000`
pub fn session_expire_date(now_ms: i64, expires_in_secs: i64) -> i64 {
    now_ms.saturating_add(expires_in_secs.saturating_mul(1000))
}

/// Session expiry counted from the current wall clock
pub fn session_expire_date_from_now(expires_in_secs: i64) -> i64 {
    session_expire_date(Utc::now().timestamp_millis(), expires_in_secs)
}

/// Hex SHA-256 digest handed to the write procedures in place of the
/// plaintext password
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
