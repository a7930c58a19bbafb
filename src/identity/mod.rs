// Client for the external identity server's OAuth2 token endpoint.
//
// Password verification and token signing both live on the identity server;
// this side only exchanges credentials or refresh tokens for a grant.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::IdentityConfig;

/// Tokens issued by the identity server. Never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid identity server URL: {0}")]
    InvalidUrl(String),

    #[error("Identity server rejected the request ({status}): {error}")]
    Rejected { status: u16, error: String },

    #[error("Identity server request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Identity server returned an unreadable token response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Resource owner password grant
    async fn login(&self, user_name: &str, password: &str) -> Result<TokenGrant, IdentityError>;

    /// Exchange a refresh token for a new grant. No local checks are made on
    /// the token before it is sent.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, IdentityError>;
}

/// Error body defined by RFC 6749 section 5.2
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

pub struct TokenServerClient {
    http: reqwest::Client,
    token_endpoint: Url,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl TokenServerClient {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        Ok(Self {
            http: reqwest::Client::new(),
            token_endpoint: Self::token_endpoint(&config.base_url)?,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        })
    }

    /// `<base>/connect/token`, keeping any path prefix on the base URL
    fn token_endpoint(base_url: &str) -> Result<Url, IdentityError> {
        let mut base =
            Url::parse(base_url).map_err(|e| IdentityError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join("connect/token")
            .map_err(|e| IdentityError::InvalidUrl(e.to_string()))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenGrant, IdentityError> {
        let response = self
            .http
            .post(self.token_endpoint.clone())
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::rejection(status, response).await);
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))
    }

    async fn rejection(status: StatusCode, response: reqwest::Response) -> IdentityError {
        let body = response.text().await.unwrap_or_default();
        let error = match serde_json::from_str::<OAuthErrorBody>(&body) {
            Ok(OAuthErrorBody { error, error_description: Some(description) }) => {
                format!("{}: {}", error, description)
            }
            Ok(OAuthErrorBody { error, .. }) => error,
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => body,
        };
        IdentityError::Rejected { status: status.as_u16(), error }
    }
}

#[async_trait]
impl IdentityClient for TokenServerClient {
    async fn login(&self, user_name: &str, password: &str) -> Result<TokenGrant, IdentityError> {
        debug!("Requesting password grant for {}", user_name);
        let result = self
            .request_token(&[
                ("grant_type", "password"),
                ("username", user_name),
                ("password", password),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .await;

        if let Err(e) = &result {
            warn!("Password grant for {} failed: {}", user_name, e);
        }
        result
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, IdentityError> {
        let result = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .await;

        if let Err(e) = &result {
            warn!("Refresh grant failed: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_endpoint_appends_to_root() {
        let url = TokenServerClient::token_endpoint("http://identity:5000").unwrap();
        assert_eq!(url.as_str(), "http://identity:5000/connect/token");
    }

    #[test]
    fn token_endpoint_keeps_path_prefix() {
        let url = TokenServerClient::token_endpoint("https://auth.example.com/identity").unwrap();
        assert_eq!(url.as_str(), "https://auth.example.com/identity/connect/token");

        let url = TokenServerClient::token_endpoint("https://auth.example.com/identity/").unwrap();
        assert_eq!(url.as_str(), "https://auth.example.com/identity/connect/token");
    }

    #[test]
    fn token_endpoint_rejects_garbage() {
        assert!(matches!(
            TokenServerClient::token_endpoint(""),
            Err(IdentityError::InvalidUrl(_))
        ));
    }

    #[test]
    fn grant_without_refresh_token_parses() {
        let grant: TokenGrant =
            serde_json::from_str(r#"{"access_token":"abc","expires_in":3600,"token_type":"Bearer"}"#).unwrap();
        assert_eq!(grant.refresh_token, None);
        assert_eq!(grant.expires_in, 3600);
    }
}
