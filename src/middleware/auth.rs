use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{Claims, TokenValidator};

/// Caller identity taken from a validated access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
    pub client_id: Option<String>,
}

impl std::fmt::Display for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.client_id {
            Some(client_id) => write!(f, "{} (client {})", self.subject, client_id),
            None => write!(f, "{}", self.subject),
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            client_id: claims.client_id,
        }
    }
}

/// Rejects requests without a valid bearer token with an empty 401 before
/// the route handler runs.
pub async fn require_bearer(
    State(validator): State<TokenValidator>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(reason) => {
            tracing::debug!("Unauthenticated request to {}: {}", request.uri(), reason);
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    match validator.validate(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser::from(claims));
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Rejected token for {}: {}", request.uri(), e);
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

/// Extract the token from an `Authorization: Bearer` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn caller_display_includes_client() {
        let caller = AuthUser { subject: "42".into(), client_id: Some("fos-web".into()) };
        assert_eq!(caller.to_string(), "42 (client fos-web)");

        let caller = AuthUser { subject: "42".into(), client_id: None };
        assert_eq!(caller.to_string(), "42");
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers("Bearer   ")).is_err());
    }
}
