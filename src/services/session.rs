use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::auth::session_expire_date_from_now;
use crate::database::models::User;
use crate::database::UserRepository;
use crate::dispatch::{Handler, Request, RequestKind};
use crate::identity::IdentityClient;
use crate::services::ServiceError;

/// Sign in with user name and password.
///
/// The password is checked only by the identity server. The repository
/// lookup decides whether the account exists and is active.
#[derive(Debug, Clone)]
pub struct Login {
    pub user_name: String,
    pub password: String,
}

impl Request for Login {
    type Output = LoginOutcome;
    const KIND: RequestKind = RequestKind::Login;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    pub user: User,
    pub token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(Session),
    /// No active account with that user name
    UnknownUser,
}

pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityClient>,
}

impl LoginHandler {
    pub fn new(users: Arc<dyn UserRepository>, identity: Arc<dyn IdentityClient>) -> Self {
        Self { users, identity }
    }
}

#[async_trait]
impl Handler<Login> for LoginHandler {
    async fn handle(&self, request: Login) -> Result<LoginOutcome, ServiceError> {
        let user = match self.users.user_by_user_name(&request.user_name).await? {
            Some(user) if user.is_active => user,
            Some(_) => {
                info!("Login refused for inactive user {}", request.user_name);
                return Ok(LoginOutcome::UnknownUser);
            }
            None => {
                info!("Login refused for unknown user {}", request.user_name);
                return Ok(LoginOutcome::UnknownUser);
            }
        };

        let grant = self.identity.login(&request.user_name, &request.password).await?;

        let mut user = user;
        user.session_expire_date = Some(session_expire_date_from_now(grant.expires_in));
        info!("User {} signed in", user.user_name);

        Ok(LoginOutcome::Authenticated(Session {
            user,
            token: grant.access_token,
            refresh_token: grant.refresh_token,
        }))
    }
}

/// Trade a refresh token for a new access token
#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub refresh_token: String,
}

impl Request for RefreshSession {
    type Output = RefreshedSession;
    const KIND: RequestKind = RequestKind::RefreshSession;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RefreshedSession {
    pub session_expire_date: i64,
    pub access_token: String,
    pub refresh_token: String,
}

pub struct RefreshSessionHandler {
    identity: Arc<dyn IdentityClient>,
}

impl RefreshSessionHandler {
    pub fn new(identity: Arc<dyn IdentityClient>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl Handler<RefreshSession> for RefreshSessionHandler {
    async fn handle(&self, request: RefreshSession) -> Result<RefreshedSession, ServiceError> {
        let grant = self.identity.refresh(&request.refresh_token).await?;

        // Servers with reusable refresh tokens omit it from the response
        let refresh_token = grant.refresh_token.unwrap_or(request.refresh_token);

        Ok(RefreshedSession {
            session_expire_date: session_expire_date_from_now(grant.expires_in),
            access_token: grant.access_token,
            refresh_token,
        })
    }
}
