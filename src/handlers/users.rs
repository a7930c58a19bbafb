use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::models::User;
use crate::dispatch::Dispatcher;
use crate::error::ApiError;
use crate::handlers::{messages, path_id, required, Payload, QueryParams};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{AllUsers, DeactivateUser, Login, LoginOutcome, RefreshSession, RefreshedSession, Session};

/// Login body. The password is never echoed back in error envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub user_name: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TokenModel {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllUsersQuery {
    #[serde(rename = "companyId", alias = "CompanyId")]
    pub company_id: Option<i64>,
}

/// POST /api/Users/GetUserByUserNameAndPassword
pub async fn login(
    State(dispatcher): State<Arc<Dispatcher>>,
    Payload(body): Payload<LoginRequest>,
) -> ApiResult<Session> {
    let outcome = async {
        let user_name = required(body.user_name.clone(), "UserName")?;
        let password = required(body.password.clone(), "Password")?;
        dispatcher.send(Login { user_name, password }).await
    }
    .await
    .map_err(|e| ApiError::from(e).with_request(&body))?;

    match outcome {
        LoginOutcome::Authenticated(session) => Ok(ApiResponse::success(session)),
        LoginOutcome::UnknownUser => Err(ApiError::bad_request(messages::INVALID_USER).with_request(&body)),
    }
}

/// POST /api/Users/RefreshToken
///
/// The access token in the body is accepted but not inspected; only the
/// refresh token goes to the identity server.
pub async fn refresh_token(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Result<Json<TokenModel>, JsonRejection>,
) -> ApiResult<RefreshedSession> {
    let Ok(Json(body)) = body else {
        return Err(ApiError::bad_request(messages::INVALID_CLIENT_REQUEST));
    };

    let refresh_token = required(body.refresh_token, "RefreshToken")?;
    let session = dispatcher.send(RefreshSession { refresh_token }).await?;
    Ok(ApiResponse::success(session))
}

/// GET /api/Users/GetAllUsers
pub async fn all_users(
    State(dispatcher): State<Arc<Dispatcher>>,
    QueryParams(query): QueryParams<AllUsersQuery>,
) -> ApiResult<Vec<User>> {
    let users = dispatcher
        .send(AllUsers { company_id: query.company_id })
        .await?;
    Ok(ApiResponse::success(users))
}

/// DELETE /api/Users/DeactivateUser/:id
pub async fn deactivate_user(
    State(dispatcher): State<Arc<Dispatcher>>,
    Extension(caller): Extension<AuthUser>,
    id: Option<Path<String>>,
) -> ApiResult<&'static str> {
    let user_id = path_id(id, "id")?;
    let status = dispatcher.send(DeactivateUser { user_id }).await?;

    if status.is_ok() {
        tracing::info!("User {} deactivated by {}", user_id, caller);
        return Ok(ApiResponse::success(messages::USER_DEACTIVATED));
    }

    tracing::warn!(
        "Deactivating user {} for {} returned status {}",
        user_id,
        caller,
        status.code()
    );
    Ok(ApiResponse::error(messages::USER_DEACTIVATE_FAILED))
}
