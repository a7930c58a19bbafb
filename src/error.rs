// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::response::{CapturedException, ErrorDetail, ErrorEnvelope};
use crate::services::ServiceError;

/// Controller-level failure, rendered as an error envelope
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest {
        message: Option<String>,
        exception: Option<CapturedException>,
        request: Option<Value>,
    },

    // 500 Internal Server Error
    InternalServerError(CapturedException),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: Some(message.into()),
            exception: None,
            request: None,
        }
    }

    pub fn internal_server_error(exception: CapturedException) -> Self {
        ApiError::InternalServerError(exception)
    }

    /// Echo the request that failed. Types with secrets must skip them when
    /// serializing.
    pub fn with_request<T: Serialize>(mut self, body: &T) -> Self {
        if let ApiError::BadRequest { request, .. } = &mut self {
            *request = serde_json::to_value(body).ok();
        }
        self
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest { message: Some(message), .. } => message.clone(),
            ApiError::BadRequest { exception: Some(exception), .. } => exception.message.clone(),
            ApiError::BadRequest { .. } => "Bad request".to_string(),
            ApiError::InternalServerError(exception) => exception.message.clone(),
        }
    }

    pub fn to_envelope(&self) -> ErrorEnvelope {
        match self {
            ApiError::BadRequest { message, exception, request } => ErrorEnvelope::new(
                self.status_code(),
                ErrorDetail {
                    message: message.clone(),
                    exception: exception.clone(),
                },
            )
            .with_request(request.clone()),
            ApiError::InternalServerError(exception) => {
                ErrorEnvelope::new(self.status_code(), ErrorDetail::exception(exception.clone()))
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Database(e) => tracing::error!("Database error: {}", e),
            ServiceError::Dispatch(e) => tracing::error!("Dispatch error: {}", e),
            ServiceError::Identity(e) => tracing::warn!("Identity server error: {}", e),
            ServiceError::MissingArgument(_) | ServiceError::InvalidArgument { .. } => {
                tracing::debug!("Rejected request: {}", err)
            }
        }

        ApiError::BadRequest {
            message: None,
            exception: Some(CapturedException::new(err.kind(), err.client_message())),
            request: None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            message: None,
            exception: Some(CapturedException::new("InvalidRequestBody", rejection.body_text())),
            request: None,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest {
            message: None,
            exception: Some(CapturedException::new("InvalidQueryString", rejection.body_text())),
            request: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        self.to_envelope().into_response()
    }
}
