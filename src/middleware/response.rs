use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Error,
}

/// `{ "Status": ..., "Message": ... }` - the body of every successful call
/// and of business-level failures such as a rejected insert
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status: Status,
    pub message: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `Status: Success`
    pub fn success(message: T) -> Self {
        Self {
            status: Status::Success,
            message,
            status_code: StatusCode::OK,
        }
    }

    /// 400 with `Status: Error`, for outcomes reported as values
    pub fn error(message: T) -> Self {
        Self {
            status: Status::Error,
            message,
            status_code: StatusCode::BAD_REQUEST,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let message = match serde_json::to_value(&self.message) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response message: {}", e);
                let envelope = ErrorEnvelope::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetail::exception(CapturedException::new("Serialization", e.to_string())),
                );
                return envelope.into_response();
            }
        };

        let envelope = json!({
            "Status": self.status,
            "Message": message,
        });

        (self.status_code, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

/// Error summary carried in error envelopes; no backtraces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapturedException {
    pub kind: String,
    pub message: String,
}

impl CapturedException {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<CapturedException>,
}

impl ErrorDetail {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            exception: None,
        }
    }

    pub fn exception(exception: CapturedException) -> Self {
        Self {
            message: None,
            exception: Some(exception),
        }
    }
}

/// Body produced on every exception path
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorEnvelope {
    pub status: Status,
    pub status_code: u16,
    pub error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
}

impl ErrorEnvelope {
    pub fn new(status_code: StatusCode, error: ErrorDetail) -> Self {
        Self {
            status: Status::Error,
            status_code: status_code.as_u16(),
            error,
            request: None,
        }
    }

    pub fn with_request(mut self, request: Option<Value>) -> Self {
        self.request = request;
        self
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
