pub mod auth;
pub mod exception;
pub mod response;

pub use auth::{require_bearer, AuthUser};
pub use exception::exception_middleware;
pub use response::{ApiResponse, ApiResult, ErrorEnvelope, Status};
