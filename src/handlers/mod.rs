// handlers/mod.rs - HTTP controllers
//
// Public:  /api/Users/GetUserByUserNameAndPassword, /api/Users/RefreshToken
// Guarded: /api/Users/{GetAllUsers,DeactivateUser}, /api/Home/*, /api/UserManagement/*
//
// Every controller binds its input, checks required fields, dispatches one
// request and wraps the result in the response envelope.

pub mod extract;
pub mod home;
pub mod user_management;
pub mod users;

use axum::extract::Path;

use crate::services::ServiceError;

pub use extract::{Payload, QueryParams};

pub mod messages {
    pub const INVALID_USER: &str = "Invalid user name or password";
    pub const INVALID_CLIENT_REQUEST: &str = "Invalid client request";
    pub const USER_CREATED: &str = "User Created successfully";
    pub const USER_CREATE_FAILED: &str = "An error occurred while creating the user";
    pub const USER_UPDATED: &str = "User Updated successfully";
    pub const USER_UPDATE_FAILED: &str = "An error occurred while updating the user";
    pub const USER_DEACTIVATED: &str = "User deactivated successfully";
    pub const USER_DEACTIVATE_FAILED: &str = "An error occurred while deactivating the user";
}

/// Presence check for mandatory fields
pub(crate) fn required<T>(value: Option<T>, name: &'static str) -> Result<T, ServiceError> {
    value.ok_or(ServiceError::MissingArgument(name))
}

/// Numeric id from an optional path segment
pub(crate) fn path_id(segment: Option<Path<String>>, name: &'static str) -> Result<i64, ServiceError> {
    let Path(raw) = required(segment, name)?;
    raw.trim()
        .parse()
        .map_err(|_| ServiceError::InvalidArgument { name, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_reports_field_name() {
        assert_eq!(required(Some(3), "CompanyId").unwrap(), 3);
        let err = required::<i64>(None, "CompanyId").unwrap_err();
        assert!(matches!(err, ServiceError::MissingArgument("CompanyId")));
    }

    #[test]
    fn path_id_parses_or_rejects() {
        assert_eq!(path_id(Some(Path("17".to_string())), "userId").unwrap(), 17);
        assert!(matches!(
            path_id(None, "userId"),
            Err(ServiceError::MissingArgument("userId"))
        ));
        assert!(matches!(
            path_id(Some(Path("abc".to_string())), "userId"),
            Err(ServiceError::InvalidArgument { name: "userId", .. })
        ));
    }
}
