use serde::Serialize;
use sqlx::FromRow;

/// Row returned by the user lookup procedures.
///
/// `session_expire_date` is never stored; login fills it in from the token
/// lifetime before the user is returned to the caller.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company_id: i64,
    pub user_level_id: Option<i64>,
    pub is_active: bool,
    #[sqlx(default)]
    pub session_expire_date: Option<i64>,
}

/// Full profile of an existing user, as shown on the edit screen
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct UserDetails {
    pub user_id: i64,
    pub user_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub company_id: i64,
    pub user_level_id: Option<i64>,
    pub designation_id: Option<i64>,
    pub reporting_to: Option<i64>,
    pub is_active: bool,
}

/// Fields written by the insert and update procedures.
///
/// `password` holds the digest, never the plaintext, once it reaches the
/// repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user_name: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub company_id: i64,
    pub user_level_id: Option<i64>,
    pub designation_id: Option<i64>,
    pub reporting_to: Option<i64>,
    pub identity_document_no: Option<String>,
    pub tax_id: Option<String>,
    pub created_by: Option<i64>,
}
