pub mod lookups;
pub mod session;
pub mod users;

use std::sync::Arc;
use thiserror::Error;

use crate::database::{DatabaseError, UserManagementRepository, UserRepository};
use crate::dispatch::{DispatchError, Dispatcher};
use crate::identity::{IdentityClient, IdentityError};

pub use lookups::{
    DesignationLookup, ExistingUserDetails, ReportingLevelLookup, UserLevelLookup,
    UserTranslanderLookup,
};
pub use session::{Login, LoginOutcome, RefreshSession, RefreshedSession, Session};
pub use users::{AllUsers, DeactivateUser, InsertUser, UpdateUser, UserMenus};

/// Failure of a dispatched request. Business outcomes such as duplicate
/// users are values, not errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Value cannot be null (parameter '{0}')")]
    MissingArgument(&'static str),

    #[error("Invalid value '{value}' for parameter '{name}'")]
    InvalidArgument { name: &'static str, value: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ServiceError {
    /// Short category name reported in error envelopes
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::MissingArgument(_) => "MissingArgument",
            ServiceError::InvalidArgument { .. } => "InvalidArgument",
            ServiceError::Database(_) => "DatabaseError",
            ServiceError::Identity(_) => "IdentityError",
            ServiceError::Dispatch(_) => "DispatchError",
        }
    }

    /// Text safe to hand to clients. SQL errors stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            ServiceError::Database(_) => "Database error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

/// Register every handler. Fails if a request kind is left without one.
pub fn dispatcher(
    users: Arc<dyn UserRepository>,
    management: Arc<dyn UserManagementRepository>,
    identity: Arc<dyn IdentityClient>,
) -> Result<Dispatcher, DispatchError> {
    Dispatcher::builder()
        .register::<Login, _>(session::LoginHandler::new(users.clone(), identity.clone()))
        .register::<RefreshSession, _>(session::RefreshSessionHandler::new(identity))
        .register::<UserMenus, _>(users::UserMenusHandler::new(users.clone()))
        .register::<AllUsers, _>(users::AllUsersHandler::new(users.clone()))
        .register::<DeactivateUser, _>(users::DeactivateUserHandler::new(users))
        .register::<InsertUser, _>(users::InsertUserHandler::new(management.clone()))
        .register::<UpdateUser, _>(users::UpdateUserHandler::new(management.clone()))
        .register::<UserLevelLookup, _>(lookups::UserLevelLookupHandler::new(management.clone()))
        .register::<DesignationLookup, _>(lookups::DesignationLookupHandler::new(management.clone()))
        .register::<ReportingLevelLookup, _>(lookups::ReportingLevelLookupHandler::new(
            management.clone(),
        ))
        .register::<ExistingUserDetails, _>(lookups::ExistingUserDetailsHandler::new(
            management.clone(),
        ))
        .register::<UserTranslanderLookup, _>(lookups::UserTranslanderLookupHandler::new(
            management,
        ))
        .build()
}
