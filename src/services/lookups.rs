// Read-only reference lists. Each handler is a single repository call.

use async_trait::async_trait;
use std::sync::Arc;

use crate::database::models::{Lookup, ReportingLevel, UserDetails, UserTranslander};
use crate::database::UserManagementRepository;
use crate::dispatch::{Handler, Request, RequestKind};
use crate::services::ServiceError;

#[derive(Debug, Clone)]
pub struct UserLevelLookup {
    pub user_id: i64,
    pub company_id: i64,
}

impl Request for UserLevelLookup {
    type Output = Vec<Lookup>;
    const KIND: RequestKind = RequestKind::UserLevelLookup;
}

#[derive(Debug, Clone)]
pub struct DesignationLookup {
    pub company_id: i64,
    pub prefix: Option<String>,
}

impl Request for DesignationLookup {
    type Output = Vec<Lookup>;
    const KIND: RequestKind = RequestKind::DesignationLookup;
}

#[derive(Debug, Clone)]
pub struct ReportingLevelLookup {
    pub company_id: i64,
    pub user_level_id: Option<i64>,
    pub prefix: Option<String>,
}

impl Request for ReportingLevelLookup {
    type Output = Vec<ReportingLevel>;
    const KIND: RequestKind = RequestKind::ReportingLevelLookup;
}

#[derive(Debug, Clone)]
pub struct ExistingUserDetails {
    pub user_id: i64,
    pub company_id: i64,
}

impl Request for ExistingUserDetails {
    type Output = Option<UserDetails>;
    const KIND: RequestKind = RequestKind::ExistingUserDetails;
}

#[derive(Debug, Clone)]
pub struct UserTranslanderLookup {
    pub company_id: i64,
    pub prefix: Option<String>,
}

impl Request for UserTranslanderLookup {
    type Output = Vec<UserTranslander>;
    const KIND: RequestKind = RequestKind::UserTranslanderLookup;
}

macro_rules! management_handler {
    ($handler:ident) => {
        pub struct $handler {
            management: Arc<dyn UserManagementRepository>,
        }

        impl $handler {
            pub fn new(management: Arc<dyn UserManagementRepository>) -> Self {
                Self { management }
            }
        }
    };
}

management_handler!(UserLevelLookupHandler);
management_handler!(DesignationLookupHandler);
management_handler!(ReportingLevelLookupHandler);
management_handler!(ExistingUserDetailsHandler);
management_handler!(UserTranslanderLookupHandler);

#[async_trait]
impl Handler<UserLevelLookup> for UserLevelLookupHandler {
    async fn handle(&self, request: UserLevelLookup) -> Result<Vec<Lookup>, ServiceError> {
        Ok(self
            .management
            .user_levels(request.user_id, request.company_id)
            .await?)
    }
}

#[async_trait]
impl Handler<DesignationLookup> for DesignationLookupHandler {
    async fn handle(&self, request: DesignationLookup) -> Result<Vec<Lookup>, ServiceError> {
        Ok(self
            .management
            .designations(request.company_id, request.prefix.as_deref())
            .await?)
    }
}

#[async_trait]
impl Handler<ReportingLevelLookup> for ReportingLevelLookupHandler {
    async fn handle(&self, request: ReportingLevelLookup) -> Result<Vec<ReportingLevel>, ServiceError> {
        Ok(self
            .management
            .reporting_levels(request.company_id, request.user_level_id, request.prefix.as_deref())
            .await?)
    }
}

#[async_trait]
impl Handler<ExistingUserDetails> for ExistingUserDetailsHandler {
    async fn handle(&self, request: ExistingUserDetails) -> Result<Option<UserDetails>, ServiceError> {
        Ok(self
            .management
            .existing_user_details(request.user_id, request.company_id)
            .await?)
    }
}

#[async_trait]
impl Handler<UserTranslanderLookup> for UserTranslanderLookupHandler {
    async fn handle(&self, request: UserTranslanderLookup) -> Result<Vec<UserTranslander>, ServiceError> {
        Ok(self
            .management
            .user_translanders(request.company_id, request.prefix.as_deref())
            .await?)
    }
}
