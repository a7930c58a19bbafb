use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::digest_password;
use crate::database::models::{NewUser, SaveStatus, User, UserMenu};
use crate::database::{UserManagementRepository, UserRepository};
use crate::dispatch::{Handler, Request, RequestKind};
use crate::services::ServiceError;

#[derive(Debug, Clone)]
pub struct UserMenus {
    pub user_id: i64,
}

impl Request for UserMenus {
    type Output = Vec<UserMenu>;
    const KIND: RequestKind = RequestKind::UserMenus;
}

pub struct UserMenusHandler {
    users: Arc<dyn UserRepository>,
}

impl UserMenusHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<UserMenus> for UserMenusHandler {
    async fn handle(&self, request: UserMenus) -> Result<Vec<UserMenu>, ServiceError> {
        Ok(self.users.user_menus(request.user_id).await?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AllUsers {
    pub company_id: Option<i64>,
}

impl Request for AllUsers {
    type Output = Vec<User>;
    const KIND: RequestKind = RequestKind::AllUsers;
}

pub struct AllUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl AllUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<AllUsers> for AllUsersHandler {
    async fn handle(&self, request: AllUsers) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.all_users(request.company_id).await?)
    }
}

#[derive(Debug, Clone)]
pub struct DeactivateUser {
    pub user_id: i64,
}

impl Request for DeactivateUser {
    type Output = SaveStatus;
    const KIND: RequestKind = RequestKind::DeactivateUser;
}

pub struct DeactivateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl DeactivateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<DeactivateUser> for DeactivateUserHandler {
    async fn handle(&self, request: DeactivateUser) -> Result<SaveStatus, ServiceError> {
        Ok(self.users.deactivate_user(request.user_id).await?)
    }
}

/// Create a user. `password` arrives in plaintext and is digested here.
#[derive(Debug, Clone)]
pub struct InsertUser(pub NewUser);

impl Request for InsertUser {
    type Output = SaveStatus;
    const KIND: RequestKind = RequestKind::InsertUser;
}

pub struct InsertUserHandler {
    management: Arc<dyn UserManagementRepository>,
}

impl InsertUserHandler {
    pub fn new(management: Arc<dyn UserManagementRepository>) -> Self {
        Self { management }
    }
}

#[async_trait]
impl Handler<InsertUser> for InsertUserHandler {
    async fn handle(&self, request: InsertUser) -> Result<SaveStatus, ServiceError> {
        let mut user = request.0;
        user.password = digest_password(&user.password);
        Ok(self.management.insert_user(&user).await?)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub user_id: i64,
    pub details: NewUser,
}

impl Request for UpdateUser {
    type Output = SaveStatus;
    const KIND: RequestKind = RequestKind::UpdateUser;
}

pub struct UpdateUserHandler {
    management: Arc<dyn UserManagementRepository>,
}

impl UpdateUserHandler {
    pub fn new(management: Arc<dyn UserManagementRepository>) -> Self {
        Self { management }
    }
}

#[async_trait]
impl Handler<UpdateUser> for UpdateUserHandler {
    async fn handle(&self, request: UpdateUser) -> Result<SaveStatus, ServiceError> {
        let mut details = request.details;
        details.password = digest_password(&details.password);
        Ok(self.management.update_user(request.user_id, &details).await?)
    }
}
