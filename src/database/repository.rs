use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Lookup, NewUser, ReportingLevel, SaveStatus, User, UserDetails, UserMenu, UserTranslander,
};

/// Account and session related procedures
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn user_by_user_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError>;

    async fn user_menus(&self, user_id: i64) -> Result<Vec<UserMenu>, DatabaseError>;

    async fn all_users(&self, company_id: Option<i64>) -> Result<Vec<User>, DatabaseError>;

    /// Soft-disable; users are never removed
    async fn deactivate_user(&self, user_id: i64) -> Result<SaveStatus, DatabaseError>;
}

/// Lookup and user maintenance procedures
#[async_trait]
pub trait UserManagementRepository: Send + Sync {
    async fn user_levels(&self, user_id: i64, company_id: i64) -> Result<Vec<Lookup>, DatabaseError>;

    async fn designations(
        &self,
        company_id: i64,
        prefix: Option<&str>,
    ) -> Result<Vec<Lookup>, DatabaseError>;

    async fn reporting_levels(
        &self,
        company_id: i64,
        user_level_id: Option<i64>,
        prefix: Option<&str>,
    ) -> Result<Vec<ReportingLevel>, DatabaseError>;

    async fn existing_user_details(
        &self,
        user_id: i64,
        company_id: i64,
    ) -> Result<Option<UserDetails>, DatabaseError>;

    async fn user_translanders(
        &self,
        company_id: i64,
        prefix: Option<&str>,
    ) -> Result<Vec<UserTranslander>, DatabaseError>;

    async fn insert_user(&self, user: &NewUser) -> Result<SaveStatus, DatabaseError>;

    async fn update_user(&self, user_id: i64, user: &NewUser) -> Result<SaveStatus, DatabaseError>;
}

/// Stored procedure access over a shared PostgreSQL pool
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn user_by_user_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT * FROM fos_get_user_by_username($1)")
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_get_user_by_username"))
    }

    async fn user_menus(&self, user_id: i64) -> Result<Vec<UserMenu>, DatabaseError> {
        sqlx::query_as::<_, UserMenu>("SELECT * FROM fos_get_user_menus($1)")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_get_user_menus"))
    }

    async fn all_users(&self, company_id: Option<i64>) -> Result<Vec<User>, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT * FROM fos_get_all_users($1)")
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_get_all_users"))
    }

    async fn deactivate_user(&self, user_id: i64) -> Result<SaveStatus, DatabaseError> {
        let code: i32 = sqlx::query_scalar("SELECT fos_deactivate_user($1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_deactivate_user"))?;
        Ok(SaveStatus::from_code(code))
    }
}

#[async_trait]
impl UserManagementRepository for PgRepository {
    async fn user_levels(&self, user_id: i64, company_id: i64) -> Result<Vec<Lookup>, DatabaseError> {
        sqlx::query_as::<_, Lookup>("SELECT * FROM fos_get_user_level_lookup($1, $2)")
            .bind(user_id)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_get_user_level_lookup"))
    }

    async fn designations(
        &self,
        company_id: i64,
        prefix: Option<&str>,
    ) -> Result<Vec<Lookup>, DatabaseError> {
        sqlx::query_as::<_, Lookup>("SELECT * FROM fos_get_designation_lookup($1, $2)")
            .bind(company_id)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_get_designation_lookup"))
    }

    async fn reporting_levels(
        &self,
        company_id: i64,
        user_level_id: Option<i64>,
        prefix: Option<&str>,
    ) -> Result<Vec<ReportingLevel>, DatabaseError> {
        sqlx::query_as::<_, ReportingLevel>("SELECT * FROM fos_get_reporting_levels($1, $2, $3)")
            .bind(company_id)
            .bind(user_level_id)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_get_reporting_levels"))
    }

    async fn existing_user_details(
        &self,
        user_id: i64,
        company_id: i64,
    ) -> Result<Option<UserDetails>, DatabaseError> {
        sqlx::query_as::<_, UserDetails>("SELECT * FROM fos_get_user_details($1, $2)")
            .bind(user_id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_get_user_details"))
    }

    async fn user_translanders(
        &self,
        company_id: i64,
        prefix: Option<&str>,
    ) -> Result<Vec<UserTranslander>, DatabaseError> {
        sqlx::query_as::<_, UserTranslander>("SELECT * FROM fos_get_user_translanders($1, $2)")
            .bind(company_id)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::procedure("fos_get_user_translanders"))
    }

    async fn insert_user(&self, user: &NewUser) -> Result<SaveStatus, DatabaseError> {
        let code: i32 = sqlx::query_scalar(
            "SELECT fos_insert_user($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&user.user_name)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.mobile_no)
        .bind(user.company_id)
        .bind(user.user_level_id)
        .bind(user.designation_id)
        .bind(user.reporting_to)
        .bind(&user.identity_document_no)
        .bind(&user.tax_id)
        .bind(user.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::procedure("fos_insert_user"))?;

        Ok(SaveStatus::from_code(code))
    }

    async fn update_user(&self, user_id: i64, user: &NewUser) -> Result<SaveStatus, DatabaseError> {
        let code: i32 = sqlx::query_scalar(
            "SELECT fos_update_user($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(user_id)
        .bind(&user.user_name)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.mobile_no)
        .bind(user.company_id)
        .bind(user.user_level_id)
        .bind(user.designation_id)
        .bind(user.reporting_to)
        .bind(&user.identity_document_no)
        .bind(&user.tax_id)
        .bind(user.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::procedure("fos_update_user"))?;

        Ok(SaveStatus::from_code(code))
    }
}
