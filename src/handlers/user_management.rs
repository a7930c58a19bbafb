use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::models::{Lookup, NewUser, ReportingLevel, UserDetails, UserTranslander};
use crate::dispatch::Dispatcher;
use crate::handlers::{messages, required, Payload};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{
    DesignationLookup, ExistingUserDetails, InsertUser, ReportingLevelLookup, ServiceError,
    UpdateUser, UserLevelLookup, UserTranslanderLookup,
};

/// Shared body of the lookup endpoints. Each endpoint reads the fields it needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LookupFilter {
    pub user_id: Option<i64>,
    pub company_id: Option<i64>,
    pub user_level_id: Option<i64>,
    pub prefix: Option<String>,
}

/// Create/update body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDetailsModel {
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub company_id: Option<i64>,
    pub user_level_id: Option<i64>,
    pub designation_id: Option<i64>,
    pub reporting_to: Option<i64>,
    pub identity_document_no: Option<String>,
    pub tax_id: Option<String>,
    pub created_by: Option<i64>,
}

impl UserDetailsModel {
    pub fn into_new_user(self) -> Result<NewUser, ServiceError> {
        Ok(NewUser {
            user_name: required(self.user_name, "UserName")?,
            password: required(self.password, "Password")?,
            company_id: required(self.company_id, "CompanyId")?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            mobile_no: self.mobile_no,
            user_level_id: self.user_level_id,
            designation_id: self.designation_id,
            reporting_to: self.reporting_to,
            identity_document_no: self.identity_document_no,
            tax_id: self.tax_id,
            created_by: self.created_by,
        })
    }
}

/// POST /api/UserManagement/GetUserlevelLookup
pub async fn user_level_lookup(
    State(dispatcher): State<Arc<Dispatcher>>,
    Payload(filter): Payload<LookupFilter>,
) -> ApiResult<Vec<Lookup>> {
    let request = UserLevelLookup {
        user_id: required(filter.user_id, "UserId")?,
        company_id: required(filter.company_id, "CompanyId")?,
    };
    Ok(ApiResponse::success(dispatcher.send(request).await?))
}

/// POST /api/UserManagement/GetUserdesignationlevel
pub async fn designation_lookup(
    State(dispatcher): State<Arc<Dispatcher>>,
    Payload(filter): Payload<LookupFilter>,
) -> ApiResult<Vec<Lookup>> {
    let request = DesignationLookup {
        company_id: required(filter.company_id, "CompanyId")?,
        prefix: filter.prefix,
    };
    Ok(ApiResponse::success(dispatcher.send(request).await?))
}

/// POST /api/UserManagement/GetUserreportinglevel
pub async fn reporting_level_lookup(
    State(dispatcher): State<Arc<Dispatcher>>,
    Payload(filter): Payload<LookupFilter>,
) -> ApiResult<Vec<ReportingLevel>> {
    let request = ReportingLevelLookup {
        company_id: required(filter.company_id, "CompanyId")?,
        user_level_id: filter.user_level_id,
        prefix: filter.prefix,
    };
    Ok(ApiResponse::success(dispatcher.send(request).await?))
}

/// POST /api/UserManagement/GetExistingUserDetails
///
/// An unknown user is a successful call with a null message.
pub async fn existing_user_details(
    State(dispatcher): State<Arc<Dispatcher>>,
    Payload(filter): Payload<LookupFilter>,
) -> ApiResult<Option<UserDetails>> {
    let request = ExistingUserDetails {
        user_id: required(filter.user_id, "UserId")?,
        company_id: required(filter.company_id, "CompanyId")?,
    };
    Ok(ApiResponse::success(dispatcher.send(request).await?))
}

/// POST /api/UserManagement/GetUserTranslander
pub async fn user_translander(
    State(dispatcher): State<Arc<Dispatcher>>,
    Payload(filter): Payload<LookupFilter>,
) -> ApiResult<Vec<UserTranslander>> {
    let request = UserTranslanderLookup {
        company_id: required(filter.company_id, "CompanyId")?,
        prefix: filter.prefix,
    };
    Ok(ApiResponse::success(dispatcher.send(request).await?))
}

/// POST /api/UserManagement/UserInsert
pub async fn user_insert(
    State(dispatcher): State<Arc<Dispatcher>>,
    Extension(caller): Extension<AuthUser>,
    Payload(model): Payload<UserDetailsModel>,
) -> ApiResult<&'static str> {
    let user = model.into_new_user()?;
    let user_name = user.user_name.clone();
    let status = dispatcher.send(InsertUser(user)).await?;

    if status.is_ok() {
        tracing::info!("User {} created by {}", user_name, caller);
        return Ok(ApiResponse::success(messages::USER_CREATED));
    }

    tracing::warn!(
        "Creating user {} for {} returned status {} ({:?})",
        user_name,
        caller,
        status.code(),
        status
    );
    Ok(ApiResponse::error(messages::USER_CREATE_FAILED))
}

/// POST /api/UserManagement/UserUpdate
pub async fn user_update(
    State(dispatcher): State<Arc<Dispatcher>>,
    Extension(caller): Extension<AuthUser>,
    Payload(mut model): Payload<UserDetailsModel>,
) -> ApiResult<&'static str> {
    let user_id = required(model.user_id.take(), "UserId")?;
    let details = model.into_new_user()?;
    let status = dispatcher.send(UpdateUser { user_id, details }).await?;

    if status.is_ok() {
        tracing::info!("User {} updated by {}", user_id, caller);
        return Ok(ApiResponse::success(messages::USER_UPDATED));
    }

    tracing::warn!("Updating user {} for {} returned status {}", user_id, caller, status.code());
    Ok(ApiResponse::error(messages::USER_UPDATE_FAILED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_requires_name_password_and_company() {
        let model: UserDetailsModel = serde_json::from_value(serde_json::json!({
            "UserName": "bob",
            "Password": "pw",
        }))
        .unwrap();

        let err = model.into_new_user().unwrap_err();
        assert!(matches!(err, ServiceError::MissingArgument("CompanyId")));
    }

    #[test]
    fn model_password_is_not_serialized() {
        let model = UserDetailsModel {
            user_name: Some("bob".into()),
            password: Some("pw".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["UserName"], "bob");
        assert!(value.get("Password").is_none());
    }
}
