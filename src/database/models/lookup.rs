use serde::Serialize;
use sqlx::FromRow;

/// Id/name pair used by the user level and designation dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Lookup {
    pub id: i64,
    pub name: String,
}

/// One user in the reporting hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct ReportingLevel {
    pub user_id: i64,
    pub user_name: String,
    pub user_level_id: Option<i64>,
    pub reports_to: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct UserTranslander {
    pub user_id: i64,
    pub user_name: String,
    pub full_name: Option<String>,
}
