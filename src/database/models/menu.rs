use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct UserMenu {
    pub menu_id: i64,
    pub menu_name: String,
    pub parent_menu_id: Option<i64>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub display_order: i32,
}
