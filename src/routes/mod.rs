pub mod auth;
pub mod groceries;
pub mod health;
pub mod metrics;
pub mod recipes;
pub mod weekly_menus;

use serde::Deserialize;

/// Query params for the per-user list endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: String,
}
