use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_action")]
pub enum ActivityAction {
    Added,
    Edited,
    Deleted,
    Transaction,
    Alert,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: i32,
    pub item_name: String,
    pub action: ActivityAction,
    pub user_id: Option<i32>,
    pub timestamp: DateTime<Utc>,
    pub details: Option<String>,
    pub user_name: Option<String>,
    pub user_role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivityLog {
    pub item_name: String,
    pub action: ActivityAction,
    pub user_id: i32,
    pub details: Option<String>,
}
