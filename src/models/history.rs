use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::member::MemberStatus;

/// Audit trail, appended on every member status mutation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusChange {
    pub id: i32,
    pub member_id: i32,
    pub from_status: MemberStatus,
    pub to_status: MemberStatus,
    pub changed_by: String,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StatusChangeInsert {
    pub member_id: i32,
    pub from_status: MemberStatus,
    pub to_status: MemberStatus,
    pub changed_by: String,
    pub note: Option<String>,
}
