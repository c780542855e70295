use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::state_change::RequestStatus;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WithdrawalRequest {
    pub id: i32,
    pub member_id: i32,
    pub member_name: String,
    pub reason: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<String>,
    pub reject_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WithdrawalInsert {
    pub member_id: i32,
    pub member_name: String,
    pub reason: String,
}
