use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use crate::models::member::MemberStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StateChange {
    pub id: i32,
    pub member_id: i32,
    pub member_name: String,
    pub current_status: MemberStatus,
    pub requested_status: MemberStatus,
    pub reason: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<String>,
    pub reject_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StateChangeInsert {
    pub member_id: i32,
    pub member_name: String,
    pub current_status: MemberStatus,
    pub requested_status: MemberStatus,
    pub reason: String,
}

/// Terminal decision written onto a pending queue row.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub status: RequestStatus,
    pub processed_by: String,
    pub processed_at: DateTime<Utc>,
    pub reject_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub member_id: Option<i32>,
}
