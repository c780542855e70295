use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Process-wide configuration, a single row with id = 1. Mutable only by
/// admins; capacity-gated approvals lock it for the span of the decision.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemSettings {
    pub id: i32,
    pub max_capacity: i32,
    pub weekly_capacity: i32,
    pub include_inactive_in_capacity: bool,
    pub dormancy_period_weeks: i32,
    pub kakao_invite_link: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub max_capacity: Option<i32>,
    pub weekly_capacity: Option<i32>,
    pub include_inactive_in_capacity: Option<bool>,
    pub dormancy_period_weeks: Option<i32>,
    pub kakao_invite_link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    pub max_capacity: i32,
    pub weekly_capacity: i32,
    pub include_inactive_in_capacity: bool,
    pub dormancy_period_weeks: i32,
    pub kakao_invite_link: String,
}
