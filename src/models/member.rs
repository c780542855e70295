use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Active,
    Inactive,
    Withdrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "calendar_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    Solar,
    Lunar,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub salt: String,
    pub name: String,
    pub nickname: Option<String>,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub calendar_type: Option<CalendarType>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub status: MemberStatus,
    pub role: MemberRole,
    pub has_joined_kakao: bool,
    pub has_completed_onboarding: bool,
    pub version: i32,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MemberInsert {
    pub email: String,
    pub password: String,
    pub salt: String,
    pub name: String,
    pub nickname: Option<String>,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub calendar_type: Option<CalendarType>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub status: MemberStatus,
    pub role: MemberRole,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub calendar_type: Option<CalendarType>,
    pub gender: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberQuery {
    pub status: Option<MemberStatus>,
    pub role: Option<MemberRole>,
}
