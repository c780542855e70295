use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Stage of the intake pipeline. One row per pending member; the stage
/// column is the discriminant of the applicant state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "application_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStage {
    ReferrerPending,
    ReferrerRejected,
    AdminPending,
    AdminRejected,
    Approved,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: i32,
    pub member_id: i32,
    pub referrer_name: String,
    pub motivation: String,
    pub strokes: Vec<String>,
    pub stage: ApplicationStage,
    pub agreed_suitability: Option<bool>,
    pub agreed_mentoring: Option<bool>,
    pub agreed_cap_provision: Option<bool>,
    pub referrer_reject_reason: Option<String>,
    pub referrer_processed_by: Option<String>,
    pub referrer_processed_at: Option<DateTime<Utc>>,
    pub admin_reject_reason: Option<String>,
    pub admin_processed_by: Option<String>,
    pub admin_processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ApplicationInsert {
    pub member_id: i32,
    pub referrer_name: String,
    pub motivation: String,
    pub strokes: Vec<String>,
}

/// Full set of mutable columns. Core loads the row, rewrites the fields it
/// needs and hands the whole thing back to the store.
#[derive(Debug, Clone)]
pub struct ApplicationUpdate {
    pub referrer_name: String,
    pub motivation: String,
    pub strokes: Vec<String>,
    pub stage: ApplicationStage,
    pub agreed_suitability: Option<bool>,
    pub agreed_mentoring: Option<bool>,
    pub agreed_cap_provision: Option<bool>,
    pub referrer_reject_reason: Option<String>,
    pub referrer_processed_by: Option<String>,
    pub referrer_processed_at: Option<DateTime<Utc>>,
    pub admin_reject_reason: Option<String>,
    pub admin_processed_by: Option<String>,
    pub admin_processed_at: Option<DateTime<Utc>>,
}

impl From<&Application> for ApplicationUpdate {
    fn from(app: &Application) -> Self {
        ApplicationUpdate {
            referrer_name: app.referrer_name.clone(),
            motivation: app.motivation.clone(),
            strokes: app.strokes.clone(),
            stage: app.stage,
            agreed_suitability: app.agreed_suitability,
            agreed_mentoring: app.agreed_mentoring,
            agreed_cap_provision: app.agreed_cap_provision,
            referrer_reject_reason: app.referrer_reject_reason.clone(),
            referrer_processed_by: app.referrer_processed_by.clone(),
            referrer_processed_at: app.referrer_processed_at,
            admin_reject_reason: app.admin_reject_reason.clone(),
            admin_processed_by: app.admin_processed_by.clone(),
            admin_processed_at: app.admin_processed_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationQuery {
    pub stage: Option<ApplicationStage>,
    pub referrer_name: Option<String>,
}
