use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::core::auth::{hash_password, random_salt};
use crate::core::capacity;
use crate::core::db::{ApplicationCommon, ChecklistCommon, HistoryCommon, MemberCommon, SettingsCommon, Storer, TxStorer};
use crate::core::member::require_admin;
use crate::core::state_change::Decision;
use crate::error::Error;
use crate::models::application::{Application, ApplicationInsert, ApplicationQuery, ApplicationUpdate, ApplicationStage};
use crate::models::history::StatusChangeInsert;
use crate::models::member::{CalendarType, Member, MemberInsert, MemberRole, MemberStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSubmit {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub nickname: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub calendar_type: Option<CalendarType>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub referrer_name: String,
    pub motivation: String,
    pub strokes: Vec<String>,
    /// Ids of the checklist items the applicant ticked off.
    #[serde(default)]
    pub acknowledged: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ReferrerDecision {
    Approve {
        agreed_suitability: bool,
        agreed_mentoring: bool,
        agreed_cap_provision: bool,
    },
    Reject {
        reason: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationEdit {
    pub motivation: Option<String>,
    pub strokes: Option<Vec<String>>,
    pub referrer_name: Option<String>,
}

fn validate_submission(data: &ApplicationSubmit) -> Result<(), Error> {
    if data.name.trim().is_empty() || data.email.trim().is_empty() || data.password.is_empty() || data.phone.trim().is_empty() {
        return Err(Error::ValidationFailed("name, email, password and phone are required".into()));
    }
    if data.referrer_name.trim().is_empty() {
        return Err(Error::ValidationFailed("a referrer is required".into()));
    }
    if data.strokes.is_empty() || data.strokes.iter().any(|s| s.trim().is_empty()) {
        return Err(Error::ValidationFailed("at least one swim stroke must be selected".into()));
    }
    if data.motivation.trim().is_empty() {
        return Err(Error::ValidationFailed("motivation must not be empty".into()));
    }
    Ok(())
}

/// Entry point of the intake pipeline: creates a pending member together
/// with its application row in stage referrer_pending. A withdrawn member
/// re-applying under the same email gets their row revived as a fresh
/// applicant; any other existing row is a duplicate.
pub async fn submit<T>(mut db: T, data: ApplicationSubmit) -> Result<Member, Error>
where
    T: TxStorer,
{
    validate_submission(&data)?;
    for item in ChecklistCommon::list(&mut db, true).await? {
        if !data.acknowledged.contains(&item.id) {
            return Err(Error::ValidationFailed(format!("checklist item not acknowledged: {}", item.label)));
        }
    }

    let salt = random_salt();
    let password = hash_password(&data.password, &salt);
    let member_id = match MemberCommon::get_by_email(&mut db, &data.email).await? {
        Some(existing) if existing.status == MemberStatus::Withdrawn => {
            // the concluded application of the previous membership makes
            // way for the new one
            if let Some(old) = ApplicationCommon::get_by_member(&mut db, existing.id).await? {
                ApplicationCommon::delete(&mut db, old.id).await?;
            }
            MemberCommon::update_credentials(&mut db, existing.id, password, salt).await?;
            MemberCommon::update_profile(
                &mut db,
                existing.id,
                crate::models::member::MemberPatch {
                    name: Some(data.name.clone()),
                    nickname: data.nickname.clone(),
                    phone: Some(data.phone.clone()),
                    birth_date: data.birth_date,
                    calendar_type: data.calendar_type,
                    gender: data.gender.clone(),
                    position: data.position.clone(),
                },
            )
            .await?;
            MemberCommon::set_status(&mut db, existing.id, MemberStatus::Pending).await?;
            existing.id
        }
        Some(_) => return Err(Error::DuplicateEmail),
        None => {
            MemberCommon::insert(
                &mut db,
                MemberInsert {
                    email: data.email.clone(),
                    password,
                    salt,
                    name: data.name.clone(),
                    nickname: data.nickname.clone(),
                    phone: data.phone.clone(),
                    birth_date: data.birth_date,
                    calendar_type: data.calendar_type,
                    gender: data.gender.clone(),
                    position: data.position.clone(),
                    status: MemberStatus::Pending,
                    role: MemberRole::Member,
                },
            )
            .await?
        }
    };
    ApplicationCommon::insert(
        &mut db,
        ApplicationInsert {
            member_id,
            referrer_name: data.referrer_name.clone(),
            motivation: data.motivation.clone(),
            strokes: data.strokes.clone(),
        },
    )
    .await?;
    let member = MemberCommon::get(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    db.commit().await?;
    Ok(member)
}

/// First approval stage. Only the member named as referrer may act, and
/// approval requires all three commitments.
pub async fn referrer_decide<T>(mut db: T, member_id: i32, actor_id: i32, decision: ReferrerDecision) -> Result<(), Error>
where
    T: TxStorer,
{
    let actor = MemberCommon::get(&mut db, actor_id).await?.ok_or(Error::NotAuthorized)?;
    let app = ApplicationCommon::get_by_member_for_update(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    if actor.name != app.referrer_name {
        return Err(Error::NotAuthorized);
    }
    if app.stage != ApplicationStage::ReferrerPending {
        return Err(Error::AlreadyProcessed);
    }
    let mut update = ApplicationUpdate::from(&app);
    match decision {
        ReferrerDecision::Approve {
            agreed_suitability,
            agreed_mentoring,
            agreed_cap_provision,
        } => {
            if !(agreed_suitability && agreed_mentoring && agreed_cap_provision) {
                return Err(Error::ValidationFailed("all three referrer commitments are required".into()));
            }
            update.stage = ApplicationStage::AdminPending;
            update.agreed_suitability = Some(true);
            update.agreed_mentoring = Some(true);
            update.agreed_cap_provision = Some(true);
        }
        ReferrerDecision::Reject { reason } => {
            if reason.trim().is_empty() {
                return Err(Error::ValidationFailed("a reject reason is required".into()));
            }
            update.stage = ApplicationStage::ReferrerRejected;
            update.referrer_reject_reason = Some(reason);
        }
    }
    update.referrer_processed_by = Some(actor.name);
    update.referrer_processed_at = Some(Utc::now());
    ApplicationCommon::update(&mut db, app.id, update).await?;
    db.commit().await?;
    Ok(())
}

/// Second approval stage. Admission is capacity-gated at decision time; a
/// full club leaves the application in admin_pending.
pub async fn admin_decide<T>(mut db: T, member_id: i32, actor_id: i32, decision: Decision) -> Result<(), Error>
where
    T: TxStorer,
{
    let actor = require_admin(&mut db, actor_id).await?;
    let app = ApplicationCommon::get_by_member_for_update(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    if app.stage != ApplicationStage::AdminPending {
        return Err(Error::AlreadyProcessed);
    }
    match decision {
        Decision::Approve => {
            let settings = SettingsCommon::get_for_update(&mut db).await?;
            if capacity::remaining_slots(&mut db, &settings).await? <= 0 {
                return Err(Error::CapacityFull);
            }
            MemberCommon::set_status(&mut db, member_id, MemberStatus::Active).await?;
            MemberCommon::set_onboarding(&mut db, member_id, false, false).await?;
            HistoryCommon::insert(
                &mut db,
                StatusChangeInsert {
                    member_id,
                    from_status: MemberStatus::Pending,
                    to_status: MemberStatus::Active,
                    changed_by: actor.name.clone(),
                    note: Some("application approved".into()),
                },
            )
            .await?;
            let mut update = ApplicationUpdate::from(&app);
            update.stage = ApplicationStage::Approved;
            update.admin_processed_by = Some(actor.name);
            update.admin_processed_at = Some(Utc::now());
            ApplicationCommon::update(&mut db, app.id, update).await?;
        }
        Decision::Reject { reason } => {
            if reason.trim().is_empty() {
                return Err(Error::ValidationFailed("a reject reason is required".into()));
            }
            let mut update = ApplicationUpdate::from(&app);
            update.stage = ApplicationStage::AdminRejected;
            update.admin_reject_reason = Some(reason);
            update.admin_processed_by = Some(actor.name);
            update.admin_processed_at = Some(Utc::now());
            ApplicationCommon::update(&mut db, app.id, update).await?;
        }
    }
    db.commit().await?;
    Ok(())
}

/// A rejected applicant may edit and go through the failed stage again.
/// The member id is retained; only the rejected stage is reset.
pub async fn resubmit<T>(mut db: T, member_id: i32, actor_id: i32, edits: ApplicationEdit) -> Result<(), Error>
where
    T: TxStorer,
{
    if actor_id != member_id {
        return Err(Error::NotAuthorized);
    }
    let app = ApplicationCommon::get_by_member_for_update(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    let mut update = ApplicationUpdate::from(&app);
    if let Some(motivation) = edits.motivation {
        if motivation.trim().is_empty() {
            return Err(Error::ValidationFailed("motivation must not be empty".into()));
        }
        update.motivation = motivation;
    }
    if let Some(strokes) = edits.strokes {
        if strokes.is_empty() || strokes.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::ValidationFailed("at least one swim stroke must be selected".into()));
        }
        update.strokes = strokes;
    }
    match app.stage {
        ApplicationStage::ReferrerRejected => {
            if let Some(referrer_name) = edits.referrer_name {
                if referrer_name.trim().is_empty() {
                    return Err(Error::ValidationFailed("a referrer is required".into()));
                }
                update.referrer_name = referrer_name;
            }
            update.stage = ApplicationStage::ReferrerPending;
            update.agreed_suitability = None;
            update.agreed_mentoring = None;
            update.agreed_cap_provision = None;
            update.referrer_reject_reason = None;
            update.referrer_processed_by = None;
            update.referrer_processed_at = None;
        }
        ApplicationStage::AdminRejected => {
            // referrer consent stands, only the admin stage restarts
            update.stage = ApplicationStage::AdminPending;
            update.admin_reject_reason = None;
            update.admin_processed_by = None;
            update.admin_processed_at = None;
        }
        _ => return Err(Error::AlreadyProcessed),
    }
    ApplicationCommon::update(&mut db, app.id, update).await?;
    db.commit().await?;
    Ok(())
}

/// A rejected applicant giving up. Irreversible purge of the member record
/// (the application row goes with it).
pub async fn withdraw<T>(mut db: T, member_id: i32, actor_id: i32) -> Result<(), Error>
where
    T: TxStorer,
{
    if actor_id != member_id {
        return Err(Error::NotAuthorized);
    }
    let app = ApplicationCommon::get_by_member_for_update(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    match app.stage {
        ApplicationStage::ReferrerRejected | ApplicationStage::AdminRejected => {
            MemberCommon::delete(&mut db, member_id).await?;
        }
        _ => return Err(Error::InvalidState("only a rejected application can be withdrawn".into())),
    }
    db.commit().await?;
    Ok(())
}

pub async fn list<S>(db: &mut S, param: ApplicationQuery, page: i64, size: i64) -> Result<(Vec<Application>, i64), Error>
where
    S: Storer,
{
    let total = ApplicationCommon::count(db, &param).await?;
    let list = ApplicationCommon::query(db, &param, page, size).await?;
    Ok((list, total))
}

pub async fn detail_for_member<S>(db: &mut S, member_id: i32) -> Result<Option<Application>, Error>
where
    S: Storer,
{
    ApplicationCommon::get_by_member(db, member_id).await
}
