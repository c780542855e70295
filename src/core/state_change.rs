use chrono::Utc;
use serde::Deserialize;

use crate::core::capacity;
use crate::core::db::{HistoryCommon, MemberCommon, SettingsCommon, StateChangeCommon, Storer, TxStorer, WithdrawalCommon};
use crate::core::member::require_admin;
use crate::error::Error;
use crate::models::history::StatusChangeInsert;
use crate::models::member::{Member, MemberStatus};
use crate::models::state_change::{DecisionRecord, RequestQuery, RequestStatus, StateChange, StateChangeInsert};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject { reason: String },
}

pub(crate) async fn require_standing_member<S>(db: &mut S, member_id: i32) -> Result<Member, Error>
where
    S: Storer,
{
    let member = MemberCommon::get(db, member_id).await?.ok_or(Error::NotFound)?;
    match member.status {
        MemberStatus::Active | MemberStatus::Inactive => Ok(member),
        status => Err(Error::InvalidState(format!("member is {:?}, not in standing", status).to_lowercase())),
    }
}

pub(crate) async fn ensure_no_pending_request<S>(db: &mut S, member_id: i32) -> Result<(), Error>
where
    S: Storer,
{
    if StateChangeCommon::has_pending(db, member_id).await? || WithdrawalCommon::has_pending(db, member_id).await? {
        return Err(Error::AlreadyPending);
    }
    Ok(())
}

/// A member asks to flip between active and inactive. The current status is
/// snapshotted onto the request so the decider can detect staleness.
pub async fn request<T>(mut db: T, member_id: i32, requested_status: MemberStatus, reason: String) -> Result<StateChange, Error>
where
    T: TxStorer,
{
    let member = require_standing_member(&mut db, member_id).await?;
    if !matches!(requested_status, MemberStatus::Active | MemberStatus::Inactive) {
        return Err(Error::ValidationFailed("only active and inactive can be requested".into()));
    }
    if requested_status == member.status {
        return Err(Error::ValidationFailed("requested status equals current status".into()));
    }
    if reason.trim().is_empty() {
        return Err(Error::ValidationFailed("a reason is required".into()));
    }
    ensure_no_pending_request(&mut db, member_id).await?;
    let id = StateChangeCommon::insert(
        &mut db,
        StateChangeInsert {
            member_id,
            member_name: member.name,
            current_status: member.status,
            requested_status,
            reason,
        },
    )
    .await?;
    let created = StateChangeCommon::get(&mut db, id).await?.ok_or(Error::NotFound)?;
    db.commit().await?;
    Ok(created)
}

/// Admin decision on a pending state change. Approval re-validates the
/// member against the snapshot and re-checks capacity at decision time.
pub async fn decide<T>(mut db: T, id: i32, actor_id: i32, decision: Decision) -> Result<(), Error>
where
    T: TxStorer,
{
    let actor = require_admin(&mut db, actor_id).await?;
    let sc = StateChangeCommon::get_for_update(&mut db, id).await?.ok_or(Error::NotFound)?;
    if sc.status != RequestStatus::Pending {
        return Err(Error::AlreadyProcessed);
    }
    match decision {
        Decision::Approve => {
            let member = MemberCommon::get_for_update(&mut db, sc.member_id)
                .await?
                .ok_or_else(|| Error::InvalidState("member no longer exists".into()))?;
            if member.status != sc.current_status {
                return Err(Error::InvalidState("member status changed since the request was made".into()));
            }
            if sc.requested_status == MemberStatus::Active {
                let settings = SettingsCommon::get_for_update(&mut db).await?;
                if capacity::remaining_slots(&mut db, &settings).await? <= 0 {
                    return Err(Error::CapacityFull);
                }
            }
            MemberCommon::set_status(&mut db, sc.member_id, sc.requested_status).await?;
            HistoryCommon::insert(
                &mut db,
                StatusChangeInsert {
                    member_id: sc.member_id,
                    from_status: sc.current_status,
                    to_status: sc.requested_status,
                    changed_by: actor.name.clone(),
                    note: Some(format!("state change request {}", sc.id)),
                },
            )
            .await?;
            StateChangeCommon::set_decision(
                &mut db,
                id,
                DecisionRecord {
                    status: RequestStatus::Approved,
                    processed_by: actor.name,
                    processed_at: Utc::now(),
                    reject_reason: None,
                },
            )
            .await?;
        }
        Decision::Reject { reason } => {
            if reason.trim().is_empty() {
                return Err(Error::ValidationFailed("a reject reason is required".into()));
            }
            StateChangeCommon::set_decision(
                &mut db,
                id,
                DecisionRecord {
                    status: RequestStatus::Rejected,
                    processed_by: actor.name,
                    processed_at: Utc::now(),
                    reject_reason: Some(reason),
                },
            )
            .await?;
        }
    }
    db.commit().await?;
    Ok(())
}

pub async fn list<S>(db: &mut S, param: RequestQuery, page: i64, size: i64) -> Result<(Vec<StateChange>, i64), Error>
where
    S: Storer,
{
    let total = StateChangeCommon::count(db, &param).await?;
    let list = StateChangeCommon::query(db, &param, page, size).await?;
    Ok((list, total))
}
