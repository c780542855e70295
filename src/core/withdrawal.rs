use chrono::Utc;

use crate::core::db::{HistoryCommon, MemberCommon, Storer, TxStorer, WithdrawalCommon};
use crate::core::member::require_admin;
use crate::core::state_change::{ensure_no_pending_request, require_standing_member, Decision};
use crate::error::Error;
use crate::models::history::StatusChangeInsert;
use crate::models::member::MemberStatus;
use crate::models::state_change::{DecisionRecord, RequestQuery, RequestStatus};
use crate::models::withdrawal::{WithdrawalInsert, WithdrawalRequest};

pub async fn request<T>(mut db: T, member_id: i32, reason: String) -> Result<WithdrawalRequest, Error>
where
    T: TxStorer,
{
    let member = require_standing_member(&mut db, member_id).await?;
    if reason.trim().is_empty() {
        return Err(Error::ValidationFailed("a reason is required".into()));
    }
    ensure_no_pending_request(&mut db, member_id).await?;
    let id = WithdrawalCommon::insert(
        &mut db,
        WithdrawalInsert {
            member_id,
            member_name: member.name,
            reason,
        },
    )
    .await?;
    let created = WithdrawalCommon::get(&mut db, id).await?.ok_or(Error::NotFound)?;
    db.commit().await?;
    Ok(created)
}

/// Approval is unconditional and terminal: the member becomes withdrawn and
/// can only come back through a fresh application.
pub async fn decide<T>(mut db: T, id: i32, actor_id: i32, decision: Decision) -> Result<(), Error>
where
    T: TxStorer,
{
    let actor = require_admin(&mut db, actor_id).await?;
    let req = WithdrawalCommon::get_for_update(&mut db, id).await?.ok_or(Error::NotFound)?;
    if req.status != RequestStatus::Pending {
        return Err(Error::AlreadyProcessed);
    }
    match decision {
        Decision::Approve => {
            let member = MemberCommon::get_for_update(&mut db, req.member_id)
                .await?
                .ok_or_else(|| Error::InvalidState("member no longer exists".into()))?;
            if !matches!(member.status, MemberStatus::Active | MemberStatus::Inactive) {
                return Err(Error::InvalidState("member is no longer in standing".into()));
            }
            MemberCommon::set_status(&mut db, req.member_id, MemberStatus::Withdrawn).await?;
            HistoryCommon::insert(
                &mut db,
                StatusChangeInsert {
                    member_id: req.member_id,
                    from_status: member.status,
                    to_status: MemberStatus::Withdrawn,
                    changed_by: actor.name.clone(),
                    note: Some(format!("withdrawal request {}", req.id)),
                },
            )
            .await?;
            WithdrawalCommon::set_decision(
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
            WithdrawalCommon::set_decision(
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

pub async fn list<S>(db: &mut S, param: RequestQuery, page: i64, size: i64) -> Result<(Vec<WithdrawalRequest>, i64), Error>
where
    S: Storer,
{
    let total = WithdrawalCommon::count(db, &param).await?;
    let list = WithdrawalCommon::query(db, &param, page, size).await?;
    Ok((list, total))
}
