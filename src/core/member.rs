use crate::core::db::{HistoryCommon, MemberCommon, Storer, TxStorer};
use crate::error::Error;
use crate::models::history::{StatusChange, StatusChangeInsert};
use crate::models::member::{Member, MemberPatch, MemberQuery, MemberRole, MemberStatus};

pub(crate) async fn require_admin<S>(db: &mut S, actor_id: i32) -> Result<Member, Error>
where
    S: Storer,
{
    let actor = MemberCommon::get(db, actor_id).await?.ok_or(Error::NotAuthorized)?;
    if actor.role != MemberRole::Admin {
        return Err(Error::NotAuthorized);
    }
    Ok(actor)
}

pub async fn list_members<S>(db: &mut S, param: MemberQuery, page: i64, size: i64) -> Result<(Vec<Member>, i64), Error>
where
    S: Storer,
{
    let total = MemberCommon::count(db, &param).await?;
    let members = MemberCommon::query(db, &param, page, size).await?;
    Ok((members, total))
}

pub async fn member_detail<S>(db: &mut S, id: i32) -> Result<Member, Error>
where
    S: Storer,
{
    MemberCommon::get(db, id).await?.ok_or(Error::NotFound)
}

pub async fn status_history<S>(db: &mut S, actor_id: i32, member_id: i32) -> Result<Vec<StatusChange>, Error>
where
    S: Storer,
{
    require_admin(db, actor_id).await?;
    HistoryCommon::list_for_member(db, member_id).await
}

/// Profile edits are allowed for the member themselves and for admins.
pub async fn update_profile<T>(mut db: T, member_id: i32, actor_id: i32, patch: MemberPatch) -> Result<(), Error>
where
    T: TxStorer,
{
    if actor_id != member_id {
        require_admin(&mut db, actor_id).await?;
    }
    MemberCommon::get_for_update(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    MemberCommon::update_profile(&mut db, member_id, patch).await?;
    db.commit().await?;
    Ok(())
}

pub async fn update_onboarding<T>(mut db: T, member_id: i32, actor_id: i32, kakao: Option<bool>, onboarding: Option<bool>) -> Result<(), Error>
where
    T: TxStorer,
{
    if actor_id != member_id {
        require_admin(&mut db, actor_id).await?;
    }
    let member = MemberCommon::get_for_update(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    if member.status != MemberStatus::Active {
        return Err(Error::InvalidState("onboarding flags belong to active members".into()));
    }
    MemberCommon::set_onboarding(
        &mut db,
        member_id,
        kakao.unwrap_or(member.has_joined_kakao),
        onboarding.unwrap_or(member.has_completed_onboarding),
    )
    .await?;
    db.commit().await?;
    Ok(())
}

/// Administrative escape hatch: set a member's status directly, bypassing
/// the request queues. Pending requests referencing the member are left in
/// place; the deciders re-validate against the live status.
pub async fn override_status<T>(mut db: T, member_id: i32, actor_id: i32, new_status: MemberStatus, note: Option<String>) -> Result<(), Error>
where
    T: TxStorer,
{
    let actor = require_admin(&mut db, actor_id).await?;
    if new_status == MemberStatus::Pending {
        return Err(Error::ValidationFailed("members cannot be moved back into the intake pipeline".into()));
    }
    let member = MemberCommon::get_for_update(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    if member.status == new_status {
        return Err(Error::ValidationFailed("status unchanged".into()));
    }
    MemberCommon::set_status(&mut db, member_id, new_status).await?;
    HistoryCommon::insert(
        &mut db,
        StatusChangeInsert {
            member_id,
            from_status: member.status,
            to_status: new_status,
            changed_by: actor.name,
            note: note.or_else(|| Some("manual override".into())),
        },
    )
    .await?;
    db.commit().await?;
    Ok(())
}

/// Hard delete. Not a status transition: the record and its requests are
/// purged.
pub async fn delete_member<T>(mut db: T, member_id: i32, actor_id: i32) -> Result<(), Error>
where
    T: TxStorer,
{
    require_admin(&mut db, actor_id).await?;
    MemberCommon::get_for_update(&mut db, member_id).await?.ok_or(Error::NotFound)?;
    MemberCommon::delete(&mut db, member_id).await?;
    db.commit().await?;
    Ok(())
}
