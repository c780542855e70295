use actix_web::web::{Data, Json, Path, Query};
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::member::{self, require_admin};
use crate::database::sqlx::PgStoreManager;
use crate::error::Error;
use crate::models::history::StatusChange;
use crate::models::member::{Member, MemberPatch, MemberQuery, MemberStatus};
use crate::request::Pagination;
use crate::response::List;

pub async fn list(
    me: UserInfo,
    Query(param): Query<MemberQuery>,
    Query(Pagination { page, size }): Query<Pagination>,
    db: Data<PgStoreManager>,
) -> Result<Json<List<Member>>, Error> {
    let mut conn = db.acquire().await?;
    require_admin(&mut conn, me.id).await?;
    let (members, total) = member::list_members(&mut conn, param, page, size).await?;
    Ok(Json(List::new(members, total)))
}

pub async fn detail(me: UserInfo, member_id: Path<(i32,)>, db: Data<PgStoreManager>) -> Result<Json<Member>, Error> {
    let member_id = member_id.into_inner().0;
    let mut conn = db.acquire().await?;
    require_admin(&mut conn, me.id).await?;
    let member = member::member_detail(&mut conn, member_id).await?;
    Ok(Json(member))
}

pub async fn history(me: UserInfo, member_id: Path<(i32,)>, db: Data<PgStoreManager>) -> Result<Json<Vec<StatusChange>>, Error> {
    let member_id = member_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let rows = member::status_history(&mut conn, me.id, member_id).await?;
    Ok(Json(rows))
}

pub async fn update_my_profile(me: UserInfo, Json(patch): Json<MemberPatch>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let tx = db.begin().await?;
    member::update_profile(tx, me.id, me.id, patch).await?;
    Ok(Json(()))
}

pub async fn update_profile(me: UserInfo, member_id: Path<(i32,)>, Json(patch): Json<MemberPatch>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let member_id = member_id.into_inner().0;
    let tx = db.begin().await?;
    member::update_profile(tx, member_id, me.id, patch).await?;
    Ok(Json(()))
}

#[derive(Debug, Deserialize)]
pub struct OnboardingUpdate {
    pub has_joined_kakao: Option<bool>,
    pub has_completed_onboarding: Option<bool>,
}

pub async fn update_onboarding(me: UserInfo, Json(body): Json<OnboardingUpdate>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let tx = db.begin().await?;
    member::update_onboarding(tx, me.id, me.id, body.has_joined_kakao, body.has_completed_onboarding).await?;
    Ok(Json(()))
}

#[derive(Debug, Deserialize)]
pub struct StatusOverride {
    pub status: MemberStatus,
    pub note: Option<String>,
}

pub async fn override_status(me: UserInfo, member_id: Path<(i32,)>, Json(body): Json<StatusOverride>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let member_id = member_id.into_inner().0;
    let status = body.status;
    let tx = db.begin().await?;
    member::override_status(tx, member_id, me.id, status, body.note).await?;
    log::warn!("member {} status overridden to {:?} by admin {}", member_id, status, me.id);
    Ok(Json(()))
}

pub async fn delete(me: UserInfo, member_id: Path<(i32,)>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let member_id = member_id.into_inner().0;
    let tx = db.begin().await?;
    member::delete_member(tx, member_id, me.id).await?;
    log::warn!("member {} deleted by admin {}", member_id, me.id);
    Ok(Json(()))
}
