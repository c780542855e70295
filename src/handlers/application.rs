use actix_web::web::{Data, Json, Path, Query};
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::application::{self, ApplicationEdit, ApplicationSubmit, ReferrerDecision};
use crate::core::member::require_admin;
use crate::core::state_change::Decision;
use crate::database::sqlx::PgStoreManager;
use crate::error::Error;
use crate::models::application::{Application, ApplicationQuery, ApplicationStage};
use crate::models::member::Member;
use crate::request::Pagination;
use crate::response::List;

pub async fn submit(Json(body): Json<ApplicationSubmit>, db: Data<PgStoreManager>) -> Result<Json<Member>, Error> {
    let tx = db.begin().await?;
    let member = application::submit(tx, body).await?;
    log::info!("application submitted by member {}", member.id);
    Ok(Json(member))
}

#[derive(Debug, Deserialize)]
pub struct StageFilter {
    pub stage: Option<ApplicationStage>,
}

pub async fn list(
    me: UserInfo,
    Query(filter): Query<StageFilter>,
    Query(Pagination { page, size }): Query<Pagination>,
    db: Data<PgStoreManager>,
) -> Result<Json<List<Application>>, Error> {
    let mut conn = db.acquire().await?;
    require_admin(&mut conn, me.id).await?;
    let param = ApplicationQuery {
        stage: filter.stage,
        referrer_name: None,
    };
    let (list, total) = application::list(&mut conn, param, page, size).await?;
    Ok(Json(List::new(list, total)))
}

/// Applications waiting on the caller as referrer.
pub async fn referrals(me: UserInfo, db: Data<PgStoreManager>) -> Result<Json<List<Application>>, Error> {
    let mut conn = db.acquire().await?;
    let caller = crate::core::member::member_detail(&mut conn, me.id).await?;
    let param = ApplicationQuery {
        stage: Some(ApplicationStage::ReferrerPending),
        referrer_name: Some(caller.name),
    };
    let (list, total) = application::list(&mut conn, param, 1, i64::MAX).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn referrer_decide(
    me: UserInfo,
    member_id: Path<(i32,)>,
    Json(decision): Json<ReferrerDecision>,
    db: Data<PgStoreManager>,
) -> Result<Json<()>, Error> {
    let member_id = member_id.into_inner().0;
    let tx = db.begin().await?;
    application::referrer_decide(tx, member_id, me.id, decision).await?;
    Ok(Json(()))
}

pub async fn admin_decide(
    me: UserInfo,
    member_id: Path<(i32,)>,
    Json(decision): Json<Decision>,
    db: Data<PgStoreManager>,
) -> Result<Json<()>, Error> {
    let member_id = member_id.into_inner().0;
    let tx = db.begin().await?;
    application::admin_decide(tx, member_id, me.id, decision).await?;
    Ok(Json(()))
}

pub async fn resubmit(me: UserInfo, Json(edits): Json<ApplicationEdit>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let tx = db.begin().await?;
    application::resubmit(tx, me.id, me.id, edits).await?;
    Ok(Json(()))
}

pub async fn withdraw(me: UserInfo, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let tx = db.begin().await?;
    application::withdraw(tx, me.id, me.id).await?;
    log::info!("application withdrawn by member {}", me.id);
    Ok(Json(()))
}
