use actix_web::web::{Data, Json, Path, Query};
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::db::MemberCommon;
use crate::core::state_change::Decision;
use crate::core::withdrawal;
use crate::database::sqlx::PgStoreManager;
use crate::error::Error;
use crate::models::member::MemberRole;
use crate::models::state_change::{RequestQuery, RequestStatus};
use crate::models::withdrawal::WithdrawalRequest;
use crate::request::Pagination;
use crate::response::List;

#[derive(Debug, Deserialize)]
pub struct WithdrawalCreate {
    pub reason: String,
}

pub async fn create(me: UserInfo, Json(body): Json<WithdrawalCreate>, db: Data<PgStoreManager>) -> Result<Json<WithdrawalRequest>, Error> {
    let tx = db.begin().await?;
    let created = withdrawal::request(tx, me.id, body.reason).await?;
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<RequestStatus>,
}

pub async fn list(
    me: UserInfo,
    Query(filter): Query<StatusFilter>,
    Query(Pagination { page, size }): Query<Pagination>,
    db: Data<PgStoreManager>,
) -> Result<Json<List<WithdrawalRequest>>, Error> {
    let mut conn = db.acquire().await?;
    let caller = MemberCommon::get(&mut conn, me.id).await?.ok_or(Error::NotAuthorized)?;
    let param = RequestQuery {
        status: filter.status,
        member_id: (caller.role != MemberRole::Admin).then_some(me.id),
    };
    let (list, total) = withdrawal::list(&mut conn, param, page, size).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn decide(me: UserInfo, id: Path<(i32,)>, Json(decision): Json<Decision>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let id = id.into_inner().0;
    let tx = db.begin().await?;
    withdrawal::decide(tx, id, me.id, decision).await?;
    Ok(Json(()))
}
