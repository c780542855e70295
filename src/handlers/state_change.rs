use actix_web::web::{Data, Json, Path, Query};
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::db::MemberCommon;
use crate::core::state_change::{self, Decision};
use crate::database::sqlx::PgStoreManager;
use crate::error::Error;
use crate::models::member::{MemberRole, MemberStatus};
use crate::models::state_change::{RequestQuery, RequestStatus, StateChange};
use crate::request::Pagination;
use crate::response::List;

#[derive(Debug, Deserialize)]
pub struct StateChangeCreate {
    pub requested_status: MemberStatus,
    pub reason: String,
}

pub async fn create(me: UserInfo, Json(body): Json<StateChangeCreate>, db: Data<PgStoreManager>) -> Result<Json<StateChange>, Error> {
    let tx = db.begin().await?;
    let created = state_change::request(tx, me.id, body.requested_status, body.reason).await?;
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<RequestStatus>,
}

/// Admins see the whole queue, members only their own requests.
pub async fn list(
    me: UserInfo,
    Query(filter): Query<StatusFilter>,
    Query(Pagination { page, size }): Query<Pagination>,
    db: Data<PgStoreManager>,
) -> Result<Json<List<StateChange>>, Error> {
    let mut conn = db.acquire().await?;
    let caller = MemberCommon::get(&mut conn, me.id).await?.ok_or(Error::NotAuthorized)?;
    let param = RequestQuery {
        status: filter.status,
        member_id: (caller.role != MemberRole::Admin).then_some(me.id),
    };
    let (list, total) = state_change::list(&mut conn, param, page, size).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn decide(me: UserInfo, id: Path<(i32,)>, Json(decision): Json<Decision>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let id = id.into_inner().0;
    let tx = db.begin().await?;
    state_change::decide(tx, id, me.id, decision).await?;
    Ok(Json(()))
}
