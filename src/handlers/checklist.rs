use actix_web::web::{Data, Json, Path};

use crate::context::UserInfo;
use crate::core::checklist;
use crate::database::sqlx::PgStoreManager;
use crate::error::Error;
use crate::models::checklist::{ChecklistInsert, ChecklistItem, ChecklistPatch};
use crate::response::CreateResponse;

/// Public: the application form shows the active items in order.
pub async fn list(db: Data<PgStoreManager>) -> Result<Json<Vec<ChecklistItem>>, Error> {
    let mut conn = db.acquire().await?;
    let items = checklist::list(&mut conn, true).await?;
    Ok(Json(items))
}

pub async fn list_all(me: UserInfo, db: Data<PgStoreManager>) -> Result<Json<Vec<ChecklistItem>>, Error> {
    let mut conn = db.acquire().await?;
    crate::core::member::require_admin(&mut conn, me.id).await?;
    let items = checklist::list(&mut conn, false).await?;
    Ok(Json(items))
}

pub async fn create(me: UserInfo, Json(body): Json<ChecklistInsert>, db: Data<PgStoreManager>) -> Result<Json<CreateResponse>, Error> {
    let tx = db.begin().await?;
    let id = checklist::create(tx, me.id, body).await?;
    Ok(Json(CreateResponse::new(id)))
}

pub async fn update(me: UserInfo, id: Path<(i32,)>, Json(patch): Json<ChecklistPatch>, db: Data<PgStoreManager>) -> Result<Json<()>, Error> {
    let id = id.into_inner().0;
    let tx = db.begin().await?;
    checklist::update(tx, me.id, id, patch).await?;
    Ok(Json(()))
}
