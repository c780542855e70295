use actix_web::web::{Data, Json};

use crate::context::UserInfo;
use crate::core::settings;
use crate::database::sqlx::PgStoreManager;
use crate::error::Error;
use crate::models::settings::{SettingsPatch, SystemSettings};

pub async fn get(_me: UserInfo, db: Data<PgStoreManager>) -> Result<Json<SystemSettings>, Error> {
    let mut conn = db.acquire().await?;
    let settings = settings::get(&mut conn).await?;
    Ok(Json(settings))
}

pub async fn update(me: UserInfo, Json(patch): Json<SettingsPatch>, db: Data<PgStoreManager>) -> Result<Json<SystemSettings>, Error> {
    let tx = db.begin().await?;
    let updated = settings::update(tx, me.id, patch).await?;
    log::info!("system settings updated by admin {}", me.id);
    Ok(Json(updated))
}
