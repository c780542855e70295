use actix_web::web::{Data, Json};

use crate::context::UserInfo;
use crate::core::capacity::{self, Occupancy};
use crate::database::sqlx::PgStoreManager;
use crate::error::Error;

pub async fn get(_me: UserInfo, db: Data<PgStoreManager>) -> Result<Json<Occupancy>, Error> {
    let mut conn = db.acquire().await?;
    let occupancy = capacity::current(&mut conn).await?;
    Ok(Json(occupancy))
}
