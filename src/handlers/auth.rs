use actix_web::web::{Data, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::context::UserInfo;
use crate::core::auth::hash_password;
use crate::core::db::MemberCommon;
use crate::core::tokener::Tokener;
use crate::core::{application, member};
use crate::database::sqlx::PgStoreManager;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::Claim;
use crate::models::application::Application;
use crate::models::member::{Member, MemberStatus};
use crate::response::TokenResponse;

const TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 7;

#[derive(Debug, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

pub async fn login(Json(body): Json<Login>, db: Data<PgStoreManager>, jwt: Data<JWT>) -> Result<Json<TokenResponse>, Error> {
    let mut conn = db.acquire().await?;
    let member = match MemberCommon::get_by_email(&mut conn, &body.email).await? {
        Some(member) => member,
        None => {
            log::info!("login rejected for unknown email");
            return Err(Error::NotAuthorized);
        }
    };
    if hash_password(&body.password, &member.salt) != member.password {
        log::info!("login rejected for member {}", member.id);
        return Err(Error::NotAuthorized);
    }
    let claim = Claim {
        user: member.id.to_string(),
        exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
    };
    let token = jwt.gen_token(&claim)?;
    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Serialize)]
pub struct Me {
    #[serde(flatten)]
    pub member: Member,
    /// Present while the member is still in the intake pipeline.
    pub application: Option<Application>,
}

pub async fn me(me: UserInfo, db: Data<PgStoreManager>) -> Result<Json<Me>, Error> {
    let mut conn = db.acquire().await?;
    let m = member::member_detail(&mut conn, me.id).await?;
    let application = if m.status == MemberStatus::Pending {
        application::detail_for_member(&mut conn, me.id).await?
    } else {
        None
    };
    Ok(Json(Me { member: m, application }))
}
