mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
mod models;
mod request;
mod response;

use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::HttpServer;
use database::sqlx::PgStoreManager;
use impls::tokener::jwt::JWT;
use middlewares::jwt::{JWTMiddleware, JWT_SECRET};
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,actix_web=info");
    }
    env_logger::init();

    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let secret = dotenv::var(JWT_SECRET).expect("environment variable JWT_SECRET not been set");
    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    database::version::prepare(&pool).await.expect("failed to prepare database schema");

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(PgStoreManager::new(pool.clone())))
            .app_data(Data::new(JWT::new(secret.clone().into_bytes())))
            .service(
                scope("")
                    .service(resource("login").route(post().to(handlers::auth::login)))
                    .service(resource("signup").route(post().to(handlers::application::submit)))
                    .service(resource("checklist").route(get().to(handlers::checklist::list)))
                    .service(
                        scope("")
                            .wrap(JWTMiddleware::new(secret.clone().into_bytes()))
                            .service(
                                scope("me")
                                    .route("", get().to(handlers::auth::me))
                                    .route("profile", put().to(handlers::member::update_my_profile))
                                    .route("onboarding", put().to(handlers::member::update_onboarding))
                                    .service(
                                        resource("application")
                                            .route(put().to(handlers::application::resubmit))
                                            .route(delete().to(handlers::application::withdraw)),
                                    ),
                            )
                            .service(resource("occupancy").route(get().to(handlers::occupancy::get)))
                            .service(resource("settings").route(get().to(handlers::settings::get)))
                            .service(resource("referrals").route(get().to(handlers::application::referrals)))
                            .service(
                                scope("applications").service(
                                    scope("{member_id}")
                                        .route("referrer-decision", post().to(handlers::application::referrer_decide)),
                                ),
                            )
                            .service(
                                scope("state-changes")
                                    .service(
                                        resource("")
                                            .route(post().to(handlers::state_change::create))
                                            .route(get().to(handlers::state_change::list)),
                                    )
                                    .route("{id}/decision", post().to(handlers::state_change::decide)),
                            )
                            .service(
                                scope("withdrawals")
                                    .service(
                                        resource("")
                                            .route(post().to(handlers::withdrawal::create))
                                            .route(get().to(handlers::withdrawal::list)),
                                    )
                                    .route("{id}/decision", post().to(handlers::withdrawal::decide)),
                            )
                            .service(
                                scope("admin")
                                    .service(
                                        scope("applications")
                                            .route("", get().to(handlers::application::list))
                                            .route("{member_id}/decision", post().to(handlers::application::admin_decide)),
                                    )
                                    .service(
                                        scope("members").route("", get().to(handlers::member::list)).service(
                                            scope("{member_id}")
                                                .service(
                                                    resource("")
                                                        .route(get().to(handlers::member::detail))
                                                        .route(delete().to(handlers::member::delete)),
                                                )
                                                .route("profile", put().to(handlers::member::update_profile))
                                                .route("status", put().to(handlers::member::override_status))
                                                .route("history", get().to(handlers::member::history)),
                                        ),
                                    )
                                    .service(resource("settings").route(put().to(handlers::settings::update)))
                                    .service(
                                        scope("checklist")
                                            .service(
                                                resource("")
                                                    .route(get().to(handlers::checklist::list_all))
                                                    .route(post().to(handlers::checklist::create)),
                                            )
                                            .route("{id}", put().to(handlers::checklist::update)),
                                    ),
                            ),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
