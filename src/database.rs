pub mod sqlx;
pub mod version;
