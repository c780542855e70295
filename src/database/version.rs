use sqlx::{query_scalar, PgPool};

use crate::error::Error;

/// Schema version this binary was built against. Every migration bumps the
/// value stored in schema_meta.
pub const SCHEMA_VERSION: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaCheck {
    UpToDate,
    Behind { found: i32, expected: i32 },
    Ahead { found: i32, expected: i32 },
}

pub fn compare(found: i32, expected: i32) -> SchemaCheck {
    if found == expected {
        SchemaCheck::UpToDate
    } else if found < expected {
        SchemaCheck::Behind { found, expected }
    } else {
        SchemaCheck::Ahead { found, expected }
    }
}

/// 0 on a fresh database where schema_meta does not exist yet.
pub async fn current_version(pool: &PgPool) -> Result<i32, Error> {
    let exists: bool = query_scalar("SELECT to_regclass('schema_meta') IS NOT NULL").fetch_one(pool).await?;
    if !exists {
        return Ok(0);
    }
    let version: Option<i32> = query_scalar("SELECT version FROM schema_meta LIMIT 1").fetch_optional(pool).await?;
    Ok(version.unwrap_or(0))
}

/// Checks the stored schema version and applies the embedded migrations.
/// A mismatch is logged, never resolved by wiping data.
pub async fn prepare(pool: &PgPool) -> Result<(), Error> {
    let found = current_version(pool).await?;
    match compare(found, SCHEMA_VERSION) {
        SchemaCheck::UpToDate => log::info!("schema version {} is current", found),
        SchemaCheck::Behind { found, expected } => {
            log::warn!("schema version mismatch detected: found {}, expected {}; running migrations", found, expected);
        }
        SchemaCheck::Ahead { found, expected } => {
            log::error!("database schema version {} is newer than this binary expects ({})", found, expected);
            return Err(Error::InvalidState("database schema is newer than this binary".into()));
        }
    }
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
