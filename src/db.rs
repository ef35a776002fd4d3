use anyhow::Context;
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlDatabaseError, MySqlPoolOptions};
use tracing::info;

use crate::config::Config;

// MySQL error numbers behind SQLSTATE 23000
pub const ER_DUP_ENTRY: u16 = 1062;
pub const ER_ROW_IS_REFERENCED: u16 = 1451;
pub const ER_NO_REFERENCED_ROW: u16 = 1452;

pub async fn init_db(config: &Config) -> anyhow::Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    info!("Database ready");
    Ok(pool)
}

pub async fn ping(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

pub fn mysql_error_number(e: &sqlx::Error) -> Option<u16> {
    match e {
        sqlx::Error::Database(db_err) => db_err
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(|e| e.number()),
        _ => None,
    }
}

/// Unique key violation.
pub fn is_duplicate_entry(e: &sqlx::Error) -> bool {
    mysql_error_number(e) == Some(ER_DUP_ENTRY)
}

/// Insert or update pointed a foreign key at a row that does not exist.
pub fn is_missing_reference(e: &sqlx::Error) -> bool {
    mysql_error_number(e) == Some(ER_NO_REFERENCED_ROW)
}

/// Delete blocked by a RESTRICT foreign key.
pub fn is_still_referenced(e: &sqlx::Error) -> bool {
    mysql_error_number(e) == Some(ER_ROW_IS_REFERENCED)
}
