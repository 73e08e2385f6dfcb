pub mod catalog_repo;
pub mod models;
pub mod settings_repo;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::types::errors::EngineResult;

/// Fallback when `WASTESORT_DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://wastesort.db";

/// Open (creating if missing) the catalog database and apply migrations.
pub async fn connect(url: &str) -> EngineResult<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("[Database] Connected to {url}");
    Ok(pool)
}
