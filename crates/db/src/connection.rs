//! SQLite pool construction for the suggestion workload: read-heavy with an
//! occasional contended first-compute write per trip.

use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use tripweaver_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Upper bound on how long a statement waits out a competing writer before
/// reporting busy. Kept at or below the acquire timeout so a wedged writer
/// fails the statement rather than the pool checkout.
const MAX_BUSY_TIMEOUT_MS: u64 = 5_000;

pub async fn connect(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(&config.url, config.max_connections, config.timeout_secs).await
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let busy_timeout_ms = (timeout_secs.max(1) * 1_000).min(MAX_BUSY_TIMEOUT_MS);

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        // SQLite scopes these settings per connection, so they run on every
        // connection the pool opens. Foreign keys back the suggestion->trip
        // reference; WAL keeps suggestion reads open while a first compute
        // commits its record.
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA synchronous = NORMAL").execute(&mut *conn).await?;
                sqlx::query(&format!("PRAGMA busy_timeout = {busy_timeout_ms}"))
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}
