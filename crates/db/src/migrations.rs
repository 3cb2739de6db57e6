use sqlx::migrate::{MigrateError, MigrationType, Migrator};
use thiserror::Error;

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Migrate(#[from] MigrateError),
    #[error("migration ledger query failed: {0}")]
    Ledger(#[from] sqlx::Error),
}

/// A migration newly applied by one `run_pending` call, reported back so
/// operators can see what a deploy changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
}

/// Applies outstanding migrations and reports the versions this call
/// actually applied; empty when the schema was already current.
pub async fn run_pending(pool: &DbPool) -> Result<Vec<AppliedMigration>, MigrationError> {
    let already_applied = applied_versions(pool).await?;

    MIGRATOR.run(pool).await?;

    Ok(MIGRATOR
        .iter()
        .filter(|migration| !matches!(migration.migration_type, MigrationType::ReversibleDown))
        .filter(|migration| !already_applied.contains(&migration.version))
        .map(|migration| AppliedMigration {
            version: migration.version,
            description: migration.description.to_string(),
        })
        .collect())
}

async fn applied_versions(pool: &DbPool) -> Result<Vec<i64>, sqlx::Error> {
    // The ledger table only exists once the first migration pass ran.
    let ledger_exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if ledger_exists == 0 {
        return Ok(Vec::new());
    }

    sqlx::query_scalar("SELECT version FROM _sqlx_migrations ORDER BY version")
        .fetch_all(pool)
        .await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::{connect_with_settings, migrations::MIGRATOR};

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "trip",
        "trip_suggestion",
        "idx_trip_destination",
        "idx_trip_suggestion_trip_id",
    ];

    #[tokio::test]
    async fn migrations_create_baseline_tables() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for table in ["trip", "trip_suggestion"] {
            let count = sqlx::query(
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .expect("check table")
            .get::<i64, _>("count");

            assert_eq!(count, 1, "table {table} should exist");
        }
    }

    #[tokio::test]
    async fn run_pending_reports_each_migration_exactly_once() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");

        let first = run_pending(&pool).await.expect("run migrations");
        let versions: Vec<i64> = first.iter().map(|migration| migration.version).collect();
        assert_eq!(versions, vec![1, 2]);
        assert!(first[0].description.contains("trip"));

        let second = run_pending(&pool).await.expect("re-run migrations");
        assert!(second.is_empty(), "an up-to-date schema should report nothing applied");
    }

    #[tokio::test]
    async fn migrations_are_reversible() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");

        let remaining = sqlx::query(
            "SELECT COUNT(*) AS count FROM sqlite_master
             WHERE type IN ('table', 'index') AND name IN ('trip', 'trip_suggestion')",
        )
        .fetch_one(&pool)
        .await
        .expect("check objects removed")
        .get::<i64, _>("count");

        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn migrations_up_down_up_preserves_schema_signature() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let initial_signature = managed_schema_signature(&pool).await;
        assert_eq!(
            initial_signature.len(),
            MANAGED_SCHEMA_OBJECTS.len(),
            "initial migration pass should create all managed schema objects",
        );

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");
        assert!(managed_schema_signature(&pool).await.is_empty());

        run_pending(&pool).await.expect("re-run migrations");
        assert_eq!(managed_schema_signature(&pool).await, initial_signature);
    }

    async fn managed_schema_signature(pool: &sqlx::SqlitePool) -> Vec<(String, String, String)> {
        let mut signature: Vec<(String, String, String)> = sqlx::query(
            "SELECT type, name, IFNULL(sql, '') AS sql
             FROM sqlite_master
             WHERE type IN ('table', 'index')",
        )
        .fetch_all(pool)
        .await
        .expect("load schema objects")
        .into_iter()
        .filter_map(|row| {
            let name = row.get::<String, _>("name");
            if MANAGED_SCHEMA_OBJECTS.contains(&name.as_str()) {
                Some((row.get::<String, _>("type"), name, row.get::<String, _>("sql")))
            } else {
                None
            }
        })
        .collect();
        signature.sort();
        signature
    }
}
