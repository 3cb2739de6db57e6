use sqlx::{sqlite::SqliteRow, Row};

use tripweaver_core::{StoreError, SuggestionRecord, SuggestionStore, TripId};

use super::RepositoryError;
use crate::DbPool;

/// The full record is persisted as a JSON payload; the indexed columns exist
/// for lookups and reporting, never as a second source of truth.
pub struct SqlSuggestionStore {
    pool: DbPool,
}

impl SqlSuggestionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find(&self, trip_id: &TripId) -> Result<Option<SuggestionRecord>, RepositoryError> {
        let row = sqlx::query("SELECT payload FROM trip_suggestion WHERE trip_id = ?")
            .bind(&trip_id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(record_from_row).transpose()
    }

    async fn insert(&self, record: &SuggestionRecord) -> Result<(), RepositoryError> {
        let payload = serde_json::to_string(record)
            .map_err(|error| RepositoryError::Decode(error.to_string()))?;

        // No ON CONFLICT clause: a duplicate trip_id must fail so the caller
        // can distinguish a lost race from success.
        sqlx::query(
            "INSERT INTO trip_suggestion (
                id,
                trip_id,
                destination,
                total_budget,
                payload,
                created_at
             ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id.0)
        .bind(&record.trip_id.0)
        .bind(&record.destination)
        .bind(record.total_budget)
        .bind(payload)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SuggestionStore for SqlSuggestionStore {
    async fn find_by_trip(&self, trip_id: &TripId) -> Result<Option<SuggestionRecord>, StoreError> {
        self.find(trip_id).await.map_err(StoreError::from)
    }

    async fn insert_if_absent(&self, record: &SuggestionRecord) -> Result<(), StoreError> {
        self.insert(record).await.map_err(StoreError::from)
    }
}

fn record_from_row(row: SqliteRow) -> Result<SuggestionRecord, RepositoryError> {
    let payload = row.try_get::<String, _>("payload")?;
    serde_json::from_str(&payload)
        .map_err(|error| RepositoryError::Decode(format!("invalid suggestion payload: {error}")))
}
