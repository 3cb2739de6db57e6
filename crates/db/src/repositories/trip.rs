use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use tripweaver_core::{StoreError, Trip, TripId, TripStore};

use super::RepositoryError;
use crate::DbPool;

pub struct SqlTripStore {
    pool: DbPool,
}

impl SqlTripStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: &TripId) -> Result<Option<Trip>, RepositoryError> {
        let row = sqlx::query(
            "SELECT
                id,
                destination,
                budget_range,
                travelers,
                duration_days,
                preferences,
                start_date,
                international,
                created_at
             FROM trip
             WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(trip_from_row).transpose()
    }

    /// Idempotent: re-inserting an existing trip id is a no-op, which keeps
    /// repeated seeding safe.
    pub async fn insert(&self, trip: &Trip) -> Result<(), RepositoryError> {
        let preferences = serde_json::to_string(&trip.preferences)
            .map_err(|error| RepositoryError::Decode(error.to_string()))?;

        sqlx::query(
            "INSERT INTO trip (
                id,
                destination,
                budget_range,
                travelers,
                duration_days,
                preferences,
                start_date,
                international,
                created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(&trip.id.0)
        .bind(&trip.destination)
        .bind(&trip.budget_range)
        .bind(i64::from(trip.travelers))
        .bind(i64::from(trip.duration_days))
        .bind(preferences)
        .bind(trip.start_date.map(|date| date.format("%Y-%m-%d").to_string()))
        .bind(i64::from(trip.international))
        .bind(trip.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl TripStore for SqlTripStore {
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, StoreError> {
        self.find(id).await.map_err(StoreError::from)
    }
}

fn trip_from_row(row: SqliteRow) -> Result<Trip, RepositoryError> {
    let preferences_raw = row.try_get::<String, _>("preferences")?;
    let preferences = serde_json::from_str(&preferences_raw).map_err(|error| {
        RepositoryError::Decode(format!("invalid preferences json: {error}"))
    })?;

    Ok(Trip {
        id: TripId(row.try_get("id")?),
        destination: row.try_get("destination")?,
        budget_range: row.try_get("budget_range")?,
        travelers: parse_u32("travelers", row.try_get("travelers")?)?,
        duration_days: parse_u32("duration_days", row.try_get("duration_days")?)?,
        preferences,
        start_date: parse_optional_date("start_date", row.try_get("start_date")?)?,
        international: row.try_get::<i64, _>("international")? != 0,
        created_at: parse_timestamp("created_at", row.try_get("created_at")?)?,
    })
}

pub(crate) fn parse_u32(column: &str, value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|_| {
        RepositoryError::Decode(format!(
            "invalid value for `{column}` (expected non-negative u32): {value}"
        ))
    })
}

pub(crate) fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&value).map(|timestamp| timestamp.with_timezone(&Utc)).map_err(
        |error| {
            RepositoryError::Decode(format!("invalid timestamp in `{column}`: `{value}` ({error})"))
        },
    )
}

fn parse_optional_date(
    column: &str,
    value: Option<String>,
) -> Result<Option<NaiveDate>, RepositoryError> {
    value
        .map(|date| {
            NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|error| {
                RepositoryError::Decode(format!("invalid date in `{column}`: `{date}` ({error})"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, Utc};

    use tripweaver_core::{Trip, TripId, TripStore};

    use super::SqlTripStore;
    use crate::{connect_with_settings, migrations, DbPool};

    #[tokio::test]
    async fn sql_trip_store_round_trips_a_trip() {
        let pool = setup_pool().await;
        let store = SqlTripStore::new(pool.clone());
        let trip = sample_trip();

        store.insert(&trip).await.expect("insert trip");

        let found = store.find_by_id(&trip.id).await.expect("find trip");
        assert_eq!(found, Some(trip));

        pool.close().await;
    }

    #[tokio::test]
    async fn reinserting_the_same_trip_is_a_no_op() {
        let pool = setup_pool().await;
        let store = SqlTripStore::new(pool.clone());
        let trip = sample_trip();

        store.insert(&trip).await.expect("first insert");

        let mut changed = trip.clone();
        changed.destination = "Delhi".to_string();
        store.insert(&changed).await.expect("second insert");

        let found = store.find_by_id(&trip.id).await.expect("find trip");
        assert_eq!(found.map(|t| t.destination), Some("Mumbai".to_string()));

        pool.close().await;
    }

    #[tokio::test]
    async fn missing_trip_reads_as_none() {
        let pool = setup_pool().await;
        let store = SqlTripStore::new(pool.clone());

        let found = store.find_by_id(&TripId("TRIP-NOPE".to_string())).await.expect("find");
        assert_eq!(found, None);

        pool.close().await;
    }

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 30)
            .await
            .expect("connect test pool");
        migrations::run_pending(&pool).await.expect("run migrations");
        pool
    }

    fn sample_trip() -> Trip {
        Trip {
            id: TripId("TRIP-MUMBAI-5D".to_string()),
            destination: "Mumbai".to_string(),
            budget_range: "₹50,000 - ₹1,00,000".to_string(),
            travelers: 2,
            duration_days: 5,
            preferences: vec!["food".to_string()],
            start_date: NaiveDate::from_ymd_opt(2026, 11, 10),
            international: false,
            created_at: parse_ts("2026-08-01T09:00:00Z"),
        }
    }

    fn parse_ts(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).expect("valid rfc3339").with_timezone(&Utc)
    }
}
