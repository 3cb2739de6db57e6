use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::commands::CommandResult;
use tripweaver_core::config::{AppConfig, LoadOptions};
use tripweaver_core::{Trip, TripId};
use tripweaver_db::repositories::SqlTripStore;
use tripweaver_db::{connect, migrations};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let store = SqlTripStore::new(pool.clone());
        let trips = demo_trips();
        for trip in &trips {
            store
                .insert(trip)
                .await
                .map_err(|error| ("seed_execution", error.to_string(), 6u8))?;
        }

        pool.close().await;
        Ok::<Vec<Trip>, (&'static str, String, u8)>(trips)
    });

    match result {
        Ok(trips) => {
            let descriptions: Vec<String> = trips
                .iter()
                .map(|trip| {
                    format!(
                        "  - {}: {} ({} days, {})",
                        trip.id,
                        trip.destination,
                        trip.duration_days,
                        trip.budget_range
                    )
                })
                .collect();
            let message =
                format!("demo trips loaded (idempotent):\n{}", descriptions.join("\n"));
            let details: Vec<_> = trips
                .iter()
                .map(|trip| {
                    json!({
                        "id": trip.id.0,
                        "destination": trip.destination,
                        "duration_days": trip.duration_days,
                        "budget_range": trip.budget_range,
                    })
                })
                .collect();
            CommandResult::success_with_details("seed", message, json!({ "trips": details }))
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

/// Fixed demo dataset covering the interesting pipeline paths: a curated
/// city with preferences and a festival month, an over-cap domestic request,
/// an open-ended budget, and a long international trip.
pub fn demo_trips() -> Vec<Trip> {
    vec![
        Trip {
            id: TripId("TRIP-MUMBAI-5D".to_string()),
            destination: "Mumbai".to_string(),
            budget_range: "₹50,000 - ₹1,00,000".to_string(),
            travelers: 2,
            duration_days: 5,
            preferences: vec!["food".to_string()],
            start_date: NaiveDate::from_ymd_opt(2026, 11, 10),
            international: false,
            created_at: seed_timestamp(),
        },
        Trip {
            id: TripId("TRIP-MANALI-20D".to_string()),
            destination: "Manali".to_string(),
            budget_range: "₹80,000 - ₹1,20,000".to_string(),
            travelers: 3,
            duration_days: 20,
            preferences: vec!["adventure".to_string()],
            start_date: NaiveDate::from_ymd_opt(2026, 7, 4),
            international: false,
            created_at: seed_timestamp(),
        },
        Trip {
            id: TripId("TRIP-JAIPUR-OPEN".to_string()),
            destination: "Jaipur".to_string(),
            budget_range: "₹40,000+".to_string(),
            travelers: 2,
            duration_days: 4,
            preferences: vec!["culture".to_string()],
            start_date: NaiveDate::from_ymd_opt(2026, 10, 18),
            international: false,
            created_at: seed_timestamp(),
        },
        Trip {
            id: TripId("TRIP-BALI-75D".to_string()),
            destination: "Bali".to_string(),
            budget_range: "₹3,00,000 - ₹5,00,000".to_string(),
            travelers: 2,
            duration_days: 75,
            preferences: vec![],
            start_date: None,
            international: true,
            created_at: seed_timestamp(),
        },
    ]
}

fn seed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-01T00:00:00Z")
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
