//! Liveness endpoint on its own port so orchestration probes keep working
//! while the API listener is saturated. Readiness means the database answers
//! and the suggestion schema is in place.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};
use tripweaver_db::DbPool;

const SUGGESTION_TABLES: &[&str] = &["trip", "trip_suggestion"];

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: &'static str,
    pub detail: String,
}

impl HealthCheck {
    fn ready(name: &'static str, detail: impl Into<String>) -> Self {
        Self { name, status: "ready", detail: detail.into() }
    }

    fn degraded(name: &'static str, detail: impl Into<String>) -> Self {
        Self { name, status: "degraded", detail: detail.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub checks: Vec<HealthCheck>,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool })
}

pub async fn spawn(bind_address: &str, port: u16, db_pool: DbPool) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "health.listener_started",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(db_pool)).await {
            error!(
                event_name = "health.listener_failed",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let checks = vec![
        HealthCheck::ready("server", "request runtime initialized"),
        database_check(&state.db_pool).await,
        schema_check(&state.db_pool).await,
    ];
    let ready = checks.iter().all(|check| check.status == "ready");

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        checks,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthCheck::ready("database", "database query succeeded"),
        Err(error) => HealthCheck::degraded("database", format!("database query failed: {error}")),
    }
}

/// A reachable database with the trip tables missing means migrations have
/// not run; suggestions cannot be served or persisted from it.
async fn schema_check(pool: &DbPool) -> HealthCheck {
    let query = "SELECT COUNT(*) FROM sqlite_master \
                 WHERE type = 'table' AND name IN ('trip', 'trip_suggestion')";
    match sqlx::query_scalar::<_, i64>(query).fetch_one(pool).await {
        Ok(count) if count == SUGGESTION_TABLES.len() as i64 => {
            HealthCheck::ready("schema", "trip and trip_suggestion tables present")
        }
        Ok(count) => HealthCheck::degraded(
            "schema",
            format!("{count}/{} suggestion tables present", SUGGESTION_TABLES.len()),
        ),
        Err(error) => HealthCheck::degraded("schema", format!("schema query failed: {error}")),
    }
}
