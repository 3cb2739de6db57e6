use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use tripweaver_core::config::{AppConfig, ConfigError, LoadOptions};
use tripweaver_core::{ForecastProvider, SuggestionEngine, SuggestionStore, TextEnricher, TripStore};
use tripweaver_db::repositories::{SqlSuggestionStore, SqlTripStore};
use tripweaver_db::{connect, migrations, DbPool};

use crate::enrichment::HttpTextEnricher;
use crate::weather::HttpForecastProvider;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub engine: Arc<SuggestionEngine>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] migrations::MigrationError),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    let applied = migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        newly_applied = applied.len(),
        "database migrations applied"
    );

    let trips: Arc<dyn TripStore> = Arc::new(SqlTripStore::new(db_pool.clone()));
    let suggestions: Arc<dyn SuggestionStore> =
        Arc::new(SqlSuggestionStore::new(db_pool.clone()));

    let mut engine = SuggestionEngine::new(trips, suggestions);

    if config.weather.enabled {
        let provider: Arc<dyn ForecastProvider> = Arc::new(
            HttpForecastProvider::new(&config.weather).map_err(BootstrapError::HttpClient)?,
        );
        engine = engine.with_forecasts(provider);
        info!(
            event_name = "system.bootstrap.weather_enabled",
            correlation_id = "bootstrap",
            base_url = %config.weather.base_url,
            "weather forecast provider wired"
        );
    }

    if config.enrichment.enabled {
        let enricher: Arc<dyn TextEnricher> = Arc::new(
            HttpTextEnricher::new(&config.enrichment).map_err(BootstrapError::HttpClient)?,
        );
        engine = engine.with_enricher(enricher);
        info!(
            event_name = "system.bootstrap.enrichment_enabled",
            correlation_id = "bootstrap",
            base_url = %config.enrichment.base_url,
            "text enrichment client wired"
        );
    }

    Ok(Application { config, db_pool, engine: Arc::new(engine) })
}

#[cfg(test)]
mod tests {
    use tripweaver_core::config::{ConfigOverrides, LoadOptions};
    use tripweaver_core::TripId;

    use crate::bootstrap::bootstrap;

    #[tokio::test]
    async fn bootstrap_applies_migrations_and_serves_the_engine() {
        let app = bootstrap(valid_overrides("sqlite::memory:?cache=shared"))
            .await
            .expect("bootstrap should succeed with valid overrides");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('trip', 'trip_suggestion')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("expected baseline tables after bootstrap");
        assert_eq!(table_count, 2, "bootstrap should expose both baseline tables");

        // Empty database: the engine must answer with not-found, never panic.
        let result = app.engine.get_or_create(&TripId("TRIP-NONE".to_string())).await;
        assert!(result.is_err());

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_rejects_a_non_sqlite_database_url() {
        let result = bootstrap(valid_overrides("postgres://nope/tripweaver")).await;
        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }

    fn valid_overrides(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }
}
