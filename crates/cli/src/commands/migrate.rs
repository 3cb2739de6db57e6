use serde_json::json;

use crate::commands::CommandResult;
use tripweaver_core::config::{AppConfig, LoadOptions};
use tripweaver_db::{connect, migrations};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
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
                "migrate",
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
        let applied = migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        pool.close().await;
        Ok::<Vec<migrations::AppliedMigration>, (&'static str, String, u8)>(applied)
    });

    match result {
        Ok(applied) if applied.is_empty() => {
            CommandResult::success("migrate", "no pending migrations; schema is up to date")
        }
        Ok(applied) => {
            let details: Vec<_> = applied
                .iter()
                .map(|migration| {
                    json!({
                        "version": migration.version,
                        "description": migration.description,
                    })
                })
                .collect();
            CommandResult::success_with_details(
                "migrate",
                format!("applied {} pending migrations", applied.len()),
                json!({ "applied": details }),
            )
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}
