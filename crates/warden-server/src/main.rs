#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]

use warden_db::migrate;
use warden_server::{bootstrap, settings};

mod cli;

#[tokio::main]
async fn main() {
    let run_mode = cli::parse_args();
    let settings = settings::Settings::from_env();
    bootstrap::init_tracing();
    let seeding = settings.config.setup.enabled || run_mode == cli::RunMode::Seed;
    if matches!(run_mode, cli::RunMode::Server | cli::RunMode::Seed) {
        if let Err(problems) = settings::preflight(&settings, seeding) {
            tracing::error!(
                event = "preflight_failed",
                problems = ?problems,
                "Configuration rejected"
            );
            std::process::exit(1);
        }
    }
    bootstrap::log_startup(&settings);
    bootstrap::init_metrics_registry(&settings.config.metrics);

    let db = match bootstrap::connect_db(&settings).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(event = "db_connect_failed", error = %err);
            std::process::exit(1);
        }
    };
    if let Err(err) = migrate(&db).await {
        tracing::error!(event = "migration_failed", error = %err);
        std::process::exit(1);
    }
    tracing::info!(event = "migrations_applied");
    if run_mode == cli::RunMode::Migrate {
        return;
    }

    let state = bootstrap::build_state(&settings, db);
    if seeding {
        let seeder = bootstrap::build_seeder(&state);
        if let Err(err) = seeder.on_ready().await {
            tracing::error!(event = "seed_failed", error = %err);
            std::process::exit(1);
        }
    } else {
        tracing::info!(event = "seed_disabled", "Bootstrap seeding disabled");
    }
    if run_mode == cli::RunMode::Seed {
        return;
    }

    let app = bootstrap::build_app(&settings.config.metrics, state);
    bootstrap::serve(&settings, app).await;
}
