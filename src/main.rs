use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tiller::{AgentDirectory, ControlConfig, ControlDatabase, InitStatus};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tiller=debug")),
        )
        .init();

    tracing::info!("Tiller bootstrap starting...");

    let config = ControlConfig::load();
    tracing::info!("Using database at {}", config.database_path);

    let db = match ControlDatabase::new(&config.database_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!("Failed to open control database: {}", e);
            std::process::exit(1);
        }
    };

    let directory = match AgentDirectory::bootstrap(db) {
        Ok(directory) => directory,
        Err(e) => {
            tracing::error!("Failed to build agent directory: {}", e);
            std::process::exit(1);
        }
    };

    let report = directory.initialize_all();
    let mut failures = 0usize;
    for entry in &report {
        match entry.status {
            InitStatus::Initialized => tracing::info!("{}: initialized", entry.id),
            InitStatus::Error => {
                failures += 1;
                tracing::error!(
                    "{}: {}",
                    entry.id,
                    entry.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    tracing::info!(
        "Agent initialization complete: {}/{} succeeded",
        report.len() - failures,
        report.len()
    );

    if failures > 0 {
        std::process::exit(1);
    }
}
