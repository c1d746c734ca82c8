//! Local application layer of the Brainzlet flashcard app.
//!
//! Owns the SQLite storage, configuration, logging setup and the command
//! surface a UI shell calls.

pub mod commands;
pub mod config;
pub mod db;
pub mod state;

pub use commands::CommandError;
pub use config::AppConfig;
pub use state::AppState;

use anyhow::Context;
use db::SqliteRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global `tracing` subscriber.
pub fn init_tracing(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the database and load application state.
pub fn open(config: &AppConfig) -> anyhow::Result<AppState> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening database...");
    let repository = SqliteRepository::open(&config.db_path)?;
    let state = AppState::new(repository)?;
    Ok(state)
}

/// Read configuration, set up logging and open the app.
pub fn run() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();
    init_tracing(&config);
    open(&config)
}
