//! Runtime configuration from the environment.

use std::path::PathBuf;

const DB_PATH_VAR: &str = "BRAINZLET_DB_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// `tracing_subscriber` filter directive.
    pub log_filter: String,
}

impl AppConfig {
    /// Read configuration, loading `.env` first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = std::env::var_os(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        Self {
            db_path,
            log_filter,
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brainzlet")
        .join("flashcards.db")
}
