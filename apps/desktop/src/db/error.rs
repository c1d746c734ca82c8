//! Storage errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A `kv_store` document that no longer deserializes.
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored row whose difficulty or timestamp cannot be read back.
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}
