//! Error types for brainzlet-core.

use thiserror::Error;

/// Result type alias using CollectionError.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Errors raised by card and folder operations on a collection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("card not found: {0}")]
    CardNotFound(String),

    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("the default folder cannot be deleted")]
    DefaultFolderProtected,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Errors that can occur while importing an exported card list.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of cards")]
    NotAnArray,
}

/// Errors reported by a math renderer for a single expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MathError {
    #[error("unbalanced braces at byte {position}")]
    UnbalancedBraces { position: usize },

    #[error("unclosed environment `{0}`")]
    UnclosedEnvironment(String),

    #[error("expected \\end{{{expected}}}, found \\end{{{found}}}")]
    MismatchedEnvironment { expected: String, found: String },

    #[error("unbalanced \\left/\\right delimiters")]
    UnbalancedDelimiters,

    #[error("dangling backslash at end of expression")]
    TrailingBackslash,
}
