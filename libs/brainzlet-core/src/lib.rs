//! Core library of the Brainzlet flashcard app.
//!
//! Provides:
//! - Inline markdown and LaTeX segmentation and rendering for card text
//! - A line classifier for headings, lists, quotes and code fences
//! - The in-memory card and folder store with search and filters
//! - JSON export and import
//! - Study sessions, review analytics and the focus timer
//! - Persisted view state

pub mod collection;
pub mod error;
pub mod exchange;
pub mod markdown;
pub mod stats;
pub mod study;
pub mod timer;
pub mod types;
pub mod ui_state;

pub use collection::{CardQuery, Collection};
pub use error::{CollectionError, ImportError, MathError, Result};
pub use exchange::{export_cards, import_cards, ImportOutcome, EXPORT_FILE_NAME};
pub use markdown::{
    classify_lines, render_document, render_inline, segment, Block, Inline, MathMode,
    MathRenderer, RenderMode, Segment, SegmentKind, UnicodeMath,
};
pub use stats::{analyze, Analytics, Timeframe};
pub use study::{StudyFilter, StudySession};
pub use timer::{format_duration, StudyTimer, TimerEvent};
pub use types::{
    Card, CardUpdate, Difficulty, Folder, FolderFilter, FolderStats, FolderUpdate, NewCard,
    NewFolder, SortDirection, SortField, ALL_FOLDERS, DEFAULT_FOLDER_ID, DEFAULT_FOLDER_NAME,
};
pub use ui_state::{UiState, UI_STATE_KEY};
