//! Commands exposed to the UI shell.
//!
//! Every command takes the shared [`AppState`](crate::state::AppState) and
//! returns `Result<T, CommandError>`. Mutations are written through to the
//! database before returning.

pub mod cards;
pub mod exchange;
pub mod folders;
pub mod render;
pub mod settings;
pub mod stats;
pub mod study;
pub mod timer;

use crate::db::SqliteRepository;
use crate::state::AppState;
use brainzlet_core::Collection;

pub use cards::{
    add_card, delete_card, delete_cards, list_card_categories, list_cards, mark_reviewed,
    move_cards, set_cards_category, update_card, CardListRequest,
};
pub use exchange::{export_json, export_to_file, import_from_file, import_json, ImportSummary};
pub use folders::{add_folder, delete_folder, get_folder_stats, list_folders, update_folder};
pub use render::{render_card, render_text, RenderedCard};
pub use settings::{get_ui_state, reset_ui_state, update_ui_state};
pub use stats::get_analytics;
pub use study::{
    flip_card, get_study_status, mark_current, next_card, previous_card, start_study,
    StudyRequest, StudyStatus,
};
pub use timer::{get_timer_status, pause_timer, reset_timer, start_timer, TimerStatus};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<brainzlet_core::CollectionError> for CommandError {
    fn from(e: brainzlet_core::CollectionError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<brainzlet_core::ImportError> for CommandError {
    fn from(e: brainzlet_core::ImportError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self { message: e.to_string() }
    }
}

/// Write the whole collection back to storage.
fn persist(state: &AppState, collection: &Collection) -> Result<(), CommandError> {
    let repo = state.repository.lock().expect("repository lock");
    repo.save_collection(collection).map_err(Into::into)
}

fn with_repo<T>(
    state: &AppState,
    f: impl FnOnce(&SqliteRepository) -> Result<T, crate::db::DbError>,
) -> Result<T, CommandError> {
    let repo = state.repository.lock().expect("repository lock");
    f(&repo).map_err(Into::into)
}
