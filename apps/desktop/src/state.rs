//! Application state.

use crate::db::{DbError, KeyValueRepository, SqliteRepository};
use brainzlet_core::{Collection, StudySession, UiState, UnicodeMath, UI_STATE_KEY};
use chrono::Utc;
use std::sync::{Arc, Mutex};

/// Global application state.
///
/// Lock order is `collection`, then `session`, then `repository`.
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub collection: Mutex<Collection>,
    pub session: Mutex<StudySession>,
    pub math: UnicodeMath,
}

impl AppState {
    /// Load the stored collection and resume the saved study position.
    pub fn new(repository: SqliteRepository) -> Result<Self, DbError> {
        let collection = repository.load_collection(Utc::now())?;
        let ui = load_ui_state(&repository)?;

        let mut session = StudySession::from_collection(&collection, &ui.study_filter());
        session.restore(ui.study_current_index, ui.study_is_flipped);

        Ok(Self {
            repository: Arc::new(Mutex::new(repository)),
            collection: Mutex::new(collection),
            session: Mutex::new(session),
            math: UnicodeMath,
        })
    }
}

/// Stored view state, or defaults when nothing was saved yet.
pub(crate) fn load_ui_state(repo: &SqliteRepository) -> Result<UiState, DbError> {
    Ok(repo
        .get_value(UI_STATE_KEY)?
        .map(|raw| UiState::from_json(&raw))
        .unwrap_or_default())
}

pub(crate) fn save_ui_state(repo: &SqliteRepository, ui: &UiState) -> Result<(), DbError> {
    repo.set_json(UI_STATE_KEY, ui)
}
