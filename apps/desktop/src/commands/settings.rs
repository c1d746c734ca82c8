//! View state commands.

use super::{with_repo, CommandError};
use crate::db::KeyValueRepository;
use crate::state::{load_ui_state, save_ui_state, AppState};
use brainzlet_core::{UiState, UI_STATE_KEY};
use serde_json::Value;

pub fn get_ui_state(state: &AppState) -> Result<UiState, CommandError> {
    with_repo(state, load_ui_state)
}

/// Apply a partial update, e.g. `{"manageSortField": "question"}`.
pub fn update_ui_state(state: &AppState, patch: Value) -> Result<UiState, CommandError> {
    let repo = state.repository.lock().expect("repository lock");
    let ui = load_ui_state(&repo)?.merged(&patch)?;
    save_ui_state(&repo, &ui)?;
    Ok(ui)
}

/// Forget the stored state and return the defaults.
pub fn reset_ui_state(state: &AppState) -> Result<UiState, CommandError> {
    with_repo(state, |repo| repo.remove_value(UI_STATE_KEY))?;
    Ok(UiState::default())
}
