//! Study session commands.

use super::{persist, with_repo, CommandError};
use crate::state::{load_ui_state, save_ui_state, AppState};
use brainzlet_core::types::{Card, Difficulty, FolderFilter, ALL_FOLDERS};
use brainzlet_core::{Collection, StudyFilter, StudySession};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyRequest {
    /// Folder id, or `"all"`.
    pub folder: Option<String>,
    /// Empty means every category.
    pub categories: Vec<String>,
    pub shuffle: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStatus {
    pub card: Option<Card>,
    /// One-based; zero when the session is empty.
    pub position: usize,
    pub total: usize,
    pub flipped: bool,
}

impl StudyStatus {
    fn new(session: &StudySession, collection: &Collection) -> Self {
        let (position, total) = session.position();
        Self {
            card: session.current().and_then(|id| collection.get(id)).cloned(),
            position,
            total,
            flipped: session.is_flipped(),
        }
    }
}

/// Start a new pass over the matching cards.
pub fn start_study(state: &AppState, request: StudyRequest) -> Result<StudyStatus, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    let mut session = state.session.lock().expect("session lock");

    let folder_key = request.folder.unwrap_or_else(|| ALL_FOLDERS.to_string());
    let filter = StudyFilter {
        folder: FolderFilter::from_key(&folder_key),
        categories: request.categories,
    };
    *session = StudySession::from_collection(&collection, &filter);
    if request.shuffle {
        session.shuffle(&mut rand::thread_rng());
    }

    with_repo(state, |repo| {
        let mut ui = load_ui_state(repo)?;
        ui.study_folder = folder_key;
        ui.study_selected_categories = filter.categories.clone();
        ui.study_current_index = session.index();
        ui.study_is_flipped = session.is_flipped();
        save_ui_state(repo, &ui)
    })?;

    tracing::info!(cards = session.len(), shuffled = request.shuffle, "study session started");
    Ok(StudyStatus::new(&session, &collection))
}

pub fn get_study_status(state: &AppState) -> Result<StudyStatus, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    let session = state.session.lock().expect("session lock");
    Ok(StudyStatus::new(&session, &collection))
}

pub fn flip_card(state: &AppState) -> Result<StudyStatus, CommandError> {
    navigate(state, StudySession::flip)
}

pub fn next_card(state: &AppState) -> Result<StudyStatus, CommandError> {
    navigate(state, |session| {
        session.next();
    })
}

pub fn previous_card(state: &AppState) -> Result<StudyStatus, CommandError> {
    navigate(state, |session| {
        session.previous();
    })
}

/// Tag the current card and move on to the next one.
pub fn mark_current(state: &AppState, difficulty: Difficulty) -> Result<StudyStatus, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let mut session = state.session.lock().expect("session lock");

    if let Some(id) = session.current().map(str::to_string) {
        collection.mark_reviewed(&id, difficulty, Utc::now())?;
        persist(state, &collection)?;
        session.mark();
    }
    save_position(state, &session)?;
    Ok(StudyStatus::new(&session, &collection))
}

fn navigate(state: &AppState, step: impl FnOnce(&mut StudySession)) -> Result<StudyStatus, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    let mut session = state.session.lock().expect("session lock");
    step(&mut *session);
    save_position(state, &session)?;
    Ok(StudyStatus::new(&session, &collection))
}

/// Drop deleted cards from the running session.
pub(super) fn prune_session(state: &AppState, collection: &Collection) -> Result<(), CommandError> {
    let mut session = state.session.lock().expect("session lock");
    if session.retain(|id| collection.get(id).is_some()) > 0 {
        save_position(state, &session)?;
    }
    Ok(())
}

fn save_position(state: &AppState, session: &StudySession) -> Result<(), CommandError> {
    with_repo(state, |repo| {
        let mut ui = load_ui_state(repo)?;
        ui.study_current_index = session.index();
        ui.study_is_flipped = session.is_flipped();
        save_ui_state(repo, &ui)
    })
}
