//! Card commands.

use super::study::prune_session;
use super::{persist, with_repo, CommandError};
use crate::state::{load_ui_state, save_ui_state, AppState};
use brainzlet_core::types::{
    Card, CardUpdate, Difficulty, FolderFilter, NewCard, SortDirection, SortField,
};
use brainzlet_core::CardQuery;
use chrono::Utc;
use serde::Deserialize;

/// Filters for [`list_cards`]. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardListRequest {
    /// Folder id, or `"all"`.
    pub folder: Option<String>,
    pub search: String,
    pub category: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl From<CardListRequest> for CardQuery {
    fn from(request: CardListRequest) -> Self {
        CardQuery::default()
            .in_folder(
                request
                    .folder
                    .as_deref()
                    .map(FolderFilter::from_key)
                    .unwrap_or_default(),
            )
            .search(request.search)
            .category(request.category)
            .sorted_by(request.sort_field, request.sort_direction)
    }
}

/// List cards matching the filters, sorted.
pub fn list_cards(state: &AppState, request: CardListRequest) -> Result<Vec<Card>, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    let query = CardQuery::from(request);
    Ok(collection.query(&query).into_iter().cloned().collect())
}

/// Create a card and remember its category for the folder.
pub fn add_card(state: &AppState, card: NewCard) -> Result<Card, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let created = collection.create(card, Utc::now())?.clone();
    persist(state, &collection)?;

    with_repo(state, |repo| {
        let mut ui = load_ui_state(repo)?;
        ui.remember_category(&created.folder, &created.category);
        ui.add_card_selected_folder = created.folder.clone();
        save_ui_state(repo, &ui)
    })?;

    tracing::info!(id = %created.id, "card added");
    Ok(created)
}

pub fn update_card(state: &AppState, id: String, update: CardUpdate) -> Result<Card, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let card = collection.update(&id, update)?.clone();
    persist(state, &collection)?;
    Ok(card)
}

pub fn delete_card(state: &AppState, id: String) -> Result<(), CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    collection.delete(&id)?;
    persist(state, &collection)?;
    prune_session(state, &collection)
}

/// Delete several cards. Unknown ids are ignored.
pub fn delete_cards(state: &AppState, ids: Vec<String>) -> Result<usize, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let removed = collection.delete_many(&ids);
    persist(state, &collection)?;
    prune_session(state, &collection)?;
    Ok(removed)
}

pub fn set_cards_category(
    state: &AppState,
    ids: Vec<String>,
    category: String,
) -> Result<usize, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let changed = collection.set_category_many(&ids, &category);
    persist(state, &collection)?;
    Ok(changed)
}

pub fn move_cards(state: &AppState, ids: Vec<String>, folder: String) -> Result<usize, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let moved = collection.move_to_folder(&ids, &folder)?;
    persist(state, &collection)?;
    Ok(moved)
}

pub fn mark_reviewed(
    state: &AppState,
    id: String,
    difficulty: Difficulty,
) -> Result<Card, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let card = collection.mark_reviewed(&id, difficulty, Utc::now())?.clone();
    persist(state, &collection)?;
    Ok(card)
}

/// Categories in use, optionally limited to one folder.
pub fn list_card_categories(
    state: &AppState,
    folder: Option<String>,
) -> Result<Vec<String>, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    let filter = folder
        .as_deref()
        .map(FolderFilter::from_key)
        .unwrap_or_default();
    Ok(collection.categories_in_folder(&filter))
}
