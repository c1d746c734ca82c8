//! Folder commands.

use super::{persist, CommandError};
use crate::state::AppState;
use brainzlet_core::types::{Folder, FolderFilter, FolderStats, FolderUpdate, NewFolder};
use chrono::Utc;

pub fn list_folders(state: &AppState) -> Result<Vec<Folder>, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    Ok(collection.folders().to_vec())
}

pub fn add_folder(state: &AppState, folder: NewFolder) -> Result<Folder, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let created = collection.add_folder(folder, Utc::now())?.clone();
    persist(state, &collection)?;
    Ok(created)
}

pub fn update_folder(
    state: &AppState,
    id: String,
    update: FolderUpdate,
) -> Result<Folder, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let folder = collection.update_folder(&id, update)?.clone();
    persist(state, &collection)?;
    Ok(folder)
}

/// Delete a folder. Its cards move to the default folder; returns how many.
pub fn delete_folder(state: &AppState, id: String) -> Result<usize, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let moved = collection.delete_folder(&id)?;
    persist(state, &collection)?;
    Ok(moved)
}

/// Difficulty breakdown for one folder, or all folders when `None`.
pub fn get_folder_stats(
    state: &AppState,
    folder: Option<String>,
) -> Result<FolderStats, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    let filter = folder
        .as_deref()
        .map(FolderFilter::from_key)
        .unwrap_or_default();
    Ok(collection.folder_stats(&filter))
}
