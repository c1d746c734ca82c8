//! Export and import commands.

use super::{persist, CommandError};
use crate::state::AppState;
use brainzlet_core::{export_cards, import_cards, EXPORT_FILE_NAME};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Every card as a pretty-printed JSON array.
pub fn export_json(state: &AppState) -> Result<String, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    export_cards(collection.list()).map_err(Into::into)
}

/// Write the export to `path`. A directory gets the default file name.
pub fn export_to_file(state: &AppState, path: PathBuf) -> Result<PathBuf, CommandError> {
    let json = export_json(state)?;
    let target = if path.is_dir() {
        path.join(EXPORT_FILE_NAME)
    } else {
        path
    };
    fs::write(&target, json)?;
    tracing::info!(path = %target.display(), "cards exported");
    Ok(target)
}

/// Append the cards of an exported JSON array to the collection.
pub fn import_json(state: &AppState, json: String) -> Result<ImportSummary, CommandError> {
    let mut collection = state.collection.lock().expect("collection lock");
    let known: HashSet<String> = collection.folders().iter().map(|f| f.id.clone()).collect();
    let outcome = import_cards(&json, &known, Utc::now())?;

    let summary = ImportSummary {
        imported: outcome.cards.len(),
        skipped: outcome.skipped,
    };
    collection.extend(outcome.cards);
    persist(state, &collection)?;
    Ok(summary)
}

pub fn import_from_file(state: &AppState, path: PathBuf) -> Result<ImportSummary, CommandError> {
    let json = read_export(&path)?;
    import_json(state, json)
}

fn read_export(path: &Path) -> Result<String, CommandError> {
    fs::read_to_string(path).map_err(|e| CommandError {
        message: format!("failed to read {}: {e}", path.display()),
    })
}
