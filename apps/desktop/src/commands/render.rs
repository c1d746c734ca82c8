//! Rendering commands.

use super::CommandError;
use crate::state::AppState;
use brainzlet_core::{render_document, Block, CollectionError, RenderMode};
use serde::Serialize;

/// A card's question and answer as display blocks.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedCard {
    pub question: Vec<Block>,
    pub answer: Vec<Block>,
}

pub fn render_card(state: &AppState, id: String, mode: RenderMode) -> Result<RenderedCard, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    let card = collection
        .get(&id)
        .ok_or(CollectionError::CardNotFound(id))?;

    Ok(RenderedCard {
        question: render_document(&card.question, mode, &state.math),
        answer: render_document(&card.answer, mode, &state.math),
    })
}

/// Render arbitrary text, e.g. the live preview while editing.
pub fn render_text(state: &AppState, text: String, mode: RenderMode) -> Result<Vec<Block>, CommandError> {
    Ok(render_document(&text, mode, &state.math))
}
