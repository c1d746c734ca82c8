//! Analytics commands.

use super::CommandError;
use crate::state::AppState;
use brainzlet_core::{analyze, Analytics, Timeframe};
use chrono::Utc;

pub fn get_analytics(state: &AppState, timeframe: Timeframe) -> Result<Analytics, CommandError> {
    let collection = state.collection.lock().expect("collection lock");
    Ok(analyze(collection.list(), timeframe, Utc::now()))
}
