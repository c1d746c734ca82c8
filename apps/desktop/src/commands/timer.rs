//! Focus timer commands.

use super::{with_repo, CommandError};
use crate::db::{DbError, KeyValueRepository, SqliteRepository};
use crate::state::AppState;
use brainzlet_core::timer::DEFAULT_MINUTES;
use brainzlet_core::{format_duration, StudyTimer, TimerEvent};
use chrono::{DateTime, Utc};
use serde::Serialize;

const TIMER_KEY: &str = "study-timer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub running: bool,
    pub remaining_ms: i64,
    pub total_ms: i64,
    /// `m:ss` or `h:mm:ss`.
    pub display: String,
    /// Set on the status call that observed the countdown reach zero.
    pub finished: bool,
}

impl TimerStatus {
    fn new(timer: &StudyTimer, now: DateTime<Utc>, event: Option<TimerEvent>) -> Self {
        let remaining_ms = timer.remaining(now).num_milliseconds();
        Self {
            running: timer.is_running(),
            remaining_ms,
            total_ms: timer.total().num_milliseconds(),
            display: format_duration(remaining_ms),
            finished: event == Some(TimerEvent::Finished),
        }
    }
}

/// Current timer state. Finishes the countdown once it runs out.
pub fn get_timer_status(state: &AppState) -> Result<TimerStatus, CommandError> {
    update_timer(state, |_, _| {})
}

pub fn start_timer(state: &AppState, minutes: Option<u32>) -> Result<TimerStatus, CommandError> {
    let minutes = minutes.unwrap_or(DEFAULT_MINUTES);
    update_timer(state, |timer, now| timer.start(minutes, now))
}

pub fn pause_timer(state: &AppState) -> Result<TimerStatus, CommandError> {
    update_timer(state, |timer, now| timer.pause(now))
}

pub fn reset_timer(state: &AppState, minutes: Option<u32>) -> Result<TimerStatus, CommandError> {
    let minutes = minutes.unwrap_or(DEFAULT_MINUTES);
    update_timer(state, |timer, _| timer.reset(minutes))
}

fn update_timer(
    state: &AppState,
    change: impl FnOnce(&mut StudyTimer, DateTime<Utc>),
) -> Result<TimerStatus, CommandError> {
    let now = Utc::now();
    with_repo(state, |repo| {
        let mut timer = load_timer(repo)?;
        change(&mut timer, now);
        let event = timer.tick(now);
        if event.is_some() {
            tracing::info!("focus timer finished");
        }
        repo.set_json(TIMER_KEY, &timer)?;
        Ok(TimerStatus::new(&timer, now, event))
    })
}

fn load_timer(repo: &SqliteRepository) -> Result<StudyTimer, DbError> {
    Ok(repo.get_json(TIMER_KEY)?.unwrap_or_default())
}
