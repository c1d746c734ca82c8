//! Focus timer shown next to the study view.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MINUTES: u32 = 25;

/// Emitted by [`StudyTimer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Finished,
}

/// A countdown timer. Times are wall-clock, so a paused or restored timer
/// only needs the current instant to report its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTimer {
    is_running: bool,
    remaining_ms: i64,
    total_ms: i64,
    started_at: Option<DateTime<Utc>>,
}

impl Default for StudyTimer {
    fn default() -> Self {
        Self::stopped(DEFAULT_MINUTES)
    }
}

impl StudyTimer {
    fn stopped(minutes: u32) -> Self {
        let total_ms = minutes_to_ms(minutes);
        Self {
            is_running: false,
            remaining_ms: total_ms,
            total_ms,
            started_at: None,
        }
    }

    /// Start a fresh countdown of `minutes`.
    pub fn start(&mut self, minutes: u32, now: DateTime<Utc>) {
        let total_ms = minutes_to_ms(minutes);
        *self = Self {
            is_running: true,
            remaining_ms: total_ms,
            total_ms,
            started_at: Some(now),
        };
    }

    /// Stop counting, keeping the time left.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.remaining_ms = self.remaining_ms_at(now);
        self.is_running = false;
        self.started_at = None;
    }

    /// Stop and refill to `minutes`.
    pub fn reset(&mut self, minutes: u32) {
        *self = Self::stopped(minutes);
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn total(&self) -> Duration {
        Duration::milliseconds(self.total_ms)
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        Duration::milliseconds(self.remaining_ms_at(now))
    }

    fn remaining_ms_at(&self, now: DateTime<Utc>) -> i64 {
        match (self.is_running, self.started_at) {
            (true, Some(started)) => {
                let elapsed = (now - started).num_milliseconds();
                (self.total_ms - elapsed).max(0)
            }
            _ => self.remaining_ms,
        }
    }

    /// Advance to `now`. Reports [`TimerEvent::Finished`] once, when a
    /// running countdown reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if !self.is_running {
            return None;
        }
        self.remaining_ms = self.remaining_ms_at(now);
        if self.remaining_ms > 0 {
            return None;
        }
        self.is_running = false;
        self.started_at = None;
        Some(TimerEvent::Finished)
    }
}

fn minutes_to_ms(minutes: u32) -> i64 {
    i64::from(minutes) * 60 * 1000
}

/// Format milliseconds as `h:mm:ss`, or `m:ss` under an hour.
pub fn format_duration(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(format_duration(25 * 60 * 1000), "25:00");
        assert_eq!(format_duration(65_999), "1:05");
        assert_eq!(format_duration(3_600_000 + 61_000), "1:01:01");
        assert_eq!(format_duration(0), "0:00");
    }

    #[test]
    fn default_is_stopped_at_25_minutes() {
        let timer = StudyTimer::default();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(t0()), Duration::minutes(25));
    }

    #[test]
    fn counts_down_while_running() {
        let mut timer = StudyTimer::default();
        timer.start(10, t0());
        assert_eq!(timer.remaining(t0() + Duration::minutes(4)), Duration::minutes(6));
        assert_eq!(timer.tick(t0() + Duration::minutes(4)), None);
    }

    #[test]
    fn pause_freezes_remaining_time() {
        let mut timer = StudyTimer::default();
        timer.start(10, t0());
        timer.pause(t0() + Duration::minutes(3));
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(t0() + Duration::hours(5)), Duration::minutes(7));
    }

    #[test]
    fn finishes_once() {
        let mut timer = StudyTimer::default();
        timer.start(1, t0());
        let later = t0() + Duration::minutes(2);
        assert_eq!(timer.tick(later), Some(TimerEvent::Finished));
        assert_eq!(timer.remaining(later), Duration::zero());
        assert_eq!(timer.tick(later), None);
    }

    #[test]
    fn reset_refills() {
        let mut timer = StudyTimer::default();
        timer.start(5, t0());
        timer.reset(50);
        assert!(!timer.is_running());
        assert_eq!(timer.total(), Duration::minutes(50));
        assert_eq!(timer.remaining(t0()), Duration::minutes(50));
    }
}
