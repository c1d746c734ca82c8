//! Review analytics over a card list.

use crate::types::{Card, Difficulty};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Longest timeline the analytics view shows, in days.
const MAX_TIMELINE_DAYS: i64 = 30;

const TOP_CATEGORIES: usize = 5;

/// Window of review activity to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "all")]
    All,
}

impl Timeframe {
    /// Length in days, `None` for all time.
    pub fn days(self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Quarter => Some(90),
            Self::All => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Reviews on one UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayActivity {
    pub date: NaiveDate,
    pub cards_reviewed: usize,
    /// Mean of easy=1, medium=2, hard=3; zero on days without reviews.
    pub average_difficulty: f64,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_cards: usize,
    pub reviewed_cards: usize,
    pub average_review_count: f64,
    pub difficulty: DifficultyStats,
    /// Card count per category, keyed by name.
    pub categories: BTreeMap<String, usize>,
    pub top_categories: Vec<CategoryCount>,
    pub timeline: Vec<DayActivity>,
}

impl Analytics {
    /// Share of considered cards that were reviewed, as a whole percentage.
    pub fn completion_rate(&self) -> u32 {
        if self.total_cards == 0 {
            return 0;
        }
        (self.reviewed_cards as f64 / self.total_cards as f64 * 100.0).round() as u32
    }
}

/// Compute analytics for `cards`.
///
/// Outside [`Timeframe::All`] only cards last reviewed on or after the
/// cutoff are considered.
pub fn analyze(cards: &[Card], timeframe: Timeframe, now: DateTime<Utc>) -> Analytics {
    let considered: Vec<&Card> = match timeframe.days() {
        None => cards.iter().collect(),
        Some(days) => {
            let cutoff = now - Duration::days(days);
            cards
                .iter()
                .filter(|c| c.last_reviewed.is_some_and(|at| at >= cutoff))
                .collect()
        }
    };

    let mut difficulty = DifficultyStats::default();
    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    for card in &considered {
        match card.difficulty {
            Difficulty::Easy => difficulty.easy += 1,
            Difficulty::Medium => difficulty.medium += 1,
            Difficulty::Hard => difficulty.hard += 1,
        }
        *categories.entry(card.category.clone()).or_default() += 1;
    }

    let total_cards = considered.len();
    let reviewed_cards = considered.iter().filter(|c| c.last_reviewed.is_some()).count();
    let average_review_count = if total_cards == 0 {
        0.0
    } else {
        considered.iter().map(|c| f64::from(c.review_count)).sum::<f64>() / total_cards as f64
    };

    let mut top_categories: Vec<CategoryCount> = categories
        .iter()
        .map(|(category, &count)| CategoryCount {
            category: category.clone(),
            count,
        })
        .collect();
    top_categories.sort_by(|a, b| b.count.cmp(&a.count));
    top_categories.truncate(TOP_CATEGORIES);

    let timeline_days = timeframe.days().map_or(MAX_TIMELINE_DAYS, |d| d.min(MAX_TIMELINE_DAYS));
    let timeline = (0..timeline_days)
        .rev()
        .map(|offset| day_activity(&considered, (now - Duration::days(offset)).date_naive()))
        .collect();

    Analytics {
        total_cards,
        reviewed_cards,
        average_review_count,
        difficulty,
        categories,
        top_categories,
        timeline,
    }
}

fn day_activity(cards: &[&Card], date: NaiveDate) -> DayActivity {
    let day: Vec<&Card> = cards
        .iter()
        .copied()
        .filter(|c| c.last_reviewed.is_some_and(|at| at.date_naive() == date))
        .collect();

    let average_difficulty = if day.is_empty() {
        0.0
    } else {
        day.iter().map(|c| f64::from(c.difficulty.rank())).sum::<f64>() / day.len() as f64
    };
    let categories: BTreeSet<String> = day.iter().map(|c| c.category.clone()).collect();

    DayActivity {
        date,
        cards_reviewed: day.len(),
        average_difficulty,
        categories: categories.into_iter().collect(),
    }
}
