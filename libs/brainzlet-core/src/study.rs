//! Flip-card study session.

use crate::collection::Collection;
use crate::types::{Card, FolderFilter};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which cards a session draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyFilter {
    pub folder: FolderFilter,
    /// Empty means every category.
    pub categories: Vec<String>,
}

impl StudyFilter {
    pub fn matches(&self, card: &Card) -> bool {
        self.folder.matches(card)
            && (self.categories.is_empty() || self.categories.contains(&card.category))
    }
}

/// An ordered pass over a set of cards.
///
/// The session stores card ids only; the caller looks cards up in the
/// collection so edits made mid-session are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    card_ids: Vec<String>,
    index: usize,
    flipped: bool,
}

impl StudySession {
    pub fn new(card_ids: Vec<String>) -> Self {
        Self {
            card_ids,
            index: 0,
            flipped: false,
        }
    }

    /// Session over the collection's cards that pass `filter`, in
    /// collection order.
    pub fn from_collection(collection: &Collection, filter: &StudyFilter) -> Self {
        let ids = collection
            .list()
            .iter()
            .filter(|c| filter.matches(c))
            .map(|c| c.id.clone())
            .collect();
        Self::new(ids)
    }

    /// Jump to a saved position, clamped to the session.
    pub fn restore(&mut self, index: usize, flipped: bool) {
        if self.card_ids.is_empty() {
            return;
        }
        self.index = index.min(self.card_ids.len() - 1);
        self.flipped = flipped;
    }

    /// Shuffle the order and start over from the first card.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.card_ids.shuffle(rng);
        self.index = 0;
        self.flipped = false;
    }

    pub fn card_ids(&self) -> &[String] {
        &self.card_ids
    }

    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&str> {
        self.card_ids.get(self.index).map(String::as_str)
    }

    /// One-based position and total, e.g. `(3, 10)`.
    pub fn position(&self) -> (usize, usize) {
        if self.card_ids.is_empty() {
            (0, 0)
        } else {
            (self.index + 1, self.card_ids.len())
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.card_ids.len()
    }

    /// Advance one card. Returns false at the end.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        self.flipped = false;
        true
    }

    /// Go back one card. Returns false at the start.
    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.flipped = false;
        true
    }

    /// Take the current card for marking and move on unless it is the last.
    pub fn mark(&mut self) -> Option<String> {
        let id = self.current()?.to_string();
        self.next();
        Some(id)
    }

    /// Drop cards for which `keep` returns false and return how many went.
    ///
    /// The current card stays current when kept. Otherwise the card that
    /// followed it takes its place, or the new last card, unflipped.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let index = self.index;
        let before = self.card_ids.len();
        let mut pos = 0;
        let mut removed_before = 0;
        let mut current_removed = false;

        self.card_ids.retain(|id| {
            let kept = keep(id);
            if !kept {
                if pos < index {
                    removed_before += 1;
                } else if pos == index {
                    current_removed = true;
                }
            }
            pos += 1;
            kept
        });

        self.index = (index - removed_before).min(self.card_ids.len().saturating_sub(1));
        if current_removed || self.card_ids.is_empty() {
            self.flipped = false;
        }
        before - self.card_ids.len()
    }
}
