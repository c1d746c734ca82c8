//! In-memory card store.
//!
//! A [`Collection`] owns every card and folder. The default folder always
//! exists, and every card points at a folder that exists: creating a card
//! in an unknown folder files it under the default one, and deleting a
//! folder moves its cards there.

use crate::error::{CollectionError, Result};
use crate::types::{
    Card, CardUpdate, Difficulty, Folder, FolderFilter, FolderStats, FolderUpdate, NewCard,
    NewFolder, SortDirection, SortField, DEFAULT_FOLDER_ID,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// Filter and sort options for listing cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardQuery {
    pub folder: FolderFilter,
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    /// Exact category; empty matches everything.
    pub category: String,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl CardQuery {
    pub fn in_folder(mut self, folder: FolderFilter) -> Self {
        self.folder = folder;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn sorted_by(mut self, sort: SortField, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }
}

/// The card store.
#[derive(Debug, Clone)]
pub struct Collection {
    cards: Vec<Card>,
    folders: Vec<Folder>,
}

impl Collection {
    /// An empty collection holding only the default folder.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            cards: Vec::new(),
            folders: vec![Folder::default_folder(now)],
        }
    }

    /// Rebuild a collection from stored parts.
    ///
    /// Adds the default folder when missing and moves cards that reference
    /// unknown folders into it.
    pub fn from_parts(cards: Vec<Card>, mut folders: Vec<Folder>, now: DateTime<Utc>) -> Self {
        if !folders.iter().any(Folder::is_default) {
            folders.insert(0, Folder::default_folder(now));
        }
        let mut collection = Self { cards, folders };
        collection.reassign_orphans();
        collection
    }

    // ==================== Cards ====================

    pub fn list(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Card> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CollectionError::CardNotFound(id.to_string()))
    }

    /// Create a card with a fresh id.
    pub fn create(&mut self, new: NewCard, now: DateTime<Utc>) -> Result<&Card> {
        let question = required(&new.question, "question")?;
        let answer = required(&new.answer, "answer")?;
        let folder = self.resolve_folder(new.folder.as_deref());

        self.cards.push(Card {
            id: Uuid::new_v4().to_string(),
            question,
            answer,
            category: new.category.trim().to_string(),
            folder,
            difficulty: Difficulty::Medium,
            created_at: now,
            last_reviewed: None,
            review_count: 0,
        });

        let card = &self.cards[self.cards.len() - 1];
        tracing::debug!(id = %card.id, folder = %card.folder, "card created");
        Ok(card)
    }

    /// Apply a partial update.
    pub fn update(&mut self, id: &str, update: CardUpdate) -> Result<&Card> {
        let question = update
            .question
            .as_deref()
            .map(|q| required(q, "question"))
            .transpose()?;
        let answer = update
            .answer
            .as_deref()
            .map(|a| required(a, "answer"))
            .transpose()?;
        if let Some(folder) = &update.folder {
            if self.folder(folder).is_none() {
                return Err(CollectionError::FolderNotFound(folder.clone()));
            }
        }

        let card = self.get_mut(id)?;
        if let Some(question) = question {
            card.question = question;
        }
        if let Some(answer) = answer {
            card.answer = answer;
        }
        if let Some(category) = update.category {
            card.category = category.trim().to_string();
        }
        if let Some(folder) = update.folder {
            card.folder = folder;
        }
        if let Some(difficulty) = update.difficulty {
            card.difficulty = difficulty;
        }
        Ok(card)
    }

    pub fn delete(&mut self, id: &str) -> Result<Card> {
        let idx = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CollectionError::CardNotFound(id.to_string()))?;
        Ok(self.cards.remove(idx))
    }

    /// Record a study review.
    pub fn mark_reviewed(
        &mut self,
        id: &str,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Result<&Card> {
        let card = self.get_mut(id)?;
        card.last_reviewed = Some(now);
        card.difficulty = difficulty;
        card.review_count += 1;
        Ok(card)
    }

    /// Append already-validated cards, e.g. from an import.
    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
        self.reassign_orphans();
    }

    /// Delete every card whose id is in `ids`. Returns how many were removed.
    pub fn delete_many(&mut self, ids: &[String]) -> usize {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.cards.len();
        self.cards.retain(|c| !ids.contains(c.id.as_str()));
        before - self.cards.len()
    }

    /// Set the category of every listed card. Returns how many changed.
    pub fn set_category_many(&mut self, ids: &[String], category: &str) -> usize {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let category = category.trim();
        let mut changed = 0;
        for card in self.cards.iter_mut().filter(|c| ids.contains(c.id.as_str())) {
            card.category = category.to_string();
            changed += 1;
        }
        changed
    }

    /// Move every listed card into `folder`.
    pub fn move_to_folder(&mut self, ids: &[String], folder: &str) -> Result<usize> {
        if self.folder(folder).is_none() {
            return Err(CollectionError::FolderNotFound(folder.to_string()));
        }
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut moved = 0;
        for card in self.cards.iter_mut().filter(|c| ids.contains(c.id.as_str())) {
            card.folder = folder.to_string();
            moved += 1;
        }
        Ok(moved)
    }

    // ==================== Lookups ====================

    /// Cards whose question, answer or category contains `query`,
    /// ignoring case. An empty query matches every card.
    pub fn search(&self, query: &str) -> Vec<&Card> {
        let needle = query.to_lowercase();
        self.cards.iter().filter(|c| matches_search(c, &needle)).collect()
    }

    pub fn filter_by_folder(&self, folder: &FolderFilter) -> Vec<&Card> {
        self.cards.iter().filter(|c| folder.matches(c)).collect()
    }

    /// Cards in `category`. An empty category matches every card.
    pub fn filter_by_category(&self, category: &str) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| category.is_empty() || c.category == category)
            .collect()
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.categories_in_folder(&FolderFilter::All)
    }

    pub fn categories_in_folder(&self, folder: &FolderFilter) -> Vec<String> {
        self.cards
            .iter()
            .filter(|c| folder.matches(c) && !c.category.is_empty())
            .map(|c| c.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Folder filter, then search, then category, then a stable sort.
    pub fn query(&self, query: &CardQuery) -> Vec<&Card> {
        let needle = query.search.to_lowercase();
        let mut cards: Vec<&Card> = self
            .cards
            .iter()
            .filter(|c| query.folder.matches(c))
            .filter(|c| matches_search(c, &needle))
            .filter(|c| query.category.is_empty() || c.category == query.category)
            .collect();

        cards.sort_by(|a, b| {
            let ordering = compare_by(a, b, query.sort);
            match query.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        cards
    }

    // ==================== Folders ====================

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn add_folder(&mut self, new: NewFolder, now: DateTime<Utc>) -> Result<&Folder> {
        let name = required(&new.name, "folder name")?;
        self.folders.push(Folder {
            id: Uuid::new_v4().to_string(),
            name,
            description: new.description.trim().to_string(),
            color: new.color,
            icon: new.icon,
            created_at: now,
        });
        Ok(&self.folders[self.folders.len() - 1])
    }

    pub fn update_folder(&mut self, id: &str, update: FolderUpdate) -> Result<&Folder> {
        let name = update
            .name
            .as_deref()
            .map(|n| required(n, "folder name"))
            .transpose()?;
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| CollectionError::FolderNotFound(id.to_string()))?;

        if let Some(name) = name {
            folder.name = name;
        }
        if let Some(description) = update.description {
            folder.description = description.trim().to_string();
        }
        if let Some(color) = update.color {
            folder.color = color;
        }
        if let Some(icon) = update.icon {
            folder.icon = icon;
        }
        Ok(folder)
    }

    /// Delete a folder and move its cards to the default folder.
    ///
    /// Returns the number of cards that were moved.
    pub fn delete_folder(&mut self, id: &str) -> Result<usize> {
        if id == DEFAULT_FOLDER_ID {
            return Err(CollectionError::DefaultFolderProtected);
        }
        let idx = self
            .folders
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| CollectionError::FolderNotFound(id.to_string()))?;
        self.folders.remove(idx);

        let moved = self.move_cards(|card| card.folder == id);
        tracing::info!(folder = id, moved, "folder deleted, cards moved to default folder");
        Ok(moved)
    }

    /// Move cards that reference a missing folder into the default folder.
    pub fn reassign_orphans(&mut self) -> usize {
        let known: HashSet<String> = self.folders.iter().map(|f| f.id.clone()).collect();
        let moved = self.move_cards(|card| !known.contains(&card.folder));
        if moved > 0 {
            tracing::info!(moved, "orphaned cards moved to default folder");
        }
        moved
    }

    fn move_cards(&mut self, predicate: impl Fn(&Card) -> bool) -> usize {
        let mut moved = 0;
        for card in self.cards.iter_mut() {
            if predicate(card) {
                card.folder = DEFAULT_FOLDER_ID.to_string();
                moved += 1;
            }
        }
        moved
    }

    pub fn folder_stats(&self, folder: &FolderFilter) -> FolderStats {
        let mut stats = FolderStats::default();
        for card in self.cards.iter().filter(|c| folder.matches(c)) {
            stats.total += 1;
            if card.last_reviewed.is_some() {
                stats.reviewed += 1;
            }
            match card.difficulty {
                Difficulty::Easy => stats.easy += 1,
                Difficulty::Medium => stats.medium += 1,
                Difficulty::Hard => stats.hard += 1,
            }
        }
        stats
    }

    fn resolve_folder(&self, requested: Option<&str>) -> String {
        match requested {
            Some(id) if self.folder(id).is_some() => id.to_string(),
            _ => DEFAULT_FOLDER_ID.to_string(),
        }
    }
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CollectionError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// `needle` must already be lowercase.
fn matches_search(card: &Card, needle: &str) -> bool {
    needle.is_empty()
        || card.question.to_lowercase().contains(needle)
        || card.answer.to_lowercase().contains(needle)
        || card.category.to_lowercase().contains(needle)
}

fn compare_by(a: &Card, b: &Card, field: SortField) -> Ordering {
    match field {
        SortField::Question => a.question.to_lowercase().cmp(&b.question.to_lowercase()),
        SortField::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        SortField::Difficulty => a.difficulty.rank().cmp(&b.difficulty.rank()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn sample() -> Collection {
        let mut collection = Collection::new(now());
        collection
            .create(NewCard::new("What is Rust?", "A language").with_category("Programming"), now())
            .unwrap();
        collection
            .create(
                NewCard::new("Capital of France", "Paris").with_category("Geography"),
                now() + Duration::minutes(1),
            )
            .unwrap();
        collection
            .create(NewCard::new("2 + 2", "4"), now() + Duration::minutes(2))
            .unwrap();
        collection
    }

    fn ids(cards: &[&Card]) -> Vec<String> {
        cards.iter().map(|c| c.question.clone()).collect()
    }

    #[test]
    fn new_collection_has_default_folder() {
        let collection = Collection::new(now());
        assert_eq!(collection.folders().len(), 1);
        assert!(collection.folders()[0].is_default());
        assert!(collection.is_empty());
    }

    #[test]
    fn create_trims_and_defaults() {
        let mut collection = Collection::new(now());
        let card = collection
            .create(
                NewCard::new("  Q  ", "\tA\n").with_category("  Cat ").in_folder("missing"),
                now(),
            )
            .unwrap()
            .clone();

        assert_eq!(card.question, "Q");
        assert_eq!(card.answer, "A");
        assert_eq!(card.category, "Cat");
        assert_eq!(card.folder, DEFAULT_FOLDER_ID);
        assert_eq!(card.difficulty, Difficulty::Medium);
        assert_eq!(card.review_count, 0);
        assert!(Uuid::parse_str(&card.id).is_ok());
    }

    #[test]
    fn create_rejects_blank_fields() {
        let mut collection = Collection::new(now());
        assert_eq!(
            collection.create(NewCard::new("   ", "A"), now()).unwrap_err(),
            CollectionError::EmptyField("question")
        );
        assert_eq!(
            collection.create(NewCard::new("Q", ""), now()).unwrap_err(),
            CollectionError::EmptyField("answer")
        );
        assert!(collection.is_empty());
    }

    #[test]
    fn update_changes_only_given_fields() {
        let mut collection = sample();
        let id = collection.list()[0].id.clone();
        let updated = collection
            .update(
                &id,
                CardUpdate {
                    answer: Some(" A systems language ".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.question, "What is Rust?");
        assert_eq!(updated.answer, "A systems language");
        assert_eq!(updated.category, "Programming");
    }

    #[test]
    fn update_unknown_card_or_folder_fails() {
        let mut collection = sample();
        assert_eq!(
            collection.update("nope", CardUpdate::default()).unwrap_err(),
            CollectionError::CardNotFound("nope".into())
        );
        let id = collection.list()[0].id.clone();
        assert_eq!(
            collection
                .update(
                    &id,
                    CardUpdate {
                        folder: Some("ghost".into()),
                        ..Default::default()
                    }
                )
                .unwrap_err(),
            CollectionError::FolderNotFound("ghost".into())
        );
    }

    #[test]
    fn delete_removes_card() {
        let mut collection = sample();
        let id = collection.list()[1].id.clone();
        let removed = collection.delete(&id).unwrap();
        assert_eq!(removed.question, "Capital of France");
        assert_eq!(collection.len(), 2);
        assert!(collection.delete(&id).is_err());
    }

    #[test]
    fn mark_reviewed_updates_review_fields() {
        let mut collection = sample();
        let id = collection.list()[0].id.clone();
        let later = now() + Duration::hours(3);
        collection.mark_reviewed(&id, Difficulty::Hard, later).unwrap();
        let card = collection.mark_reviewed(&id, Difficulty::Easy, later).unwrap();
        assert_eq!(card.review_count, 2);
        assert_eq!(card.difficulty, Difficulty::Easy);
        assert_eq!(card.last_reviewed, Some(later));
    }

    #[test]
    fn search_is_case_insensitive_over_all_text() {
        let collection = sample();
        assert_eq!(ids(&collection.search("PARIS")), vec!["Capital of France"]);
        assert_eq!(ids(&collection.search("programming")), vec!["What is Rust?"]);
        assert_eq!(collection.search("").len(), 3);
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let mut collection = sample();
        collection
            .create(NewCard::new("Q", "A").with_category("Geography"), now())
            .unwrap();
        assert_eq!(collection.categories(), vec!["Geography", "Programming"]);
        assert_eq!(collection.filter_by_category("Geography").len(), 2);
        assert_eq!(collection.filter_by_category("").len(), 4);
    }

    #[test]
    fn deleting_a_folder_moves_its_cards_to_default() {
        let mut collection = sample();
        let work = collection
            .add_folder(
                NewFolder {
                    name: "Work".into(),
                    ..Default::default()
                },
                now(),
            )
            .unwrap()
            .id
            .clone();
        let all: Vec<String> = collection.list().iter().map(|c| c.id.clone()).collect();
        assert_eq!(collection.move_to_folder(&all[..2], &work).unwrap(), 2);
        assert_eq!(
            collection.filter_by_folder(&FolderFilter::Folder(work.clone())).len(),
            2
        );

        assert_eq!(collection.delete_folder(&work).unwrap(), 2);
        assert!(collection.folder(&work).is_none());
        assert!(collection.list().iter().all(|c| c.folder == DEFAULT_FOLDER_ID));
    }

    #[test]
    fn default_folder_cannot_be_deleted() {
        let mut collection = sample();
        assert_eq!(
            collection.delete_folder(DEFAULT_FOLDER_ID).unwrap_err(),
            CollectionError::DefaultFolderProtected
        );
        assert_eq!(
            collection.delete_folder("ghost").unwrap_err(),
            CollectionError::FolderNotFound("ghost".into())
        );
    }

    #[test]
    fn from_parts_restores_invariants() {
        let mut card = sample().list()[0].clone();
        card.folder = "deleted-long-ago".into();
        let collection = Collection::from_parts(vec![card], Vec::new(), now());
        assert!(collection.folder(DEFAULT_FOLDER_ID).is_some());
        assert_eq!(collection.list()[0].folder, DEFAULT_FOLDER_ID);
    }

    #[test]
    fn bulk_operations_report_counts() {
        let mut collection = sample();
        let all: Vec<String> = collection.list().iter().map(|c| c.id.clone()).collect();
        assert_eq!(collection.set_category_many(&all[1..], " Misc "), 2);
        assert_eq!(collection.categories(), vec!["Misc", "Programming"]);
        assert_eq!(collection.delete_many(&[all[0].clone(), "ghost".into()]), 1);
        assert_eq!(collection.len(), 2);
        assert!(collection.move_to_folder(&all, "ghost").is_err());
    }

    #[test]
    fn folder_stats_count_difficulties() {
        let mut collection = sample();
        let id = collection.list()[0].id.clone();
        collection.mark_reviewed(&id, Difficulty::Hard, now()).unwrap();
        assert_eq!(
            collection.folder_stats(&FolderFilter::All),
            FolderStats {
                total: 3,
                reviewed: 1,
                easy: 0,
                medium: 2,
                hard: 1,
            }
        );
    }

    #[test]
    fn query_filters_then_sorts() {
        let collection = sample();

        let newest_first = collection.query(&CardQuery::default());
        assert_eq!(ids(&newest_first), vec!["2 + 2", "Capital of France", "What is Rust?"]);

        let by_question = collection.query(
            &CardQuery::default().sorted_by(SortField::Question, SortDirection::Asc),
        );
        assert_eq!(ids(&by_question), vec!["2 + 2", "Capital of France", "What is Rust?"]);

        let searched = collection.query(&CardQuery::default().search("a").category("Geography"));
        assert_eq!(ids(&searched), vec!["Capital of France"]);
    }

    #[test]
    fn difficulty_sorts_by_rank_and_is_stable() {
        let mut collection = sample();
        let all: Vec<String> = collection.list().iter().map(|c| c.id.clone()).collect();
        collection.mark_reviewed(&all[0], Difficulty::Hard, now()).unwrap();
        collection.mark_reviewed(&all[2], Difficulty::Easy, now()).unwrap();

        let asc = collection.query(
            &CardQuery::default().sorted_by(SortField::Difficulty, SortDirection::Asc),
        );
        assert_eq!(ids(&asc), vec!["2 + 2", "Capital of France", "What is Rust?"]);

        let desc = collection.query(
            &CardQuery::default().sorted_by(SortField::Difficulty, SortDirection::Desc),
        );
        assert_eq!(ids(&desc), vec!["What is Rust?", "Capital of France", "2 + 2"]);
    }
}
