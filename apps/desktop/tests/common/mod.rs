//! Common test utilities for command integration tests.
//!
//! Every [`TestContext`] owns a fresh in-memory database, so tests never
//! share state.

pub mod fixtures;

use brainzlet_core::{Card, Folder, NewCard, NewFolder};
use brainzlet_desktop::commands;
use brainzlet_desktop::db::{CardRepository, FolderRepository, SqliteRepository};
use brainzlet_desktop::AppState;

pub struct TestContext {
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let repository = SqliteRepository::open_in_memory().expect("open in-memory database");
        let state = AppState::new(repository).expect("load application state");
        Self { state }
    }

    /// Add a card through the command layer.
    pub fn add_card(&self, question: &str, answer: &str, category: &str) -> Card {
        commands::add_card(
            &self.state,
            NewCard::new(question, answer).with_category(category),
        )
        .expect("add card")
    }

    pub fn add_card_in(&self, folder: &str, question: &str, answer: &str) -> Card {
        commands::add_card(&self.state, NewCard::new(question, answer).in_folder(folder))
            .expect("add card")
    }

    pub fn add_folder(&self, name: &str) -> Folder {
        commands::add_folder(
            &self.state,
            NewFolder {
                name: name.to_string(),
                ..Default::default()
            },
        )
        .expect("add folder")
    }

    /// Card as stored in the database, bypassing the in-memory collection.
    pub fn stored_card(&self, id: &str) -> Option<Card> {
        let repo = self.state.repository.lock().expect("repository lock");
        repo.get_card(id).expect("read card")
    }

    pub fn stored_card_count(&self) -> usize {
        let repo = self.state.repository.lock().expect("repository lock");
        repo.count_cards().expect("count cards")
    }

    pub fn stored_folders(&self) -> Vec<Folder> {
        let repo = self.state.repository.lock().expect("repository lock");
        repo.get_all_folders().expect("read folders")
    }
}
