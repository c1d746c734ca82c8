//! JSON export and import of card lists.
//!
//! Exports are a pretty-printed JSON array of cards. Imports accept any
//! array of card-shaped objects: elements without string `id`, `question`
//! and `answer` fields are dropped, and every accepted card gets a fresh id
//! so it cannot collide with an existing one.

use crate::error::ImportError;
use crate::types::{Card, Difficulty, DEFAULT_FOLDER_ID};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "flashcards.json";

/// Cards accepted from an import plus how many elements were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub cards: Vec<Card>,
    pub skipped: usize,
}

/// Serialize cards as a pretty-printed JSON array.
pub fn export_cards(cards: &[Card]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(cards)
}

/// Parse an exported card list.
///
/// Missing optional fields fall back to defaults. A folder that is not in
/// `known_folders` becomes the default folder.
pub fn import_cards(
    json: &str,
    known_folders: &HashSet<String>,
    now: DateTime<Utc>,
) -> Result<ImportOutcome, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let total = items.len();
    let cards: Vec<Card> = items
        .iter()
        .filter_map(|item| item.as_object())
        .filter_map(|object| card_from_object(object, known_folders, now))
        .collect();
    let skipped = total - cards.len();

    tracing::info!(imported = cards.len(), skipped, "parsed card import");
    Ok(ImportOutcome { cards, skipped })
}

fn card_from_object(
    object: &Map<String, Value>,
    known_folders: &HashSet<String>,
    now: DateTime<Utc>,
) -> Option<Card> {
    let str_field = |name: &str| object.get(name).and_then(Value::as_str);

    // `id` is only checked; imported cards never keep it.
    str_field("id")?;
    let question = str_field("question")?.to_string();
    let answer = str_field("answer")?.to_string();

    let folder = str_field("folder")
        .filter(|f| known_folders.contains(*f))
        .unwrap_or(DEFAULT_FOLDER_ID)
        .to_string();
    let difficulty = str_field("difficulty")
        .and_then(Difficulty::parse)
        .unwrap_or_default();
    let created_at = str_field("createdAt").and_then(parse_timestamp).unwrap_or(now);
    let last_reviewed = str_field("lastReviewed").and_then(parse_timestamp);
    let review_count = object
        .get("reviewCount")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);

    Some(Card {
        id: Uuid::new_v4().to_string(),
        question,
        answer,
        category: str_field("category").unwrap_or_default().to_string(),
        folder,
        difficulty,
        created_at,
        last_reviewed,
        review_count,
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn folders() -> HashSet<String> {
        ["general", "work"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_non_json_and_non_arrays() {
        assert!(matches!(
            import_cards("not json", &folders(), now()),
            Err(ImportError::Json(_))
        ));
        assert!(matches!(
            import_cards(r#"{"id": "x"}"#, &folders(), now()),
            Err(ImportError::NotAnArray)
        ));
    }

    #[test]
    fn drops_elements_without_required_strings() {
        let json = r#"[
            {"id": "1", "question": "Q1", "answer": "A1"},
            {"id": "2", "question": "Q2"},
            {"id": 3, "question": "Q3", "answer": "A3"},
            {"question": "Q4", "answer": "A4"},
            "just a string",
            {"id": "5", "question": "Q5", "answer": "A5"}
        ]"#;
        let outcome = import_cards(json, &folders(), now()).unwrap();
        let questions: Vec<&str> = outcome.cards.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["Q1", "Q5"]);
        assert_eq!(outcome.skipped, 4);
    }

    #[test]
    fn accepted_cards_get_fresh_ids() {
        let json = r#"[{"id": "dup", "question": "Q", "answer": "A"},
                       {"id": "dup", "question": "Q", "answer": "A"}]"#;
        let outcome = import_cards(json, &folders(), now()).unwrap();
        assert_eq!(outcome.cards.len(), 2);
        assert_ne!(outcome.cards[0].id, "dup");
        assert_ne!(outcome.cards[0].id, outcome.cards[1].id);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"[{"id": "1", "question": "Q", "answer": "A", "folder": "archived"}]"#;
        let card = import_cards(json, &folders(), now()).unwrap().cards.remove(0);
        assert_eq!(card.category, "");
        assert_eq!(card.folder, DEFAULT_FOLDER_ID);
        assert_eq!(card.difficulty, Difficulty::Medium);
        assert_eq!(card.created_at, now());
        assert_eq!(card.last_reviewed, None);
        assert_eq!(card.review_count, 0);
    }

    #[test]
    fn present_fields_are_kept() {
        let json = r#"[{
            "id": "1",
            "question": "Q",
            "answer": "A",
            "category": "Math",
            "folder": "work",
            "difficulty": "hard",
            "createdAt": "2024-01-02T03:04:05.000Z",
            "lastReviewed": "2024-02-02T00:00:00Z",
            "reviewCount": 7
        }]"#;
        let card = import_cards(json, &folders(), now()).unwrap().cards.remove(0);
        assert_eq!(card.category, "Math");
        assert_eq!(card.folder, "work");
        assert_eq!(card.difficulty, Difficulty::Hard);
        assert_eq!(card.created_at, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert!(card.last_reviewed.is_some());
        assert_eq!(card.review_count, 7);
    }

    #[test]
    fn export_is_a_pretty_array_that_imports_back() {
        let card = Card {
            id: "c1".into(),
            question: "What is $x^2$?".into(),
            answer: "**square**".into(),
            category: "Math".into(),
            folder: "work".into(),
            difficulty: Difficulty::Easy,
            created_at: now(),
            last_reviewed: None,
            review_count: 1,
        };
        let json = export_cards(std::slice::from_ref(&card)).unwrap();
        assert!(json.starts_with("[\n  {"));
        assert!(json.contains("\"createdAt\""));

        let back = import_cards(&json, &folders(), now()).unwrap().cards.remove(0);
        assert_eq!(back.question, card.question);
        assert_eq!(back.folder, card.folder);
        assert_eq!(back.difficulty, card.difficulty);
        assert_ne!(back.id, card.id);
    }
}
