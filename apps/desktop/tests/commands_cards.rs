//! Card and folder command tests.

mod common;

use brainzlet_core::{
    CardUpdate, Difficulty, FolderUpdate, SortDirection, SortField, DEFAULT_FOLDER_ID,
};
use brainzlet_desktop::commands::{self, CardListRequest};
use common::TestContext;
use pretty_assertions::assert_eq;

#[test]
fn add_card_is_written_through() {
    let ctx = TestContext::new();
    let card = ctx.add_card("  What is 2+2?  ", "4", "arith");

    assert_eq!(card.question, "What is 2+2?");
    assert_eq!(card.folder, DEFAULT_FOLDER_ID);
    assert_eq!(ctx.stored_card(&card.id), Some(card));
}

#[test]
fn add_card_rejects_blank_question() {
    let ctx = TestContext::new();
    let err = commands::add_card(&ctx.state, brainzlet_core::NewCard::new("   ", "a"))
        .unwrap_err();

    assert!(err.message.contains("question"));
    assert_eq!(ctx.stored_card_count(), 0);
}

#[test]
fn add_card_remembers_category_per_folder() {
    let ctx = TestContext::new();
    ctx.add_card("q", "a", "geometry");

    let ui = commands::get_ui_state(&ctx.state).unwrap();
    assert_eq!(ui.last_category_for(DEFAULT_FOLDER_ID), "geometry");
}

#[test]
fn list_cards_filters_and_sorts() {
    let ctx = TestContext::new();
    ctx.add_card("Banana", "yellow", "fruit");
    ctx.add_card("Apple", "red", "fruit");
    ctx.add_card("Carrot", "orange", "veg");

    let request = CardListRequest {
        category: "fruit".to_string(),
        sort_field: SortField::Question,
        sort_direction: SortDirection::Asc,
        ..Default::default()
    };
    let questions: Vec<String> = commands::list_cards(&ctx.state, request)
        .unwrap()
        .into_iter()
        .map(|c| c.question)
        .collect();
    assert_eq!(questions, vec!["Apple", "Banana"]);

    let request = CardListRequest {
        search: "ORANGE".to_string(),
        ..Default::default()
    };
    let found = commands::list_cards(&ctx.state, request).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].question, "Carrot");
}

#[test]
fn update_card_changes_only_given_fields() {
    let ctx = TestContext::new();
    let card = ctx.add_card("q", "a", "old");

    let updated = commands::update_card(
        &ctx.state,
        card.id.clone(),
        CardUpdate {
            category: Some("new".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(updated.category, "new");
    assert_eq!(updated.question, "q");
    assert_eq!(ctx.stored_card(&card.id).unwrap().category, "new");
}

#[test]
fn update_card_to_unknown_folder_fails() {
    let ctx = TestContext::new();
    let card = ctx.add_card("q", "a", "");

    let result = commands::update_card(
        &ctx.state,
        card.id,
        CardUpdate {
            folder: Some("nowhere".to_string()),
            ..Default::default()
        },
    );
    assert!(result.is_err());
}

#[test]
fn delete_and_bulk_operations() {
    let ctx = TestContext::new();
    let a = ctx.add_card("a", "1", "");
    let b = ctx.add_card("b", "2", "");
    let c = ctx.add_card("c", "3", "");

    commands::delete_card(&ctx.state, a.id.clone()).unwrap();
    assert!(ctx.stored_card(&a.id).is_none());
    assert!(commands::delete_card(&ctx.state, a.id.clone()).is_err());

    let changed =
        commands::set_cards_category(&ctx.state, vec![b.id.clone(), c.id.clone()], "bulk".into())
            .unwrap();
    assert_eq!(changed, 2);
    assert_eq!(
        commands::list_card_categories(&ctx.state, None).unwrap(),
        vec!["bulk"]
    );

    let removed = commands::delete_cards(&ctx.state, vec![b.id, "missing".to_string()]).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(ctx.stored_card_count(), 1);
}

#[test]
fn mark_reviewed_counts_reviews() {
    let ctx = TestContext::new();
    let card = ctx.add_card("q", "a", "");

    commands::mark_reviewed(&ctx.state, card.id.clone(), Difficulty::Hard).unwrap();
    let marked = commands::mark_reviewed(&ctx.state, card.id.clone(), Difficulty::Easy).unwrap();

    assert_eq!(marked.review_count, 2);
    assert_eq!(marked.difficulty, Difficulty::Easy);
    assert!(marked.last_reviewed.is_some());
    assert_eq!(ctx.stored_card(&card.id), Some(marked));
}

#[test]
fn deleting_a_folder_moves_its_cards_to_default() {
    let ctx = TestContext::new();
    let work = ctx.add_folder("Work");
    let card = ctx.add_card_in(&work.id, "q", "a");
    ctx.add_card("other", "a", "");

    let moved = commands::delete_folder(&ctx.state, work.id.clone()).unwrap();

    assert_eq!(moved, 1);
    assert_eq!(ctx.stored_card(&card.id).unwrap().folder, DEFAULT_FOLDER_ID);
    assert!(ctx.stored_folders().iter().all(|f| f.id != work.id));
}

#[test]
fn default_folder_cannot_be_deleted() {
    let ctx = TestContext::new();
    assert!(commands::delete_folder(&ctx.state, DEFAULT_FOLDER_ID.to_string()).is_err());
    assert_eq!(ctx.stored_folders().len(), 1);
}

#[test]
fn move_cards_and_folder_stats() {
    let ctx = TestContext::new();
    let lab = ctx.add_folder("Lab");
    let a = ctx.add_card("a", "1", "");
    let b = ctx.add_card("b", "2", "");
    commands::mark_reviewed(&ctx.state, a.id.clone(), Difficulty::Easy).unwrap();

    let moved = commands::move_cards(&ctx.state, vec![a.id, b.id], lab.id.clone()).unwrap();
    assert_eq!(moved, 2);

    let stats = commands::get_folder_stats(&ctx.state, Some(lab.id)).unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.reviewed, 1);
    assert_eq!(stats.easy, 1);
    assert_eq!(stats.medium, 1);

    let all = commands::get_folder_stats(&ctx.state, None).unwrap();
    assert_eq!(all.total, 2);
}

#[test]
fn rename_folder() {
    let ctx = TestContext::new();
    let folder = ctx.add_folder("Draft");

    let renamed = commands::update_folder(
        &ctx.state,
        folder.id.clone(),
        FolderUpdate {
            name: Some("Final".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(renamed.name, "Final");
    let stored = ctx.stored_folders();
    assert!(stored.iter().any(|f| f.id == folder.id && f.name == "Final"));
}
