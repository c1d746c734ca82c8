//! Sample data for command tests.

use serde_json::{json, Value};

/// An exported card array as another install would write it.
pub fn export_payload(folder: &str) -> Value {
    json!([
        {
            "id": "old-1",
            "question": "What is $\\pi$?",
            "answer": "About **3.14**",
            "category": "math",
            "folder": folder,
            "difficulty": "easy",
            "createdAt": "2024-01-10T08:00:00Z",
            "reviewCount": 4
        },
        {
            "id": "old-2",
            "question": "Capital of France?",
            "answer": "Paris"
        },
        {
            "question": "no id, skipped",
            "answer": "x"
        }
    ])
}
