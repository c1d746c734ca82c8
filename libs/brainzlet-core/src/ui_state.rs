//! View state that survives restarts.

use crate::collection::CardQuery;
use crate::study::StudyFilter;
use crate::types::{FolderFilter, SortDirection, SortField, ALL_FOLDERS, DEFAULT_FOLDER_ID};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key the UI state is stored under.
pub const UI_STATE_KEY: &str = "flashcards-ui-state";

const LEGACY_CATEGORY_KEY: &str = "studySelectedCategory";
const CATEGORIES_KEY: &str = "studySelectedCategories";

/// Selections of the study, manage and add views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub study_current_index: usize,
    pub study_selected_categories: Vec<String>,
    pub study_folder: String,
    pub study_is_flipped: bool,

    pub manage_search_query: String,
    pub manage_selected_category: String,
    pub manage_selected_folder: String,
    pub manage_sort_field: SortField,
    pub manage_sort_direction: SortDirection,
    pub manage_expanded_card: Option<String>,

    /// Folder id to the category last used when adding a card there.
    pub add_card_last_category: BTreeMap<String, String>,
    pub add_card_selected_folder: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            study_current_index: 0,
            study_selected_categories: Vec::new(),
            study_folder: ALL_FOLDERS.to_string(),
            study_is_flipped: false,
            manage_search_query: String::new(),
            manage_selected_category: String::new(),
            manage_selected_folder: ALL_FOLDERS.to_string(),
            manage_sort_field: SortField::CreatedAt,
            manage_sort_direction: SortDirection::Desc,
            manage_expanded_card: None,
            add_card_last_category: BTreeMap::new(),
            add_card_selected_folder: DEFAULT_FOLDER_ID.to_string(),
        }
    }
}

impl UiState {
    /// Load stored state. Missing keys take defaults; anything unreadable
    /// gives the default state.
    pub fn from_json(json: &str) -> Self {
        let mut value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "stored UI state is not JSON, using defaults");
                return Self::default();
            }
        };
        migrate(&mut value);
        serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "stored UI state is invalid, using defaults");
            Self::default()
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Overlay the keys of a partial JSON object onto this state.
    pub fn merged(&self, patch: &Value) -> serde_json::Result<Self> {
        let mut value = serde_json::to_value(self)?;
        if let (Value::Object(target), Value::Object(updates)) = (&mut value, patch) {
            for (key, update) in updates {
                target.insert(key.clone(), update.clone());
            }
        }
        serde_json::from_value(value)
    }

    pub fn last_category_for(&self, folder: &str) -> &str {
        self.add_card_last_category
            .get(folder)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn remember_category(&mut self, folder: &str, category: &str) {
        self.add_card_last_category
            .insert(folder.to_string(), category.to_string());
    }

    /// The manage view's filter and sort selections.
    pub fn manage_query(&self) -> CardQuery {
        CardQuery::default()
            .in_folder(FolderFilter::from_key(&self.manage_selected_folder))
            .search(self.manage_search_query.clone())
            .category(self.manage_selected_category.clone())
            .sorted_by(self.manage_sort_field, self.manage_sort_direction)
    }

    /// The study view's folder and category selections.
    pub fn study_filter(&self) -> StudyFilter {
        StudyFilter {
            folder: FolderFilter::from_key(&self.study_folder),
            categories: self.study_selected_categories.clone(),
        }
    }
}

/// Older versions stored a single study category.
fn migrate(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };
    if map.contains_key(CATEGORIES_KEY) {
        return;
    }
    let Some(legacy) = map.remove(LEGACY_CATEGORY_KEY) else {
        return;
    };
    let categories = match legacy.as_str() {
        Some(category) if !category.is_empty() => vec![Value::String(category.to_string())],
        _ => Vec::new(),
    };
    map.insert(CATEGORIES_KEY.to_string(), Value::Array(categories));
}
