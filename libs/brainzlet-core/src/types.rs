//! Core types for the flashcard collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the folder every card falls back to.
pub const DEFAULT_FOLDER_ID: &str = "general";

/// Display name of the default folder.
pub const DEFAULT_FOLDER_NAME: &str = "General Review";

/// Folder key that selects every folder.
pub const ALL_FOLDERS: &str = "all";

/// Difficulty tag assigned while studying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    /// Numeric weight used for ordering and averages (1-3).
    pub fn rank(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parse from the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// A question/answer flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_count: u32,
}

fn default_folder() -> String {
    DEFAULT_FOLDER_ID.to_string()
}

/// Fields supplied when creating a card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCard {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub folder: Option<String>,
}

impl NewCard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }
}

/// Partial card update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// A named grouping of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// The built-in folder orphaned cards are moved to.
    pub fn default_folder(now: DateTime<Utc>) -> Self {
        Self {
            id: DEFAULT_FOLDER_ID.to_string(),
            name: DEFAULT_FOLDER_NAME.to_string(),
            description: "Cards without a more specific home".to_string(),
            color: "#667eea".to_string(),
            icon: "📚".to_string(),
            created_at: now,
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_FOLDER_ID
    }
}

/// Fields supplied when creating a folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewFolder {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

/// Partial folder update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Per-folder difficulty breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderStats {
    pub total: usize,
    pub reviewed: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

/// Folder selector used by filters: every folder or a single one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FolderFilter {
    #[default]
    All,
    Folder(String),
}

impl FolderFilter {
    /// Interpret a stored folder key, where `"all"` selects every folder.
    pub fn from_key(key: &str) -> Self {
        if key == ALL_FOLDERS || key.is_empty() {
            Self::All
        } else {
            Self::Folder(key.to_string())
        }
    }

    pub fn matches(&self, card: &Card) -> bool {
        match self {
            Self::All => true,
            Self::Folder(id) => card.folder == *id,
        }
    }
}

/// Field the manage view sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Question,
    Category,
    Difficulty,
    #[default]
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}
