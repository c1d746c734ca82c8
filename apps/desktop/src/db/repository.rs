//! Repository pattern for database access.

use crate::db::error::DbError;
use brainzlet_core::types::{Card, Difficulty, Folder};
use brainzlet_core::Collection;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for card reads.
pub trait CardRepository {
    fn get_card(&self, id: &str) -> Result<Option<Card>>;
    fn get_all_cards(&self) -> Result<Vec<Card>>;
    fn count_cards(&self) -> Result<usize>;
}

/// Repository for folder reads.
pub trait FolderRepository {
    fn get_folder(&self, id: &str) -> Result<Option<Folder>>;
    fn get_all_folders(&self) -> Result<Vec<Folder>>;
}

/// Repository for small JSON documents stored by key.
pub trait KeyValueRepository {
    fn get_value(&self, key: &str) -> Result<Option<String>>;
    fn set_value(&self, key: &str, value: &str) -> Result<()>;
    fn remove_value(&self, key: &str) -> Result<()>;

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get_value(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.set_value(key, &serde_json::to_string(value)?)
    }
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute(
            super::schema::INIT_SCHEMA_VERSION,
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Replace the stored cards and folders with `collection`.
    ///
    /// Runs in one transaction; the last save wins.
    pub fn save_collection(&self, collection: &Collection) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM cards", [])?;
        tx.execute("DELETE FROM folders", [])?;

        {
            let mut insert_folder = tx.prepare(
                "INSERT INTO folders (id, name, description, color, icon, created_at, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (position, folder) in collection.folders().iter().enumerate() {
                insert_folder.execute(params![
                    folder.id,
                    folder.name,
                    folder.description,
                    folder.color,
                    folder.icon,
                    folder.created_at.to_rfc3339(),
                    position as i64,
                ])?;
            }

            let mut insert_card = tx.prepare(
                "INSERT INTO cards (id, question, answer, category, folder_id, difficulty, created_at, last_reviewed, review_count, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for (position, card) in collection.list().iter().enumerate() {
                insert_card.execute(params![
                    card.id,
                    card.question,
                    card.answer,
                    card.category,
                    card.folder,
                    card.difficulty.as_str(),
                    card.created_at.to_rfc3339(),
                    card.last_reviewed.map(|at| at.to_rfc3339()),
                    card.review_count,
                    position as i64,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            cards = collection.len(),
            folders = collection.folders().len(),
            "collection saved"
        );
        Ok(())
    }

    /// Rebuild the collection from storage.
    ///
    /// Ensures the default folder exists and moves cards that reference a
    /// missing folder into it.
    pub fn load_collection(&self, now: DateTime<Utc>) -> Result<Collection> {
        let cards = self.get_all_cards()?;
        let folders = self.get_all_folders()?;
        let collection = Collection::from_parts(cards, folders, now);
        tracing::info!(
            cards = collection.len(),
            folders = collection.folders().len(),
            "collection loaded"
        );
        Ok(collection)
    }
}

const CARD_COLUMNS: &str = "id, question, answer, category, folder_id, difficulty, created_at, last_reviewed, review_count";

const FOLDER_COLUMNS: &str = "id, name, description, color, icon, created_at";

/// Raw card columns before validation.
struct CardRow {
    id: String,
    question: String,
    answer: String,
    category: String,
    folder: String,
    difficulty: String,
    created_at: String,
    last_reviewed: Option<String>,
    review_count: u32,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            category: row.get(3)?,
            folder: row.get(4)?,
            difficulty: row.get(5)?,
            created_at: row.get(6)?,
            last_reviewed: row.get(7)?,
            review_count: row.get(8)?,
        })
    }
}

impl TryFrom<CardRow> for Card {
    type Error = DbError;

    fn try_from(row: CardRow) -> Result<Self> {
        let difficulty = Difficulty::parse(&row.difficulty).ok_or_else(|| {
            DbError::CorruptRow(format!("card {}: difficulty '{}'", row.id, row.difficulty))
        })?;
        let created_at = parse_timestamp(&row.created_at)?;
        let last_reviewed = row
            .last_reviewed
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(Card {
            id: row.id,
            question: row.question,
            answer: row.answer,
            category: row.category,
            folder: row.folder,
            difficulty,
            created_at,
            last_reviewed,
            review_count: row.review_count,
        })
    }
}

/// Raw folder columns before validation.
struct FolderRow {
    id: String,
    name: String,
    description: String,
    color: String,
    icon: String,
    created_at: String,
}

impl FolderRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            color: row.get(3)?,
            icon: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<FolderRow> for Folder {
    type Error = DbError;

    fn try_from(row: FolderRow) -> Result<Self> {
        Ok(Folder {
            created_at: parse_timestamp(&row.created_at)?,
            id: row.id,
            name: row.name,
            description: row.description,
            color: row.color,
            icon: row.icon,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::CorruptRow(format!("timestamp '{s}': {e}")))
}

impl CardRepository for SqliteRepository {
    fn get_card(&self, id: &str) -> Result<Option<Card>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![id],
                CardRow::from_row,
            )
            .optional()?;
        row.map(Card::try_from).transpose()
    }

    fn get_all_cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY position"))?;
        let rows = stmt
            .query_map([], CardRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(Card::try_from).collect()
    }

    fn count_cards(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl FolderRepository for SqliteRepository {
    fn get_folder(&self, id: &str) -> Result<Option<Folder>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ?1"),
                params![id],
                FolderRow::from_row,
            )
            .optional()?;
        row.map(Folder::try_from).transpose()
    }

    fn get_all_folders(&self) -> Result<Vec<Folder>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {FOLDER_COLUMNS} FROM folders ORDER BY position"))?;
        let rows = stmt
            .query_map([], FolderRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(Folder::try_from).collect()
    }
}

impl KeyValueRepository for SqliteRepository {
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}
