//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the storage collaborator interface the commit pipeline relies on.
//! - Persist records, their fields, the tag registry and undo checkpoints.
//!
//! # Invariants
//! - A missing record is always reported as `StoreError::NotFound`, the only
//!   "no such object" kind in this interface.
//! - Every successful `update_record` bumps `revision` by exactly one.
//! - An undo checkpoint requested with a write is persisted only together
//!   with that write.
//! - Field sets are fixed at creation; updates only replace values.
//! - Tags are canonicalized case-insensitively against the tag registry.

use crate::db::DbError;
use crate::model::record::{Field, Record, RecordId};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage collaborator error.
#[derive(Debug)]
pub enum StoreError {
    /// Record does not exist (never created or deleted concurrently).
    NotFound(RecordId),
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid record data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage collaborator used by the commit pipeline.
pub trait RecordStore {
    /// Loads the live record, or `StoreError::NotFound`.
    fn get_record(&self, id: RecordId) -> StoreResult<Record>;
    /// Applies the store's tag canonicalization rule to raw tokens.
    fn canonicalize_tags(&self, tokens: &[String]) -> StoreResult<Vec<String>>;
    /// Persists field values and tags of an existing record.
    ///
    /// When `checkpoint` is set, an undo checkpoint with that label is
    /// registered atomically with the write; a failed write leaves none.
    fn update_record(&mut self, record: &Record, checkpoint: Option<&str>) -> StoreResult<()>;
}

/// SQLite-backed record store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Creates a record with the given fields (in order) and tags.
    pub fn create_record(&mut self, fields: &[Field], tags: &[String]) -> StoreResult<RecordId> {
        let mut seen = BTreeSet::new();
        for field in fields {
            if !seen.insert(field.name.as_str()) {
                return Err(StoreError::InvalidData(format!(
                    "duplicate field name `{}`",
                    field.name
                )));
            }
        }

        let tags = self.canonicalize_tags(tags)?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO records (tags) VALUES (?1);",
            [tags.join(" ")],
        )?;
        let id = tx.last_insert_rowid();
        for (ord, field) in fields.iter().enumerate() {
            tx.execute(
                "INSERT INTO fields (record_id, ord, name, value) VALUES (?1, ?2, ?3, ?4);",
                params![id, ord as i64, field.name.as_str(), field.value.as_str()],
            )?;
        }
        register_tags(&tx, &tags)?;
        tx.commit()?;
        Ok(id)
    }

    /// Deletes a record and its fields.
    pub fn delete_record(&mut self, id: RecordId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Returns checkpoint labels, oldest first.
    pub fn checkpoint_labels(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT label FROM undo_checkpoints ORDER BY id ASC;")?;
        let labels = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(labels)
    }

    /// Returns all registered tags sorted case-insensitively.
    pub fn list_tags(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM tags ORDER BY name COLLATE NOCASE ASC;")?;
        let tags = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn get_record(&self, id: RecordId) -> StoreResult<Record> {
        let header = self
            .conn
            .query_row(
                "SELECT tags, revision FROM records WHERE id = ?1;",
                [id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;
        let Some((tags_text, revision)) = header else {
            return Err(StoreError::NotFound(id));
        };

        let mut stmt = self
            .conn
            .prepare("SELECT name, value FROM fields WHERE record_id = ?1 ORDER BY ord ASC;")?;
        let fields = stmt
            .query_map([id], |row| {
                Ok(Field {
                    name: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Record {
            id,
            fields,
            tags: tags_text.split_whitespace().map(str::to_string).collect(),
            revision,
        })
    }

    fn canonicalize_tags(&self, tokens: &[String]) -> StoreResult<Vec<String>> {
        let mut unique: BTreeMap<String, String> = BTreeMap::new();
        for token in tokens {
            let Some(stripped) = strip_illegal_tag_chars(token) else {
                continue;
            };
            let registered: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM tags WHERE name = ?1 COLLATE NOCASE;",
                    [stripped.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            let canonical = registered.unwrap_or(stripped);
            unique.entry(canonical.to_lowercase()).or_insert(canonical);
        }
        Ok(unique.into_values().collect())
    }

    fn update_record(&mut self, record: &Record, checkpoint: Option<&str>) -> StoreResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(label) = checkpoint {
            insert_checkpoint(&tx, label)?;
        }
        let changed = tx.execute(
            "UPDATE records
             SET
                tags = ?2,
                revision = revision + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![record.id, record.tags_text()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(record.id));
        }

        for field in &record.fields {
            let changed = tx.execute(
                "UPDATE fields SET value = ?3 WHERE record_id = ?1 AND name = ?2;",
                params![record.id, field.name.as_str(), field.value.as_str()],
            )?;
            if changed != 1 {
                return Err(StoreError::InvalidData(format!(
                    "record {} has no field `{}`",
                    record.id, field.name
                )));
            }
        }

        register_tags(&tx, &record.tags)?;
        tx.commit()?;
        Ok(())
    }

}

/// Removes characters the tag list cannot hold; `None` when nothing is left.
fn strip_illegal_tag_chars(token: &str) -> Option<String> {
    let stripped: String = token
        .chars()
        .filter(|ch| !matches!(ch, '"' | '\'') && !ch.is_control() && !ch.is_whitespace())
        .collect();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

fn insert_checkpoint(tx: &Transaction<'_>, label: &str) -> StoreResult<()> {
    tx.execute("INSERT INTO undo_checkpoints (label) VALUES (?1);", [label])?;
    Ok(())
}

fn register_tags(tx: &Transaction<'_>, tags: &[String]) -> StoreResult<()> {
    for tag in tags {
        tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1);", [tag.as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::strip_illegal_tag_chars;

    #[test]
    fn strip_removes_quotes_and_controls() {
        assert_eq!(
            strip_illegal_tag_chars("it's\u{7}\"ok\""),
            Some("itsok".to_string())
        );
        assert_eq!(strip_illegal_tag_chars("\"\""), None);
    }
}
