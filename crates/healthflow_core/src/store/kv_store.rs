//! Key-value persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Keep SQL details inside the core persistence boundary.
//! - Surface medium failures as `PersistenceError`.
//!
//! # Invariants
//! - `put` is an upsert; the last write for a key wins.
//! - `put_many` commits every entry or none of them.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const UPSERT_SQL: &str = "INSERT INTO preferences (key, value)
     VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = (strftime('%s', 'now') * 1000);";

pub type StoreResult<T> = Result<T, PersistenceError>;

/// Failure of the underlying storage medium or of record encoding.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode records: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Durable, synchronous string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Writes all entries atomically.
    fn put_many(&self, entries: &[(&str, String)]) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// SQLite-backed preference table.
#[derive(Clone, Copy)]
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(UPSERT_SQL, params![key, value])?;
        Ok(())
    }

    fn put_many(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT_SQL)?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM preferences WHERE key = ?1;", [key])?;
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn put_many(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        (**self).put_many(entries)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, SqliteKeyValueStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn put_overwrites_and_remove_clears() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::new(&conn);

        assert_eq!(store.get("user_name").unwrap(), None);
        store.put("user_name", "Ana").unwrap();
        store.put("user_name", "Bea").unwrap();
        assert_eq!(store.get("user_name").unwrap().as_deref(), Some("Bea"));

        store.remove("user_name").unwrap();
        assert_eq!(store.get("user_name").unwrap(), None);
    }

    #[test]
    fn put_many_writes_every_entry() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::new(&conn);

        store
            .put_many(&[
                ("step_count", "10".to_string()),
                ("total_lifetime_steps", "90".to_string()),
            ])
            .unwrap();
        assert_eq!(store.get("step_count").unwrap().as_deref(), Some("10"));
        assert_eq!(
            store.get("total_lifetime_steps").unwrap().as_deref(),
            Some("90")
        );
    }

    #[test]
    fn put_many_rolls_back_when_a_write_fails() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::new(&conn);
        store.put("step_count", "1").unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_lifetime BEFORE INSERT ON preferences
             WHEN NEW.key = 'total_lifetime_steps'
             BEGIN SELECT RAISE(ABORT, 'medium unavailable'); END;",
        )
        .unwrap();

        let result = store.put_many(&[
            ("step_count", "2".to_string()),
            ("total_lifetime_steps", "2".to_string()),
        ]);

        assert!(result.is_err());
        assert_eq!(store.get("step_count").unwrap().as_deref(), Some("1"));
    }
}
