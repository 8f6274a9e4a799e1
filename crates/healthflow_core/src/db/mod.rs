//! Bootstrap of the SQLite file that backs the preference store.
//!
//! # Responsibility
//! - Open the database and bring the `preferences` table to the latest
//!   schema before any preference is read.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A returned connection always has a `preferences` table carrying every
//!   column in `PREFERENCE_COLUMNS`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Table holding every stored preference.
pub const PREFERENCES_TABLE: &str = "preferences";
/// Columns the key-value store reads and writes.
pub const PREFERENCE_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer app build.
    NewerSchema { found: u32, supported: u32 },
    /// A registered migration failed; nothing from the batch was kept.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The schema version claims to be current but the table is unusable.
    MissingPreferenceColumn(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::NewerSchema { found, supported } => write!(
                f,
                "preference database is at schema {found}, this build reads up to {supported}"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration {version} ({name}) failed: {source}"),
            Self::MissingPreferenceColumn(column) => {
                write!(f, "{PREFERENCES_TABLE} table has no `{column}` column")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Migration { source, .. } => Some(source),
            Self::NewerSchema { .. } | Self::MissingPreferenceColumn(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
