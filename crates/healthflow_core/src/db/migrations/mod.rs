//! Versioned schema steps for the preference database.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per step.
//! - Pending steps run in one transaction together with the
//!   `user_version` bump, so a failed step leaves the file untouched.

use crate::db::{DbError, DbResult, PREFERENCES_TABLE, PREFERENCE_COLUMNS};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "preferences",
    sql: include_str!("0001_preferences.sql"),
}];

/// Latest schema version this build can read and write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the database to `latest_version()` and checks the result.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::NewerSchema { found, supported });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > found)
        .collect();
    if !pending.is_empty() {
        let tx = conn.transaction()?;
        for migration in &pending {
            let step = format!(
                "{}\nPRAGMA user_version = {};",
                migration.sql, migration.version
            );
            tx.execute_batch(&step).map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        }
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from_version={found} to_version={supported} steps={}",
            pending.len()
        );
    }

    verify_preferences_table(conn)
}

/// Fails when the preference table lacks a column the store relies on.
fn verify_preferences_table(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({PREFERENCES_TABLE});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    match PREFERENCE_COLUMNS
        .iter()
        .copied()
        .find(|column| !present.iter().any(|name| name == column))
    {
        Some(missing) => Err(DbError::MissingPreferenceColumn(missing)),
        None => Ok(()),
    }
}
