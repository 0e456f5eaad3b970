//! SQLite schema creation and migration.
//!
//! Products live in a single object store keyed by name; each row holds the
//! product as a JSON document. Derived indexes are SQLite expression indexes
//! over `json_extract(data, '$.<field>')`, recorded in `product_indexes`.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use storefront_catalog::{Field, MigrationHistory, SchemaVersion};
use thiserror::Error;

use crate::migrate;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error creating {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Database is at schema version {found}, newer than the supported version {expected}")]
    VersionAhead {
        expected: SchemaVersion,
        found: SchemaVersion,
    },
    #[error("Migration to version {version} failed at '{step}': {source}")]
    MigrationFailed {
        version: SchemaVersion,
        step: String,
        source: rusqlite::Error,
    },
}

/// Where the product database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

/// Open a connection without touching the schema.
pub fn connect(location: &DbLocation) -> Result<Connection, SchemaError> {
    let conn = match location {
        DbLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| SchemaError::Io {
                    path: parent.display().to_string(),
                    source: e,
                })?;
            }
            let conn = Connection::open(path)?;
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn
        }
        DbLocation::Memory => Connection::open_in_memory()?,
    };
    Ok(conn)
}

/// Open or create a product database at the given path and bring it up to
/// the history's version.
pub fn open_database(path: &Path, history: &MigrationHistory) -> Result<Connection, SchemaError> {
    let mut conn = connect(&DbLocation::File(path.to_path_buf()))?;
    upgrade(&mut conn, history)?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory(history: &MigrationHistory) -> Result<Connection, SchemaError> {
    let mut conn = connect(&DbLocation::Memory)?;
    upgrade(&mut conn, history)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn schema_version(conn: &Connection) -> Result<SchemaVersion, rusqlite::Error> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
}

/// Run every pending migration batch inside one transaction.
///
/// Returns the version the database was at before the upgrade. If any step
/// fails the transaction is rolled back and the database keeps its
/// previous version and indexes.
pub fn upgrade(
    conn: &mut Connection,
    history: &MigrationHistory,
) -> Result<SchemaVersion, SchemaError> {
    let found = schema_version(conn)?;
    let expected = history.version();

    if found > expected {
        return Err(SchemaError::VersionAhead { expected, found });
    }
    if found == expected && found > 0 {
        return Ok(found);
    }

    log::info!("Upgrading product database from version {found} to {expected}");
    let tx = conn.transaction()?;
    if found == 0 {
        tx.execute_batch(BASE_SCHEMA_SQL)?;
    }

    for (version, batch) in history.pending(found) {
        for step in &batch.steps {
            log::debug!("v{version}: {}", step.describe());
            migrate::apply(&tx, step).map_err(|source| SchemaError::MigrationFailed {
                version,
                step: step.describe(),
                source,
            })?;
        }
        set_schema_version(&tx, version)?;
    }

    tx.commit()?;
    Ok(found)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: SchemaVersion) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// SQL expression a derived index on `field` is built over.
///
/// Queries must use the identical expression for SQLite to pick the index.
pub(crate) fn field_expr(field: Field) -> String {
    format!("json_extract(data, '$.{}')", field.as_str())
}

/// JSON path of `field` inside a product document.
pub(crate) fn field_path(field: Field) -> String {
    format!("$.{}", field.as_str())
}

const BASE_SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Product object store, keyed by name
CREATE TABLE IF NOT EXISTS products (
    name TEXT PRIMARY KEY NOT NULL,
    data TEXT NOT NULL CHECK (json_valid(data))
);

-- Derived indexes declared by migrations
CREATE TABLE IF NOT EXISTS product_indexes (
    name TEXT PRIMARY KEY NOT NULL,
    field TEXT NOT NULL
);
"#;
