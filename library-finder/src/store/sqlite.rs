//! SQLite-backed library cache.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Transaction, params};

use crate::domain::{Coordinate, Library};
use crate::freshness::NEVER_REFRESHED;

use super::error::StoreError;

/// Metadata key holding the date of the last successful refresh.
const LAST_REFRESHED_KEY: &str = "last_refreshed_on";

/// Date format used for the freshness stamp.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Configuration for the library cache.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

impl StoreConfig {
    /// Create a new store config for the given database path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        // Default to a database in the current directory
        Self::new("library.db")
    }
}

/// Durable cache of library records and the date they were fetched.
///
/// Holds the only connection to the database. Records can only be replaced
/// wholesale through [`LibraryStore::replace_all`], which runs as a single
/// transaction so readers never see a half-written cache.
pub struct LibraryStore {
    conn: Mutex<Connection>,
}

impl LibraryStore {
    /// Open or create the cache database.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %config.path.display(), "opening library cache");

        let conn = Connection::open(&config.path)?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory cache.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        create_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Date of the last successful refresh.
    ///
    /// Returns [`NEVER_REFRESHED`] if the cache has never been filled.
    pub fn last_refreshed_on(&self) -> Result<NaiveDate, StoreError> {
        let conn = self.lock()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM cache_metadata WHERE key = ?1",
                params![LAST_REFRESHED_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(value) => NaiveDate::parse_from_str(&value, DATE_FORMAT)
                .map_err(|_| StoreError::InvalidDate { value }),
            None => Ok(NEVER_REFRESHED),
        }
    }

    /// Replace every cached record and stamp the cache as refreshed.
    ///
    /// Clear, inserts and the new stamp commit together or not at all.
    pub fn replace_all(
        &self,
        libraries: &[Library],
        refreshed_on: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        clear_libraries(&tx)?;
        for library in libraries {
            insert_library(&tx, library)?;
        }
        tx.execute(
            "INSERT OR REPLACE INTO cache_metadata (key, value) VALUES (?1, ?2)",
            params![
                LAST_REFRESHED_KEY,
                refreshed_on.format(DATE_FORMAT).to_string()
            ],
        )?;

        tx.commit()?;

        tracing::debug!(count = libraries.len(), %refreshed_on, "library cache replaced");
        Ok(())
    }

    /// All cached records, in insertion order.
    pub fn load_all(&self) -> Result<Vec<Library>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT name, latitude, longitude FROM libraries ORDER BY rowid")?;

        let rows = stmt.query_map([], |row| {
            Ok(Library::new(
                row.get::<_, String>(0)?,
                Coordinate::from_raw(row.get(1)?, row.get(2)?),
            ))
        })?;

        let libraries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(libraries)
    }

    /// Number of cached records.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM libraries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Check if the cache holds no records.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.count()? == 0)
    }
}

/// Create the tables if they don't already exist.
fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS libraries (
            name TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cache_metadata (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn clear_libraries(tx: &Transaction<'_>) -> Result<(), StoreError> {
    tx.execute("DELETE FROM libraries", [])?;
    Ok(())
}

fn insert_library(tx: &Transaction<'_>, library: &Library) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO libraries (name, latitude, longitude) VALUES (?1, ?2, ?3)",
        params![
            library.name,
            library.location.latitude(),
            library.location.longitude()
        ],
    )?;
    Ok(())
}

impl std::fmt::Debug for LibraryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryStore").finish_non_exhaustive()
    }
}
