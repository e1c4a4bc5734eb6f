pub mod error;
pub mod filter;
pub mod migrations;
pub mod models;
pub mod queries;

pub use error::{DbError, Result};
pub use filter::Filter;
pub use queries::{ANONYMOUS_STORIES_ARE_PUBLIC, story_visibility};

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the story database.
///
/// No connection is held between calls: every operation opens its own
/// connection, runs a single transaction and drops both before returning.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let db = Self {
            path: path.to_path_buf(),
        };

        let conn = db.connect()?;
        // WAL mode so readers don't block the writer
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Run `f` as one unit of work on a fresh connection.
    ///
    /// The write lock is taken at `BEGIN IMMEDIATE`, so concurrent units of
    /// work queue on the busy timeout instead of failing when a read is
    /// upgraded to a write.
    ///
    /// The transaction commits only if `f` returns `Ok`. On an error, or if
    /// `f` panics, the transaction is rolled back when it is dropped, and the
    /// connection is closed right after.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
