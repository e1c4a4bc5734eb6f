use thiserror::Error;

/// Failures surfaced by the database layer.
///
/// `NotFound` and `Conflict` are domain outcomes the caller is expected to
/// report; the remaining variants are infrastructure failures.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt characters column: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt timestamp '{0}'")]
    Timestamp(String),
}

impl DbError {
    /// True when `err` is a UNIQUE constraint violation raised by SQLite.
    /// Foreign key violations share the primary code, so the extended code
    /// is checked.
    pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
