//! Append-only log of finished quiz attempts.

mod sqlite;

use thiserror::Error;

use crate::models::AttemptRecord;

pub use sqlite::{SqliteAttemptLog, TIMESTAMP_FORMAT};

/// Number of attempts shown by the history views.
pub const RECENT_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("attempt store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not create attempt store directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored attempt {id} is unreadable: {reason}")]
    CorruptRow { id: i64, reason: String },
    #[error("{field} is too large to store")]
    Overflow { field: &'static str },
}

/// Persistent, append-only record of attempts. Stored records are never
/// updated or deleted.
pub trait AttemptLog {
    /// Durably store one attempt and return its row id.
    fn append(&mut self, record: &AttemptRecord) -> Result<i64, HistoryError>;

    /// Up to `limit` attempts, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<AttemptRecord>, HistoryError>;

    /// Release the underlying store. Best-effort: failures are logged, not
    /// returned.
    fn close(self)
    where
        Self: Sized,
    {
    }
}
