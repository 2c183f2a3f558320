use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use super::{AttemptLog, HistoryError};
use crate::models::AttemptRecord;

/// Format of the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS attempts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        category TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        score INTEGER NOT NULL,
        total INTEGER NOT NULL,
        duration_seconds INTEGER NOT NULL
    );
";

/// Attempt log stored in a local SQLite database.
pub struct SqliteAttemptLog {
    conn: Connection,
}

impl SqliteAttemptLog {
    /// Open (or create) the database at `path`, creating parent directories
    /// and the `attempts` table as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let log = Self::init(Connection::open(path)?)?;
        info!(path = %path.display(), "attempt log opened");
        Ok(log)
    }

    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, HistoryError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl AttemptLog for SqliteAttemptLog {
    fn append(&mut self, record: &AttemptRecord) -> Result<i64, HistoryError> {
        let duration = i64::try_from(record.duration_seconds).map_err(|_| HistoryError::Overflow {
            field: "duration_seconds",
        })?;

        self.conn.execute(
            r"
                INSERT INTO attempts (timestamp, category, difficulty, score, total, duration_seconds)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                record.category,
                record.difficulty,
                record.score,
                record.total,
                duration,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, score = record.score, total = record.total, "attempt appended");
        Ok(id)
    }

    fn recent(&self, limit: usize) -> Result<Vec<AttemptRecord>, HistoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            r"
                SELECT id, timestamp, category, difficulty, score, total, duration_seconds
                FROM attempts
                ORDER BY id DESC
                LIMIT ?1
            ",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok(StoredAttempt {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                category: row.get(2)?,
                difficulty: row.get(3)?,
                score: row.get(4)?,
                total: row.get(5)?,
                duration_seconds: row.get(6)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_record()?);
        }
        Ok(out)
    }

    fn close(self) {
        match self.conn.close() {
            Ok(()) => debug!("attempt log closed"),
            Err((_, e)) => warn!(error = %e, "failed to close attempt log"),
        }
    }
}

/// Raw column values of one `attempts` row.
struct StoredAttempt {
    id: i64,
    timestamp: String,
    category: String,
    difficulty: String,
    score: u32,
    total: u32,
    duration_seconds: i64,
}

impl StoredAttempt {
    fn into_record(self) -> Result<AttemptRecord, HistoryError> {
        let timestamp = NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).map_err(|e| {
            HistoryError::CorruptRow {
                id: self.id,
                reason: format!("timestamp `{}`: {e}", self.timestamp),
            }
        })?;
        let duration_seconds = u64::try_from(self.duration_seconds).map_err(|_| HistoryError::CorruptRow {
            id: self.id,
            reason: format!("negative duration {}", self.duration_seconds),
        })?;

        Ok(AttemptRecord {
            timestamp,
            category: self.category,
            difficulty: self.difficulty,
            score: self.score,
            total: self.total,
            duration_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(minute: u32, score: u32) -> AttemptRecord {
        AttemptRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(9, minute, 30)
                .unwrap(),
            category: "Science".to_string(),
            difficulty: "Any".to_string(),
            score,
            total: 5,
            duration_seconds: 61,
        }
    }

    #[test]
    fn test_append_then_recent_round_trips() {
        let mut log = SqliteAttemptLog::open_in_memory().unwrap();
        let saved = record(15, 4);

        let id = log.append(&saved).unwrap();
        assert_eq!(id, 1);

        let recent = log.recent(1).unwrap();
        assert_eq!(recent, vec![saved]);
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let mut log = SqliteAttemptLog::open_in_memory().unwrap();
        assert!(log.recent(20).unwrap().is_empty());

        for minute in 0..5 {
            log.append(&record(minute, minute)).unwrap();
        }

        let recent = log.recent(3).unwrap();
        let scores: Vec<u32> = recent.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![4, 3, 2]);
        assert_eq!(log.recent(100).unwrap().len(), 5);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.db");

        let mut log = SqliteAttemptLog::open(&path).unwrap();
        log.append(&record(1, 2)).unwrap();
        log.append(&record(2, 3)).unwrap();
        log.close();

        let reopened = SqliteAttemptLog::open(&path).unwrap();
        let recent = reopened.recent(20).unwrap();
        assert_eq!(recent, vec![record(2, 3), record(1, 2)]);
    }

    #[test]
    fn test_timestamp_column_format() {
        let mut log = SqliteAttemptLog::open_in_memory().unwrap();
        log.append(&record(7, 1)).unwrap();

        let stored: String = log
            .conn
            .query_row("SELECT timestamp FROM attempts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, "2024-05-01 09:07:30");
    }

    #[test]
    fn test_unreadable_row_is_reported() {
        let log = SqliteAttemptLog::open_in_memory().unwrap();
        log.conn
            .execute(
                "INSERT INTO attempts (timestamp, category, difficulty, score, total, duration_seconds)
                 VALUES ('yesterday', 'Art', 'Easy', 1, 2, 3)",
                [],
            )
            .unwrap();

        assert!(matches!(
            log.recent(5),
            Err(HistoryError::CorruptRow { id: 1, .. })
        ));
    }
}
