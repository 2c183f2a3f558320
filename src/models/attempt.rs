use chrono::{NaiveDateTime, Timelike};

use crate::engine::SessionResult;

/// Persisted summary of one finished quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Local wall-clock time the attempt was recorded, to the second.
    pub timestamp: NaiveDateTime,
    pub category: String,
    pub difficulty: String,
    pub score: u32,
    pub total: u32,
    pub duration_seconds: u64,
}

impl AttemptRecord {
    /// Build the record for a finished session. Sub-second precision is
    /// dropped so the record matches what storage keeps.
    pub fn from_result(timestamp: NaiveDateTime, result: &SessionResult) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            category: result.category.to_string(),
            difficulty: result.difficulty.to_string(),
            score: result.score,
            total: result.total,
            duration_seconds: result.duration_seconds,
        }
    }
}
