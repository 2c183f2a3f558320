//! User-adjustable quiz settings and default file locations.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::models::{CategoryFilter, DifficultyFilter};

pub const QUESTION_COUNT_RANGE: RangeInclusive<u32> = 1..=50;
pub const TIME_LIMIT_RANGE: RangeInclusive<u32> = 5..=120;

pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const DEFAULT_TIME_LIMIT: u32 = 20;

const DATA_DIR_NAME: &str = ".flashcard_quiz";
const DATABASE_FILE: &str = "quiz.db";
const LOG_FILE: &str = "quiz.log";

/// Choices made on the home screen before a quiz starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    pub category: CategoryFilter,
    pub difficulty: DifficultyFilter,
    question_count: u32,
    time_limit: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            category: CategoryFilter::Any,
            difficulty: DifficultyFilter::Any,
            question_count: DEFAULT_QUESTION_COUNT,
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }
}

impl QuizSettings {
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    /// Seconds allowed per question.
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    /// Set the question count, clamped to [`QUESTION_COUNT_RANGE`].
    pub fn set_question_count(&mut self, count: u32) {
        self.question_count = clamp_to(count, &QUESTION_COUNT_RANGE);
    }

    /// Set the time limit, clamped to [`TIME_LIMIT_RANGE`].
    pub fn set_time_limit(&mut self, seconds: u32) {
        self.time_limit = clamp_to(seconds, &TIME_LIMIT_RANGE);
    }

    #[must_use]
    pub fn with_question_count(mut self, count: u32) -> Self {
        self.set_question_count(count);
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.set_time_limit(seconds);
        self
    }
}

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

/// Per-user data directory (`~/.flashcard_quiz`), falling back to the working
/// directory when no home directory is known.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

pub fn default_database_path() -> PathBuf {
    data_dir().join(DATABASE_FILE)
}

pub fn default_log_path() -> PathBuf {
    data_dir().join(LOG_FILE)
}
