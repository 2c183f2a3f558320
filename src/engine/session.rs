//! Per-run quiz state.

use chrono::{DateTime, Utc};

use crate::models::{CategoryFilter, DifficultyFilter};

/// Lifecycle of the engine's session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session started (or explicitly reset).
    Idle,
    /// Started, with questions left to answer.
    InProgress,
    /// Every selected question has been answered or timed out.
    Finished,
}

/// One run from `start` until every selected question has been answered.
#[derive(Debug, Clone)]
pub struct Session {
    category: CategoryFilter,
    difficulty: DifficultyFilter,
    /// Bank indices of the questions that passed the filters.
    pool: Vec<usize>,
    /// Distinct positions into `pool`, in the order they are asked.
    order: Vec<usize>,
    position: usize,
    score: usize,
    started_at: DateTime<Utc>,
}

impl Session {
    pub(super) fn new(
        category: CategoryFilter,
        difficulty: DifficultyFilter,
        pool: Vec<usize>,
        order: Vec<usize>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category,
            difficulty,
            pool,
            order,
            position: 0,
            score: 0,
            started_at,
        }
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn difficulty(&self) -> &DifficultyFilter {
        &self.difficulty
    }

    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Zero-based position of the question being asked.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.order.len()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_finished(&self) -> bool {
        self.position == self.order.len()
    }

    /// Bank index of the question at the current position.
    pub(super) fn current_bank_index(&self) -> Option<usize> {
        let slot = *self.order.get(self.position)?;
        self.pool.get(slot).copied()
    }

    pub(super) fn record(&mut self, correct: bool) {
        if correct {
            self.score += 1;
        }
        self.position += 1;
    }
}

/// Outcome of a finished session, ready to be logged or displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub category: CategoryFilter,
    pub difficulty: DifficultyFilter,
    pub score: u32,
    pub total: u32,
    pub duration_seconds: u64,
}

impl SessionResult {
    /// Whole-number percentage of correct answers.
    pub fn percentage(&self) -> u32 {
        let total = f64::from(self.total.max(1));
        (f64::from(self.score) * 100.0 / total).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: u32, total: u32) -> SessionResult {
        SessionResult {
            category: CategoryFilter::Any,
            difficulty: DifficultyFilter::Any,
            score,
            total,
            duration_seconds: 0,
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(result(3, 5).percentage(), 60);
        assert_eq!(result(2, 3).percentage(), 67);
        assert_eq!(result(5, 5).percentage(), 100);
        assert_eq!(result(0, 0).percentage(), 0);
    }

    #[test]
    fn test_record_advances_position() {
        let mut session = Session::new(
            CategoryFilter::Any,
            DifficultyFilter::Any,
            vec![4, 7],
            vec![1, 0],
            Utc::now(),
        );
        assert_eq!(session.current_bank_index(), Some(7));

        session.record(true);
        assert_eq!((session.position(), session.score()), (1, 1));
        assert_eq!(session.current_bank_index(), Some(4));

        session.record(false);
        assert!(session.is_finished());
        assert_eq!(session.score(), 1);
        assert_eq!(session.current_bank_index(), None);
    }
}
