//! Quiz session engine.
//!
//! The engine selects a random subset of the question bank under the chosen
//! filters, hands out questions one at a time and keeps score. It performs no
//! I/O and knows nothing about how questions are displayed, so any front end
//! can drive it.
//!
//! Randomness and time are injected: tests seed the generator and use a
//! fixed [`Clock`].

mod session;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

use crate::data::QuestionBank;
use crate::models::{CategoryFilter, DifficultyFilter, Question};
use crate::time::Clock;

pub use session::{Session, SessionResult, SessionState};

static ANY_CATEGORY: CategoryFilter = CategoryFilter::Any;
static ANY_DIFFICULTY: DifficultyFilter = DifficultyFilter::Any;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The filters leave no questions to ask. Recoverable; nothing changes.
    #[error("no questions match category `{category}` and difficulty `{difficulty}`")]
    NoMatch {
        category: CategoryFilter,
        difficulty: DifficultyFilter,
    },
    #[error("no quiz session has been started")]
    Idle,
    #[error("the quiz session is already finished")]
    Finished,
    /// An answer arrived for a question that is no longer the current one,
    /// e.g. a second submit for the same question.
    #[error("answer for question {submitted} rejected: question {current} is active")]
    StaleSubmission { submitted: usize, current: usize },
}

pub struct QuizEngine<R = StdRng> {
    bank: QuestionBank,
    rng: R,
    clock: Clock,
    session: Option<Session>,
}

impl QuizEngine<StdRng> {
    /// Engine seeded from OS entropy and driven by the system clock.
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_rng(bank, StdRng::from_entropy())
    }

    /// Engine with a reproducible question order.
    pub fn seeded(bank: QuestionBank, seed: u64) -> Self {
        Self::with_rng(bank, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn with_rng(bank: QuestionBank, rng: R) -> Self {
        Self {
            bank,
            rng,
            clock: Clock::default(),
            session: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            None => SessionState::Idle,
            Some(s) if s.is_finished() => SessionState::Finished,
            Some(_) => SessionState::InProgress,
        }
    }

    /// Start a new session, replacing any existing one.
    ///
    /// `requested` is clamped to `1..=pool size`. The questions are a prefix
    /// of a uniform shuffle of the pool, so none repeats. Returns the number
    /// of questions in the session.
    ///
    /// On [`EngineError::NoMatch`] the previous state is left untouched.
    pub fn start(
        &mut self,
        category: CategoryFilter,
        difficulty: DifficultyFilter,
        requested: usize,
    ) -> Result<usize, EngineError> {
        let pool = self.bank.matching(&category, &difficulty);
        if pool.is_empty() {
            debug!(%category, %difficulty, "no questions match filters");
            return Err(EngineError::NoMatch { category, difficulty });
        }

        let count = requested.clamp(1, pool.len());
        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.shuffle(&mut self.rng);
        order.truncate(count);

        info!(%category, %difficulty, pool = pool.len(), total = count, "quiz session started");
        self.session = Some(Session::new(category, difficulty, pool, order, self.clock.now()));
        Ok(count)
    }

    /// Start over with the filters and length of the current session.
    pub fn restart(&mut self) -> Result<usize, EngineError> {
        let session = self.session.as_ref().ok_or(EngineError::Idle)?;
        let category = session.category().clone();
        let difficulty = *session.difficulty();
        let total = session.total();
        self.start(category, difficulty, total)
    }

    /// Question at the current position, or `None` when idle or finished.
    pub fn current(&self) -> Option<&Question> {
        let index = self.session.as_ref()?.current_bank_index()?;
        self.bank.get(index)
    }

    /// True once a started session has answered all of its questions.
    pub fn is_finished(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_finished)
    }

    /// Answer the current question. `None` (a timeout) always counts as
    /// wrong. Returns whether the answer was correct.
    pub fn submit(&mut self, choice: Option<&str>) -> Result<bool, EngineError> {
        self.submit_at(self.index(), choice)
    }

    /// Answer the question at `position`, which must be the current one.
    ///
    /// Front ends pass the position they displayed, so a duplicate submit or
    /// a late timeout is rejected instead of answering the next question.
    pub fn submit_at(&mut self, position: usize, choice: Option<&str>) -> Result<bool, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::Idle)?;
        if session.is_finished() {
            return Err(EngineError::Finished);
        }
        if position != session.position() {
            return Err(EngineError::StaleSubmission {
                submitted: position,
                current: session.position(),
            });
        }

        let question = session
            .current_bank_index()
            .and_then(|index| self.bank.get(index))
            .ok_or(EngineError::Finished)?;
        let correct = question.is_correct(choice);
        session.record(correct);

        debug!(
            position,
            correct,
            timed_out = choice.is_none(),
            score = session.score(),
            "answer recorded"
        );
        Ok(correct)
    }

    /// Whole seconds since the session started, never negative.
    pub fn duration_seconds(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| {
            let elapsed = (self.clock.now() - s.started_at()).num_seconds();
            u64::try_from(elapsed).unwrap_or(0)
        })
    }

    /// Summary of the session once it is finished.
    pub fn result(&self) -> Option<SessionResult> {
        let session = self.session.as_ref().filter(|s| s.is_finished())?;
        Some(SessionResult {
            category: session.category().clone(),
            difficulty: *session.difficulty(),
            score: u32::try_from(session.score()).unwrap_or(u32::MAX),
            total: u32::try_from(session.total()).unwrap_or(u32::MAX),
            duration_seconds: self.duration_seconds(),
        })
    }

    /// Drop the session and return to idle. The bank is kept.
    pub fn reset(&mut self) {
        if self.session.take().is_some() {
            debug!("quiz session reset");
        }
    }

    pub fn score(&self) -> usize {
        self.session.as_ref().map_or(0, Session::score)
    }

    pub fn total(&self) -> usize {
        self.session.as_ref().map_or(0, Session::total)
    }

    /// Zero-based position of the current question.
    pub fn index(&self) -> usize {
        self.session.as_ref().map_or(0, Session::position)
    }

    pub fn category(&self) -> &CategoryFilter {
        self.session.as_ref().map_or(&ANY_CATEGORY, Session::category)
    }

    pub fn difficulty(&self) -> &DifficultyFilter {
        self.session.as_ref().map_or(&ANY_DIFFICULTY, Session::difficulty)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::models::Difficulty;

    /// Ten questions: answers are `right-{i}`, categories alternate
    /// Science/Art, difficulties cycle Easy/Medium/Hard. No History.
    fn bank() -> QuestionBank {
        let questions = (0..10)
            .map(|i| {
                let category = if i % 2 == 0 { "Science" } else { "Art" };
                let options = vec![format!("right-{i}"), format!("wrong-{i}"), "other".to_string()];
                Question::new(
                    category,
                    format!("question {i}"),
                    options,
                    format!("right-{i}"),
                    Difficulty::ALL[i % 3],
                )
                .unwrap()
            })
            .collect();
        QuestionBank::new(questions)
    }

    fn engine(seed: u64) -> QuizEngine {
        let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        QuizEngine::seeded(bank(), seed).with_clock(Clock::fixed(start))
    }

    fn answer_correctly(engine: &mut QuizEngine) -> bool {
        let answer = engine.current().unwrap().answer().to_string();
        engine.submit(Some(&answer)).unwrap()
    }

    #[test]
    fn test_total_is_clamped_and_order_has_no_repeats() {
        for seed in 0..20 {
            for requested in 0..=15 {
                let mut engine = engine(seed);
                let total = engine.start(CategoryFilter::Any, DifficultyFilter::Any, requested).unwrap();
                assert_eq!(total, requested.clamp(1, 10));
                assert_eq!(engine.total(), total);

                let session = engine.session().unwrap();
                let distinct: HashSet<_> = session.order().iter().collect();
                assert_eq!(distinct.len(), total);
                assert!(session.order().iter().all(|&i| i < session.pool().len()));
            }
        }
    }

    #[test]
    fn test_three_right_two_wrong() {
        let mut engine = engine(1);
        assert_eq!(engine.start(CategoryFilter::Any, DifficultyFilter::Any, 5), Ok(5));
        assert_eq!(engine.state(), SessionState::InProgress);

        for _ in 0..3 {
            assert!(answer_correctly(&mut engine));
        }
        assert_eq!(engine.submit(Some("other")), Ok(false));
        assert_eq!(engine.submit(None), Ok(false));

        assert_eq!(engine.score(), 3);
        assert!(engine.is_finished());
        assert_eq!(engine.state(), SessionState::Finished);
        assert!(engine.current().is_none());
    }

    #[test]
    fn test_no_match_keeps_engine_idle() {
        let mut engine = engine(2);
        let err = engine
            .start(
                CategoryFilter::Named("History".to_string()),
                DifficultyFilter::Only(Difficulty::Hard),
                5,
            )
            .unwrap_err();

        assert!(matches!(err, EngineError::NoMatch { .. }));
        assert_eq!(engine.state(), SessionState::Idle);
        assert!(engine.current().is_none());
    }

    #[test]
    fn test_no_match_leaves_previous_session_alone() {
        let mut engine = engine(3);
        engine.start(CategoryFilter::Any, DifficultyFilter::Any, 2).unwrap();
        answer_correctly(&mut engine);

        assert!(engine
            .start(CategoryFilter::Named("History".to_string()), DifficultyFilter::Any, 2)
            .is_err());
        assert_eq!((engine.index(), engine.score(), engine.total()), (1, 1, 2));
    }

    #[test]
    fn test_oversized_request_takes_whole_pool() {
        let mut engine = engine(4);
        let science_easy_or_any = engine.start(CategoryFilter::Named("Science".to_string()), DifficultyFilter::Any, 100);
        assert_eq!(science_easy_or_any, Ok(5));

        let mut pool = engine.session().unwrap().order().to_vec();
        pool.sort_unstable();
        assert_eq!(pool, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_selected_questions_match_filters() {
        let mut engine = engine(5);
        let total = engine
            .start(
                CategoryFilter::Named("Art".to_string()),
                DifficultyFilter::Only(Difficulty::Medium),
                10,
            )
            .unwrap();

        for _ in 0..total {
            let q = engine.current().unwrap();
            assert_eq!(q.category(), "Art");
            assert_eq!(q.difficulty(), Difficulty::Medium);
            engine.submit(None).unwrap();
        }
        assert!(engine.is_finished());
    }

    #[test]
    fn test_score_never_exceeds_position() {
        let mut engine = engine(6);
        engine.start(CategoryFilter::Any, DifficultyFilter::Any, 10).unwrap();

        let mut step = 0;
        while !engine.is_finished() {
            if step % 3 == 0 {
                engine.submit(Some("wrong")).unwrap();
            } else {
                answer_correctly(&mut engine);
            }
            step += 1;
            assert!(engine.score() <= engine.index());
            assert!(engine.index() <= engine.total());
        }
        assert_eq!(step, 10);
        assert_eq!(engine.score(), 6);
    }

    #[test]
    fn test_correct_answer_scores_exactly_one() {
        let mut engine = engine(7);
        engine.start(CategoryFilter::Any, DifficultyFilter::Any, 3).unwrap();

        let before = engine.score();
        assert!(answer_correctly(&mut engine));
        assert_eq!(engine.score(), before + 1);

        let wrong = engine.current().unwrap().options()[1].clone();
        assert_eq!(engine.submit(Some(&wrong)), Ok(false));
        assert_eq!(engine.submit(None), Ok(false));
        assert_eq!(engine.score(), before + 1);
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut engine = engine(8);
        engine.start(CategoryFilter::Any, DifficultyFilter::Any, 3).unwrap();

        assert!(engine.submit_at(0, None).is_ok());
        assert_eq!(
            engine.submit_at(0, None),
            Err(EngineError::StaleSubmission { submitted: 0, current: 1 })
        );
        assert_eq!(engine.index(), 1);
    }

    #[test]
    fn test_submit_outside_session() {
        let mut engine = engine(9);
        assert_eq!(engine.submit(None), Err(EngineError::Idle));

        engine.start(CategoryFilter::Any, DifficultyFilter::Any, 1).unwrap();
        engine.submit(None).unwrap();
        assert_eq!(engine.submit(None), Err(EngineError::Finished));
        assert_eq!(engine.index(), 1);
    }

    #[test]
    fn test_duration_tracks_clock_and_is_never_negative() {
        let mut engine = engine(10);
        assert_eq!(engine.duration_seconds(), 0);

        engine.start(CategoryFilter::Any, DifficultyFilter::Any, 2).unwrap();
        assert_eq!(engine.duration_seconds(), 0);

        engine.clock_mut().advance(Duration::milliseconds(12_700));
        assert_eq!(engine.duration_seconds(), 12);
        engine.clock_mut().advance(Duration::seconds(30));
        assert_eq!(engine.duration_seconds(), 42);

        engine.clock_mut().advance(Duration::seconds(-3600));
        assert_eq!(engine.duration_seconds(), 0);
    }

    #[test]
    fn test_result_only_when_finished() {
        let mut engine = engine(11);
        engine.start(CategoryFilter::Named("Science".to_string()), DifficultyFilter::Any, 2).unwrap();
        answer_correctly(&mut engine);
        assert!(engine.result().is_none());

        engine.submit(None).unwrap();
        engine.clock_mut().advance(Duration::seconds(9));

        let result = engine.result().unwrap();
        assert_eq!(result.category, CategoryFilter::Named("Science".to_string()));
        assert_eq!(result.difficulty, DifficultyFilter::Any);
        assert_eq!((result.score, result.total, result.duration_seconds), (1, 2, 9));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut engine = engine(12);
        engine
            .start(CategoryFilter::Named("Art".to_string()), DifficultyFilter::Only(Difficulty::Easy), 2)
            .unwrap();
        answer_correctly(&mut engine);

        engine.reset();
        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!((engine.score(), engine.total(), engine.index()), (0, 0, 0));
        assert_eq!(engine.category(), &CategoryFilter::Any);
        assert_eq!(engine.difficulty(), &DifficultyFilter::Any);
        assert_eq!(engine.bank().len(), 10);
    }

    #[test]
    fn test_restart_reuses_filters_and_length() {
        let mut engine = engine(13);
        assert_eq!(engine.restart(), Err(EngineError::Idle));

        engine
            .start(CategoryFilter::Named("Science".to_string()), DifficultyFilter::Any, 3)
            .unwrap();
        while !engine.is_finished() {
            engine.submit(None).unwrap();
        }

        assert_eq!(engine.restart(), Ok(3));
        assert_eq!(engine.state(), SessionState::InProgress);
        assert_eq!(engine.category(), &CategoryFilter::Named("Science".to_string()));
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = engine(42);
        let mut b = engine(42);
        a.start(CategoryFilter::Any, DifficultyFilter::Any, 10).unwrap();
        b.start(CategoryFilter::Any, DifficultyFilter::Any, 10).unwrap();
        assert_eq!(a.session().unwrap().order(), b.session().unwrap().order());
    }
}
