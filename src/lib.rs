//! # flashcard-quiz
//!
//! A terminal flashcard quiz: multiple-choice questions drawn from a JSON
//! question bank, filtered by category and difficulty, timed per question,
//! with every finished attempt recorded in a local SQLite history.
//!
//! The [`engine::QuizEngine`] holds all session rules and can be driven by
//! any front end; [`Quiz`] is the bundled terminal front end.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flashcard_quiz::{history::SqliteAttemptLog, QuizError, QuizSettings, Quiz};
//!
//! fn main() -> Result<(), QuizError> {
//!     let runtime = tokio::runtime::Runtime::new()?;
//!     let _guard = runtime.enter();
//!
//!     let log = SqliteAttemptLog::open("quiz.db")?;
//!     let quiz = Quiz::from_json("questions.json", Some(log), QuizSettings::default())?;
//!     quiz.run()
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod engine;
pub mod history;
pub mod models;
pub mod terminal;
pub mod time;
pub mod timer;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

pub use app::{App, AppState, HomeField};
pub use config::QuizSettings;
pub use data::{load_questions_from_json, LoadError, QuestionBank};
pub use engine::{EngineError, QuizEngine};
pub use history::{AttemptLog, HistoryError};

use history::SqliteAttemptLog;
use terminal::TerminalSession;
use timer::TimerEvent;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz that can be run in the terminal.
pub struct Quiz<L: AttemptLog = SqliteAttemptLog> {
    app: App<L>,
    timer_events: UnboundedReceiver<TimerEvent>,
}

impl<L: AttemptLog> Quiz<L> {
    /// Create a quiz over `bank` with random question order. Without a log,
    /// attempts are not recorded.
    pub fn new(bank: QuestionBank, log: Option<L>, settings: QuizSettings) -> Self {
        Self::build(QuizEngine::new(bank), StdRng::from_entropy(), log, settings)
    }

    /// Create a quiz whose question selection and option order are
    /// reproducible for a given seed.
    pub fn seeded(bank: QuestionBank, log: Option<L>, settings: QuizSettings, seed: u64) -> Self {
        Self::build(
            QuizEngine::seeded(bank, seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
            log,
            settings,
        )
    }

    /// Load a quiz from a JSON question file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use flashcard_quiz::{history::SqliteAttemptLog, Quiz, QuizSettings};
    ///
    /// let quiz = Quiz::<SqliteAttemptLog>::from_json("questions.json", None, QuizSettings::default())
    ///     .expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(
        path: P,
        log: Option<L>,
        settings: QuizSettings,
    ) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(path)?;
        Ok(Self::new(QuestionBank::new(questions), log, settings))
    }

    fn build(engine: QuizEngine, rng: StdRng, log: Option<L>, settings: QuizSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            app: App::new(engine, log, settings, tx, rng),
            timer_events: rx,
        }
    }

    /// Run the quiz in the terminal until the user quits.
    ///
    /// Must be called from within a tokio runtime context; question
    /// countdowns run as tasks on that runtime.
    pub fn run(mut self) -> Result<(), QuizError> {
        info!(questions = self.app.engine().bank().len(), "starting quiz UI");
        let result = {
            let mut session = TerminalSession::enter()?;
            run_event_loop(session.terminal(), &mut self.app, &mut self.timer_events)
        };
        self.app.shutdown();
        result
    }

    pub fn app(&self) -> &App<L> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App<L> {
        &mut self.app
    }
}

fn run_event_loop<L: AttemptLog>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<L>,
    timer_events: &mut UnboundedReceiver<TimerEvent>,
) -> Result<(), QuizError> {
    loop {
        while let Ok(event) = timer_events.try_recv() {
            app.handle_timer_event(event);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(INPUT_POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input<L: AttemptLog>(app: &mut App<L>, key: KeyCode) -> bool {
    match app.state {
        AppState::Home => handle_home_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
        AppState::History => handle_history_input(app, key),
    }
}

fn handle_home_input<L: AttemptLog>(app: &mut App<L>, key: KeyCode) -> bool {
    app.clear_notice();
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.focus_previous(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.focus_next(),
        KeyCode::Left | KeyCode::Char('h') => app.adjust_focused(-1),
        KeyCode::Right | KeyCode::Char('l') => app.adjust_focused(1),
        KeyCode::Enter => app.start_quiz(),
        KeyCode::Char('v') | KeyCode::Char('V') => app.open_history(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

fn handle_quiz_input<L: AttemptLog>(app: &mut App<L>, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.select_option(digit as usize - 1);
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Esc => app.go_home(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_result_input<L: AttemptLog>(app: &mut App<L>, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => app.play_again(),
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Esc => app.go_home(),
        KeyCode::Char('v') | KeyCode::Char('V') => app.open_history(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_history_input<L: AttemptLog>(app: &mut App<L>, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_history_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_history_up(),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') => app.close_history(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
