use std::time::Duration;

use chrono::Local;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace, warn};

use crate::config::QuizSettings;
use crate::engine::{QuizEngine, SessionResult};
use crate::history::{AttemptLog, RECENT_LIMIT};
use crate::models::{AttemptRecord, CategoryFilter, DifficultyFilter};
use crate::timer::{Countdown, TimerEvent};

const TICK_PERIOD: Duration = Duration::from_secs(1);
const TIME_LIMIT_STEP: u32 = 5;

/// Screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Home,
    Quiz,
    Result,
    History,
}

/// Selector focused on the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HomeField {
    #[default]
    Category,
    Difficulty,
    QuestionCount,
    TimeLimit,
}

impl HomeField {
    pub const ALL: [HomeField; 4] = [
        HomeField::Category,
        HomeField::Difficulty,
        HomeField::QuestionCount,
        HomeField::TimeLimit,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Front-end state around a [`QuizEngine`]: home selectors, the shuffled
/// options of the displayed question, its countdown, and attempt history.
pub struct App<L> {
    pub state: AppState,
    engine: QuizEngine,
    log: Option<L>,
    settings: QuizSettings,
    focus: HomeField,
    categories: Vec<CategoryFilter>,
    rng: StdRng,
    options: Vec<String>,
    selected_option: usize,
    time_left: u32,
    countdown: Option<Countdown>,
    timer_events: UnboundedSender<TimerEvent>,
    last_answer: Option<bool>,
    result: Option<SessionResult>,
    history: Vec<AttemptRecord>,
    history_scroll: usize,
    notice: Option<String>,
}

impl<L> App<L> {
    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn focus(&self) -> HomeField {
        self.focus
    }

    /// `Any` followed by every category in the bank.
    pub fn categories(&self) -> &[CategoryFilter] {
        &self.categories
    }

    /// Options of the displayed question, in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Whether the previous answer in this session was correct.
    pub fn last_answer(&self) -> Option<bool> {
        self.last_answer
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    pub fn history_scroll(&self) -> usize {
        self.history_scroll
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn log(&self) -> Option<&L> {
        self.log.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Change the focused home selector by `step` (negative moves back).
    pub fn adjust_focused(&mut self, step: i32) {
        match self.focus {
            HomeField::Category => {
                let current = self
                    .categories
                    .iter()
                    .position(|c| *c == self.settings.category)
                    .unwrap_or(0);
                let next = cycle(current, step, self.categories.len());
                self.settings.category = self.categories[next].clone();
            }
            HomeField::Difficulty => {
                let choices = DifficultyFilter::CHOICES;
                let current = choices
                    .iter()
                    .position(|d| *d == self.settings.difficulty)
                    .unwrap_or(0);
                self.settings.difficulty = choices[cycle(current, step, choices.len())];
            }
            HomeField::QuestionCount => {
                let count = self.settings.question_count().saturating_add_signed(step);
                self.settings.set_question_count(count);
            }
            HomeField::TimeLimit => {
                let delta = step.saturating_mul(TIME_LIMIT_STEP as i32);
                let seconds = self.settings.time_limit().saturating_add_signed(delta);
                self.settings.set_time_limit(seconds);
            }
        }
    }

    pub fn select_next_option(&mut self) {
        if !self.options.is_empty() {
            self.selected_option = (self.selected_option + 1) % self.options.len();
        }
    }

    pub fn select_previous_option(&mut self) {
        if !self.options.is_empty() {
            let len = self.options.len();
            self.selected_option = (self.selected_option + len - 1) % len;
        }
    }

    /// Highlight the option at `index` if it exists.
    pub fn select_option(&mut self, index: usize) {
        if index < self.options.len() {
            self.selected_option = index;
        }
    }

    pub fn scroll_history_down(&mut self) {
        if self.history_scroll + 1 < self.history.len() {
            self.history_scroll += 1;
        }
    }

    pub fn scroll_history_up(&mut self) {
        self.history_scroll = self.history_scroll.saturating_sub(1);
    }

    fn cancel_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }
    }
}

impl<L: AttemptLog> App<L> {
    pub fn new(
        engine: QuizEngine,
        log: Option<L>,
        settings: QuizSettings,
        timer_events: UnboundedSender<TimerEvent>,
        rng: StdRng,
    ) -> Self {
        let categories = std::iter::once(CategoryFilter::Any)
            .chain(
                engine
                    .bank()
                    .categories()
                    .into_iter()
                    .map(|name| CategoryFilter::Named(name.to_string())),
            )
            .collect();

        Self {
            state: AppState::Home,
            engine,
            log,
            settings,
            focus: HomeField::default(),
            categories,
            rng,
            options: Vec::new(),
            selected_option: 0,
            time_left: 0,
            countdown: None,
            timer_events,
            last_answer: None,
            result: None,
            history: Vec::new(),
            history_scroll: 0,
            notice: None,
        }
    }

    /// Start a quiz with the current home-screen settings. A filter
    /// combination without questions leaves the app on the home screen with
    /// a notice.
    pub fn start_quiz(&mut self) {
        self.notice = None;
        let started = self.engine.start(
            self.settings.category.clone(),
            self.settings.difficulty,
            self.settings.question_count() as usize,
        );

        match started {
            Ok(_) => self.enter_quiz(),
            Err(e) => {
                info!(error = %e, "quiz not started");
                self.notice = Some(e.to_string());
            }
        }
    }

    /// Run the same filters and length again.
    pub fn play_again(&mut self) {
        match self.engine.restart() {
            Ok(_) => self.enter_quiz(),
            Err(e) => {
                self.go_home();
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn go_home(&mut self) {
        self.cancel_countdown();
        self.engine.reset();
        self.options.clear();
        self.result = None;
        self.state = AppState::Home;
    }

    /// Answer the displayed question with the highlighted option.
    pub fn submit_answer(&mut self) {
        let choice = self.options.get(self.selected_option).cloned();
        self.answer(self.engine.index(), choice);
    }

    pub fn handle_timer_event(&mut self, event: TimerEvent) {
        if self.state != AppState::Quiz {
            return;
        }

        match event {
            TimerEvent::Tick { question, remaining } if question == self.engine.index() => {
                self.time_left = remaining;
            }
            TimerEvent::Expired { question } if question == self.engine.index() => {
                debug!(question, "time expired");
                self.answer(question, None);
            }
            stale => trace!(?stale, "ignoring timer event for an earlier question"),
        }
    }

    pub fn open_history(&mut self) {
        self.notice = None;
        self.history = match self.log.as_ref().map(|log| log.recent(RECENT_LIMIT)) {
            Some(Ok(records)) => records,
            Some(Err(e)) => {
                warn!(error = %e, "failed to read attempt history");
                self.notice = Some(format!("History unavailable: {e}"));
                Vec::new()
            }
            None => {
                self.notice = Some("History is disabled".to_string());
                Vec::new()
            }
        };
        self.history_scroll = 0;
        self.state = AppState::History;
    }

    pub fn close_history(&mut self) {
        self.notice = None;
        self.state = AppState::Home;
    }

    /// Stop any countdown and release the attempt log.
    pub fn shutdown(mut self) {
        self.cancel_countdown();
        if let Some(log) = self.log.take() {
            log.close();
        }
    }

    fn enter_quiz(&mut self) {
        self.last_answer = None;
        self.result = None;
        self.state = AppState::Quiz;
        self.present_question();
    }

    /// Show the current question with freshly shuffled options and a new
    /// countdown, or finish when nothing is left.
    fn present_question(&mut self) {
        self.cancel_countdown();

        if self.engine.is_finished() {
            self.finish();
            return;
        }
        let Some(question) = self.engine.current() else {
            return;
        };

        let mut options = question.options().to_vec();
        options.shuffle(&mut self.rng);
        self.options = options;
        self.selected_option = 0;
        self.time_left = self.settings.time_limit();
        self.countdown = Some(Countdown::start(
            self.engine.index(),
            self.settings.time_limit(),
            TICK_PERIOD,
            self.timer_events.clone(),
        ));
    }

    fn answer(&mut self, position: usize, choice: Option<String>) {
        if self.state != AppState::Quiz {
            return;
        }
        self.cancel_countdown();

        match self.engine.submit_at(position, choice.as_deref()) {
            Ok(correct) => {
                self.last_answer = Some(correct);
                self.present_question();
            }
            Err(e) => debug!(error = %e, "answer ignored"),
        }
    }

    fn finish(&mut self) {
        self.cancel_countdown();
        let Some(result) = self.engine.result() else {
            return;
        };

        let timestamp = self.engine.clock().now().with_timezone(&Local).naive_local();
        let record = AttemptRecord::from_result(timestamp, &result);
        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.append(&record) {
                warn!(error = %e, "failed to save attempt");
                self.notice = Some(format!("Attempt not saved to history: {e}"));
            }
        }

        info!(
            score = result.score,
            total = result.total,
            duration_seconds = result.duration_seconds,
            "quiz finished"
        );
        self.options.clear();
        self.result = Some(result);
        self.state = AppState::Result;
    }
}

fn cycle(current: usize, step: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (current as i64 + i64::from(step)).rem_euclid(len) as usize
}
