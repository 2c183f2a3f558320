use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::Parser;
use flashcard_quiz::config::{self, DEFAULT_QUESTION_COUNT, DEFAULT_TIME_LIMIT};
use flashcard_quiz::data::DEFAULT_QUESTIONS_PATH;
use flashcard_quiz::history::{AttemptLog, SqliteAttemptLog, RECENT_LIMIT, TIMESTAMP_FORMAT};
use flashcard_quiz::models::{CategoryFilter, DifficultyFilter};
use flashcard_quiz::{load_questions_from_json, QuestionBank, Quiz, QuizError, QuizSettings};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FLASHCARD_QUIZ_LOG";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from
    #[arg(short, long, default_value = DEFAULT_QUESTIONS_PATH)]
    questions: PathBuf,

    /// SQLite database for attempt history [default: ~/.flashcard_quiz/quiz.db]
    #[arg(long)]
    database: Option<PathBuf>,

    /// Initial category filter ("Any" for all)
    #[arg(short, long, default_value = "Any")]
    category: CategoryFilter,

    /// Initial difficulty filter: Any, Easy, Medium or Hard
    #[arg(short, long, default_value = "Any")]
    difficulty: DifficultyFilter,

    /// Number of questions per quiz
    #[arg(short = 'n', long, default_value_t = DEFAULT_QUESTION_COUNT,
          value_parser = clap::value_parser!(u32).range(1..=50))]
    count: u32,

    /// Seconds allowed per question
    #[arg(short, long, default_value_t = DEFAULT_TIME_LIMIT,
          value_parser = clap::value_parser!(u32).range(5..=120))]
    time_limit: u32,

    /// Seed for a reproducible question order
    #[arg(long)]
    seed: Option<u64>,

    /// Print the most recent attempts and exit
    #[arg(long)]
    history: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(&config::default_log_path());

    if let Err(e) = run(args) {
        error!(error = %e, "quiz exited with an error");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), QuizError> {
    let database = args.database.unwrap_or_else(config::default_database_path);

    if args.history {
        let log = SqliteAttemptLog::open(&database)?;
        print_history(&log)?;
        log.close();
        return Ok(());
    }

    let questions = load_questions_from_json(&args.questions)?;
    let bank = QuestionBank::new(questions);

    let log = match SqliteAttemptLog::open(&database) {
        Ok(log) => Some(log),
        Err(e) => {
            warn!(error = %e, path = %database.display(), "history disabled");
            None
        }
    };

    let mut settings = QuizSettings::default()
        .with_question_count(args.count)
        .with_time_limit(args.time_limit);
    settings.category = args.category;
    settings.difficulty = args.difficulty;

    let quiz = match args.seed {
        Some(seed) => Quiz::seeded(bank, log, settings, seed),
        None => Quiz::new(bank, log, settings),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();
    quiz.run()
}

fn print_history(log: &SqliteAttemptLog) -> Result<(), QuizError> {
    let records = log.recent(RECENT_LIMIT)?;
    if records.is_empty() {
        println!("No attempts yet.");
        return Ok(());
    }

    println!(
        "{:<19}  {:<20}  {:<10}  {:>5}  {:>5}  {:>12}",
        "timestamp", "category", "difficulty", "score", "total", "duration (s)"
    );
    for r in records {
        println!(
            "{:<19}  {:<20}  {:<10}  {:>5}  {:>5}  {:>12}",
            r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            r.category,
            r.difficulty,
            r.score,
            r.total,
            r.duration_seconds
        );
    }
    Ok(())
}

/// Send tracing output to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) {
    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| File::options().create(true).append(true).open(path));

    let Ok(file) = file else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("flashcard_quiz=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}
