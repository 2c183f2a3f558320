use std::io::Write;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use flashcard_quiz::engine::{EngineError, QuizEngine, SessionState};
use flashcard_quiz::history::{AttemptLog, SqliteAttemptLog, RECENT_LIMIT};
use flashcard_quiz::models::{AttemptRecord, CategoryFilter, Difficulty, DifficultyFilter};
use flashcard_quiz::time::Clock;
use flashcard_quiz::{load_questions_from_json, LoadError, QuestionBank};
use tempfile::{tempdir, NamedTempFile};

const QUESTIONS: &str = r#"{
    "Science": [
        {"question": "H2O is?", "options": ["Water", "Salt"], "answer": "Water", "difficulty": "Easy"},
        {"question": "Speed of light?", "options": ["300k km/s", "30 km/s"], "answer": "300k km/s", "difficulty": "Hard"}
    ],
    "History": [
        {"question": "First moon landing?", "options": ["1969", "1972"], "answer": "1969"}
    ]
}"#;

fn question_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn bank() -> QuestionBank {
    let file = question_file(QUESTIONS);
    QuestionBank::new(load_questions_from_json(file.path()).unwrap())
}

#[test]
fn test_load_questions_from_file() {
    let bank = bank();

    assert_eq!(bank.len(), 3);
    assert_eq!(bank.categories(), vec!["History", "Science"]);
    let landing = bank.iter().find(|q| q.category() == "History").unwrap();
    assert_eq!(landing.difficulty(), Difficulty::Easy);
}

#[test]
fn test_load_rejects_missing_and_empty_sources() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(
        load_questions_from_json(&missing),
        Err(LoadError::NotFound(_))
    ));

    let empty = question_file("{}");
    assert!(matches!(
        load_questions_from_json(empty.path()),
        Err(LoadError::Empty)
    ));
}

#[test]
fn test_full_session_is_logged() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let mut engine = QuizEngine::seeded(bank(), 11).with_clock(Clock::fixed(start));

    let total = engine
        .start(CategoryFilter::Named("Science".into()), DifficultyFilter::Any, 10)
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(engine.state(), SessionState::InProgress);

    let answer = engine.current().unwrap().answer().to_string();
    assert!(engine.submit(Some(&answer)).unwrap());
    assert_eq!(
        engine.submit_at(0, Some(&answer)),
        Err(EngineError::StaleSubmission { submitted: 0, current: 1 })
    );
    assert!(!engine.submit(None).unwrap());
    assert!(engine.is_finished());
    assert_eq!(engine.submit(None), Err(EngineError::Finished));

    engine.clock_mut().advance(Duration::seconds(42));
    let result = engine.result().unwrap();
    assert_eq!((result.score, result.total, result.duration_seconds), (1, 2, 42));
    assert_eq!(result.percentage(), 50);

    let dir = tempdir().unwrap();
    let path = dir.path().join("history").join("quiz.db");
    let when = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 42)
        .unwrap();

    let mut log = SqliteAttemptLog::open(&path).unwrap();
    log.append(&AttemptRecord::from_result(when, &result)).unwrap();
    log.close();

    let log = SqliteAttemptLog::open(&path).unwrap();
    let recent = log.recent(RECENT_LIMIT).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].timestamp, when);
    assert_eq!(recent[0].category, "Science");
    assert_eq!(recent[0].difficulty, "Any");
    assert_eq!((recent[0].score, recent[0].total), (1, 2));
    assert_eq!(recent[0].duration_seconds, 42);
}

#[test]
fn test_unmatched_filters_keep_engine_idle() {
    let mut engine = QuizEngine::seeded(bank(), 3);

    let err = engine
        .start(
            CategoryFilter::Named("History".into()),
            DifficultyFilter::Only(Difficulty::Hard),
            5,
        )
        .unwrap_err();

    assert!(matches!(err, EngineError::NoMatch { .. }));
    assert_eq!(engine.state(), SessionState::Idle);
    assert!(engine.current().is_none());
    assert!(!engine.is_finished());
}
