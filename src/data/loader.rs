use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::{Difficulty, Question};

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";

/// Errors raised while loading the question source. All of them are fatal
/// to startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("question source is not a JSON object of question lists: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("category `{category}` must map to a list of questions")]
    NotAList { category: String },
    #[error("question {index} in category `{category}`: {reason}")]
    Malformed {
        category: String,
        index: usize,
        reason: String,
    },
    #[error("question source contains no questions")]
    Empty,
}

/// One entry as written in the source file.
#[derive(Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    answer: String,
    #[serde(default)]
    difficulty: Option<String>,
}

/// Load all questions from a JSON file mapping category names to question
/// lists.
///
/// A relative path that does not exist is also looked up next to the running
/// executable.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = locate_source(path.as_ref())?;

    let json_content = fs::read_to_string(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;

    let questions = parse_questions(&json_content)?;
    debug!(path = %path.display(), count = questions.len(), "loaded question source");
    Ok(questions)
}

/// Parse the question source. Categories and questions keep their source order.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, LoadError> {
    let raw: Map<String, Value> = serde_json::from_str(json)?;
    let mut out = Vec::new();

    for (category, items) in raw {
        let Value::Array(items) = items else {
            return Err(LoadError::NotAList { category });
        };

        for (index, item) in items.into_iter().enumerate() {
            let question = build_question(&category, item).map_err(|reason| LoadError::Malformed {
                category: category.clone(),
                index,
                reason,
            })?;
            out.push(question);
        }
    }

    if out.is_empty() {
        return Err(LoadError::Empty);
    }

    Ok(out)
}

fn build_question(category: &str, item: Value) -> Result<Question, String> {
    let raw: RawQuestion = serde_json::from_value(item).map_err(|e| e.to_string())?;

    let difficulty = match raw.difficulty.as_deref() {
        Some(label) => label.parse::<Difficulty>().map_err(|e| e.to_string())?,
        None => Difficulty::default(),
    };

    Question::new(category, raw.question, raw.options, raw.answer, difficulty).map_err(|e| e.to_string())
}

fn locate_source(path: &Path) -> Result<PathBuf, LoadError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    if path.is_relative() {
        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(path)));

        if let Some(candidate) = beside_exe.filter(|p| p.is_file()) {
            debug!(path = %candidate.display(), "using question source next to executable");
            return Ok(candidate);
        }
    }

    Err(LoadError::NotFound(path.to_path_buf()))
}
