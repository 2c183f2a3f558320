use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Difficulty label attached to every question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}` (expected Easy, Medium or Hard)")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

/// Reasons a question record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQuestion {
    #[error("question has no options")]
    NoOptions,
    #[error("answer `{0}` is not one of the options")]
    AnswerNotInOptions(String),
}

/// A single multiple-choice question.
///
/// The correct answer is always one of the options; construction through
/// [`Question::new`] enforces that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    category: String,
    text: String,
    options: Vec<String>,
    answer: String,
    difficulty: Difficulty,
}

impl Question {
    pub fn new(
        category: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, InvalidQuestion> {
        let answer = answer.into();

        if options.is_empty() {
            return Err(InvalidQuestion::NoOptions);
        }
        if !options.contains(&answer) {
            return Err(InvalidQuestion::AnswerNotInOptions(answer));
        }

        Ok(Self {
            category: category.into(),
            text: text.into(),
            options,
            answer,
            difficulty,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Options in their canonical (source) order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Exact comparison against the canonical answer. `None` (no selection,
    /// e.g. a timeout) is never correct.
    pub fn is_correct(&self, choice: Option<&str>) -> bool {
        choice == Some(self.answer.as_str())
    }
}
