//! Category and difficulty filters used to build a question pool.
//!
//! Both filters parse from and display as the labels shown to the user, with
//! `"Any"` meaning "do not filter".

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::question::{Difficulty, Question, UnknownDifficulty};

/// Label for the pass-through filter value.
pub const ANY_LABEL: &str = "Any";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    Any,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::Named(name) => question.category() == name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::Any => f.write_str(ANY_LABEL),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ANY_LABEL {
            Ok(CategoryFilter::Any)
        } else {
            Ok(CategoryFilter::Named(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DifficultyFilter {
    #[default]
    Any,
    Only(Difficulty),
}

impl DifficultyFilter {
    /// Every selectable value, in display order.
    pub const CHOICES: [DifficultyFilter; 4] = [
        DifficultyFilter::Any,
        DifficultyFilter::Only(Difficulty::Easy),
        DifficultyFilter::Only(Difficulty::Medium),
        DifficultyFilter::Only(Difficulty::Hard),
    ];

    pub fn matches(&self, question: &Question) -> bool {
        match self {
            DifficultyFilter::Any => true,
            DifficultyFilter::Only(level) => question.difficulty() == *level,
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyFilter::Any => f.write_str(ANY_LABEL),
            DifficultyFilter::Only(level) => level.fmt(f),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ANY_LABEL {
            Ok(DifficultyFilter::Any)
        } else {
            s.parse().map(DifficultyFilter::Only)
        }
    }
}
