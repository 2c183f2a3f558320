mod attempt;
mod filter;
mod question;

pub use attempt::AttemptRecord;
pub use filter::{CategoryFilter, DifficultyFilter, ANY_LABEL};
pub use question::{Difficulty, InvalidQuestion, Question, UnknownDifficulty};
