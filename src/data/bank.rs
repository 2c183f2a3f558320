use crate::models::{CategoryFilter, DifficultyFilter, Question};

/// Immutable store of every loaded question.
///
/// Sessions refer to questions by their index in the bank instead of
/// copying them.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Distinct category names, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.questions.iter().map(Question::category).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Bank indices of the questions passing both filters, in bank order.
    pub fn matching(&self, category: &CategoryFilter, difficulty: &DifficultyFilter) -> Vec<usize> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| category.matches(q) && difficulty.matches(q))
            .map(|(index, _)| index)
            .collect()
    }
}

impl From<Vec<Question>> for QuestionBank {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn bank() -> QuestionBank {
        let q = |category: &str, difficulty| {
            Question::new(category, "?", vec!["x".to_string()], "x", difficulty).unwrap()
        };
        QuestionBank::new(vec![
            q("Science", Difficulty::Easy),
            q("Art", Difficulty::Hard),
            q("Science", Difficulty::Hard),
            q("History", Difficulty::Medium),
        ])
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        assert_eq!(bank().categories(), vec!["Art", "History", "Science"]);
    }

    #[test]
    fn test_matching_applies_both_filters() {
        let bank = bank();
        assert_eq!(bank.matching(&CategoryFilter::Any, &DifficultyFilter::Any), vec![0, 1, 2, 3]);
        assert_eq!(
            bank.matching(&CategoryFilter::Named("Science".into()), &DifficultyFilter::Any),
            vec![0, 2]
        );
        assert_eq!(
            bank.matching(&CategoryFilter::Any, &DifficultyFilter::Only(Difficulty::Hard)),
            vec![1, 2]
        );
        assert!(bank
            .matching(&CategoryFilter::Named("History".into()), &DifficultyFilter::Only(Difficulty::Hard))
            .is_empty());
    }
}
