use std::collections::HashMap;

use crate::model::{ids::QuestionId, question::OptionLabel};

/// Mapping from question to the option label the user picked.
///
/// Mutated only through the running session; cleared on reset; never
/// persisted past the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    picks: HashMap<QuestionId, OptionLabel>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the pick for a question.
    pub fn select(&mut self, question: QuestionId, label: OptionLabel) {
        self.picks.insert(question, label);
    }

    #[must_use]
    pub fn selected(&self, question: QuestionId) -> Option<&OptionLabel> {
        self.picks.get(&question)
    }

    /// Number of questions with a recorded pick.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.picks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> OptionLabel {
        OptionLabel::new(s).unwrap()
    }

    #[test]
    fn select_overwrites() {
        let mut sheet = AnswerSheet::new();
        sheet.select(QuestionId::new(1), label("A"));
        sheet.select(QuestionId::new(1), label("B"));

        assert_eq!(sheet.answered(), 1);
        assert_eq!(sheet.selected(QuestionId::new(1)), Some(&label("B")));
    }

    #[test]
    fn clear_empties_the_sheet() {
        let mut sheet = AnswerSheet::new();
        sheet.select(QuestionId::new(1), label("A"));
        sheet.clear();
        assert!(sheet.is_empty());
    }
}
