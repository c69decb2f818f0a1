use prep_core::model::SessionReport;

/// Presentation-agnostic score summary.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The UI may format the ratio (percentage, fraction, grade) as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreLine {
    pub correct: u32,
    pub total: u32,
}

impl ScoreLine {
    #[must_use]
    pub fn from_report(report: &SessionReport) -> Self {
        Self {
            correct: report.score(),
            total: report.total(),
        }
    }

    /// Score as a fraction in [0, 1]; zero-question reports score 0.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total)
    }
}

/// Review-stage aggregate: how the answered set splits up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewCounts {
    pub correct: u32,
    pub incorrect: u32,
    pub skipped: u32,
}

impl ReviewCounts {
    #[must_use]
    pub fn from_report(report: &SessionReport) -> Self {
        let mut correct = 0_u32;
        let mut incorrect = 0_u32;
        let mut skipped = 0_u32;
        for row in report.rows() {
            if row.is_correct {
                correct = correct.saturating_add(1);
            } else if row.selected.is_some() {
                incorrect = incorrect.saturating_add(1);
            } else {
                skipped = skipped.saturating_add(1);
            }
        }
        Self {
            correct,
            incorrect,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::{
        AnswerOption, AnswerSheet, Content, Finish, OptionLabel, Question, QuestionDraft,
        QuestionId,
    };
    use prep_core::time::fixed_now;

    fn label(s: &str) -> OptionLabel {
        OptionLabel::new(s).unwrap()
    }

    fn build_question(id: u64) -> Question {
        QuestionDraft {
            prompt: Content::plain(format!("Q{id}")).unwrap(),
            options: vec![
                AnswerOption {
                    label: label("A"),
                    content: Content::plain("yes").unwrap(),
                },
                AnswerOption {
                    label: label("B"),
                    content: Content::plain("no").unwrap(),
                },
            ],
            correct: label("A"),
            explanation: None,
            difficulty: None,
        }
        .validate()
        .unwrap()
        .assign_id(QuestionId::new(id))
    }

    #[test]
    fn counts_split_correct_incorrect_skipped() {
        let questions = vec![build_question(1), build_question(2), build_question(3)];
        let mut sheet = AnswerSheet::new();
        sheet.select(QuestionId::new(1), label("A"));
        sheet.select(QuestionId::new(2), label("B"));

        let now = fixed_now();
        let report =
            SessionReport::from_answers(&questions, &sheet, now, now, Finish::Manual).unwrap();

        let counts = ReviewCounts::from_report(&report);
        assert_eq!(counts.correct, 1);
        assert_eq!(counts.incorrect, 1);
        assert_eq!(counts.skipped, 1);

        let score = ScoreLine::from_report(&report);
        assert_eq!(score.correct, 1);
        assert_eq!(score.total, 3);
        assert!((score.fraction() - 1.0 / 3.0).abs() < 1e-9);
    }
}
