use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    answer_sheet::AnswerSheet,
    ids::QuestionId,
    question::{OptionLabel, Question},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("submitted_at is before started_at")]
    InvalidTimeRange,

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// How a session reached the submitted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Manual,
    TimeExpired,
}

/// One question in the post-submission review: what was picked, what was
/// right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub question_id: QuestionId,
    pub selected: Option<OptionLabel>,
    pub correct: OptionLabel,
    pub is_correct: bool,
}

/// Final result of a submitted session.
///
/// Computed exactly once at the submit transition; inputs are frozen from
/// then on, so the report never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    rows: Vec<ReviewRow>,
    score: u32,
    total: u32,
    started_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
    finish: Finish,
}

impl SessionReport {
    /// Build the report from the session's questions and answer sheet.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidTimeRange` if `submitted_at` is before
    /// `started_at`, or `ReportError::TooManyQuestions` if the question count
    /// cannot fit in `u32`.
    pub fn from_answers(
        questions: &[Question],
        sheet: &AnswerSheet,
        started_at: DateTime<Utc>,
        submitted_at: DateTime<Utc>,
        finish: Finish,
    ) -> Result<Self, ReportError> {
        if submitted_at < started_at {
            return Err(ReportError::InvalidTimeRange);
        }
        let total = u32::try_from(questions.len()).map_err(|_| ReportError::TooManyQuestions {
            len: questions.len(),
        })?;

        let mut rows = Vec::with_capacity(questions.len());
        let mut score = 0_u32;
        for question in questions {
            let selected = sheet.selected(question.id()).cloned();
            let is_correct = selected
                .as_ref()
                .is_some_and(|label| question.is_correct(label));
            if is_correct {
                score = score.saturating_add(1);
            }
            rows.push(ReviewRow {
                question_id: question.id(),
                selected,
                correct: question.correct_label().clone(),
                is_correct,
            });
        }

        Ok(Self {
            rows,
            score,
            total,
            started_at,
            submitted_at,
            finish,
        })
    }

    #[must_use]
    pub fn rows(&self) -> &[ReviewRow] {
        &self.rows
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn finish(&self) -> Finish {
        self.finish
    }
}
