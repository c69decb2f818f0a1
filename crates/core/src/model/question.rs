use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::model::{
    content::{Content, ContentError},
    difficulty::Difficulty,
    ids::QuestionId,
};

//
// ─── OPTION LABEL ──────────────────────────────────────────────────────────────
//

/// Validated answer-option label such as "A" (trimmed, non-empty, uppercased).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionLabel(String);

const MAX_LABEL_LEN: usize = 8;

impl OptionLabel {
    /// Create a validated label.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyLabel` for blank input and
    /// `QuestionError::LabelTooLong` past 8 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, QuestionError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuestionError::EmptyLabel);
        }
        if trimmed.chars().count() > MAX_LABEL_LEN {
            return Err(QuestionError::LabelTooLong {
                len: trimmed.chars().count(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// One labeled answer option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: OptionLabel,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: Content,
    pub options: Vec<AnswerOption>,
    pub correct: OptionLabel,
    pub explanation: Option<Content>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionDraft {
    /// Check the cross-field invariants of a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when there are fewer than two options, a label
    /// repeats, or the correct label names no option.
    pub fn validate(self) -> Result<ValidatedQuestion, QuestionError> {
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                len: self.options.len(),
            });
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.label.clone()) {
                return Err(QuestionError::DuplicateLabel(option.label.clone()));
            }
        }

        if !seen.contains(&self.correct) {
            return Err(QuestionError::CorrectLabelMissing(self.correct.clone()));
        }

        Ok(ValidatedQuestion {
            prompt: self.prompt,
            options: self.options,
            correct: self.correct,
            explanation: self.explanation,
            difficulty: self.difficulty,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    prompt: Content,
    options: Vec<AnswerOption>,
    correct: OptionLabel,
    explanation: Option<Content>,
    difficulty: Option<Difficulty>,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            prompt: self.prompt,
            options: self.options,
            correct: self.correct,
            explanation: self.explanation,
            difficulty: self.difficulty,
        }
    }
}

/// A validated question, immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: Content,
    options: Vec<AnswerOption>,
    correct: OptionLabel,
    explanation: Option<Content>,
    difficulty: Option<Difficulty>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &Content {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_label(&self) -> &OptionLabel {
        &self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&Content> {
        self.explanation.as_ref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// True when the question carries an option with this label.
    #[must_use]
    pub fn has_option(&self, label: &OptionLabel) -> bool {
        self.options.iter().any(|o| &o.label == label)
    }

    #[must_use]
    pub fn is_correct(&self, label: &OptionLabel) -> bool {
        &self.correct == label
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("option label cannot be empty")]
    EmptyLabel,

    #[error("option label too long: {len} characters")]
    LabelTooLong { len: usize },

    #[error("a question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("duplicate option label: {0}")]
    DuplicateLabel(OptionLabel),

    #[error("correct label {0} names no option")]
    CorrectLabelMissing(OptionLabel),

    #[error("invalid prompt content: {0}")]
    InvalidPrompt(#[source] ContentError),

    #[error("invalid content for option {label}: {source}")]
    InvalidOption {
        label: String,
        #[source]
        source: ContentError,
    },

    #[error("invalid explanation content: {0}")]
    InvalidExplanation(#[source] ContentError),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
