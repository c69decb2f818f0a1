//! Shared error types for the services crate.

use thiserror::Error;

use catalog::SourceError;
use prep_core::model::{OptionLabel, QuestionId, ReportError};

/// Errors emitted by the session subsystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is not running")]
    NotRunning,

    #[error("session already started")]
    AlreadyStarted,

    #[error("session already submitted")]
    AlreadySubmitted,

    #[error("the countdown has expired")]
    TimeExpired,

    #[error("session has no question {0}")]
    UnknownQuestion(QuestionId),

    #[error("question {question} has no option labeled {label}")]
    UnknownOption {
        question: QuestionId,
        label: OptionLabel,
    },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors emitted by `PreferencesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesServiceError {
    #[error(transparent)]
    Store(#[from] SourceError),
}
