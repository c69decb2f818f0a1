use thiserror::Error;

use crate::model::{ConfigError, ContentError, QuestionError, ReportError, TopicError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Topic(#[from] TopicError),
}
