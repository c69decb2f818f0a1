mod answer_sheet;
mod config;
pub mod content;
mod difficulty;
mod ids;
mod preferences;
mod question;
mod report;
mod topic;

pub use content::{Block, Content, ContentError, MediaUri, MediaValidationError};
pub use ids::{QuestionId, SessionId};

pub use answer_sheet::AnswerSheet;
pub use config::{ConfigError, SessionConfig, TimerPolicy};
pub use difficulty::{Difficulty, DifficultyError, DifficultyFilter};
pub use preferences::{UiPreferences, UiPreferencesDraft};
pub use question::{AnswerOption, OptionLabel, Question, QuestionDraft, QuestionError, ValidatedQuestion};
pub use report::{Finish, ReportError, ReviewRow, SessionReport};
pub use topic::{Topic, TopicError};
