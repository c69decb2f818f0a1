#![forbid(unsafe_code)]

pub mod error;
pub mod preferences_service;
pub mod sessions;

pub use prep_core::Clock;
pub use sessions as session;

pub use error::{PreferencesServiceError, SessionError};
pub use preferences_service::PreferencesService;

pub use sessions::{
    AssessmentSession, PlanBuilder, ReviewCounts, ScoreLine, SessionAnswerResult,
    SessionLoopService, SessionPlan, SessionProgress, SessionState, TickOutcome,
};
