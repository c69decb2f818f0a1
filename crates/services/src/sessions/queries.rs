use chrono::{DateTime, Utc};
use tracing::debug;

use catalog::QuestionSource;
use prep_core::model::{SessionConfig, Topic};

use super::plan::{PlanBuilder, SessionPlan};
use super::runner::AssessmentSession;
use crate::error::SessionError;

/// Source-backed session builders.
pub(crate) struct SessionQueries;

impl SessionQueries {
    /// Build a session plan from a fetched pool.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Source` when the fetch fails.
    pub async fn build_plan_from_source(
        topic: &Topic,
        source: &dyn QuestionSource,
        config: &SessionConfig,
    ) -> Result<SessionPlan, SessionError> {
        let pool = source.fetch_pool(topic).await?;
        let plan = PlanBuilder::new(config).build(pool);
        debug!(
            topic = %topic,
            matched = plan.matched,
            selected = plan.total(),
            requested = plan.requested,
            "session plan built"
        );
        Ok(plan)
    }

    /// Fetch, plan and start a session in one step.
    ///
    /// The returned session is already past `start`: either `Running` or,
    /// when the filter matched nothing, in the `Empty` terminal state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Source` on fetch failures.
    pub async fn start_from_source(
        topic: &Topic,
        source: &dyn QuestionSource,
        config: SessionConfig,
        now: DateTime<Utc>,
    ) -> Result<AssessmentSession, SessionError> {
        let plan = Self::build_plan_from_source(topic, source, &config).await?;
        let mut session = AssessmentSession::new(topic.clone(), config, plan);
        session.start(now)?;
        Ok(session)
    }
}
