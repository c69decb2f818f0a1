use std::sync::Arc;

use catalog::QuestionSource;
use prep_core::model::{
    OptionLabel, QuestionId, SessionConfig, SessionReport, Topic,
};

use super::progress::SessionProgress;
use super::queries::SessionQueries;
use super::runner::{AssessmentSession, TickOutcome};
use crate::Clock;
use crate::error::SessionError;
use crate::preferences_service::PreferencesService;

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub question: QuestionId,
    pub label: OptionLabel,
    pub progress: SessionProgress,
}

/// Orchestrates session start and the run-stage inputs.
///
/// Owns the time source and the question source so the caller never touches
/// either directly; optionally records the last-viewed subject as a
/// best-effort preference.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    preferences: Option<PreferencesService>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            preferences: None,
        }
    }

    #[must_use]
    pub fn with_preferences(mut self, preferences: PreferencesService) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Fetch the pool for a topic, plan it, and start the session.
    ///
    /// A failure to record the subject preference is logged by the
    /// preferences service and never fails the start.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Source` when the pool fetch fails.
    pub async fn start_session(
        &self,
        topic: &Topic,
        config: SessionConfig,
    ) -> Result<AssessmentSession, SessionError> {
        let now = self.clock.now();
        let session =
            SessionQueries::start_from_source(topic, self.source.as_ref(), config, now).await?;

        if let Some(preferences) = &self.preferences {
            preferences.remember_subject(topic.as_str()).await;
        }

        Ok(session)
    }

    /// List the topics the configured source can serve.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Source` when the source fails.
    pub async fn list_topics(&self) -> Result<Vec<Topic>, SessionError> {
        Ok(self.source.list_topics().await?)
    }

    /// Record an answer on the running session.
    ///
    /// # Errors
    ///
    /// Propagates the runner's rejection (not running, expired, unknown
    /// question or label).
    pub fn select_answer(
        &self,
        session: &mut AssessmentSession,
        question: QuestionId,
        label: OptionLabel,
    ) -> Result<SessionAnswerResult, SessionError> {
        session.select_answer(question, label.clone(), self.clock.now())?;
        Ok(SessionAnswerResult {
            question,
            label,
            progress: session.progress(),
        })
    }

    /// Drive the countdown one step.
    ///
    /// # Errors
    ///
    /// Propagates report construction failures on auto-submission.
    pub fn tick(&self, session: &mut AssessmentSession) -> Result<TickOutcome, SessionError> {
        session.tick(self.clock.now())
    }

    /// Submit the session and return its report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` on a second submit.
    pub fn submit(&self, session: &mut AssessmentSession) -> Result<SessionReport, SessionError> {
        Ok(session.submit(self.clock.now())?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::runner::SessionState;
    use catalog::{InMemoryCatalog, PreferencesStore};
    use prep_core::model::{
        AnswerOption, Content, DifficultyFilter, OptionLabel, Question, QuestionDraft,
        TimerPolicy,
    };
    use prep_core::time::fixed_clock;

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

    fn seeded_catalog(topic: &Topic, count: u64) -> Arc<InMemoryCatalog> {
        let catalog = InMemoryCatalog::new();
        catalog.insert_pool(topic.clone(), (1..=count).map(build_question).collect());
        Arc::new(catalog)
    }

    #[tokio::test]
    async fn full_run_through_workflow() {
        let topic = Topic::new("js").unwrap();
        let catalog = seeded_catalog(&topic, 2);
        let service = SessionLoopService::new(fixed_clock(), catalog);

        let config =
            SessionConfig::new(2, DifficultyFilter::Mixed, false, TimerPolicy::Off).unwrap();
        let mut session = service.start_session(&topic, config).await.unwrap();
        assert_eq!(session.state(), SessionState::Running);

        let result = service
            .select_answer(&mut session, QuestionId::new(1), label("A"))
            .unwrap();
        assert_eq!(result.progress.answered, 1);

        let report = service.submit(&mut session).unwrap();
        assert_eq!(report.score(), 1);
        assert_eq!(report.total(), 2);
    }

    #[tokio::test]
    async fn start_records_last_subject() {
        let topic = Topic::new("react").unwrap();
        let catalog = seeded_catalog(&topic, 1);
        let service = SessionLoopService::new(fixed_clock(), catalog.clone())
            .with_preferences(PreferencesService::new(catalog.clone()));

        service
            .start_session(&topic, SessionConfig::default_practice())
            .await
            .unwrap();

        let stored = catalog.load().await.unwrap().unwrap();
        assert_eq!(stored.last_subject(), Some("react"));
    }

    #[tokio::test]
    async fn list_topics_passes_through() {
        let topic = Topic::new("css").unwrap();
        let catalog = seeded_catalog(&topic, 1);
        let service = SessionLoopService::new(fixed_clock(), catalog);

        let topics = service.list_topics().await.unwrap();
        assert_eq!(topics, vec![topic]);
    }
}
