use async_trait::async_trait;
use prep_core::model::{Question, Topic, UiPreferences};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question-pool and preference adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("request failed with status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode pool payload: {0}")]
    Decode(String),

    #[error("store error: {0}")]
    Store(String),
}

/// Contract for anything that can hand out question pools.
///
/// The remote REST API is the production implementation; in-memory and
/// file-backed sources exist for tests and offline runs.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the full pool for a topic.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::TopicNotFound` for an unknown topic, or other
    /// source errors.
    async fn fetch_pool(&self, topic: &Topic) -> Result<Vec<Question>, SourceError>;

    /// List the topics this source can serve.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the listing cannot be produced.
    async fn list_topics(&self) -> Result<Vec<Topic>, SourceError>;
}

/// Load/save contract for best-effort UI preferences.
///
/// Implementations must treat the stored value as a cache: absence is a
/// normal answer, not an error.
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Load stored preferences, `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Store` when the store is unreadable.
    async fn load(&self) -> Result<Option<UiPreferences>, SourceError>;

    /// Persist preferences, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Store` when the value cannot be written.
    async fn save(&self, prefs: &UiPreferences) -> Result<(), SourceError>;
}

/// Simple in-memory catalog for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    pools: Arc<Mutex<HashMap<Topic, Vec<Question>>>>,
    prefs: Arc<Mutex<Option<UiPreferences>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed (or replace) the pool for a topic.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned; only reachable when another
    /// thread already panicked while holding it.
    pub fn insert_pool(&self, topic: Topic, questions: Vec<Question>) {
        self.pools
            .lock()
            .expect("pool lock poisoned")
            .insert(topic, questions);
    }
}

#[async_trait]
impl QuestionSource for InMemoryCatalog {
    async fn fetch_pool(&self, topic: &Topic) -> Result<Vec<Question>, SourceError> {
        let guard = self
            .pools
            .lock()
            .map_err(|e| SourceError::Store(e.to_string()))?;
        guard
            .get(topic)
            .cloned()
            .ok_or_else(|| SourceError::TopicNotFound(topic.to_string()))
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, SourceError> {
        let guard = self
            .pools
            .lock()
            .map_err(|e| SourceError::Store(e.to_string()))?;
        let mut topics: Vec<Topic> = guard.keys().cloned().collect();
        topics.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(topics)
    }
}

#[async_trait]
impl PreferencesStore for InMemoryCatalog {
    async fn load(&self) -> Result<Option<UiPreferences>, SourceError> {
        let guard = self
            .prefs
            .lock()
            .map_err(|e| SourceError::Store(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, prefs: &UiPreferences) -> Result<(), SourceError> {
        let mut guard = self
            .prefs
            .lock()
            .map_err(|e| SourceError::Store(e.to_string()))?;
        *guard = Some(prefs.clone());
        Ok(())
    }
}
