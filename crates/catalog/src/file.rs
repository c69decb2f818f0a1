use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use prep_core::model::{Question, Topic};

use crate::source::{QuestionSource, SourceError};
use crate::wire;

/// Question source reading one topic's pool from a local JSON file.
///
/// The file holds the same payload shape the HTTP API serves, so the same
/// decoding (and the same tolerance for malformed entries) applies. Used for
/// offline runs and demos.
pub struct FileCatalog {
    topic: Topic,
    path: PathBuf,
}

impl FileCatalog {
    #[must_use]
    pub fn new(topic: Topic, path: impl Into<PathBuf>) -> Self {
        Self {
            topic,
            path: path.into(),
        }
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }
}

#[async_trait]
impl QuestionSource for FileCatalog {
    async fn fetch_pool(&self, topic: &Topic) -> Result<Vec<Question>, SourceError> {
        if topic != &self.topic {
            return Err(SourceError::TopicNotFound(topic.to_string()));
        }
        debug!(path = %self.path.display(), "reading pool file");
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError::Store(e.to_string()))?;
        wire::decode_pool(&body)
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, SourceError> {
        Ok(vec![self.topic.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_pool_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"questions": [{{
                "id": 11,
                "prompt": "Pick A",
                "options": [
                    {{"label": "A", "content": "first"}},
                    {{"label": "B", "content": "second"}}
                ],
                "correct": "A"
            }}]}}"#
        )
        .unwrap();

        let topic = Topic::new("demo").unwrap();
        let catalog = FileCatalog::new(topic.clone(), file.path());

        let pool = catalog.fetch_pool(&topic).await.unwrap();
        assert_eq!(pool.len(), 1);

        let err = catalog
            .fetch_pool(&Topic::new("other").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::TopicNotFound(_)));
    }
}
