use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use prep_core::model::{Question, Topic};

use crate::source::{QuestionSource, SourceError};
use crate::wire;

/// Connection settings for the remote question-pool API.
#[derive(Clone, Debug)]
pub struct HttpCatalogConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl HttpCatalogConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: 10,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Read the configuration from `PREP_API_BASE_URL` / `PREP_API_TOKEN`.
    /// Returns `None` when no base URL is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("PREP_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let token = env::var("PREP_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Some(Self {
            base_url,
            token,
            timeout_secs: 10,
        })
    }
}

/// Question source backed by the remote REST API.
#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    config: HttpCatalogConfig,
}

impl HttpCatalog {
    /// Build the client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Transport` when the HTTP client cannot be built.
    pub fn new(config: HttpCatalogConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl QuestionSource for HttpCatalog {
    async fn fetch_pool(&self, topic: &Topic) -> Result<Vec<Question>, SourceError> {
        debug!(topic = %topic, "fetching question pool");
        let path = format!("pools/{}/questions", topic.as_str());
        match self.get(&path).await {
            Ok(body) => {
                let pool = wire::decode_pool(&body)?;
                debug!(topic = %topic, count = pool.len(), "pool fetched");
                Ok(pool)
            }
            Err(SourceError::Status(code)) if code == StatusCode::NOT_FOUND.as_u16() => {
                Err(SourceError::TopicNotFound(topic.to_string()))
            }
            Err(other) => Err(other),
        }
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, SourceError> {
        let body = self.get("pools").await?;
        wire::decode_topics(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let catalog =
            HttpCatalog::new(HttpCatalogConfig::new("https://api.example.com/v1/")).unwrap();
        assert_eq!(
            catalog.url("pools/js/questions"),
            "https://api.example.com/v1/pools/js/questions"
        );
    }

    #[test]
    fn config_builder_sets_token() {
        let config = HttpCatalogConfig::new("https://api.example.com").with_token("t0ken");
        assert_eq!(config.token.as_deref(), Some("t0ken"));
        assert_eq!(config.timeout_secs, 10);
    }
}
