use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use prep_core::model::{UiPreferences, UiPreferencesDraft};

use crate::source::{PreferencesStore, SourceError};

/// Preferences cache persisted as a small JSON file.
///
/// Reading tolerates a missing or unparseable file (both answer `None`);
/// only genuine I/O failures surface as errors.
pub struct JsonPreferencesStore {
    path: PathBuf,
}

/// Stored shape, kept separate from the domain type.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsDto {
    last_tab: Option<String>,
    last_subject: Option<String>,
}

impl JsonPreferencesStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PreferencesStore for JsonPreferencesStore {
    async fn load(&self) -> Result<Option<UiPreferences>, SourceError> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SourceError::Store(e.to_string())),
        };

        match serde_json::from_slice::<PrefsDto>(&body) {
            Ok(dto) => Ok(Some(
                UiPreferencesDraft {
                    last_tab: dto.last_tab,
                    last_subject: dto.last_subject,
                }
                .normalize(),
            )),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable preferences file, starting fresh");
                Ok(None)
            }
        }
    }

    async fn save(&self, prefs: &UiPreferences) -> Result<(), SourceError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SourceError::Store(e.to_string()))?;
        }

        let dto = PrefsDto {
            last_tab: prefs.last_tab().map(str::to_string),
            last_subject: prefs.last_subject().map(str::to_string),
        };
        let body =
            serde_json::to_vec_pretty(&dto).map_err(|e| SourceError::Store(e.to_string()))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| SourceError::Store(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferencesStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = JsonPreferencesStore::new(path);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/prefs.json");
        let store = JsonPreferencesStore::new(path);

        let prefs = UiPreferences::default()
            .with_last_tab("mock-interview")
            .with_last_subject("javascript");
        store.save(&prefs).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(prefs));
    }
}
