use std::sync::Arc;

use tracing::warn;

use catalog::PreferencesStore;
use prep_core::model::{UiPreferences, UiPreferencesDraft};

use crate::error::PreferencesServiceError;

/// Facade over the preferences store.
///
/// Preferences are a best-effort cache (last-opened tab, last-viewed
/// subject): loading degrades to defaults and the `remember_*` helpers
/// swallow store failures after logging them. Only the explicit `save`
/// surfaces errors.
#[derive(Clone)]
pub struct PreferencesService {
    store: Arc<dyn PreferencesStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(store: Arc<dyn PreferencesStore>) -> Self {
        Self { store }
    }

    /// Load stored preferences, falling back to defaults when the store is
    /// empty or unreadable.
    pub async fn load_or_default(&self) -> UiPreferences {
        match self.store.load().await {
            Ok(Some(prefs)) => prefs,
            Ok(None) => UiPreferences::default(),
            Err(e) => {
                warn!(error = %e, "could not load preferences, using defaults");
                UiPreferences::default()
            }
        }
    }

    /// Normalize and persist new preferences.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on store failures.
    pub async fn save(
        &self,
        draft: UiPreferencesDraft,
    ) -> Result<UiPreferences, PreferencesServiceError> {
        let prefs = draft.normalize();
        self.store.save(&prefs).await?;
        Ok(prefs)
    }

    /// Best-effort update of the last-viewed subject.
    pub async fn remember_subject(&self, subject: &str) {
        let updated = self.load_or_default().await.with_last_subject(subject);
        if let Err(e) = self.store.save(&updated).await {
            warn!(error = %e, subject, "could not record last subject");
        }
    }

    /// Best-effort update of the last-opened tab.
    pub async fn remember_tab(&self, tab: &str) {
        let updated = self.load_or_default().await.with_last_tab(tab);
        if let Err(e) = self.store.save(&updated).await {
            warn!(error = %e, tab, "could not record last tab");
        }
    }
}
