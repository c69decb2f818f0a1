/// Best-effort UI preferences (last-opened tab, last-viewed subject).
///
/// This is a cache, never authoritative state: a missing or stale value must
/// always be survivable by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiPreferences {
    last_tab: Option<String>,
    last_subject: Option<String>,
}

/// Unvalidated preference values as read from a store or the UI.
#[derive(Clone, Debug, Default)]
pub struct UiPreferencesDraft {
    pub last_tab: Option<String>,
    pub last_subject: Option<String>,
}

impl UiPreferencesDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize the draft: values are trimmed, blanks become `None`.
    #[must_use]
    pub fn normalize(self) -> UiPreferences {
        UiPreferences {
            last_tab: normalize_optional(self.last_tab),
            last_subject: normalize_optional(self.last_subject),
        }
    }
}

impl UiPreferences {
    #[must_use]
    pub fn last_tab(&self) -> Option<&str> {
        self.last_tab.as_deref()
    }

    #[must_use]
    pub fn last_subject(&self) -> Option<&str> {
        self.last_subject.as_deref()
    }

    #[must_use]
    pub fn with_last_tab(mut self, tab: impl Into<String>) -> Self {
        self.last_tab = normalize_optional(Some(tab.into()));
        self
    }

    #[must_use]
    pub fn with_last_subject(mut self, subject: impl Into<String>) -> Self {
        self.last_subject = normalize_optional(Some(subject.into()));
        self
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanks_normalize_to_none() {
        let prefs = UiPreferencesDraft {
            last_tab: Some("  ".into()),
            last_subject: Some(" react ".into()),
        }
        .normalize();

        assert_eq!(prefs.last_tab(), None);
        assert_eq!(prefs.last_subject(), Some("react"));
    }

    #[test]
    fn with_helpers_normalize_too() {
        let prefs = UiPreferences::default()
            .with_last_tab("practice")
            .with_last_subject("   ");
        assert_eq!(prefs.last_tab(), Some("practice"));
        assert_eq!(prefs.last_subject(), None);
    }
}
