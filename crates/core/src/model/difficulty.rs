use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DifficultyError {
    #[error("unknown difficulty tag: {0}")]
    Unknown(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Normalized difficulty tag for a question.
///
/// Content sources label questions inconsistently ("easy", "Beginner",
/// "HARD", ...); parsing folds the synonyms onto three levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" | "easy" | "basic" => Ok(Difficulty::Beginner),
            "intermediate" | "medium" | "normal" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" | "expert" => Ok(Difficulty::Advanced),
            _ => Err(DifficultyError::Unknown(s.trim().to_string())),
        }
    }
}

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

/// User-selectable constraint narrowing a question pool.
///
/// `Mixed` performs no filtering. An untagged question matches `Mixed` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    Mixed,
    Only(Difficulty),
}

impl DifficultyFilter {
    #[must_use]
    pub fn matches(&self, tag: Option<Difficulty>) -> bool {
        match self {
            DifficultyFilter::Mixed => true,
            DifficultyFilter::Only(wanted) => tag == Some(*wanted),
        }
    }

    /// Parse a user-facing filter value; "mixed" (or "all") means no filter.
    ///
    /// # Errors
    ///
    /// Returns `DifficultyError::Unknown` for an unrecognized tag.
    pub fn parse(s: &str) -> Result<Self, DifficultyError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mixed" | "all" | "any" => Ok(DifficultyFilter::Mixed),
            other => other.parse().map(DifficultyFilter::Only),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_normalize() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!(
            "Medium".parse::<Difficulty>().unwrap(),
            Difficulty::Intermediate
        );
        assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert_eq!(
            "beginner".parse::<Difficulty>().unwrap(),
            Difficulty::Beginner
        );
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let err = "impossible".parse::<Difficulty>().unwrap_err();
        assert_eq!(err, DifficultyError::Unknown("impossible".into()));
    }

    #[test]
    fn mixed_matches_everything() {
        let f = DifficultyFilter::Mixed;
        assert!(f.matches(Some(Difficulty::Advanced)));
        assert!(f.matches(None));
    }

    #[test]
    fn only_matches_exact_level() {
        let f = DifficultyFilter::Only(Difficulty::Advanced);
        assert!(f.matches(Some(Difficulty::Advanced)));
        assert!(!f.matches(Some(Difficulty::Beginner)));
        assert!(!f.matches(None));
    }

    #[test]
    fn filter_parses_mixed_and_levels() {
        assert_eq!(DifficultyFilter::parse("Mixed").unwrap(), DifficultyFilter::Mixed);
        assert_eq!(
            DifficultyFilter::parse("hard").unwrap(),
            DifficultyFilter::Only(Difficulty::Advanced)
        );
        assert!(DifficultyFilter::parse("nope").is_err());
    }
}
