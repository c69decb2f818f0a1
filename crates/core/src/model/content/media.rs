use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaValidationError {
    #[error("Media URI cannot be empty.")]
    EmptyMediaUri,

    #[error("Media URI is not a valid URL: {0}")]
    InvalidUrl(String),
}

//
// ─── MEDIA URI ─────────────────────────────────────────────────────────────────
//

/// Location of an image or video referenced from question content.
///
/// Remote pools hand out URLs; local pool files may point at files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaUri {
    FilePath(PathBuf),
    Url(Url),
}

impl MediaUri {
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, MediaValidationError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        Ok(MediaUri::FilePath(p))
    }

    pub fn from_url(url: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = url.as_ref().trim();
        if s.is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        let u = Url::parse(s).map_err(|_| MediaValidationError::InvalidUrl(s.to_string()))?;
        Ok(MediaUri::Url(u))
    }

    /// Parse a raw reference: anything with a URL scheme becomes `Url`,
    /// everything else is treated as a file path.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        match Url::parse(s) {
            Ok(u) => Ok(MediaUri::Url(u)),
            Err(_) => Self::from_file(s),
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            MediaUri::FilePath(p) => Some(p.as_path()),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            MediaUri::Url(u) => Some(u),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaUri::FilePath(p) => write!(f, "{}", p.display()),
            MediaUri::Url(u) => write!(f, "{u}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_uri_fails() {
        assert_eq!(
            MediaUri::from_url("   ").unwrap_err(),
            MediaValidationError::EmptyMediaUri
        );
        assert_eq!(
            MediaUri::from_file("").unwrap_err(),
            MediaValidationError::EmptyMediaUri
        );
    }

    #[test]
    fn url_parses() {
        let uri = MediaUri::from_url("https://cdn.example.com/q/42.png").unwrap();
        assert!(uri.as_url().is_some());
    }

    #[test]
    fn garbage_url_fails() {
        let err = MediaUri::from_url("ht!tp: not a url").unwrap_err();
        assert!(matches!(err, MediaValidationError::InvalidUrl(_)));
    }

    #[test]
    fn parse_falls_back_to_file_path() {
        let uri = MediaUri::parse("diagrams/ohm.png").unwrap();
        assert!(uri.as_path().is_some());
    }
}
