#![forbid(unsafe_code)]

pub mod file;
pub mod http;
pub mod prefs;
pub mod source;
mod wire;

pub use file::FileCatalog;
pub use http::{HttpCatalog, HttpCatalogConfig};
pub use prefs::JsonPreferencesStore;
pub use source::{InMemoryCatalog, PreferencesStore, QuestionSource, SourceError};
