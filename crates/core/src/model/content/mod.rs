pub mod block;
pub mod media;

pub use block::{Block, Content, ContentError};
pub use media::{MediaUri, MediaValidationError};
