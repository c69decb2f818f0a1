use thiserror::Error;

use crate::model::content::media::{MediaUri, MediaValidationError};

//
// ─── CONTENT TYPES ─────────────────────────────────────────────────────────────
//

/// One unit of question content.
///
/// Prompts, options and explanations arrive from the content source as an
/// ordered run of blocks: plain text, a formula, or a media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Formula(String),
    Image(MediaUri),
    Video(MediaUri),
}

/// Validated, non-empty run of content blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    blocks: Vec<Block>,
}

//
// ─── CONTENT VALIDATION ERRORS ─────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Content must have at least one block.")]
    Empty,

    #[error("Text block cannot be blank.")]
    BlankText,

    #[error("Formula block cannot be blank.")]
    BlankFormula,

    #[error(transparent)]
    Media(#[from] MediaValidationError),
}

//
// ─── CONTENT IMPL ──────────────────────────────────────────────────────────────
//

impl Content {
    /// Validate an ordered run of blocks.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Empty` when there are no blocks, or the first
    /// per-block failure (blank text/formula).
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, ContentError> {
        if blocks.is_empty() {
            return Err(ContentError::Empty);
        }
        for block in &blocks {
            match block {
                Block::Text(s) if s.trim().is_empty() => return Err(ContentError::BlankText),
                Block::Formula(s) if s.trim().is_empty() => {
                    return Err(ContentError::BlankFormula);
                }
                _ => {}
            }
        }
        Ok(Self { blocks })
    }

    /// Convenience constructor for the common single-text-block case.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::BlankText` if the text is blank.
    pub fn plain(text: impl Into<String>) -> Result<Self, ContentError> {
        Self::from_blocks(vec![Block::Text(text.into())])
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[must_use]
    pub fn has_media(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| matches!(b, Block::Image(_) | Block::Video(_)))
    }

    /// Concatenated text of all text blocks, used where only a plain
    /// rendering is needed (logs, terminal output).
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if let Block::Text(s) = block {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(s.trim());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_blocks_fails() {
        let err = Content::from_blocks(Vec::new()).unwrap_err();
        assert_eq!(err, ContentError::Empty);
    }

    #[test]
    fn blank_text_fails() {
        let err = Content::plain("   ").unwrap_err();
        assert_eq!(err, ContentError::BlankText);
    }

    #[test]
    fn plain_text_passes() {
        let c = Content::plain("What is ownership?").unwrap();
        assert_eq!(c.plain_text(), "What is ownership?");
        assert!(!c.has_media());
    }

    #[test]
    fn mixed_blocks_pass() {
        let uri = MediaUri::from_url("https://cdn.example.com/circuit.png").unwrap();
        let c = Content::from_blocks(vec![
            Block::Text("Given the circuit below".into()),
            Block::Image(uri),
            Block::Formula("V = I * R".into()),
        ])
        .unwrap();

        assert!(c.has_media());
        assert_eq!(c.blocks().len(), 3);
        assert_eq!(c.plain_text(), "Given the circuit below");
    }

    #[test]
    fn blank_formula_fails() {
        let err = Content::from_blocks(vec![
            Block::Text("ok".into()),
            Block::Formula("  ".into()),
        ])
        .unwrap_err();
        assert_eq!(err, ContentError::BlankFormula);
    }
}
