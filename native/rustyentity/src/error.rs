//! Error types for the host document collaborator
//!
//! The entity core never surfaces these: commands swallow them and report
//! success. They exist so the document tree can reject malformed positions
//! and markup before anything reaches the index.

use thiserror::Error;

/// Errors raised by structural document operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Position lies past the end of the document content
    #[error("position {pos} is outside the document (content size {size})")]
    InvalidPosition { pos: usize, size: usize },

    /// No node starts exactly at the position
    #[error("no node starts at position {pos}")]
    NoNodeAt { pos: usize },

    /// Text nodes carry no attributes
    #[error("cannot set attributes on the text node at position {pos}")]
    TextNode { pos: usize },

    /// Range ends sit in blocks at different depths, so they cannot be joined
    #[error("range {from}..{to} crosses a node boundary")]
    CrossesParent { from: usize, to: usize },

    /// Range end precedes its start
    #[error("inverted range {from}..{to}")]
    InvertedRange { from: usize, to: usize },
}

impl DocumentError {
    /// Check if this error is about a position the caller supplied.
    pub fn is_position_error(&self) -> bool {
        matches!(
            self,
            DocumentError::InvalidPosition { .. } | DocumentError::NoNodeAt { .. }
        )
    }
}

/// Errors raised by strict markup parsing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("tag mismatch: <{open}> closed with </{close}>")]
    MismatchedTag { open: String, close: String },

    #[error("unexpected end tag </{0}> without matching start tag")]
    UnexpectedEndTag(String),

    #[error("unclosed tag <{0}>")]
    UnclosedTag(String),

    #[error("unterminated markup at byte {0}")]
    Unterminated(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_display() {
        let err = DocumentError::InvalidPosition { pos: 9, size: 4 };
        assert_eq!(err.to_string(), "position 9 is outside the document (content size 4)");
        assert!(err.is_position_error());
        assert!(!DocumentError::CrossesParent { from: 1, to: 5 }.is_position_error());
    }

    #[test]
    fn test_markup_error_display() {
        let err = MarkupError::MismatchedTag {
            open: "p".to_string(),
            close: "div".to_string(),
        };
        assert_eq!(err.to_string(), "tag mismatch: <p> closed with </div>");
    }
}
