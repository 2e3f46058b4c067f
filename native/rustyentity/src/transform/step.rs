//! Document Steps
//!
//! A step is one atomic edit. Applying it either mutates the document and
//! returns a map describing how positions moved, or fails without touching
//! the document.

use crate::dom::Document;
use crate::error::DocumentError;

/// An atomic document edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Replace the attributes of the node starting at `pos`
    SetNodeAttributes { pos: usize, attrs: Vec<(String, String)> },
    /// Replace `from..to` with a single atom
    ReplaceWith {
        from: usize,
        to: usize,
        node_type: String,
        attrs: Vec<(String, String)>,
    },
    /// Insert text at `pos`
    InsertText { pos: usize, text: String },
    /// Remove `from..to`
    Delete { from: usize, to: usize },
}

impl Step {
    /// Apply the step to `doc`
    pub fn apply(&self, doc: &mut Document) -> Result<StepMap, DocumentError> {
        match self {
            Step::SetNodeAttributes { pos, attrs } => {
                doc.set_node_attributes(*pos, attrs)?;
                Ok(StepMap::IDENTITY)
            }
            Step::ReplaceWith {
                from,
                to,
                node_type,
                attrs,
            } => {
                doc.replace_with(*from, *to, node_type, attrs)?;
                Ok(StepMap::new(*from, to - from, 1))
            }
            Step::InsertText { pos, text } => {
                doc.insert_text(*pos, text)?;
                Ok(StepMap::new(*pos, 0, text.chars().count()))
            }
            Step::Delete { from, to } => {
                doc.delete(*from, *to)?;
                Ok(StepMap::new(*from, to - from, 0))
            }
        }
    }
}

/// How a step moved positions: `old_size` positions at `pos` became `new_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMap {
    pub pos: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl StepMap {
    /// A step that moved nothing
    pub const IDENTITY: StepMap = StepMap {
        pos: 0,
        old_size: 0,
        new_size: 0,
    };

    pub fn new(pos: usize, old_size: usize, new_size: usize) -> Self {
        StepMap { pos, old_size, new_size }
    }

    /// Map a position through the step. Positions inside the replaced range
    /// (and at an insertion point) end up after the new content.
    pub fn map(&self, p: usize) -> usize {
        if p < self.pos {
            p
        } else if p >= self.pos + self.old_size {
            p - self.old_size + self.new_size
        } else {
            self.pos + self.new_size
        }
    }
}
