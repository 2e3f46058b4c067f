//! Transactions
//!
//! A transaction stages steps against a working copy of the document. The
//! copy is shared with the originating state until the first step writes to
//! it, so a selection-only transaction never clones the tree.

use std::sync::Arc;

use super::selection::Selection;
use super::step::Step;
use crate::dom::Document;
use crate::error::DocumentError;

/// An atomic batch of document steps plus the resulting selection
#[derive(Debug, Clone)]
pub struct Transaction {
    doc: Arc<Document>,
    selection: Selection,
    steps: Vec<Step>,
}

impl Transaction {
    /// Start a transaction from a document and its current selection
    pub fn new(doc: Arc<Document>, selection: Selection) -> Self {
        Transaction {
            doc,
            selection,
            steps: Vec::new(),
        }
    }

    /// Apply a step to the working copy and record it.
    /// A failing step is not recorded and leaves the working copy as it was.
    /// The working copy is compacted once its dead arena share dominates.
    pub fn step(&mut self, step: Step) -> Result<&mut Self, DocumentError> {
        let doc = Arc::make_mut(&mut self.doc);
        let map = step.apply(doc)?;
        if doc.needs_compaction() {
            doc.compact();
        }
        self.selection = self.selection.map(&map).clamp(self.doc.size());
        tracing::trace!(?step, steps = self.steps.len() + 1, "step applied");
        self.steps.push(step);
        Ok(self)
    }

    /// Rewrite the attributes of the node at `pos`
    pub fn set_node_markup(&mut self, pos: usize, attrs: Vec<(String, String)>) -> Result<&mut Self, DocumentError> {
        self.step(Step::SetNodeAttributes { pos, attrs })
    }

    /// Replace the selection with a new atom and put the cursor after it
    pub fn replace_selection_with(
        &mut self,
        node_type: &str,
        attrs: Vec<(String, String)>,
    ) -> Result<&mut Self, DocumentError> {
        let (from, to) = (self.selection.from(), self.selection.to());
        self.step(Step::ReplaceWith {
            from,
            to,
            node_type: node_type.to_string(),
            attrs,
        })?;
        self.selection = Selection::cursor(from + 1);
        Ok(self)
    }

    pub fn insert_text(&mut self, pos: usize, text: &str) -> Result<&mut Self, DocumentError> {
        self.step(Step::InsertText {
            pos,
            text: text.to_string(),
        })
    }

    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, DocumentError> {
        self.step(Step::Delete { from, to })
    }

    /// Replace the selection (clamped to the document)
    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = selection.clamp(self.doc.size());
        self
    }

    /// Did any step change the document?
    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// The document after all recorded steps
    pub fn doc(&self) -> &Arc<Document> {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}
