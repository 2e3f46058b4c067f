//! Entity commands
//!
//! Every command stages its edits in one transaction and hands it to
//! `dispatch`. Without a dispatcher a command is a capability probe and does
//! nothing. Commands always report `true`: an unmatched id and a rejected
//! host edit are both silent no-ops.

use super::extension::EntityExtension;
use super::types::Entity;
use crate::editor::EditorState;
use crate::error::DocumentError;
use crate::transform::{Selection, Transaction};

/// Receives the transaction a command built
pub type Dispatch<'a> = Option<&'a mut dyn FnMut(Transaction)>;

impl EntityExtension {
    /// Replace the selection with a new marker for `entity`
    pub fn create_entity(&self, entity: &Entity, state: &EditorState, dispatch: Dispatch<'_>) -> bool {
        let Some(dispatch) = dispatch else {
            return true;
        };

        let mut tr = state.tr();
        let staged = match tr.replace_selection_with(self.node_name(), entity.to_attributes()).map(|_| ()) {
            // The range cannot be joined: keep it and insert at its start
            Err(DocumentError::CrossesParent { from, .. }) => {
                tracing::debug!(from, id = %entity.id, "create_entity: selection collapsed to its start");
                tr.set_selection(Selection::cursor(from));
                tr.replace_selection_with(self.node_name(), entity.to_attributes()).map(|_| ())
            }
            other => other,
        };
        if let Err(err) = staged {
            tracing::warn!(%err, id = %entity.id, "create_entity: edit rejected, nothing dispatched");
            return true;
        }

        tracing::debug!(id = %entity.id, pos = tr.selection().head - 1, "create_entity");
        dispatch(tr);
        true
    }

    /// Rewrite every marker whose id is `id` to `entity`, in one transaction.
    /// Matches are found by scanning the current document, not the index.
    pub fn update_entity_by_id(&self, id: &str, entity: &Entity, state: &EditorState, dispatch: Dispatch<'_>) -> bool {
        let Some(dispatch) = dispatch else {
            return true;
        };

        let positions: Vec<usize> = self
            .scan(state.doc().as_ref())
            .into_iter()
            .filter(|occurrence| occurrence.id() == id)
            .map(|occurrence| occurrence.pos)
            .collect();

        if positions.is_empty() {
            tracing::debug!(id, "update_entity_by_id: no markers with this id");
            return true;
        }

        let mut tr = state.tr();
        for &pos in &positions {
            if let Err(err) = tr.set_node_markup(pos, entity.to_attributes()) {
                tracing::warn!(%err, id, pos, "update_entity_by_id: edit rejected, nothing dispatched");
                return true;
            }
        }

        tracing::debug!(id, count = positions.len(), "update_entity_by_id");
        dispatch(tr);
        true
    }

    /// Rewrite the node at `pos` to `entity`.
    ///
    /// The node type at `pos` is not checked: whatever element or atom
    /// starts there gets the entity attributes.
    pub fn update_entity_in_position(
        &self,
        pos: usize,
        entity: &Entity,
        state: &EditorState,
        dispatch: Dispatch<'_>,
    ) -> bool {
        let Some(dispatch) = dispatch else {
            return true;
        };

        let mut tr = state.tr();
        if let Err(err) = tr.set_node_markup(pos, entity.to_attributes()) {
            tracing::warn!(%err, pos, "update_entity_in_position: edit rejected, nothing dispatched");
            return true;
        }

        tracing::debug!(id = %entity.id, pos, "update_entity_in_position");
        dispatch(tr);
        true
    }
}
