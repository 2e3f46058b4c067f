//! Entity Index State Machine
//!
//! `Uninitialized -> Ready`. The index is a value: each transition takes the
//! previous index and a transaction and returns the next index, handing back
//! the previous collections by reference whenever their content is unchanged.
//! Consumers detect "nothing changed" with `Arc::ptr_eq`.

use std::sync::Arc;

use super::fingerprint::{fingerprint, Fingerprint};
use super::reducer::unique_entities;
use super::scanner::scan_occurrences;
use super::types::{Entity, Occurrence};
use crate::dom::DocumentAccess;
use crate::transform::Transaction;

/// The derived index: every marker occurrence and the unique entities
#[derive(Debug, Clone)]
pub struct EntityIndex {
    occurrences: Arc<[Occurrence]>,
    occurrences_fingerprint: Fingerprint,
    unique: Arc<[Entity]>,
    unique_fingerprint: Fingerprint,
}

impl EntityIndex {
    /// Full scan and reduction
    pub fn build<D: DocumentAccess + ?Sized>(doc: &D, node_type: &str) -> Self {
        let occurrences = scan_occurrences(doc, node_type);
        let unique = unique_entities(&occurrences);
        EntityIndex {
            occurrences_fingerprint: fingerprint(&occurrences),
            occurrences: occurrences.into(),
            unique_fingerprint: fingerprint(&unique),
            unique: unique.into(),
        }
    }

    /// Rescan `doc` and keep whatever collections are unchanged
    pub fn refresh<D: DocumentAccess + ?Sized>(&self, doc: &D, node_type: &str) -> Self {
        let occurrences = scan_occurrences(doc, node_type);
        let occurrences_fingerprint = fingerprint(&occurrences);
        if occurrences_fingerprint == self.occurrences_fingerprint {
            tracing::trace!(count = occurrences.len(), "occurrences unchanged, index reused");
            return self.clone();
        }

        let unique = unique_entities(&occurrences);
        let unique_fingerprint = fingerprint(&unique);
        let unique = if unique_fingerprint == self.unique_fingerprint {
            tracing::trace!(count = unique.len(), "unique entities unchanged, reused");
            Arc::clone(&self.unique)
        } else {
            tracing::debug!(
                occurrences = occurrences.len(),
                unique = unique.len(),
                fingerprint = %unique_fingerprint,
                "unique entities rebuilt"
            );
            unique.into()
        };

        EntityIndex {
            occurrences: occurrences.into(),
            occurrences_fingerprint,
            unique,
            unique_fingerprint,
        }
    }

    /// All occurrences in document order
    pub fn occurrences(&self) -> &Arc<[Occurrence]> {
        &self.occurrences
    }

    /// Unique entities in first-seen order
    pub fn unique_entities(&self) -> &Arc<[Entity]> {
        &self.unique
    }

    /// Do both indexes share the same collections?
    pub fn ptr_eq(&self, other: &EntityIndex) -> bool {
        Arc::ptr_eq(&self.occurrences, &other.occurrences) && Arc::ptr_eq(&self.unique, &other.unique)
    }
}

/// Lifecycle of the index
#[derive(Debug, Clone, Default)]
pub enum EntityIndexState {
    #[default]
    Uninitialized,
    Ready(EntityIndex),
}

impl EntityIndexState {
    /// Initialize trigger
    pub fn initialize<D: DocumentAccess + ?Sized>(doc: &D, node_type: &str) -> Self {
        let index = EntityIndex::build(doc, node_type);
        tracing::debug!(
            occurrences = index.occurrences.len(),
            unique = index.unique.len(),
            "entity index initialized"
        );
        EntityIndexState::Ready(index)
    }

    /// Apply trigger. Selection-only transactions return the index untouched.
    /// Applying to an uninitialized index initializes it from the
    /// transaction's document.
    pub fn apply(&self, tr: &Transaction, node_type: &str) -> Self {
        match self {
            EntityIndexState::Uninitialized => Self::initialize(tr.doc().as_ref(), node_type),
            EntityIndexState::Ready(index) if !tr.doc_changed() => EntityIndexState::Ready(index.clone()),
            EntityIndexState::Ready(index) => EntityIndexState::Ready(index.refresh(tr.doc().as_ref(), node_type)),
        }
    }

    pub fn index(&self) -> Option<&EntityIndex> {
        match self {
            EntityIndexState::Ready(index) => Some(index),
            EntityIndexState::Uninitialized => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, EntityIndexState::Ready(_))
    }
}

/// Pure transition function over the previous state
pub fn transition(old: &EntityIndexState, tr: &Transaction, node_type: &str) -> EntityIndexState {
    old.apply(tr, node_type)
}
