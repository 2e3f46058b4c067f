//! Entity records
//!
//! Markers carry a loose attribute list in the tree. These types are the
//! fixed shape the index works with; conversion happens on read and write.

use crate::dom::{DocumentAccess, NodeId};

/// Node attribute holding the entity id
pub const ATTR_ID: &str = "id";
/// Node attribute holding the display name
pub const ATTR_NAME: &str = "name";

/// An external entity referenced from the document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    /// Stable external identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Entity {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Read an entity from a marker node. Markers without an id yield `None`;
    /// a missing name reads as empty.
    pub fn from_node<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Option<Self> {
        let id = doc.attribute(node, ATTR_ID)?;
        let name = doc.attribute(node, ATTR_NAME).unwrap_or("");
        Some(Entity::new(id, name))
    }

    /// Node attributes for writing this entity back to a marker
    pub fn to_attributes(&self) -> Vec<(String, String)> {
        vec![
            (ATTR_ID.to_string(), self.id.clone()),
            (ATTR_NAME.to_string(), self.name.clone()),
        ]
    }
}

/// One marker in the document and where it starts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Occurrence {
    pub entity: Entity,
    pub pos: usize,
}

impl Occurrence {
    pub fn new(entity: Entity, pos: usize) -> Self {
        Occurrence { entity, pos }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.entity.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.entity.name
    }
}
