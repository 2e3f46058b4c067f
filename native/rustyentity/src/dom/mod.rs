//! DOM Module - Arena-based editable document
//!
//! Implements the host document tree using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for tags, attribute names/values and text
//! - A schema that decides which markup elements become atoms

pub mod document;
pub mod node;
pub mod schema;
pub mod strings;

pub use document::{Document, ResolvedPos, ROOT};
pub use node::{Attr, Node, NodeId, NodeKind};
pub use schema::{AtomSpec, AttrSpec, Schema};
pub use strings::StringPool;

/// Read-only document access - lets the entity scanner walk any tree that can
/// report node types, attributes and positions
pub trait DocumentAccess {
    /// Get a node by ID
    fn get_node(&self, id: NodeId) -> Option<&Node>;

    /// Node type name: tag for elements, type for atoms
    fn node_type_name(&self, id: NodeId) -> Option<&str>;

    /// Get attribute value by name
    fn attribute(&self, id: NodeId, name: &str) -> Option<&str>;

    /// Visit every node with its start position in document order.
    /// Returning false skips the node's children.
    fn walk(&self, f: &mut dyn FnMut(NodeId, &Node, usize) -> bool);
}
