//! Document Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of document node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Container element (paragraphs, headings, inline wrappers)
    Element,
    /// Atomic leaf whose content is not editable (entity markers)
    Atom,
    /// Text content
    Text,
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the root and for detached nodes)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Index into string pool: tag for elements, node type for atoms,
    /// content for text nodes
    pub name_id: u32,
    /// Length of text content in chars (text nodes only)
    pub char_len: u32,
    /// Start of attributes in attribute arena
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u32,
}

impl Node {
    fn with_kind(kind: NodeKind, name_id: u32, parent: Option<NodeId>) -> Self {
        Node {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            char_len: 0,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Node::with_kind(NodeKind::Document, 0, None)
    }

    /// Create a new container element
    pub fn element(name_id: u32, parent: Option<NodeId>) -> Self {
        Node::with_kind(NodeKind::Element, name_id, parent)
    }

    /// Create a new atomic leaf of the given node type
    pub fn atom(type_id: u32, parent: Option<NodeId>) -> Self {
        Node::with_kind(NodeKind::Atom, type_id, parent)
    }

    /// Create a new text node
    pub fn text(text_id: u32, char_len: u32, parent: Option<NodeId>) -> Self {
        let mut node = Node::with_kind(NodeKind::Text, text_id, parent);
        node.char_len = char_len;
        node
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    #[inline]
    pub fn is_atom(&self) -> bool {
        self.kind == NodeKind::Atom
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Leaves never have children: atoms and text
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Atom | NodeKind::Text)
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy)]
pub struct Attr {
    /// Index into string pool for attribute name
    pub name_id: u32,
    /// Index into string pool for attribute value
    pub value_id: u32,
}

impl Attr {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        Attr { name_id, value_id }
    }
}
