//! Document - Arena-based editable tree
//!
//! Efficient tree storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for tags, attributes and text
//! - ProseMirror-style integer positions
//!
//! Position model: content starts at 0; entering or leaving an element costs
//! 1, a text node costs its length in chars, an atom costs 1. Detached nodes
//! and superseded strings stay in the arenas until `compact` rebuilds them.

use super::node::{Attr, Node, NodeId, NodeKind};
use super::schema::Schema;
use super::strings::StringPool;
use crate::error::{DocumentError, MarkupError};
use crate::markup::{Attribute, MarkupEvent, MarkupReader, MarkupWriter};

/// The document root is always the first node in the arena
pub const ROOT: NodeId = 0;

/// An editable document stored in arena format
#[derive(Debug, Clone)]
pub struct Document {
    /// Arena of nodes
    nodes: Vec<Node>,
    /// Arena of attributes
    attributes: Vec<Attr>,
    /// Interned strings
    strings: StringPool,
}

/// How a validated range is removed
enum RangeCut {
    /// Both ends share a parent
    Flat { start: ResolvedPos, end: ResolvedPos },
    /// Ends in different blocks, joined level by level
    Join {
        start: ResolvedPos,
        end: ResolvedPos,
        start_chain: Vec<NodeId>,
        end_chain: Vec<NodeId>,
    },
}

/// A position resolved against the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPos {
    /// The position that was resolved
    pub pos: usize,
    /// Container whose content holds the position
    pub parent: NodeId,
    /// Index of the child the position falls before (or inside, for text)
    pub index: usize,
    /// Char offset into the text child at `index`; 0 when on a boundary
    pub text_offset: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(Node::document());
        Document {
            nodes,
            attributes: Vec::with_capacity(32),
            strings: StringPool::new(),
        }
    }

    /// Parse a document from markup (lenient mode, never fails)
    pub fn parse(markup: &str, schema: &Schema) -> Self {
        let mut doc = Document::new();
        // Lenient mode only reports errors it has already recovered from
        let _ = doc.build_from_events(markup, schema, false);
        doc
    }

    /// Parse a document from markup in strict mode
    /// Returns Err on mismatched, unclosed or unterminated tags
    pub fn parse_strict(markup: &str, schema: &Schema) -> Result<Self, MarkupError> {
        let mut doc = Document::new();
        doc.build_from_events(markup, schema, true)?;
        Ok(doc)
    }

    fn build_from_events(&mut self, markup: &str, schema: &Schema, strict: bool) -> Result<(), MarkupError> {
        let mut reader = MarkupReader::new(markup);
        let mut stack: Vec<(NodeId, &str)> = Vec::new();
        // Depth inside an atom's markup; its content is not part of the tree
        let mut skip_depth = 0usize;

        while let Some(event) = reader.next_event() {
            if skip_depth > 0 {
                match event {
                    MarkupEvent::StartElement { .. } => skip_depth += 1,
                    MarkupEvent::EndElement { .. } => skip_depth -= 1,
                    _ => {}
                }
                continue;
            }

            let parent = stack.last().map_or(ROOT, |&(id, _)| id);

            match event {
                MarkupEvent::StartElement { name, attributes } => {
                    if self.push_atom(parent, name, &attributes, schema) {
                        skip_depth = 1;
                    } else {
                        let id = self.push_element(parent, name, &attributes);
                        stack.push((id, name));
                    }
                }

                MarkupEvent::EmptyElement { name, attributes } => {
                    if !self.push_atom(parent, name, &attributes, schema) {
                        self.push_element(parent, name, &attributes);
                    }
                }

                MarkupEvent::EndElement { name } => match stack.pop() {
                    Some((_, open)) if open == name => {}
                    Some((_, open)) => {
                        if strict {
                            return Err(MarkupError::MismatchedTag {
                                open: open.to_string(),
                                close: name.to_string(),
                            });
                        }
                    }
                    None => {
                        if strict {
                            return Err(MarkupError::UnexpectedEndTag(name.to_string()));
                        }
                    }
                },

                MarkupEvent::Text(text) => {
                    // Whitespace between top-level blocks is formatting, not content
                    if parent == ROOT && text.trim().is_empty() {
                        continue;
                    }
                    let id = self.alloc_text(&text, parent);
                    self.append_child(parent, id);
                    self.normalize_text(parent);
                }
            }
        }

        if strict {
            if let Some(offset) = reader.unterminated() {
                return Err(MarkupError::Unterminated(offset));
            }
            if let Some(&(_, open)) = stack.last() {
                return Err(MarkupError::UnclosedTag(open.to_string()));
            }
        }

        Ok(())
    }

    /// Add an atom if the schema claims the element. Returns whether it did.
    fn push_atom(&mut self, parent: NodeId, tag: &str, attributes: &[Attribute<'_>], schema: &Schema) -> bool {
        let Some((spec, attrs)) = schema.parse_atom(tag, attributes) else {
            return false;
        };
        let type_id = self.strings.intern(&spec.name);
        let id = self.alloc(Node::atom(type_id, Some(parent)));
        self.store_attributes(id, attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        self.append_child(parent, id);
        true
    }

    fn push_element(&mut self, parent: NodeId, tag: &str, attributes: &[Attribute<'_>]) -> NodeId {
        let name_id = self.strings.intern(tag);
        let id = self.alloc(Node::element(name_id, Some(parent)));
        self.store_attributes(id, attributes.iter().map(|a| (a.name, a.value.as_ref())));
        self.append_child(parent, id);
        id
    }

    // =========================================================================
    // Arena primitives
    // =========================================================================

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    fn alloc_text(&mut self, text: &str, parent: NodeId) -> NodeId {
        let text_id = self.strings.intern(text);
        let char_len = text.chars().count() as u32;
        self.alloc(Node::text(text_id, char_len, Some(parent)))
    }

    /// Replace a node's attribute list. Old entries stay in the arena.
    fn store_attributes<'s, I>(&mut self, id: NodeId, attrs: I)
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let start = self.attributes.len() as u32;
        for (name, value) in attrs {
            let name_id = self.strings.intern(name);
            let value_id = self.strings.intern(value);
            self.attributes.push(Attr::new(name_id, value_id));
        }
        let node = &mut self.nodes[id as usize];
        node.attr_start = start;
        node.attr_count = self.attributes.len() as u32 - start;
    }

    /// Link a child node as the last child of its parent
    fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        self.insert_before(parent_id, None, child_id);
    }

    /// Link a child node before `before`, or at the end when `before` is None
    fn insert_before(&mut self, parent_id: NodeId, before: Option<NodeId>, child_id: NodeId) {
        let prev = match before {
            Some(next_id) => self.nodes[next_id as usize].prev_sibling,
            None => self.nodes[parent_id as usize].last_child,
        };

        {
            let child = &mut self.nodes[child_id as usize];
            child.parent = Some(parent_id);
            child.prev_sibling = prev;
            child.next_sibling = before;
        }

        match prev {
            Some(prev_id) => self.nodes[prev_id as usize].next_sibling = Some(child_id),
            None => self.nodes[parent_id as usize].first_child = Some(child_id),
        }
        match before {
            Some(next_id) => self.nodes[next_id as usize].prev_sibling = Some(child_id),
            None => self.nodes[parent_id as usize].last_child = Some(child_id),
        }
    }

    /// Detach a node from its parent and siblings
    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id as usize];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        let Some(parent_id) = parent else {
            return;
        };

        match prev {
            Some(prev_id) => self.nodes[prev_id as usize].next_sibling = next,
            None => self.nodes[parent_id as usize].first_child = next,
        }
        match next {
            Some(next_id) => self.nodes[next_id as usize].prev_sibling = prev,
            None => self.nodes[parent_id as usize].last_child = prev,
        }

        let node = &mut self.nodes[id as usize];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Merge adjacent text siblings and drop empty text nodes
    fn normalize_text(&mut self, parent_id: NodeId) {
        let mut current = self.nodes[parent_id as usize].first_child;
        while let Some(id) = current {
            let node = &self.nodes[id as usize];
            let next = node.next_sibling;

            if node.is_text() && node.char_len == 0 {
                self.unlink(id);
                current = next;
                continue;
            }

            match next {
                Some(next_id) if node.is_text() && self.nodes[next_id as usize].is_text() => {
                    let mut merged = self.text_content(id).unwrap_or("").to_string();
                    merged.push_str(self.text_content(next_id).unwrap_or(""));
                    self.set_text(id, &merged);
                    self.unlink(next_id);
                    // Stay on `id`: it may merge with the following sibling too
                }
                _ => current = next,
            }
        }
    }

    fn set_text(&mut self, id: NodeId, text: &str) {
        let text_id = self.strings.intern(text);
        let node = &mut self.nodes[id as usize];
        node.name_id = text_id;
        node.char_len = text.chars().count() as u32;
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).nth(index)
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Node type name: tag for elements, type for atoms
    pub fn node_type_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::Atom => self.strings.get(node.name_id),
            NodeKind::Text | NodeKind::Document => None,
        }
    }

    /// Get text content of a text node
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_text() {
            self.strings.get(node.name_id)
        } else {
            None
        }
    }

    /// Get all attribute names and values for a node, in stored order
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        let Some(node) = self.get_node(id) else {
            return Vec::new();
        };
        let start = node.attr_start as usize;
        let end = start + node.attr_count as usize;
        self.attributes
            .get(start..end)
            .unwrap_or(&[])
            .iter()
            .filter_map(|attr| Some((self.strings.get(attr.name_id)?, self.strings.get(attr.value_id)?)))
            .collect()
    }

    /// Get attribute value by name
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id).into_iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Size of a node in positions
    pub fn node_size(&self, id: NodeId) -> usize {
        let Some(node) = self.get_node(id) else {
            return 0;
        };
        match node.kind {
            NodeKind::Text => node.char_len as usize,
            NodeKind::Atom => 1,
            NodeKind::Element => 2 + self.content_size(id),
            NodeKind::Document => self.content_size(id),
        }
    }

    /// Size of a node's content (excluding its own boundaries)
    pub fn content_size(&self, id: NodeId) -> usize {
        self.children(id).map(|child| self.node_size(child)).sum()
    }

    /// Size of the whole document content; valid positions are `0..=size`
    pub fn size(&self) -> usize {
        self.content_size(ROOT)
    }

    /// Iterate over all nodes with their start positions, in document order
    pub fn descendants(&self) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        self.push_children(ROOT, 0, &mut stack);
        DescendantIter { doc: self, stack }
    }

    /// Walk all nodes in document order. Returning false from `f` skips the
    /// node's children; the walk itself always continues.
    pub fn descendants_with<F>(&self, mut f: F)
    where
        F: FnMut(NodeId, &Node, usize) -> bool,
    {
        let mut stack = Vec::new();
        self.push_children(ROOT, 0, &mut stack);

        while let Some((id, pos)) = stack.pop() {
            let Some(node) = self.get_node(id) else {
                continue;
            };
            if f(id, node, pos) && node.is_element() {
                self.push_children(id, pos + 1, &mut stack);
            }
        }
    }

    /// Push children with their positions in reverse order (so first pops first)
    fn push_children(&self, parent: NodeId, content_start: usize, stack: &mut Vec<(NodeId, usize)>) {
        let mark = stack.len();
        let mut pos = content_start;
        for child in self.children(parent) {
            stack.push((child, pos));
            pos += self.node_size(child);
        }
        stack[mark..].reverse();
    }

    /// The node starting exactly at `pos` (the outermost one, if several)
    pub fn node_at(&self, pos: usize) -> Option<NodeId> {
        self.descendants().find(|&(_, start)| start == pos).map(|(id, _)| id)
    }

    /// Resolve a position to its parent container and child index
    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos, DocumentError> {
        let size = self.size();
        if pos > size {
            return Err(DocumentError::InvalidPosition { pos, size });
        }

        let mut parent = ROOT;
        let mut content_start = 0;

        'descend: loop {
            let mut offset = content_start;
            for (index, child) in self.children(parent).enumerate() {
                if pos == offset {
                    return Ok(ResolvedPos { pos, parent, index, text_offset: 0 });
                }

                let end = offset + self.node_size(child);
                if pos < end {
                    match self.nodes[child as usize].kind {
                        NodeKind::Text => {
                            return Ok(ResolvedPos {
                                pos,
                                parent,
                                index,
                                text_offset: pos - offset,
                            });
                        }
                        NodeKind::Element => {
                            parent = child;
                            content_start = offset + 1;
                            continue 'descend;
                        }
                        NodeKind::Atom | NodeKind::Document => {}
                    }
                }
                offset = end;
            }

            let index = self.children(parent).count();
            return Ok(ResolvedPos { pos, parent, index, text_offset: 0 });
        }
    }

    /// First position inside the first text block, or 0 for documents that
    /// start with inline content (or are empty)
    pub fn first_inner_position(&self) -> usize {
        let mut pos = 0;
        let mut current = self.get_node(ROOT).and_then(|n| n.first_child);
        while let Some(id) = current {
            let node = &self.nodes[id as usize];
            if !node.is_element() {
                break;
            }
            pos += 1;
            current = node.first_child;
        }
        pos
    }

    // =========================================================================
    // Structural mutation (validated before anything is touched)
    // =========================================================================

    /// Split a text child so that `index`/`text_offset` becomes a boundary.
    /// Returns the child index the boundary sits before.
    fn split_text(&mut self, parent: NodeId, index: usize, text_offset: usize) -> usize {
        if text_offset == 0 {
            return index;
        }
        let Some(child) = self.child_at(parent, index) else {
            return index;
        };
        let content = self.text_content(child).unwrap_or("").to_string();
        let byte_offset = content
            .char_indices()
            .nth(text_offset)
            .map_or(content.len(), |(i, _)| i);
        let (left, right) = content.split_at(byte_offset);

        self.set_text(child, left);
        let right_id = self.alloc_text(right, parent);
        let next = self.nodes[child as usize].next_sibling;
        self.insert_before(parent, next, right_id);
        index + 1
    }

    /// Rewrite the attributes of the node starting at `pos`.
    ///
    /// The node kind is not checked: any element or atom starting there is
    /// rewritten.
    pub fn set_node_attributes(&mut self, pos: usize, attrs: &[(String, String)]) -> Result<NodeId, DocumentError> {
        let id = self.node_at(pos).ok_or(DocumentError::NoNodeAt { pos })?;
        if self.nodes[id as usize].is_text() {
            return Err(DocumentError::TextNode { pos });
        }
        self.store_attributes(id, attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(id)
    }

    /// Insert an atom of `node_type` at `pos`, splitting text if needed
    pub fn insert_atom(&mut self, pos: usize, node_type: &str, attrs: &[(String, String)]) -> Result<NodeId, DocumentError> {
        let resolved = self.resolve(pos)?;
        let index = self.split_text(resolved.parent, resolved.index, resolved.text_offset);

        let type_id = self.strings.intern(node_type);
        let id = self.alloc(Node::atom(type_id, Some(resolved.parent)));
        self.store_attributes(id, attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let before = self.child_at(resolved.parent, index);
        self.insert_before(resolved.parent, before, id);
        Ok(id)
    }

    /// Insert text at `pos`
    pub fn insert_text(&mut self, pos: usize, text: &str) -> Result<(), DocumentError> {
        let resolved = self.resolve(pos)?;
        if text.is_empty() {
            return Ok(());
        }
        let index = self.split_text(resolved.parent, resolved.index, resolved.text_offset);

        let id = self.alloc_text(text, resolved.parent);
        let before = self.child_at(resolved.parent, index);
        self.insert_before(resolved.parent, before, id);
        self.normalize_text(resolved.parent);
        Ok(())
    }

    /// Ancestors of `id`, starting with `id` itself and ending at the root
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        std::iter::successors(Some(id), |&n| self.nodes[n as usize].parent).collect()
    }

    fn following_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id as usize].next_sibling, move |&n| {
            self.nodes[n as usize].next_sibling
        })
    }

    fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id as usize].prev_sibling, move |&n| {
            self.nodes[n as usize].prev_sibling
        })
    }

    /// Check that `from..to` can be deleted and work out how.
    ///
    /// Ends under one parent are cut flat. Ends in different blocks are
    /// joined when both blocks sit at the same depth below their closest
    /// common ancestor.
    fn check_range(&self, from: usize, to: usize) -> Result<RangeCut, DocumentError> {
        if from > to {
            return Err(DocumentError::InvertedRange { from, to });
        }
        let start = self.resolve(from)?;
        let end = self.resolve(to)?;
        if start.parent == end.parent {
            return Ok(RangeCut::Flat { start, end });
        }

        let start_line = self.ancestors(start.parent);
        let end_line = self.ancestors(end.parent);
        let depth = start_line
            .iter()
            .position(|id| end_line.contains(id))
            .filter(|&depth| depth > 0 && end_line.get(depth) == start_line.get(depth))
            .ok_or(DocumentError::CrossesParent { from, to })?;

        Ok(RangeCut::Join {
            start,
            end,
            start_chain: start_line[..depth].to_vec(),
            end_chain: end_line[..depth].to_vec(),
        })
    }

    /// Delete the content in `from..to`.
    ///
    /// A range spanning blocks keeps the start block's content before `from`,
    /// drops every block in between and appends the end block's content
    /// after `to` to the start block.
    pub fn delete(&mut self, from: usize, to: usize) -> Result<(), DocumentError> {
        match self.check_range(from, to)? {
            RangeCut::Flat { start, end } => self.cut_flat(start, end),
            RangeCut::Join {
                start,
                end,
                start_chain,
                end_chain,
            } => self.cut_joined(start, end, &start_chain, &end_chain),
        }
        Ok(())
    }

    fn cut_flat(&mut self, start: ResolvedPos, end: ResolvedPos) {
        if start.pos == end.pos {
            return;
        }
        let parent = start.parent;

        // Split the end first so the start's child index stays valid
        let end_index = self.split_text(parent, end.index, end.text_offset);
        let start_index = self.split_text(parent, start.index, start.text_offset);
        let end_index = end_index + (start_index - start.index);

        let doomed: Vec<NodeId> = self
            .children(parent)
            .skip(start_index)
            .take(end_index - start_index)
            .collect();
        for id in doomed {
            self.unlink(id);
        }
        self.normalize_text(parent);
    }

    /// Chains run from each end's parent up to the child of the common
    /// ancestor and have equal length
    fn cut_joined(&mut self, start: ResolvedPos, end: ResolvedPos, start_chain: &[NodeId], end_chain: &[NodeId]) {
        let end_index = self.split_text(end.parent, end.index, end.text_offset);
        let start_index = self.split_text(start.parent, start.index, start.text_offset);

        let mut doomed: Vec<NodeId> = self.children(start.parent).skip(start_index).collect();
        doomed.extend(self.children(end.parent).take(end_index));
        for level in 1..start_chain.len() {
            doomed.extend(self.following_siblings(start_chain[level - 1]));
            doomed.extend(self.preceding_siblings(end_chain[level - 1]));
        }
        if let (Some(&top_start), Some(&top_end)) = (start_chain.last(), end_chain.last()) {
            doomed.extend(self.following_siblings(top_start).take_while(|&id| id != top_end));
        }
        for id in doomed {
            self.unlink(id);
        }

        for (&keep, &merge) in start_chain.iter().zip(end_chain) {
            let moved: Vec<NodeId> = self.children(merge).collect();
            for id in moved {
                self.unlink(id);
                self.append_child(keep, id);
            }
            self.unlink(merge);
        }
        self.normalize_text(start.parent);
    }

    /// Replace `from..to` with a single atom
    pub fn replace_with(
        &mut self,
        from: usize,
        to: usize,
        node_type: &str,
        attrs: &[(String, String)],
    ) -> Result<NodeId, DocumentError> {
        self.delete(from, to)?;
        self.insert_atom(from, node_type, attrs)
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize the document back to markup
    /// Uses an explicit stack to avoid recursion on deep documents
    pub fn to_markup(&self, schema: &Schema) -> String {
        enum StackEntry {
            Enter(NodeId),
            Close(NodeId),
        }

        let mut writer = MarkupWriter::with_capacity(self.strings.bytes_used() + 64);
        let mut stack: Vec<StackEntry> = self.children(ROOT).map(StackEntry::Enter).collect();
        stack.reverse();

        while let Some(entry) = stack.pop() {
            match entry {
                StackEntry::Close(id) => {
                    writer.end_element(self.node_type_name(id).unwrap_or(""));
                }
                StackEntry::Enter(id) => {
                    let Some(node) = self.get_node(id) else {
                        continue;
                    };
                    let name = self.node_type_name(id).unwrap_or("");
                    let attrs = self.attributes(id);

                    match node.kind {
                        NodeKind::Element => {
                            writer.start_element(name, &attrs);
                            stack.push(StackEntry::Close(id));
                            let mark = stack.len();
                            stack.extend(self.children(id).map(StackEntry::Enter));
                            stack[mark..].reverse();
                        }
                        NodeKind::Atom => match schema.atom(name) {
                            Some(spec) => writer.leaf_element(&spec.tag, &spec.markup_attributes(&attrs)),
                            None => writer.leaf_element(name, &attrs),
                        },
                        NodeKind::Text => writer.text(self.text_content(id).unwrap_or("")),
                        NodeKind::Document => {}
                    }
                }
            }
        }

        writer.finish()
    }

    // =========================================================================
    // Compaction
    // =========================================================================

    /// Number of arena slots in use, including detached nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bytes held by the string pool, including superseded text
    pub fn string_bytes(&self) -> usize {
        self.strings.bytes_used()
    }

    /// Count what is reachable from the root
    fn live_usage(&self) -> LiveUsage {
        let mut usage = LiveUsage {
            nodes: 1,
            attributes: 0,
            bytes: 0,
        };
        for (id, _) in self.descendants() {
            let node = &self.nodes[id as usize];
            usage.nodes += 1;
            usage.attributes += node.attr_count as usize;
            usage.bytes += self.strings.get(node.name_id).map_or(0, str::len);
            usage.bytes += self
                .attributes(id)
                .iter()
                .map(|(name, value)| name.len() + value.len())
                .sum::<usize>();
        }
        usage
    }

    /// True once detached nodes, stale attributes or superseded strings
    /// outweigh the live tree
    pub fn needs_compaction(&self) -> bool {
        let live = self.live_usage();
        self.nodes.len() > 2 * live.nodes
            || self.attributes.len() > 2 * live.attributes + COMPACT_ATTRIBUTE_SLACK
            || self.strings.bytes_used() > 2 * live.bytes + COMPACT_BYTE_SLACK
    }

    /// Rebuild the arenas from the live tree. Positions are unchanged;
    /// node ids are not.
    pub fn compact(&mut self) {
        let mut out = Document::new();
        let mut stack: Vec<(NodeId, NodeId)> = self.children(ROOT).map(|child| (child, ROOT)).collect();
        stack.reverse();

        while let Some((old_id, parent)) = stack.pop() {
            let node = &self.nodes[old_id as usize];
            let name_id = out.strings.intern(self.strings.get(node.name_id).unwrap_or(""));
            let copy = match node.kind {
                NodeKind::Element => Node::element(name_id, Some(parent)),
                NodeKind::Atom => Node::atom(name_id, Some(parent)),
                NodeKind::Text => Node::text(name_id, node.char_len, Some(parent)),
                NodeKind::Document => continue,
            };
            let id = out.alloc(copy);
            out.store_attributes(id, self.attributes(old_id));
            out.append_child(parent, id);

            let mark = stack.len();
            stack.extend(self.children(old_id).map(|child| (child, id)));
            stack[mark..].reverse();
        }

        tracing::debug!(
            before = self.nodes.len(),
            after = out.nodes.len(),
            bytes_before = self.strings.bytes_used(),
            bytes_after = out.strings.bytes_used(),
            "document compacted"
        );
        *self = out;
    }
}

/// Attribute and byte allowances before stale entries trigger compaction
const COMPACT_ATTRIBUTE_SLACK: usize = 64;
const COMPACT_BYTE_SLACK: usize = 1024;

struct LiveUsage {
    nodes: usize,
    attributes: usize,
    bytes: usize,
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d Document,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over all nodes with start positions (depth-first, document order)
pub struct DescendantIter<'d> {
    doc: &'d Document,
    stack: Vec<(NodeId, usize)>,
}

impl<'d> Iterator for DescendantIter<'d> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (current, pos) = self.stack.pop()?;
        if self.doc.get_node(current).is_some_and(|n| n.is_element()) {
            self.doc.push_children(current, pos + 1, &mut self.stack);
        }
        Some((current, pos))
    }
}

// =============================================================================
// DocumentAccess trait implementation
// =============================================================================

use super::DocumentAccess;

impl DocumentAccess for Document {
    fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    fn node_type_name(&self, id: NodeId) -> Option<&str> {
        Document::node_type_name(self, id)
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        Document::attribute(self, id, name)
    }

    fn walk(&self, f: &mut dyn FnMut(NodeId, &Node, usize) -> bool) {
        self.descendants_with(f)
    }
}
