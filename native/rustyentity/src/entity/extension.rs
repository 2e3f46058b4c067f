//! Entity extension - options, node spec and index plugin hooks.
//!
//! The extension is constructed explicitly and handed to the editor; it owns
//! nothing mutable. The index it maintains lives in `EditorState`.

use super::scanner::scan_occurrences;
use super::state::EntityIndexState;
use super::types::{Entity, Occurrence, ATTR_ID, ATTR_NAME};
use crate::dom::{AtomSpec, AttrSpec, Document, DocumentAccess, Schema};
use crate::markup::MarkupWriter;
use crate::transform::Transaction;

/// Default markup attribute carrying the entity id
pub const DATA_ATTRIBUTE_ID: &str = "s-id";
/// Default markup attribute carrying the entity name
pub const DATA_ATTRIBUTE_NAME: &str = "s-name";

/// Entity extension configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOptions {
    /// Node type name of markers
    pub node_name: String,
    /// Markup tag markers are written as
    pub tag: String,
    /// Markup attribute holding the id
    pub id_attribute: String,
    /// Markup attribute holding the name
    pub name_attribute: String,
}

impl Default for EntityOptions {
    fn default() -> Self {
        EntityOptions {
            node_name: "entity".to_string(),
            tag: "span".to_string(),
            id_attribute: DATA_ATTRIBUTE_ID.to_string(),
            name_attribute: DATA_ATTRIBUTE_NAME.to_string(),
        }
    }
}

impl EntityOptions {
    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = node_name.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_id_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.id_attribute = attribute.into();
        self
    }

    pub fn with_name_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.name_attribute = attribute.into();
        self
    }
}

/// The entity extension
#[derive(Debug, Clone, Default)]
pub struct EntityExtension {
    options: EntityOptions,
}

impl EntityExtension {
    pub fn new(options: EntityOptions) -> Self {
        EntityExtension { options }
    }

    pub fn options(&self) -> &EntityOptions {
        &self.options
    }

    pub fn node_name(&self) -> &str {
        &self.options.node_name
    }

    /// Inline, selectable, draggable atom with no marks. `id` has no default,
    /// `name` defaults to empty.
    pub fn node_spec(&self) -> AtomSpec {
        AtomSpec {
            name: self.options.node_name.clone(),
            tag: self.options.tag.clone(),
            marker_attribute: self.options.id_attribute.clone(),
            attrs: vec![
                AttrSpec::new(ATTR_ID, self.options.id_attribute.as_str()),
                AttrSpec::new(ATTR_NAME, self.options.name_attribute.as_str()).with_default(""),
            ],
            inline: true,
            selectable: true,
            draggable: true,
            marks: String::new(),
        }
    }

    /// A schema recognizing this extension's markers
    pub fn schema(&self) -> Schema {
        Schema::new().with_atom(self.node_spec())
    }

    /// Scan a document for this extension's markers
    pub fn scan<D: DocumentAccess + ?Sized>(&self, doc: &D) -> Vec<Occurrence> {
        scan_occurrences(doc, self.node_name())
    }

    /// Plugin state init
    pub fn init<D: DocumentAccess + ?Sized>(&self, doc: &D) -> EntityIndexState {
        EntityIndexState::initialize(doc, self.node_name())
    }

    /// Plugin state apply
    pub fn apply(&self, tr: &Transaction, old: &EntityIndexState) -> EntityIndexState {
        old.apply(tr, self.node_name())
    }

    /// Write one entity as a marker element
    pub fn marker_to_markup(&self, entity: &Entity) -> String {
        let mut writer = MarkupWriter::new();
        writer.leaf_element(
            &self.options.tag,
            &[
                (self.options.id_attribute.as_str(), entity.id.as_str()),
                (self.options.name_attribute.as_str(), entity.name.as_str()),
            ],
        );
        writer.finish()
    }

    /// Read the first marker element in `markup`
    pub fn marker_from_markup(&self, markup: &str) -> Option<Entity> {
        let doc = Document::parse(markup, &self.schema());
        self.scan(&doc).into_iter().next().map(|occurrence| occurrence.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = EntityOptions::default();
        assert_eq!(options.node_name, "entity");
        assert_eq!(options.tag, "span");
        assert_eq!(options.id_attribute, "s-id");
        assert_eq!(options.name_attribute, "s-name");
    }

    #[test]
    fn test_node_spec_flags() {
        let spec = EntityExtension::default().node_spec();
        assert!(spec.inline && spec.selectable && spec.draggable);
        assert!(spec.marks.is_empty());
        assert_eq!(spec.attrs[0].default, None);
        assert_eq!(spec.attrs[1].default.as_deref(), Some(""));
    }

    #[test]
    fn test_marker_round_trip() {
        let ext = EntityExtension::default();
        let entity = Entity::new("42", "Ada \"the\" <Countess> & co");
        let markup = ext.marker_to_markup(&entity);
        assert_eq!(ext.marker_from_markup(&markup), Some(entity));
    }

    #[test]
    fn test_marker_markup_shape() {
        let ext = EntityExtension::default();
        assert_eq!(
            ext.marker_to_markup(&Entity::new("1", "Name 1")),
            "<span s-id=\"1\" s-name=\"Name 1\"></span>"
        );
    }

    #[test]
    fn test_marker_from_markup_missing_name() {
        let ext = EntityExtension::default();
        assert_eq!(ext.marker_from_markup("<span s-id=\"5\"/>"), Some(Entity::new("5", "")));
        assert_eq!(ext.marker_from_markup("<span class=\"x\"></span>"), None);
        assert_eq!(ext.marker_from_markup("plain"), None);
    }

    #[test]
    fn test_custom_options() {
        let ext = EntityExtension::new(
            EntityOptions::default()
                .with_node_name("mention")
                .with_tag("a")
                .with_id_attribute("data-id")
                .with_name_attribute("data-name"),
        );
        let markup = ext.marker_to_markup(&Entity::new("u1", "User"));
        assert_eq!(markup, "<a data-id=\"u1\" data-name=\"User\"></a>");
        assert_eq!(ext.marker_from_markup(&markup), Some(Entity::new("u1", "User")));
        assert_eq!(EntityExtension::default().marker_from_markup(&markup), None);
    }
}
