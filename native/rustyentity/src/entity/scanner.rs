//! Occurrence scanner - one walk over the tree collecting entity markers.

use super::types::{Entity, Occurrence};
use crate::dom::DocumentAccess;

/// Collect every marker of type `node_type`, in document order.
///
/// Atoms are leaves, so the walk never descends into a matched marker.
pub fn scan_occurrences<D: DocumentAccess + ?Sized>(doc: &D, node_type: &str) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    doc.walk(&mut |id, node, pos| {
        if !node.is_atom() {
            return true;
        }
        if doc.node_type_name(id) == Some(node_type) {
            if let Some(entity) = Entity::from_node(doc, id) {
                occurrences.push(Occurrence::new(entity, pos));
            }
        }
        false
    });

    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{AtomSpec, AttrSpec, Document, Schema};

    fn schema() -> Schema {
        let atom = |name: &str, tag: &str| AtomSpec {
            name: name.to_string(),
            tag: tag.to_string(),
            marker_attribute: "s-id".to_string(),
            attrs: vec![
                AttrSpec::new("id", "s-id"),
                AttrSpec::new("name", "s-name").with_default(""),
            ],
            inline: true,
            selectable: true,
            draggable: true,
            marks: String::new(),
        };
        Schema::new().with_atom(atom("entity", "span")).with_atom(atom("mention", "a"))
    }

    fn positions(occurrences: &[Occurrence]) -> Vec<(&str, usize)> {
        occurrences.iter().map(|o| (o.id(), o.pos)).collect()
    }

    #[test]
    fn test_scan_in_document_order() {
        let doc = Document::parse(
            "<h1><span s-id=\"a\"></span></h1><p>x<span s-id=\"b\" s-name=\"B\"></span></p>",
            &schema(),
        );
        let occurrences = scan_occurrences(&doc, "entity");
        assert_eq!(positions(&occurrences), vec![("a", 1), ("b", 5)]);
        assert_eq!(occurrences[0].name(), "");
        assert_eq!(occurrences[1].name(), "B");
    }

    #[test]
    fn test_scan_filters_by_type() {
        let doc = Document::parse("<p><a s-id=\"m\"></a><span s-id=\"e\"></span></p>", &schema());
        assert_eq!(positions(&scan_occurrences(&doc, "entity")), vec![("e", 2)]);
        assert_eq!(positions(&scan_occurrences(&doc, "mention")), vec![("m", 1)]);
    }

    #[test]
    fn test_marker_without_id_is_skipped() {
        let mut doc = Document::parse("<p></p>", &schema());
        doc.insert_atom(1, "entity", &[("name".to_string(), "orphan".to_string())])
            .unwrap();
        assert!(scan_occurrences(&doc, "entity").is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(scan_occurrences(&Document::new(), "entity").is_empty());
    }

    #[test]
    fn test_scan_through_trait_object() {
        let doc = Document::parse("<p><span s-id=\"1\"></span></p>", &schema());
        let access: &dyn DocumentAccess = &doc;
        assert_eq!(scan_occurrences(access, "entity").len(), 1);
    }
}
