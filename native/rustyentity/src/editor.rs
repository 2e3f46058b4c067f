//! Editor state and the editor that drives it
//!
//! `EditorState` is an immutable snapshot: document, selection and entity
//! index. Applying a transaction produces the next snapshot. `Editor` owns
//! the current snapshot and applies one transaction at a time.

use std::sync::Arc;

use crate::dom::{Document, Schema};
use crate::entity::{Dispatch, Entity, EntityExtension, EntityIndex, EntityIndexState, Occurrence};
use crate::error::{DocumentError, MarkupError};
use crate::transform::{Selection, Transaction};

/// Markup of a new, empty document
const EMPTY_DOCUMENT: &str = "<p></p>";

/// A snapshot of the editor
#[derive(Debug, Clone)]
pub struct EditorState {
    doc: Arc<Document>,
    selection: Selection,
    entities: EntityIndexState,
    extension: Arc<EntityExtension>,
}

impl EditorState {
    /// Create a state for `doc`, with the cursor at the first text position
    pub fn create(doc: Document, extension: EntityExtension) -> Self {
        let entities = extension.init(&doc);
        EditorState {
            selection: Selection::cursor(doc.first_inner_position()),
            doc: Arc::new(doc),
            entities,
            extension: Arc::new(extension),
        }
    }

    /// Start a transaction from this state
    pub fn tr(&self) -> Transaction {
        Transaction::new(Arc::clone(&self.doc), self.selection)
    }

    /// Produce the state after `tr`
    pub fn apply(&self, tr: &Transaction) -> EditorState {
        EditorState {
            doc: Arc::clone(tr.doc()),
            selection: tr.selection(),
            entities: self.extension.apply(tr, &self.entities),
            extension: Arc::clone(&self.extension),
        }
    }

    pub fn doc(&self) -> &Arc<Document> {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn entities(&self) -> &EntityIndexState {
        &self.entities
    }

    pub fn extension(&self) -> &EntityExtension {
        &self.extension
    }
}

/// An editor over one document
#[derive(Debug)]
pub struct Editor {
    schema: Schema,
    state: EditorState,
    occurrences_generation: u64,
    unique_generation: u64,
}

impl Editor {
    /// Editor over an empty paragraph
    pub fn new(extension: EntityExtension) -> Self {
        Self::from_markup(EMPTY_DOCUMENT, extension)
    }

    /// Editor over parsed markup (lenient)
    pub fn from_markup(markup: &str, extension: EntityExtension) -> Self {
        let schema = extension.schema();
        let doc = Document::parse(markup, &schema);
        Self::with_document(doc, schema, extension)
    }

    /// Editor over parsed markup; malformed markup is rejected
    pub fn from_markup_strict(markup: &str, extension: EntityExtension) -> Result<Self, MarkupError> {
        let schema = extension.schema();
        let doc = Document::parse_strict(markup, &schema)?;
        Ok(Self::with_document(doc, schema, extension))
    }

    fn with_document(doc: Document, schema: Schema, extension: EntityExtension) -> Self {
        Editor {
            schema,
            state: EditorState::create(doc, extension),
            occurrences_generation: 0,
            unique_generation: 0,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Apply a transaction and bump the generation of every index collection
    /// that was replaced
    pub fn dispatch(&mut self, tr: Transaction) {
        let next = self.state.apply(&tr);

        match (self.state.entities().index(), next.entities().index()) {
            (Some(old), Some(new)) => {
                if !Arc::ptr_eq(old.occurrences(), new.occurrences()) {
                    self.occurrences_generation += 1;
                }
                if !Arc::ptr_eq(old.unique_entities(), new.unique_entities()) {
                    self.unique_generation += 1;
                }
            }
            _ => {
                self.occurrences_generation += 1;
                self.unique_generation += 1;
            }
        }

        tracing::trace!(
            doc_changed = tr.doc_changed(),
            occurrences_generation = self.occurrences_generation,
            unique_generation = self.unique_generation,
            "transaction dispatched"
        );
        self.state = next;
    }

    fn index(&self) -> Option<&EntityIndex> {
        self.state.entities().index()
    }

    /// Every marker occurrence in document order
    pub fn get_all_occurrences(&self) -> Arc<[Occurrence]> {
        self.index().map_or_else(|| Arc::from([]), |index| Arc::clone(index.occurrences()))
    }

    /// One entity per id, in first-seen order
    pub fn get_unique_entities(&self) -> Arc<[Entity]> {
        self.index().map_or_else(|| Arc::from([]), |index| Arc::clone(index.unique_entities()))
    }

    /// Run a command with a dispatcher that applies its transaction
    fn run_command<F>(&mut self, command: F) -> bool
    where
        F: FnOnce(&EntityExtension, &EditorState, Dispatch<'_>) -> bool,
    {
        let mut pending = None;
        let mut capture = |tr: Transaction| pending = Some(tr);
        let ok = command(self.state.extension(), &self.state, Some(&mut capture));
        if let Some(tr) = pending {
            self.dispatch(tr);
        }
        ok
    }

    pub fn create_entity(&mut self, entity: &Entity) -> bool {
        self.run_command(|ext, state, dispatch| ext.create_entity(entity, state, dispatch))
    }

    pub fn update_entity_by_id(&mut self, id: &str, entity: &Entity) -> bool {
        self.run_command(|ext, state, dispatch| ext.update_entity_by_id(id, entity, state, dispatch))
    }

    pub fn update_entity_in_position(&mut self, pos: usize, entity: &Entity) -> bool {
        self.run_command(|ext, state, dispatch| ext.update_entity_in_position(pos, entity, state, dispatch))
    }

    /// Probe variants: report availability without dispatching
    pub fn can_create_entity(&self, entity: &Entity) -> bool {
        self.state.extension().create_entity(entity, &self.state, None)
    }

    pub fn can_update_entity_by_id(&self, id: &str, entity: &Entity) -> bool {
        self.state.extension().update_entity_by_id(id, entity, &self.state, None)
    }

    pub fn can_update_entity_in_position(&self, pos: usize, entity: &Entity) -> bool {
        self.state.extension().update_entity_in_position(pos, entity, &self.state, None)
    }

    /// Insert text at `pos` as its own transaction
    pub fn insert_text(&mut self, pos: usize, text: &str) -> Result<(), DocumentError> {
        let mut tr = self.state.tr();
        tr.insert_text(pos, text)?;
        self.dispatch(tr);
        Ok(())
    }

    /// Delete `from..to` as its own transaction
    pub fn delete(&mut self, from: usize, to: usize) -> Result<(), DocumentError> {
        let mut tr = self.state.tr();
        tr.delete(from, to)?;
        self.dispatch(tr);
        Ok(())
    }

    /// Move the selection (a selection-only transaction)
    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        let mut tr = self.state.tr();
        tr.set_selection(Selection::new(anchor, head));
        self.dispatch(tr);
    }

    /// Serialize the current document
    pub fn to_markup(&self) -> String {
        self.state.doc().to_markup(&self.schema)
    }

    /// `(occurrences_generation, unique_generation)`
    pub fn generations(&self) -> (u64, u64) {
        (self.occurrences_generation, self.unique_generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(markup: &str) -> Editor {
        Editor::from_markup(markup, EntityExtension::default())
    }

    fn marker(id: &str, name: &str) -> String {
        EntityExtension::default().marker_to_markup(&Entity::new(id, name))
    }

    fn three() -> Editor {
        editor(&format!(
            "<p>{}{}{}</p>",
            marker("1", "Name 1"),
            marker("2", "Name 2"),
            marker("1", "Name 1")
        ))
    }

    fn occurrence_list(editor: &Editor) -> Vec<(String, String, usize)> {
        editor
            .get_all_occurrences()
            .iter()
            .map(|o| (o.entity.id.clone(), o.entity.name.clone(), o.pos))
            .collect()
    }

    fn occ(id: &str, name: &str, pos: usize) -> (String, String, usize) {
        (id.to_string(), name.to_string(), pos)
    }

    #[test]
    fn test_all_occurrences() {
        let editor = three();
        assert_eq!(
            occurrence_list(&editor),
            vec![occ("1", "Name 1", 1), occ("2", "Name 2", 2), occ("1", "Name 1", 3)]
        );
    }

    #[test]
    fn test_unique_entities_first_seen() {
        let editor = three();
        assert_eq!(
            editor.get_unique_entities().to_vec(),
            vec![Entity::new("1", "Name 1"), Entity::new("2", "Name 2")]
        );
    }

    #[test]
    fn test_unique_entities_last_name_wins() {
        let editor = editor(&format!("<p>{}{}</p>", marker("1", "x"), marker("1", "y")));
        assert_eq!(editor.get_unique_entities().to_vec(), vec![Entity::new("1", "y")]);
    }

    #[test]
    fn test_update_by_id_broadcasts() {
        let mut editor = three();
        assert!(editor.update_entity_by_id("1", &Entity::new("1", "Z")));
        assert_eq!(
            occurrence_list(&editor),
            vec![occ("1", "Z", 1), occ("2", "Name 2", 2), occ("1", "Z", 3)]
        );
        assert_eq!(editor.generations(), (1, 1));
    }

    #[test]
    fn test_update_by_id_can_change_id() {
        let mut editor = three();
        assert!(editor.update_entity_by_id("2", &Entity::new("3", "Three")));
        assert_eq!(
            editor.get_unique_entities().to_vec(),
            vec![Entity::new("1", "Name 1"), Entity::new("3", "Three")]
        );
    }

    #[test]
    fn test_update_missing_id_no_op() {
        let mut editor = three();
        let before = editor.get_all_occurrences();
        let markup = editor.to_markup();
        assert!(editor.update_entity_by_id("missing", &Entity::new("9", "Nine")));
        assert!(Arc::ptr_eq(&before, &editor.get_all_occurrences()));
        assert_eq!(editor.to_markup(), markup);
        assert_eq!(editor.generations(), (0, 0));
    }

    #[test]
    fn test_update_in_position() {
        let mut editor = three();
        assert!(editor.update_entity_in_position(1, &Entity::new("1", "CHANGED")));
        assert_eq!(
            occurrence_list(&editor),
            vec![occ("1", "CHANGED", 1), occ("2", "Name 2", 2), occ("1", "Name 1", 3)]
        );
        // last write wins: the third marker still says "Name 1"
        assert_eq!(editor.get_unique_entities()[0], Entity::new("1", "Name 1"));
        assert_eq!(editor.generations(), (1, 0));
    }

    #[test]
    fn test_create_in_empty_document() {
        let mut editor = Editor::new(EntityExtension::default());
        assert!(editor.get_unique_entities().is_empty());
        assert!(editor.create_entity(&Entity::new("1", "Name 1")));
        assert_eq!(editor.get_unique_entities().to_vec(), vec![Entity::new("1", "Name 1")]);
        assert_eq!(editor.to_markup(), format!("<p>{}</p>", marker("1", "Name 1")));
        assert_eq!(editor.state().selection(), Selection::cursor(2));
    }

    #[test]
    fn test_create_replaces_selection() {
        let mut editor = editor("<p>hello world</p>");
        editor.set_selection(7, 12);
        assert!(editor.create_entity(&Entity::new("w", "World")));
        assert_eq!(editor.to_markup(), format!("<p>hello {}</p>", marker("w", "World")));
        assert_eq!(occurrence_list(&editor), vec![occ("w", "World", 7)]);
    }

    #[test]
    fn test_create_adds_exactly_one_occurrence() {
        let mut editor = three();
        editor.set_selection(4, 4);
        assert!(editor.create_entity(&Entity::new("2", "Name 2")));
        assert_eq!(editor.get_all_occurrences().len(), 4);
        assert_eq!(editor.get_unique_entities().len(), 2);
    }

    #[test]
    fn test_create_across_paragraphs() {
        let mut editor = editor("<p>ab</p><p>cd</p>");
        editor.set_selection(2, 6);
        assert!(editor.create_entity(&Entity::new("1", "Name 1")));
        assert_eq!(occurrence_list(&editor), vec![occ("1", "Name 1", 2)]);
        assert_eq!(editor.to_markup(), format!("<p>a{}d</p>", marker("1", "Name 1")));
        assert_eq!(editor.state().selection(), Selection::cursor(3));
    }

    #[test]
    fn test_create_across_paragraphs_keeps_other_markers() {
        let mut editor = editor(&format!("<p>{}ab</p><p>cd{}</p>", marker("1", "One"), marker("2", "Two")));
        editor.set_selection(3, 7);
        assert!(editor.create_entity(&Entity::new("3", "Three")));
        assert_eq!(
            occurrence_list(&editor),
            vec![occ("1", "One", 1), occ("3", "Three", 3), occ("2", "Two", 5)]
        );
    }

    #[test]
    fn test_create_across_uneven_blocks_inserts_at_start() {
        let mut editor = editor("<p>ab</p><div><p>cd</p></div>");
        editor.set_selection(2, 7);
        assert!(editor.create_entity(&Entity::new("1", "Name 1")));
        assert_eq!(occurrence_list(&editor), vec![occ("1", "Name 1", 2)]);
        assert_eq!(
            editor.to_markup(),
            format!("<p>a{}b</p><div><p>cd</p></div>", marker("1", "Name 1"))
        );
    }

    #[test]
    fn test_create_at_block_boundary() {
        let mut editor = editor(&format!("<p>{}</p><p>b</p>", marker("1", "One")));
        editor.set_selection(0, 0);
        assert!(editor.create_entity(&Entity::new("2", "Two")));
        assert_eq!(occurrence_list(&editor), vec![occ("2", "Two", 0), occ("1", "One", 2)]);

        // between the two paragraphs
        editor.set_selection(4, 4);
        assert!(editor.create_entity(&Entity::new("3", "Three")));
        assert_eq!(
            occurrence_list(&editor),
            vec![occ("2", "Two", 0), occ("1", "One", 2), occ("3", "Three", 4)]
        );
        assert_eq!(
            editor.to_markup(),
            format!(
                "{}<p>{}</p>{}<p>b</p>",
                marker("2", "Two"),
                marker("1", "One"),
                marker("3", "Three")
            )
        );
    }

    #[test]
    fn test_long_typing_session_keeps_arena_bounded() {
        let mut editor = editor("<p>x</p>");
        for i in 0..2000 {
            editor.insert_text(2 + i, "y").unwrap();
        }
        assert_eq!(editor.state().doc().size(), 2003);
        assert!(editor.state().doc().node_count() <= 6);
    }

    #[test]
    fn test_selection_change_preserves_identity() {
        let mut editor = three();
        let occurrences = editor.get_all_occurrences();
        let unique = editor.get_unique_entities();
        editor.set_selection(2, 3);
        assert!(Arc::ptr_eq(&occurrences, &editor.get_all_occurrences()));
        assert!(Arc::ptr_eq(&unique, &editor.get_unique_entities()));
        assert_eq!(editor.generations(), (0, 0));
    }

    #[test]
    fn test_unrelated_text_edit_preserves_unique_identity() {
        let mut editor = three();
        let unique = editor.get_unique_entities();

        // before the markers: positions move, entities do not
        editor.insert_text(1, "Hi ").unwrap();
        assert_eq!(editor.get_all_occurrences()[0].pos, 4);
        assert!(Arc::ptr_eq(&unique, &editor.get_unique_entities()));
        assert_eq!(editor.generations(), (1, 0));

        // after the markers: nothing moves
        let occurrences = editor.get_all_occurrences();
        editor.insert_text(7, "!").unwrap();
        assert!(Arc::ptr_eq(&occurrences, &editor.get_all_occurrences()));
        assert_eq!(editor.generations(), (1, 0));
    }

    #[test]
    fn test_deleting_marker_updates_index() {
        let mut editor = three();
        editor.delete(2, 3).unwrap();
        assert_eq!(
            occurrence_list(&editor),
            vec![occ("1", "Name 1", 1), occ("1", "Name 1", 2)]
        );
        assert_eq!(editor.get_unique_entities().to_vec(), vec![Entity::new("1", "Name 1")]);
    }

    #[test]
    fn test_rejected_edit_leaves_editor() {
        let mut editor = three();
        assert!(editor.insert_text(99, "x").is_err());
        assert_eq!(editor.generations(), (0, 0));
    }

    #[test]
    fn test_probes_do_not_mutate() {
        let editor = three();
        let markup = editor.to_markup();
        let entity = Entity::new("1", "Z");
        assert!(editor.can_create_entity(&entity));
        assert!(editor.can_update_entity_by_id("1", &entity));
        assert!(editor.can_update_entity_in_position(1, &entity));
        assert_eq!(editor.to_markup(), markup);
    }

    #[test]
    fn test_from_markup_strict() {
        let ext = EntityExtension::default();
        assert!(Editor::from_markup_strict("<p>ok</p>", ext.clone()).is_ok());
        assert!(matches!(
            Editor::from_markup_strict("<p>open", ext),
            Err(MarkupError::UnclosedTag(_))
        ));
    }

    #[test]
    fn test_markup_round_trip_through_editor() {
        let markup = format!("<h1>Title</h1><p>See {} and {}.</p>", marker("1", "A & B"), marker("2", "C"));
        let editor = editor(&markup);
        assert_eq!(editor.to_markup(), markup);
    }
}
