//! RustyEntity - Incremental entity marker index for inline documents
//!
//! Documents hold entity markers (`<span s-id=".." s-name="..">`) as atomic
//! leaves. Every transaction keeps two derived collections up to date:
//! - all marker occurrences with positions
//! - the unique entities, one per id
//!
//! Both are handed back by reference when their content did not change.

use rustler::{Encoder, Env, NifResult, ResourceArc, Term};

pub mod dom;
pub mod editor;
pub mod entity;
pub mod error;
pub mod markup;
pub mod resource;
pub mod term;
pub mod transform;

use editor::Editor;
use entity::{Entity, EntityExtension};
use resource::{EditorRef, EditorResource};
use term::{atoms, entities_to_term, occurrences_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn poisoned(reason: &'static str) -> rustler::Error {
    rustler::Error::RaiseAtom(reason)
}

// ============================================================================
// Editor lifecycle
// ============================================================================

/// Create an editor from markup (lenient mode - accepts malformed markup)
#[rustler::nif]
fn editor_new(markup: &str) -> EditorRef {
    let editor = Editor::from_markup(markup, EntityExtension::default());
    ResourceArc::new(EditorResource::new(editor))
}

/// Create an editor in strict mode (returns {:ok, ref} or {:error, reason})
#[rustler::nif]
fn editor_new_strict<'a>(env: Env<'a>, markup: &str) -> NifResult<Term<'a>> {
    match Editor::from_markup_strict(markup, EntityExtension::default()) {
        Ok(editor) => {
            let arc = ResourceArc::new(EditorResource::new(editor));
            Ok((atoms::ok(), arc).encode(env))
        }
        Err(err) => Ok((atoms::error(), err.to_string()).encode(env)),
    }
}

/// Serialize the current document
#[rustler::nif]
fn to_markup(editor: EditorRef) -> NifResult<String> {
    editor.with_editor(|ed| ed.to_markup()).map_err(poisoned)
}

// ============================================================================
// Index reads
// ============================================================================

/// All marker occurrences as `[%{id, name, pos}]`
#[rustler::nif]
fn get_all_occurrences<'a>(env: Env<'a>, editor: EditorRef) -> NifResult<Term<'a>> {
    let occurrences = editor.with_editor(|ed| ed.get_all_occurrences()).map_err(poisoned)?;
    occurrences_to_term(env, &occurrences)
}

/// Unique entities as `[%{id, name}]`
#[rustler::nif]
fn get_unique_entities<'a>(env: Env<'a>, editor: EditorRef) -> NifResult<Term<'a>> {
    let entities = editor.with_editor(|ed| ed.get_unique_entities()).map_err(poisoned)?;
    entities_to_term(env, &entities)
}

/// `{occurrences_generation, unique_generation}`; each bumps only when that
/// collection is rebuilt
#[rustler::nif]
fn index_generation(editor: EditorRef) -> NifResult<(u64, u64)> {
    editor.with_editor(|ed| ed.generations()).map_err(poisoned)
}

// ============================================================================
// Commands
// ============================================================================

#[rustler::nif]
fn create_entity(editor: EditorRef, id: String, name: String) -> bool {
    let entity = Entity::new(id, name);
    editor.with_editor(|ed| ed.create_entity(&entity)).unwrap_or(false)
}

#[rustler::nif]
fn update_entity_by_id(editor: EditorRef, id: &str, new_id: String, new_name: String) -> bool {
    let entity = Entity::new(new_id, new_name);
    editor
        .with_editor(|ed| ed.update_entity_by_id(id, &entity))
        .unwrap_or(false)
}

#[rustler::nif]
fn update_entity_in_position(editor: EditorRef, pos: usize, id: String, name: String) -> bool {
    let entity = Entity::new(id, name);
    editor
        .with_editor(|ed| ed.update_entity_in_position(pos, &entity))
        .unwrap_or(false)
}

// ============================================================================
// Plain edits
// ============================================================================

/// Insert text (returns :ok or {:error, reason})
#[rustler::nif]
fn insert_text<'a>(env: Env<'a>, editor: EditorRef, pos: usize, text: &str) -> NifResult<Term<'a>> {
    let result = editor.with_editor(|ed| ed.insert_text(pos, text)).map_err(poisoned)?;
    match result {
        Ok(()) => Ok(atoms::ok().encode(env)),
        Err(err) => Ok((atoms::error(), err.to_string()).encode(env)),
    }
}

#[rustler::nif]
fn set_selection(editor: EditorRef, anchor: usize, head: usize) -> NifResult<rustler::Atom> {
    editor.with_editor(|ed| ed.set_selection(anchor, head)).map_err(poisoned)?;
    Ok(atoms::ok())
}

// ============================================================================
// Marker boundary format
// ============================================================================

#[rustler::nif]
fn marker_to_markup(id: String, name: String) -> String {
    EntityExtension::default().marker_to_markup(&Entity::new(id, name))
}

/// Parse the first marker in `markup` (returns {id, name} or nil)
#[rustler::nif]
fn marker_from_markup(markup: &str) -> Option<(String, String)> {
    EntityExtension::default()
        .marker_from_markup(markup)
        .map(|entity| (entity.id, entity.name))
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.RustyEntity.Native");
