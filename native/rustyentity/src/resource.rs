//! ResourceArc Wrappers
//!
//! Persistent editor state held by the BEAM between NIF calls.

use crate::editor::Editor;
use rustler::ResourceArc;
use std::sync::Mutex;

/// Wrapper for Editor that can be stored in a ResourceArc.
/// One transaction is applied at a time; the mutex serializes callers.
pub struct EditorResource {
    pub editor: Mutex<Editor>,
}

impl EditorResource {
    pub fn new(editor: Editor) -> Self {
        EditorResource {
            editor: Mutex::new(editor),
        }
    }

    /// Run `f` with exclusive access to the editor.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if a previous call panicked while holding
    /// the editor.
    pub fn with_editor<F, R>(&self, f: F) -> Result<R, &'static str>
    where
        F: FnOnce(&mut Editor) -> R,
    {
        let mut guard = self.editor.lock().map_err(|_| "mutex_poisoned")?;
        Ok(f(&mut guard))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for EditorResource {}

/// Type alias for editor ResourceArc
pub type EditorRef = ResourceArc<EditorResource>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityExtension};

    #[test]
    fn test_with_editor_mutates_in_place() {
        let resource = EditorResource::new(Editor::new(EntityExtension::default()));
        let created = resource
            .with_editor(|editor| editor.create_entity(&Entity::new("1", "One")))
            .unwrap();
        assert!(created);
        let count = resource
            .with_editor(|editor| editor.get_unique_entities().len())
            .unwrap();
        assert_eq!(count, 1);
    }
}
