//! Elixir Term Conversion Utilities
//!
//! Converts entity index collections to Elixir terms.

use rustler::{Encoder, Env, NewBinary, NifResult, Term};

use crate::entity::{Entity, Occurrence};

pub mod atoms {
    // Pre-defined atoms for efficiency - created once at compile time
    rustler::atoms! {
        ok,
        error,
        id,
        name,
        pos,
    }
}

/// Create a binary term from a string slice
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// `%{id: id, name: name}`
pub fn entity_to_term<'a>(env: Env<'a>, entity: &Entity) -> NifResult<Term<'a>> {
    Term::map_from_arrays(
        env,
        &[atoms::id().encode(env), atoms::name().encode(env)],
        &[str_to_binary(env, &entity.id), str_to_binary(env, &entity.name)],
    )
}

/// `%{id: id, name: name, pos: pos}`
pub fn occurrence_to_term<'a>(env: Env<'a>, occurrence: &Occurrence) -> NifResult<Term<'a>> {
    Term::map_from_arrays(
        env,
        &[atoms::id().encode(env), atoms::name().encode(env), atoms::pos().encode(env)],
        &[
            str_to_binary(env, occurrence.id()),
            str_to_binary(env, occurrence.name()),
            occurrence.pos.encode(env),
        ],
    )
}

/// Encode a slice as a list, building in reverse to avoid an intermediate Vec
fn list_to_term<'a, T, F>(env: Env<'a>, items: &[T], encode: F) -> NifResult<Term<'a>>
where
    F: Fn(Env<'a>, &T) -> NifResult<Term<'a>>,
{
    let mut list = Term::list_new_empty(env);
    for item in items.iter().rev() {
        list = list.list_prepend(encode(env, item)?);
    }
    Ok(list)
}

pub fn entities_to_term<'a>(env: Env<'a>, entities: &[Entity]) -> NifResult<Term<'a>> {
    list_to_term(env, entities, entity_to_term)
}

pub fn occurrences_to_term<'a>(env: Env<'a>, occurrences: &[Occurrence]) -> NifResult<Term<'a>> {
    list_to_term(env, occurrences, occurrence_to_term)
}
