//! Canonical content fingerprints
//!
//! A 128-bit xxh3 digest over a canonical byte encoding of an ordered
//! collection. Every string is length-prefixed and every record is tagged,
//! so field boundaries can never be shifted to forge a collision between
//! different collections (`["ab", ""]` vs `["a", "b"]`). Element count and
//! order are part of the encoding.
//!
//! Fingerprints decide whether an index collection can be reused by
//! reference. They are not a security primitive.

use xxhash_rust::xxh3::Xxh3;

use super::types::{Entity, Occurrence};

const TAG_ENTITY: u8 = 0x01;
const TAG_OCCURRENCE: u8 = 0x02;

/// Content fingerprint of an ordered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u128);

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Records with a canonical byte encoding
pub trait Canonical {
    fn write_canonical(&self, hasher: &mut Xxh3);
}

#[inline]
fn write_str(hasher: &mut Xxh3, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn write_entity_fields(hasher: &mut Xxh3, entity: &Entity) {
    write_str(hasher, &entity.id);
    write_str(hasher, &entity.name);
}

impl Canonical for Entity {
    fn write_canonical(&self, hasher: &mut Xxh3) {
        hasher.update(&[TAG_ENTITY]);
        write_entity_fields(hasher, self);
    }
}

impl Canonical for Occurrence {
    fn write_canonical(&self, hasher: &mut Xxh3) {
        hasher.update(&[TAG_OCCURRENCE]);
        write_entity_fields(hasher, &self.entity);
        hasher.update(&(self.pos as u64).to_le_bytes());
    }
}

/// Fingerprint an ordered collection
pub fn fingerprint<T: Canonical>(items: &[T]) -> Fingerprint {
    let mut hasher = Xxh3::new();
    hasher.update(&(items.len() as u64).to_le_bytes());
    for item in items {
        item.write_canonical(&mut hasher);
    }
    Fingerprint(hasher.digest128())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn occ(id: &str, name: &str, pos: usize) -> Occurrence {
        Occurrence::new(Entity::new(id, name), pos)
    }

    #[test]
    fn test_equal_content_equal_fingerprint() {
        let a = vec![Entity::new("1", "x"), Entity::new("2", "y")];
        let b = a.clone();
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        let shown = fingerprint::<Entity>(&[]).to_string();
        assert_eq!(shown.len(), 32);
        assert!(shown.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_reordering_changes_fingerprint() {
        let a = vec![Entity::new("1", "x"), Entity::new("2", "y")];
        let b = vec![Entity::new("2", "y"), Entity::new("1", "x")];
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        assert_ne!(
            fingerprint(&[Entity::new("ab", "")]),
            fingerprint(&[Entity::new("a", "b")])
        );
    }

    #[test]
    fn test_position_is_significant() {
        assert_ne!(fingerprint(&[occ("1", "x", 1)]), fingerprint(&[occ("1", "x", 2)]));
    }

    #[test]
    fn test_empty_collections() {
        let none_e: [Entity; 0] = [];
        let none_o: [Occurrence; 0] = [];
        assert_eq!(fingerprint(&none_e), fingerprint(&none_e));
        assert_eq!(fingerprint(&none_e), fingerprint(&none_o));
        assert_ne!(fingerprint(&none_e), fingerprint(&[Entity::new("", "")]));
    }

    fn entity_strategy() -> impl Strategy<Value = Entity> {
        ("[a-c]{0,3}", "[x-z ]{0,3}").prop_map(|(id, name)| Entity::new(id, name))
    }

    proptest! {
        #[test]
        fn prop_fingerprint_tracks_content(
            a in prop::collection::vec(entity_strategy(), 0..6),
            b in prop::collection::vec(entity_strategy(), 0..6),
        ) {
            prop_assert_eq!(a == b, fingerprint(&a) == fingerprint(&b));
        }

        #[test]
        fn prop_occurrence_fingerprint_tracks_content(
            a in prop::collection::vec((entity_strategy(), 0usize..4), 0..5),
            b in prop::collection::vec((entity_strategy(), 0usize..4), 0..5),
        ) {
            let a: Vec<_> = a.into_iter().map(|(e, p)| Occurrence::new(e, p)).collect();
            let b: Vec<_> = b.into_iter().map(|(e, p)| Occurrence::new(e, p)).collect();
            prop_assert_eq!(a == b, fingerprint(&a) == fingerprint(&b));
        }
    }
}
