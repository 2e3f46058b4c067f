//! Dedup reducer - unique entities keyed by id.
//!
//! Key position is fixed at first appearance; the value is overwritten by
//! every later appearance, so the last name seen wins.

use indexmap::IndexMap;

use super::types::{Entity, Occurrence};

/// Reduce occurrences to one entity per id, in first-seen order
pub fn unique_entities(occurrences: &[Occurrence]) -> Vec<Entity> {
    let mut by_id: IndexMap<&str, &str> = IndexMap::with_capacity(occurrences.len());
    for occurrence in occurrences {
        // insert on an existing key keeps its index
        by_id.insert(occurrence.id(), occurrence.name());
    }
    by_id.into_iter().map(|(id, name)| Entity::new(id, name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn occ(id: &str, name: &str, pos: usize) -> Occurrence {
        Occurrence::new(Entity::new(id, name), pos)
    }

    #[test]
    fn test_first_seen_order() {
        let occurrences = vec![occ("1", "A", 1), occ("2", "B", 2), occ("1", "A", 3)];
        assert_eq!(
            unique_entities(&occurrences),
            vec![Entity::new("1", "A"), Entity::new("2", "B")]
        );
    }

    #[test]
    fn test_last_write_wins() {
        let occurrences = vec![occ("1", "x", 1), occ("2", "q", 2), occ("1", "y", 3)];
        let unique = unique_entities(&occurrences);
        assert_eq!(unique[0], Entity::new("1", "y"));
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(unique_entities(&[]).is_empty());
    }

    fn occurrences_strategy() -> impl Strategy<Value = Vec<Occurrence>> {
        prop::collection::vec(("[1-4]", "[a-c]"), 0..12).prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(pos, (id, name))| occ(&id, &name, pos))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_one_entry_per_id(occurrences in occurrences_strategy()) {
            let unique = unique_entities(&occurrences);
            let ids: HashSet<&str> = occurrences.iter().map(|o| o.id()).collect();
            prop_assert_eq!(unique.len(), ids.len());
            prop_assert!(unique.len() <= occurrences.len());
            let unique_ids: HashSet<&str> = unique.iter().map(|e| e.id.as_str()).collect();
            prop_assert_eq!(unique_ids, ids);
        }

        #[test]
        fn prop_order_is_first_seen(occurrences in occurrences_strategy()) {
            let unique = unique_entities(&occurrences);
            let mut seen = HashSet::new();
            let first_seen: Vec<&str> = occurrences
                .iter()
                .map(|o| o.id())
                .filter(|id| seen.insert(*id))
                .collect();
            let order: Vec<&str> = unique.iter().map(|e| e.id.as_str()).collect();
            prop_assert_eq!(order, first_seen);
        }

        #[test]
        fn prop_name_is_last_seen(occurrences in occurrences_strategy()) {
            for entity in unique_entities(&occurrences) {
                let last = occurrences.iter().rev().find(|o| o.id() == entity.id);
                prop_assert_eq!(last.map(|o| o.name()), Some(entity.name.as_str()));
            }
        }
    }
}
