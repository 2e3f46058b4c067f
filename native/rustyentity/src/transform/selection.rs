//! Text selection

use super::step::StepMap;

/// A selection between two positions. `anchor` stays put while `head` moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Selection { anchor, head }
    }

    /// Empty selection at `pos`
    pub fn cursor(pos: usize) -> Self {
        Selection { anchor: pos, head: pos }
    }

    #[inline]
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    #[inline]
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Map both ends through a step
    pub fn map(&self, map: &StepMap) -> Self {
        Selection {
            anchor: map.map(self.anchor),
            head: map.map(self.head),
        }
    }

    /// Keep both ends within `0..=size`
    pub fn clamp(&self, size: usize) -> Self {
        Selection {
            anchor: self.anchor.min(size),
            head: self.head.min(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_to_ordered() {
        let sel = Selection::new(7, 3);
        assert_eq!((sel.from(), sel.to()), (3, 7));
        assert!(!sel.is_empty());
        assert!(Selection::cursor(4).is_empty());
    }

    #[test]
    fn test_map_over_replacement() {
        // 2..5 replaced by a single node
        let map = StepMap::new(2, 3, 1);
        assert_eq!(Selection::new(2, 5).map(&map), Selection::cursor(3));
        assert_eq!(Selection::cursor(1).map(&map), Selection::cursor(1));
        assert_eq!(Selection::cursor(9).map(&map), Selection::cursor(7));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(Selection::new(2, 12).clamp(5), Selection::new(2, 5));
    }
}
