//! Edge tracking for level-sampling backends.
//!
//! Backends that can only ask "is this down right now?" latch the down set
//! once per frame and answer press/release from the previous latch.

use crate::device::ButtonQuery;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub struct ButtonEdges<K: Eq + Hash> {
    previous: HashSet<K>,
    current: HashSet<K>,
}

impl<K: Eq + Hash> Default for ButtonEdges<K> {
    fn default() -> Self {
        Self {
            previous: HashSet::new(),
            current: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash> ButtonEdges<K> {
    /// Start a new frame with `down` as the set of buttons currently held.
    pub fn latch(&mut self, down: impl IntoIterator<Item = K>) {
        self.previous = std::mem::take(&mut self.current);
        self.current.extend(down);
    }

    /// Forget all state; the next latch reports every held button as a fresh press.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.current.clear();
    }
}

impl<K, Q> ButtonQuery<Q> for ButtonEdges<K>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
{
    fn pressed(&self, id: &Q) -> bool {
        self.current.contains(id) && !self.previous.contains(id)
    }

    fn released(&self, id: &Q) -> bool {
        self.previous.contains(id) && !self.current.contains(id)
    }

    fn held(&self, id: &Q) -> bool {
        self.current.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_hold_release() {
        let mut edges: ButtonEdges<String> = ButtonEdges::default();

        edges.latch(["Jump".to_string()]);
        assert!(edges.pressed("Jump"));
        assert!(edges.held("Jump"));
        assert!(!edges.released("Jump"));

        edges.latch(["Jump".to_string()]);
        assert!(!edges.pressed("Jump"));
        assert!(edges.held("Jump"));

        edges.latch([]);
        assert!(edges.released("Jump"));
        assert!(!edges.held("Jump"));

        edges.latch([]);
        assert!(!edges.released("Jump"));
    }

    #[test]
    fn reset_replays_press() {
        let mut edges: ButtonEdges<u8> = ButtonEdges::default();
        edges.latch([1u8]);
        edges.reset();
        edges.latch([1u8]);
        assert!(edges.pressed(&1u8));
    }
}
