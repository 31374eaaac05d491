//! Ordered entity storage
//!
//! Order is meaningful: the last entity draws on top and wins hit-tests.
//! Ids are handed out by the store so they are unique and deterministic.

use serde::{Deserialize, Serialize};

/// Entity identifier (monotonic per store, starting at 1)
pub type EntityId = u32;

/// Anything kept in an [`EntityStore`]
pub trait Entity {
    fn id(&self) -> EntityId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<T> {
    items: Vec<T>,
    next_id: EntityId,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Drop every entity and restart the id counter
    pub fn reset(&mut self) {
        self.items.clear();
        self.next_id = 1;
    }

    /// Build an entity with a fresh id and append it on top
    pub fn spawn(&mut self, build: impl FnOnce(EntityId) -> T) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(build(id));
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entities bottom-to-top
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    /// Mutable access to two distinct entities by index (`i != j`)
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut T, &mut T) {
        debug_assert_ne!(i, j);
        if i < j {
            let (low, high) = self.items.split_at_mut(j);
            (&mut low[i], &mut high[0])
        } else {
            let (low, high) = self.items.split_at_mut(i);
            (&mut high[0], &mut low[j])
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Move an entity to the end (top of draw order). Returns false if absent.
    pub fn move_to_top(&mut self, id: EntityId) -> bool {
        match self.position(id) {
            Some(index) => {
                let entity = self.items.remove(index);
                self.items.push(entity);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Dummy {
        id: EntityId,
        tag: &'static str,
    }

    impl Entity for Dummy {
        fn id(&self) -> EntityId {
            self.id
        }
    }

    fn store_abc() -> EntityStore<Dummy> {
        let mut store = EntityStore::new();
        for tag in ["a", "b", "c"] {
            store.spawn(|id| Dummy { id, tag });
        }
        store
    }

    #[test]
    fn test_ids_are_monotonic_and_reset() {
        let mut store = store_abc();
        let ids: Vec<_> = store.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        store.remove(2);
        let id = store.spawn(|id| Dummy { id, tag: "d" });
        assert_eq!(id, 4, "ids are never reused within a session");

        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.spawn(|id| Dummy { id, tag: "e" }), 1);
    }

    #[test]
    fn test_move_to_top() {
        let mut store = store_abc();
        assert!(store.move_to_top(1));
        let tags: Vec<_> = store.iter().map(|d| d.tag).collect();
        assert_eq!(tags, vec!["b", "c", "a"]);
        assert!(!store.move_to_top(42));
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut store = store_abc();
        {
            let (x, y) = store.pair_mut(2, 0);
            assert_eq!((x.tag, y.tag), ("c", "a"));
            x.tag = "z";
        }
        assert_eq!(store.get(3).map(|d| d.tag), Some("z"));
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut store = store_abc();
        assert!(store.remove(99).is_none());
        assert_eq!(store.len(), 3);
    }
}
