use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::{ItemId, Row};

/// Arena-backed row storage: id registry plus insertion order.
///
/// The registry maps ids to arena slots for O(1) lookups, `order` lists the
/// same slots in insertion order. Both always hold the same set of rows.
#[derive(Debug)]
pub struct RowArena {
    /// Arena storage for all rows
    arena: Arena<Row>,
    /// Slot of each registered id
    registry: HashMap<ItemId, Index>,
    /// Slots in insertion order
    order: Vec<Index>,
}

impl Default for RowArena {
    fn default() -> Self {
        Self::new()
    }
}

impl RowArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            registry: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.registry.contains_key(id)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, id: &ItemId) -> Option<&Row> {
        self.registry.get(id).and_then(|&idx| self.arena.get(idx))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Row> {
        match self.registry.get(id) {
            Some(&idx) => self.arena.get_mut(idx),
            None => None,
        }
    }

    /// Appends a row. The caller has already checked the id is free.
    #[instrument(level = "trace", skip(self, row), fields(id = %row.id))]
    pub fn insert(&mut self, row: Row) -> &Row {
        debug_assert!(!self.registry.contains_key(&row.id));
        let id = row.id.clone();
        let idx = self.arena.insert(row);
        self.registry.insert(id, idx);
        self.order.push(idx);
        &self.arena[idx]
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> + '_ {
        self.order.iter().filter_map(move |&idx| self.arena.get(idx))
    }

    /// Drops every listed id from registry, arena and order in one pass.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_all(&mut self, ids: &HashSet<ItemId>) {
        for id in ids {
            if let Some(idx) = self.registry.remove(id) {
                self.arena.remove(idx);
            }
        }
        let arena = &self.arena;
        self.order.retain(|&idx| arena.contains(idx));
    }
}
