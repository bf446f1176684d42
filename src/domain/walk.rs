//! Subtree and ancestry walks over a [`TreeStore`].
//!
//! All walks keep a visited set, so even a malformed parent chain
//! terminates instead of looping.

use std::collections::{HashSet, VecDeque};

use tracing::{instrument, warn};

use crate::domain::{ItemId, Row, TreeStore};

/// Pre-order walk below a node: each child, then its subtree, then the next
/// sibling. The start node itself is not yielded.
pub struct Descendants<'a> {
    store: &'a TreeStore,
    stack: Vec<&'a Row>,
    seen: HashSet<&'a ItemId>,
}

impl<'a> Descendants<'a> {
    #[instrument(level = "trace", skip(store))]
    pub(crate) fn new(store: &'a TreeStore, id: &ItemId) -> Self {
        let mut walk = Self {
            store,
            stack: Vec::new(),
            seen: HashSet::new(),
        };
        if let Some(start) = store.get_item(id) {
            walk.seen.insert(&start.id);
        }
        walk.push_children(id);
        walk
    }

    fn push_children(&mut self, id: &ItemId) {
        // Reverse so the first child is popped first
        for child in self.store.get_children(Some(id)).into_iter().rev() {
            if self.seen.insert(&child.id) {
                self.stack.push(child);
            } else {
                warn!(id = %child.id, "node revisited in descendant walk");
            }
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.push_children(&current.id);
        Some(current)
    }
}

/// Ancestor walk: immediate parent first, root last.
pub struct Ancestors<'a> {
    store: &'a TreeStore,
    next: Option<&'a Row>,
    seen: HashSet<&'a ItemId>,
}

impl<'a> Ancestors<'a> {
    #[instrument(level = "trace", skip(store))]
    pub(crate) fn new(store: &'a TreeStore, id: &ItemId) -> Self {
        let mut seen = HashSet::new();
        if let Some(start) = store.get_item(id) {
            seen.insert(&start.id);
        }
        Self {
            store,
            next: store.get_parent(id),
            seen,
        }
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if !self.seen.insert(&current.id) {
            warn!(id = %current.id, "node revisited in ancestor walk");
            return None;
        }
        self.next = self.store.get_parent(&current.id);
        Some(current)
    }
}

/// Rows a grid shows: roots in order, descending only into expanded rows.
pub struct VisibleRows<'a> {
    store: &'a TreeStore,
    stack: Vec<&'a Row>,
    seen: HashSet<&'a ItemId>,
}

impl<'a> VisibleRows<'a> {
    pub(crate) fn new(store: &'a TreeStore) -> Self {
        let mut seen = HashSet::new();
        let mut stack = Vec::new();
        for root in store.to_row_data().into_iter().rev() {
            seen.insert(&root.id);
            stack.push(root);
        }
        Self { store, stack, seen }
    }
}

impl<'a> Iterator for VisibleRows<'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if current.expanded {
            for child in self.store.get_children(Some(&current.id)).into_iter().rev() {
                if self.seen.insert(&child.id) {
                    self.stack.push(child);
                }
            }
        }
        Some(current)
    }
}

/// Deletion closure: `id` plus every transitive descendant, collected
/// breadth-first.
#[instrument(level = "trace", skip(store))]
pub(crate) fn removal_closure(store: &TreeStore, id: &ItemId) -> HashSet<ItemId> {
    let mut closure = HashSet::new();
    let mut queue = VecDeque::new();
    closure.insert(id.clone());
    queue.push_back(id.clone());

    while let Some(parent_id) = queue.pop_front() {
        for child in store.get_children(Some(&parent_id)) {
            if closure.insert(child.id.clone()) {
                queue.push_back(child.id.clone());
            }
        }
    }

    closure
}
