//! The tree store: flat rows indexed into a parent/child hierarchy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::RowArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::walk::{removal_closure, Ancestors, Descendants, VisibleRows};
use crate::domain::{ItemDto, ItemId, Row};

/// What happens to descendant levels when a node is reparented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelPolicy {
    /// Only the updated node's level changes; descendants keep theirs.
    #[default]
    Preserve,
    /// Descendant levels are recomputed after every update.
    Cascade,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub level_policy: LevelPolicy,
}

/// In-memory hierarchical index over flat items.
///
/// Rows are kept in insertion order and looked up by id in O(1). Child
/// lookups scan all rows. Queries never fail on unknown ids; mutations
/// validate first and leave the store untouched on error.
#[derive(Debug, Default)]
pub struct TreeStore {
    rows: RowArena,
    options: StoreOptions,
}

impl TreeStore {
    /// Builds a store from items in input order.
    ///
    /// Levels are computed against the rows registered so far: a child listed
    /// before its parent ends up at level 0.
    pub fn new(items: impl IntoIterator<Item = ItemDto>) -> DomainResult<Self> {
        Self::with_options(items, StoreOptions::default())
    }

    #[instrument(level = "debug", skip(items))]
    pub fn with_options(
        items: impl IntoIterator<Item = ItemDto>,
        options: StoreOptions,
    ) -> DomainResult<Self> {
        let mut store = Self {
            rows: RowArena::new(),
            options,
        };
        for item in items {
            if store.rows.contains(&item.id) {
                return Err(DomainError::DuplicateId(item.id));
            }
            if let Some(parent) = &item.parent {
                if !store.rows.contains(parent) {
                    debug!(
                        id = %item.id,
                        parent = %parent,
                        "parent not registered yet, placing at level 0"
                    );
                }
            }
            let level = store.resolve_level(&item.id, item.parent.as_ref())?;
            store.rows.insert(Row::from_dto(item, level));
        }
        debug!(rows = store.rows.len(), "store built");
        Ok(store)
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.rows.contains(id)
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter()
    }

    pub fn get_all(&self) -> Vec<&Row> {
        self.rows.iter().collect()
    }

    pub fn get_item(&self, id: &ItemId) -> Option<&Row> {
        self.rows.get(id)
    }

    /// Rows whose parent is exactly `parent`; `None` selects top-level rows.
    #[instrument(level = "trace", skip(self))]
    pub fn get_children(&self, parent: Option<&ItemId>) -> Vec<&Row> {
        self.rows
            .iter()
            .filter(|row| row.parent.as_ref() == parent)
            .collect()
    }

    /// Top-level rows only; expansion is left to the grid.
    pub fn to_row_data(&self) -> Vec<&Row> {
        self.get_children(None)
    }

    /// Whole subtree below `id` in pre-order, without `id` itself.
    pub fn get_all_children(&self, id: &ItemId) -> Vec<&Row> {
        self.descendants(id).collect()
    }

    pub fn descendants(&self, id: &ItemId) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_parent(&self, id: &ItemId) -> Option<&Row> {
        let parent = self.rows.get(id)?.parent.as_ref()?;
        self.rows.get(parent)
    }

    /// Ancestor chain, immediate parent first.
    pub fn get_all_parents(&self, id: &ItemId) -> Vec<&Row> {
        self.ancestors(id).collect()
    }

    pub fn ancestors(&self, id: &ItemId) -> Ancestors<'_> {
        Ancestors::new(self, id)
    }

    /// Flattened rows as a grid renders them given the `expanded` flags.
    pub fn visible_rows(&self) -> Vec<&Row> {
        VisibleRows::new(self).collect()
    }

    #[instrument(level = "debug", skip(self, dto), fields(id = %dto.id))]
    pub fn add_item(&mut self, dto: ItemDto) -> DomainResult<&Row> {
        if self.rows.contains(&dto.id) {
            return Err(DomainError::DuplicateId(dto.id));
        }
        self.ensure_parent(dto.parent.as_ref())?;

        let level = self.resolve_level(&dto.id, dto.parent.as_ref())?;
        debug!(level, "adding row");
        Ok(self.rows.insert(Row::from_dto(dto, level)))
    }

    /// Replaces parent and label in place, keeping `expanded` and `kind`.
    ///
    /// Reparenting below the node itself or one of its descendants is
    /// rejected with [`DomainError::CycleDetected`].
    #[instrument(level = "debug", skip(self, dto), fields(id = %dto.id))]
    pub fn update_item(&mut self, dto: ItemDto) -> DomainResult<()> {
        if !self.rows.contains(&dto.id) {
            return Err(DomainError::NotFound(dto.id));
        }
        self.ensure_parent(dto.parent.as_ref())?;

        let level = self.resolve_level(&dto.id, dto.parent.as_ref())?;
        let ItemDto { id, parent, label } = dto;
        if let Some(row) = self.rows.get_mut(&id) {
            row.parent = parent;
            row.label = label;
            row.level = level;
        }
        debug!(level, "row updated");

        if self.options.level_policy == LevelPolicy::Cascade {
            self.cascade_levels(&id);
        }
        Ok(())
    }

    /// Removes `id` and its whole subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_item(&mut self, id: &ItemId) -> DomainResult<()> {
        if !self.rows.contains(id) {
            return Err(DomainError::NotFound(id.clone()));
        }
        let closure = removal_closure(self, id);
        debug!(count = closure.len(), "removing subtree");
        self.rows.remove_all(&closure);
        Ok(())
    }

    pub fn set_expanded(&mut self, id: &ItemId, expanded: bool) -> DomainResult<()> {
        let row = self.row_mut(id)?;
        row.expanded = expanded;
        Ok(())
    }

    /// Flips the expand flag and returns the new value.
    pub fn toggle_expanded(&mut self, id: &ItemId) -> DomainResult<bool> {
        let row = self.row_mut(id)?;
        row.expanded = !row.expanded;
        Ok(row.expanded)
    }

    pub fn set_kind(&mut self, id: &ItemId, kind: impl Into<String>) -> DomainResult<()> {
        let row = self.row_mut(id)?;
        row.kind = kind.into();
        Ok(())
    }

    fn row_mut(&mut self, id: &ItemId) -> DomainResult<&mut Row> {
        self.rows
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(id.clone()))
    }

    fn ensure_parent(&self, parent: Option<&ItemId>) -> DomainResult<()> {
        match parent {
            Some(p) if !self.rows.contains(p) => Err(DomainError::ParentNotFound(p.clone())),
            _ => Ok(()),
        }
    }

    /// Depth of `id` if it hangs below `parent`.
    ///
    /// Walks registered parents until a root or an unregistered id. Reaching
    /// `id` itself, or any id twice, means the chain is cyclic.
    #[instrument(level = "trace", skip(self))]
    fn resolve_level(&self, id: &ItemId, parent: Option<&ItemId>) -> DomainResult<usize> {
        let mut level = 0;
        let mut seen = HashSet::new();
        let mut current = parent;

        while let Some(pid) = current {
            if pid == id || !seen.insert(pid) {
                return Err(DomainError::CycleDetected(pid.clone()));
            }
            let Some(row) = self.rows.get(pid) else {
                break;
            };
            level += 1;
            current = row.parent.as_ref();
        }

        Ok(level)
    }

    /// Re-derives levels below `id` from the (already updated) level of `id`.
    fn cascade_levels(&mut self, id: &ItemId) {
        // Pre-order: every parent is fixed before its children
        let subtree: Vec<(ItemId, Option<ItemId>)> = self
            .descendants(id)
            .map(|row| (row.id.clone(), row.parent.clone()))
            .collect();

        for (child, parent) in subtree {
            let level = parent
                .as_ref()
                .and_then(|p| self.rows.get(p))
                .map_or(0, |p| p.level + 1);
            if let Some(row) = self.rows.get_mut(&child) {
                row.level = level;
            }
        }
        debug!(id = %id, "descendant levels recomputed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(id: i64, parent: Option<i64>, label: &str) -> ItemDto {
        ItemDto::new(id, parent.map(ItemId::Num), label)
    }

    fn chain() -> TreeStore {
        TreeStore::new(vec![
            dto(1, None, "a"),
            dto(2, Some(1), "b"),
            dto(3, Some(2), "c"),
        ])
        .unwrap()
    }

    #[test]
    fn given_self_parented_item_when_building_then_fails_with_cycle() {
        let result = TreeStore::new(vec![dto(1, Some(1), "loop")]);
        assert_eq!(result.unwrap_err(), DomainError::CycleDetected(ItemId::Num(1)));
    }

    #[test]
    fn given_mutual_parents_in_batch_when_building_then_fails_with_cycle() {
        // 1 is placed at level 0 (parent unknown yet); 2 would close the loop
        let result = TreeStore::new(vec![dto(1, Some(2), "a"), dto(2, Some(1), "b")]);
        assert_eq!(result.unwrap_err(), DomainError::CycleDetected(ItemId::Num(2)));
    }

    #[test]
    fn given_unknown_parent_in_batch_when_building_then_level_is_zero() {
        let store = TreeStore::new(vec![dto(2, Some(1), "early"), dto(1, None, "late")]).unwrap();
        assert_eq!(store.get_item(&ItemId::Num(2)).unwrap().level, 0);
        assert_eq!(store.get_parent(&ItemId::Num(1)), None);
    }

    #[test]
    fn given_reparent_under_descendant_when_updating_then_rejected_unchanged() {
        let mut store = chain();

        let err = store.update_item(dto(1, Some(3), "a")).unwrap_err();

        assert_eq!(err, DomainError::CycleDetected(ItemId::Num(1)));
        let row = store.get_item(&ItemId::Num(1)).unwrap();
        assert_eq!(row.parent, None);
        assert_eq!(row.level, 0);
    }

    #[test]
    fn given_reparent_under_itself_when_updating_then_rejected() {
        let mut store = chain();
        let err = store.update_item(dto(2, Some(2), "b")).unwrap_err();
        assert_eq!(err, DomainError::CycleDetected(ItemId::Num(2)));
    }

    #[test]
    fn given_preserve_policy_when_reparenting_then_descendant_levels_are_stale() {
        let mut store = chain();
        store.add_item(dto(10, None, "other")).unwrap();
        store.add_item(dto(11, Some(10), "deeper")).unwrap();

        store.update_item(dto(2, Some(11), "b")).unwrap();

        assert_eq!(store.get_item(&ItemId::Num(2)).unwrap().level, 2);
        assert_eq!(store.get_item(&ItemId::Num(3)).unwrap().level, 2);
    }

    #[test]
    fn given_cascade_policy_when_reparenting_then_descendant_levels_follow() {
        let options = StoreOptions {
            level_policy: LevelPolicy::Cascade,
        };
        let mut store = TreeStore::with_options(
            vec![
                dto(1, None, "a"),
                dto(2, Some(1), "b"),
                dto(3, Some(2), "c"),
                dto(4, Some(3), "d"),
                dto(10, None, "other"),
                dto(11, Some(10), "deeper"),
            ],
            options,
        )
        .unwrap();

        store.update_item(dto(2, Some(11), "b")).unwrap();

        let level = |n| store.get_item(&ItemId::Num(n)).unwrap().level;
        assert_eq!(level(2), 2);
        assert_eq!(level(3), 3);
        assert_eq!(level(4), 4);
        assert_eq!(level(1), 0);
    }

    #[test]
    fn given_ui_state_when_toggling_then_update_keeps_it() {
        let mut store = chain();
        assert!(store.toggle_expanded(&ItemId::Num(2)).unwrap());
        store.set_kind(&ItemId::Num(2), "group").unwrap();

        store.update_item(dto(2, None, "b2")).unwrap();

        let row = store.get_item(&ItemId::Num(2)).unwrap();
        assert!(row.expanded);
        assert_eq!(row.kind, "group");
        assert_eq!(row.level, 0);
        assert_eq!(row.label, "b2");
    }

    #[test]
    fn given_unknown_id_when_setting_ui_state_then_not_found() {
        let mut store = chain();
        assert_eq!(
            store.set_expanded(&ItemId::Num(99), true).unwrap_err(),
            DomainError::NotFound(ItemId::Num(99))
        );
        assert!(store.set_kind(&ItemId::Num(99), "x").is_err());
    }

    #[test]
    fn given_collapsed_and_expanded_rows_when_listing_visible_then_follows_flags() {
        let mut store = TreeStore::new(vec![
            dto(1, None, "a"),
            dto(2, Some(1), "b"),
            dto(3, Some(2), "c"),
            dto(4, Some(1), "d"),
            dto(5, None, "e"),
        ])
        .unwrap();

        let ids = |rows: Vec<&Row>| rows.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(store.visible_rows()), vec![ItemId::Num(1), ItemId::Num(5)]);

        store.set_expanded(&ItemId::Num(1), true).unwrap();
        assert_eq!(
            ids(store.visible_rows()),
            vec![ItemId::Num(1), ItemId::Num(2), ItemId::Num(4), ItemId::Num(5)]
        );

        store.set_expanded(&ItemId::Num(2), true).unwrap();
        assert_eq!(
            ids(store.visible_rows()),
            vec![
                ItemId::Num(1),
                ItemId::Num(2),
                ItemId::Num(3),
                ItemId::Num(4),
                ItemId::Num(5)
            ]
        );
    }
}
