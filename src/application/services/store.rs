//! Store service: builds tree stores from items files using the settings.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::items::load_items;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{expand_path, Settings};
use crate::domain::{DomainError, ItemDto, ItemId, TreeStore};

/// Opens items files and applies store-level operations that need settings.
#[derive(Debug, Clone, Default)]
pub struct StoreService {
    settings: Settings,
}

impl StoreService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// The explicit path if given, else the configured `items_file`.
    pub fn resolve_items_path(&self, explicit: Option<&Path>) -> ApplicationResult<PathBuf> {
        explicit
            .map(expand_path)
            .or_else(|| self.settings.items_file.clone())
            .ok_or(ApplicationError::NoItemsFile)
    }

    /// Build a store from items using the configured level policy.
    pub fn build(&self, items: Vec<ItemDto>) -> ApplicationResult<TreeStore> {
        Ok(TreeStore::with_options(items, self.settings.store_options())?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn open(&self, explicit: Option<&Path>) -> ApplicationResult<TreeStore> {
        let path = self.resolve_items_path(explicit)?;
        let items = load_items(&path)?;
        let store = self.build(items)?;
        debug!(path = %path.display(), rows = store.len(), "store opened");
        Ok(store)
    }

    /// Reparent `id` keeping its label; `None` makes it a top-level row.
    #[instrument(level = "debug", skip(self, store))]
    pub fn move_item(
        &self,
        store: &mut TreeStore,
        id: &ItemId,
        parent: Option<ItemId>,
    ) -> ApplicationResult<()> {
        let label = store
            .get_item(id)
            .map(|row| row.label.clone())
            .ok_or_else(|| DomainError::NotFound(id.clone()))?;
        store.update_item(ItemDto {
            id: id.clone(),
            parent,
            label,
        })?;
        Ok(())
    }
}
