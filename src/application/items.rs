//! Items file: the TOML form of a batch of item DTOs.
//!
//! ```toml
//! [[items]]
//! id = 1
//! label = "Root"
//!
//! [[items]]
//! id = 2
//! parent = 1
//! label = "Child"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::ItemDto;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ItemsFile {
    pub items: Vec<ItemDto>,
}

/// Parse items file content. `path` is only used for error messages.
pub fn parse_items(content: &str, path: &Path) -> ApplicationResult<Vec<ItemDto>> {
    let file: ItemsFile = toml::from_str(content).map_err(|e| ApplicationError::InvalidItems {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(file.items)
}

#[instrument(level = "debug")]
pub fn load_items(path: &Path) -> ApplicationResult<Vec<ItemDto>> {
    let content = std::fs::read_to_string(path).with_path_context("read items", path)?;
    let items = parse_items(&content, path)?;
    debug!(count = items.len(), "items loaded");
    Ok(items)
}
