//! Domain layer: the tree store and its entities
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod entities;
pub mod error;
pub mod store;
pub mod walk;

pub use arena::RowArena;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use store::{LevelPolicy, StoreOptions, TreeStore};
pub use walk::{Ancestors, Descendants, VisibleRows};
