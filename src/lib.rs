//! treestore: in-memory hierarchical index over flat parent-referencing rows
//!
//! Architecture:
//! - `domain`: the tree store, its rows and structural walks (no I/O)
//! - `application`: items file loading and the store service
//! - `cli`: argument parsing and command dispatch
//! - `config`: layered settings

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{DomainError, DomainResult, ItemDto, ItemId, Row, TreeStore};
