//! Application layer: items loading and services
//!
//! This layer feeds the domain store from files and settings.

pub mod error;
pub mod error_ext;
pub mod items;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use items::{load_items, parse_items, ItemsFile};
