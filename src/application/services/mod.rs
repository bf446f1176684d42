//! Application services
//!
//! Concrete services that orchestrate the domain store with settings and
//! items file loading.

mod store;

pub use store::StoreService;
