//! Persistence layer for the Rate Desk backend.
//!
//! This crate contains:
//! - The `EntityStore` trait and its in-memory, file and PostgreSQL backends
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Demo data seeding

pub mod db;
pub mod entities;
pub mod file;
pub mod memory;
pub mod metrics;
pub mod pg_store;
pub mod repositories;
pub mod seed;
pub mod store;

pub use file::FileStore;
pub use memory::{CatalogState, MemoryStore};
pub use pg_store::PgStore;
pub use store::{EntityStore, RateGuard, RateWrite, RateWriteContext, StoreError};
