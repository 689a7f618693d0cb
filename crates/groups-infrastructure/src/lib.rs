//! # Groups Infrastructure
//! 
//! Storage adapters for the group repository port.

pub mod database;

pub use database::{create_pool, run_migrations, MemoryGroupRepository, PgGroupRepository};
