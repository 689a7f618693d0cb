//! PostgreSQL repository implementations

pub mod group_repo_impl;
mod schema;

pub use group_repo_impl::PgGroupRepository;
