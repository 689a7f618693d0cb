//! In-memory repository implementation

pub mod group_repo_impl;

pub use group_repo_impl::MemoryGroupRepository;
