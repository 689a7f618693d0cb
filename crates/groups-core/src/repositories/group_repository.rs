//! User group repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, GroupUpdate};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, group: &Group) -> Result<Group, DomainError>;

    /// Loads the group with every membership set resolved to `MemberRef`s.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, DomainError>;

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Group>, DomainError>;

    /// Applies `update` as one atomic read-modify-write.
    ///
    /// Implementations must fail with `ConcurrentModification` when the
    /// stored version differs from `update.expected_version`, with
    /// `MemberNotFound` for unknown member ids, and must leave storage
    /// untouched when the resulting group fails
    /// [`Group::check_relationships`].
    async fn update(&self, update: &GroupUpdate) -> Result<Group, DomainError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
