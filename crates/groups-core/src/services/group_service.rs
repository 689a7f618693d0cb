// ============================================================================
// Groups Core - User Group Service
// File: crates/groups-core/src/services/group_service.rs
// ============================================================================
//! Group CRUD and membership management with tenant isolation

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Actor, Group, GroupPatch, GroupUpdate, Permission, RelationshipKind};
use crate::error::DomainError;
use crate::repositories::GroupRepository;
use crate::services::authorization::ensure_permission;

/// Service for managing user groups and their members
pub struct GroupService<R: GroupRepository + ?Sized> {
    group_repo: Arc<R>,
}

impl<R: GroupRepository + ?Sized> GroupService<R> {
    pub fn new(group_repo: Arc<R>) -> Self {
        Self { group_repo }
    }

    /// Load a group owned by the actor's tenant.
    ///
    /// Groups of other tenants are reported as not found.
    pub async fn get_group(&self, actor: &Actor, group_id: Uuid) -> Result<Group, DomainError> {
        ensure_permission(actor, Permission::Admin)?;
        self.load_group(actor, group_id).await
    }

    pub async fn create_group(&self, actor: &Actor, name: &str) -> Result<Group, DomainError> {
        ensure_permission(actor, Permission::Admin)?;

        let group = Group::new(actor.tenant_id, name.to_string())?;
        let created = self.group_repo.create(&group).await?;

        info!(
            actor_id = %actor.id,
            group_id = %created.id,
            tenant_id = %created.tenant_id,
            "User group created"
        );
        Ok(created)
    }

    pub async fn update_group(
        &self,
        actor: &Actor,
        group_id: Uuid,
        patch: GroupPatch,
    ) -> Result<Group, DomainError> {
        ensure_permission(actor, Permission::Admin)?;
        patch.validate()?;

        let group = self.load_group(actor, group_id).await?;

        let mut update = GroupUpdate::new(&group);
        update.name = patch.name.as_deref().map(|n| n.trim().to_string());
        if update.name.as_deref() == Some("") {
            return Err(DomainError::ValidationError(
                "Group name must not be blank".to_string(),
            ));
        }
        for kind in RelationshipKind::ALL {
            if let Some(ids) = patch.members(kind) {
                Self::reject_self_membership(&group, kind, ids)?;
                update.set_members(kind, ids.to_vec());
            }
        }

        let updated = self.group_repo.update(&update).await?;
        self.check_relationships(actor, &updated)?;

        info!(actor_id = %actor.id, group_id = %updated.id, version = updated.version, "User group updated");
        Ok(updated)
    }

    pub async fn delete_group(&self, actor: &Actor, group_id: Uuid) -> Result<(), DomainError> {
        ensure_permission(actor, Permission::Admin)?;

        let group = self.load_group(actor, group_id).await?;

        if !self.group_repo.delete(group.id).await? {
            // Lost a race with another delete
            warn!(group_id = %group_id, "User group vanished before delete");
            return Err(DomainError::GroupNotFound(group_id));
        }

        info!(actor_id = %actor.id, group_id = %group_id, "User group deleted");
        Ok(())
    }

    pub async fn list_groups(&self, actor: &Actor) -> Result<Vec<Group>, DomainError> {
        ensure_permission(actor, Permission::Admin)?;
        self.group_repo.list_by_tenant(actor.tenant_id).await
    }

    /// Add a member to one membership set. Adding an existing member is a
    /// no-op.
    pub async fn add_member(
        &self,
        actor: &Actor,
        group_id: Uuid,
        kind: RelationshipKind,
        member_id: Uuid,
    ) -> Result<Group, DomainError> {
        ensure_permission(actor, Permission::Admin)?;

        let group = self.load_group(actor, group_id).await?;
        Self::reject_self_membership(&group, kind, &[member_id])?;

        let mut ids = group.member_ids(kind);
        if ids.contains(&member_id) {
            self.check_relationships(actor, &group)?;
            return Ok(group);
        }
        ids.push(member_id);

        let updated = self.replace_members(actor, &group, kind, ids).await?;
        info!(
            actor_id = %actor.id,
            group_id = %group_id,
            member_id = %member_id,
            kind = kind.as_str(),
            "Member added to user group"
        );
        Ok(updated)
    }

    /// Remove a member from one membership set. Removing an absent member
    /// is a no-op.
    pub async fn remove_member(
        &self,
        actor: &Actor,
        group_id: Uuid,
        kind: RelationshipKind,
        member_id: Uuid,
    ) -> Result<Group, DomainError> {
        ensure_permission(actor, Permission::Admin)?;

        let group = self.load_group(actor, group_id).await?;

        let mut ids = group.member_ids(kind);
        let before = ids.len();
        ids.retain(|id| *id != member_id);
        if ids.len() == before {
            self.check_relationships(actor, &group)?;
            return Ok(group);
        }

        let updated = self.replace_members(actor, &group, kind, ids).await?;
        info!(
            actor_id = %actor.id,
            group_id = %group_id,
            member_id = %member_id,
            kind = kind.as_str(),
            "Member removed from user group"
        );
        Ok(updated)
    }

    async fn replace_members(
        &self,
        actor: &Actor,
        group: &Group,
        kind: RelationshipKind,
        ids: Vec<Uuid>,
    ) -> Result<Group, DomainError> {
        let mut update = GroupUpdate::new(group);
        update.set_members(kind, ids);

        let updated = match self.group_repo.update(&update).await {
            Ok(updated) => updated,
            Err(e @ DomainError::RelationshipViolation { .. }) => {
                Self::log_violation(actor, &e);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        // The whole group is re-checked, not just the touched set
        self.check_relationships(actor, &updated)?;
        Ok(updated)
    }

    async fn load_group(&self, actor: &Actor, group_id: Uuid) -> Result<Group, DomainError> {
        let group = self.group_repo.find_by_id(group_id).await?;
        Self::ensure_visible(actor, group, group_id)
    }

    fn check_relationships(&self, actor: &Actor, group: &Group) -> Result<(), DomainError> {
        group.check_relationships().inspect_err(|e| Self::log_violation(actor, e))
    }

    fn log_violation(actor: &Actor, violation: &DomainError) {
        if let DomainError::RelationshipViolation { group_id, kind, member_id } = violation {
            error!(
                actor_id = %actor.id,
                group_id = %group_id,
                member_id = %member_id,
                kind = kind.as_str(),
                "Group {} holds {} {} from another tenant (actor {})",
                group_id,
                kind,
                member_id,
                actor.id
            );
        }
    }

    fn ensure_visible(
        actor: &Actor,
        group: Option<Group>,
        group_id: Uuid,
    ) -> Result<Group, DomainError> {
        match group {
            Some(group) if group.tenant_id == actor.tenant_id => Ok(group),
            Some(group) => {
                warn!(
                    actor_id = %actor.id,
                    actor_tenant = %actor.tenant_id,
                    group_tenant = %group.tenant_id,
                    group_id = %group_id,
                    "Cross-tenant group access"
                );
                Err(DomainError::GroupNotFound(group_id))
            }
            None => Err(DomainError::GroupNotFound(group_id)),
        }
    }

    fn reject_self_membership(
        group: &Group,
        kind: RelationshipKind,
        ids: &[Uuid],
    ) -> Result<(), DomainError> {
        if kind == RelationshipKind::Groups && ids.contains(&group.id) {
            return Err(DomainError::ValidationError(format!(
                "User group {} cannot contain itself",
                group.id
            )));
        }
        Ok(())
    }
}
