// ============================================================================
// Groups Core - User Group Entity
// File: crates/groups-core/src/domain/group.rs
// Description: Tenant-scoped group owning four membership sets
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::RelationshipKind;
use crate::error::DomainError;

/// A member of a group, together with the tenant the member belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: Uuid,
    pub tenant_id: Uuid,
}

impl MemberRef {
    pub fn new(id: Uuid, tenant_id: Uuid) -> Self {
        Self { id, tenant_id }
    }
}

/// User group entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Group {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Group name must be between 1 and 255 characters"))]
    pub name: String,

    /// Bumped by every persisted update; writers must present the version
    /// they read.
    pub version: i64,

    pub users: Vec<MemberRef>,
    pub assistants: Vec<MemberRef>,
    pub services: Vec<MemberRef>,
    pub groups: Vec<MemberRef>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Group {
    pub fn new(tenant_id: Uuid, name: String) -> Result<Self, validator::ValidationErrors> {
        let group = Self {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.trim().to_string(),
            version: 1,
            users: Vec::new(),
            assistants: Vec::new(),
            services: Vec::new(),
            groups: Vec::new(),
            created_at: Utc::now(),
            modified_at: None,
        };

        group.validate()?;
        Ok(group)
    }

    pub fn members(&self, kind: RelationshipKind) -> &[MemberRef] {
        match kind {
            RelationshipKind::Users => &self.users,
            RelationshipKind::Assistants => &self.assistants,
            RelationshipKind::Services => &self.services,
            RelationshipKind::Groups => &self.groups,
        }
    }

    pub fn members_mut(&mut self, kind: RelationshipKind) -> &mut Vec<MemberRef> {
        match kind {
            RelationshipKind::Users => &mut self.users,
            RelationshipKind::Assistants => &mut self.assistants,
            RelationshipKind::Services => &mut self.services,
            RelationshipKind::Groups => &mut self.groups,
        }
    }

    pub fn member_ids(&self, kind: RelationshipKind) -> Vec<Uuid> {
        self.members(kind).iter().map(|m| m.id).collect()
    }

    pub fn has_member(&self, kind: RelationshipKind, member_id: Uuid) -> bool {
        self.members(kind).iter().any(|m| m.id == member_id)
    }

    /// Every member of every set must share the group's tenant.
    pub fn check_relationships(&self) -> Result<(), DomainError> {
        for kind in RelationshipKind::ALL {
            if let Some(member) = self
                .members(kind)
                .iter()
                .find(|m| m.tenant_id != self.tenant_id)
            {
                return Err(DomainError::RelationshipViolation {
                    group_id: self.id,
                    kind,
                    member_id: member.id,
                });
            }
        }
        Ok(())
    }
}

/// Partial update requested by a caller. Absent fields are left untouched;
/// a present membership list replaces the whole set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GroupPatch {
    #[validate(length(min = 1, max = 255, message = "Group name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    pub users: Option<Vec<Uuid>>,
    pub assistants: Option<Vec<Uuid>>,
    pub services: Option<Vec<Uuid>>,
    pub groups: Option<Vec<Uuid>>,
}

impl GroupPatch {
    pub fn members(&self, kind: RelationshipKind) -> Option<&[Uuid]> {
        match kind {
            RelationshipKind::Users => self.users.as_deref(),
            RelationshipKind::Assistants => self.assistants.as_deref(),
            RelationshipKind::Services => self.services.as_deref(),
            RelationshipKind::Groups => self.groups.as_deref(),
        }
    }
}

/// Write handed to the repository, carrying the version it was computed from
#[derive(Debug, Clone, PartialEq)]
pub struct GroupUpdate {
    pub id: Uuid,
    pub expected_version: i64,
    pub name: Option<String>,
    pub users: Option<Vec<Uuid>>,
    pub assistants: Option<Vec<Uuid>>,
    pub services: Option<Vec<Uuid>>,
    pub groups: Option<Vec<Uuid>>,
}

impl GroupUpdate {
    pub fn new(group: &Group) -> Self {
        Self {
            id: group.id,
            expected_version: group.version,
            name: None,
            users: None,
            assistants: None,
            services: None,
            groups: None,
        }
    }

    pub fn members(&self, kind: RelationshipKind) -> Option<&[Uuid]> {
        match kind {
            RelationshipKind::Users => self.users.as_deref(),
            RelationshipKind::Assistants => self.assistants.as_deref(),
            RelationshipKind::Services => self.services.as_deref(),
            RelationshipKind::Groups => self.groups.as_deref(),
        }
    }

    /// Replace one membership list. Duplicate ids are dropped, first
    /// occurrence wins.
    pub fn set_members(&mut self, kind: RelationshipKind, ids: Vec<Uuid>) {
        let mut unique: Vec<Uuid> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        let slot = match kind {
            RelationshipKind::Users => &mut self.users,
            RelationshipKind::Assistants => &mut self.assistants,
            RelationshipKind::Services => &mut self.services,
            RelationshipKind::Groups => &mut self.groups,
        };
        *slot = Some(unique);
    }
}
