// ============================================================================
// Groups Infrastructure - In-Memory User Group Repository
// File: crates/groups-infrastructure/src/database/memory/group_repo_impl.rs
// ============================================================================
//! Process-local storage with the same write semantics as the PostgreSQL
//! adapter. Members must be registered before they can join a group.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use groups_core::domain::{Group, GroupUpdate, MemberRef, RelationshipKind};
use groups_core::error::DomainError;
use groups_core::repositories::GroupRepository;
use groups_shared::config::MemberSeed;

#[derive(Debug, Clone)]
struct StoredGroup {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    version: i64,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
    members: HashMap<RelationshipKind, Vec<Uuid>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    groups: HashMap<Uuid, StoredGroup>,
    /// Tenant of every registered user, assistant and service
    directory: HashMap<(RelationshipKind, Uuid), Uuid>,
}

impl MemoryState {
    fn member_tenant(&self, kind: RelationshipKind, id: Uuid) -> Option<Uuid> {
        match kind {
            RelationshipKind::Groups => self.groups.get(&id).map(|g| g.tenant_id),
            _ => self.directory.get(&(kind, id)).copied(),
        }
    }

    fn resolve(&self, stored: &StoredGroup) -> Group {
        let mut group = Group {
            id: stored.id,
            tenant_id: stored.tenant_id,
            name: stored.name.clone(),
            version: stored.version,
            users: Vec::new(),
            assistants: Vec::new(),
            services: Vec::new(),
            groups: Vec::new(),
            created_at: stored.created_at,
            modified_at: stored.modified_at,
        };

        for kind in RelationshipKind::ALL {
            let ids = stored.members.get(&kind).map(Vec::as_slice).unwrap_or_default();
            *group.members_mut(kind) = ids
                .iter()
                .filter_map(|id| self.member_tenant(kind, *id).map(|t| MemberRef::new(*id, t)))
                .collect();
        }
        group
    }
}

#[derive(Default)]
pub struct MemoryGroupRepository {
    state: RwLock<MemoryState>,
}

impl MemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a user, assistant or service known to the store.
    pub async fn register_member(
        &self,
        kind: RelationshipKind,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<(), DomainError> {
        if kind == RelationshipKind::Groups {
            return Err(DomainError::ValidationError(
                "Groups are registered by creating them".to_string(),
            ));
        }

        self.state.write().await.directory.insert((kind, id), tenant_id);
        debug!(member_id = %id, kind = kind.as_str(), tenant_id = %tenant_id, "Member registered");
        Ok(())
    }

    /// Register members listed in configuration.
    pub async fn seed(&self, seeds: &[MemberSeed]) -> Result<(), DomainError> {
        for seed in seeds {
            let kind = RelationshipKind::from_str(&seed.kind).ok_or_else(|| {
                DomainError::ValidationError(format!("Unknown member kind {}", seed.kind))
            })?;
            let id = parse_uuid("id", &seed.id)?;
            let tenant_id = parse_uuid("tenant_id", &seed.tenant_id)?;
            self.register_member(kind, id, tenant_id).await?;
        }

        if !seeds.is_empty() {
            info!(count = seeds.len(), "Seeded in-memory member directory");
        }
        Ok(())
    }
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value)
        .map_err(|e| DomainError::ValidationError(format!("Invalid member {} {}: {}", field, value, e)))
}

#[async_trait]
impl GroupRepository for MemoryGroupRepository {
    async fn create(&self, group: &Group) -> Result<Group, DomainError> {
        let mut state = self.state.write().await;

        if state.groups.contains_key(&group.id) {
            return Err(DomainError::DatabaseError(format!(
                "duplicate key value for user group {}",
                group.id
            )));
        }

        let stored = StoredGroup {
            id: group.id,
            tenant_id: group.tenant_id,
            name: group.name.clone(),
            version: group.version,
            created_at: group.created_at,
            modified_at: group.modified_at,
            members: HashMap::new(),
        };
        let created = state.resolve(&stored);
        state.groups.insert(stored.id, stored);

        info!("User group created successfully: {}", created.id);
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, DomainError> {
        let state = self.state.read().await;
        Ok(state.groups.get(&id).map(|stored| state.resolve(stored)))
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Group>, DomainError> {
        let state = self.state.read().await;

        let mut stored: Vec<&StoredGroup> = state
            .groups
            .values()
            .filter(|g| g.tenant_id == tenant_id)
            .collect();
        stored.sort_by_key(|g| (g.created_at, g.id));

        Ok(stored.into_iter().map(|g| state.resolve(g)).collect())
    }

    async fn update(&self, update: &GroupUpdate) -> Result<Group, DomainError> {
        let mut state = self.state.write().await;

        let mut next = state
            .groups
            .get(&update.id)
            .cloned()
            .ok_or(DomainError::GroupNotFound(update.id))?;

        if next.version != update.expected_version {
            warn!(
                group_id = %update.id,
                expected = update.expected_version,
                found = next.version,
                "Stale user group version"
            );
            return Err(DomainError::ConcurrentModification(update.id));
        }

        if let Some(name) = &update.name {
            next.name = name.clone();
        }

        for kind in RelationshipKind::ALL {
            let Some(ids) = update.members(kind) else {
                continue;
            };
            if kind == RelationshipKind::Groups && ids.contains(&next.id) {
                return Err(DomainError::ValidationError(format!(
                    "User group {} cannot contain itself",
                    next.id
                )));
            }
            if let Some(missing) = ids.iter().find(|id| state.member_tenant(kind, **id).is_none()) {
                return Err(DomainError::MemberNotFound {
                    kind,
                    member_id: *missing,
                });
            }
            next.members.insert(kind, ids.to_vec());
        }

        next.version += 1;
        next.modified_at = Some(Utc::now());

        // Nothing is stored unless the resulting group is consistent
        let group = state.resolve(&next);
        group.check_relationships()?;

        state.groups.insert(next.id, next);
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        if state.groups.remove(&id).is_none() {
            return Ok(false);
        }

        // Mirror ON DELETE CASCADE on the group-in-group relationship
        for group in state.groups.values_mut() {
            if let Some(ids) = group.members.get_mut(&RelationshipKind::Groups) {
                ids.retain(|member| *member != id);
            }
        }
        Ok(true)
    }
}
