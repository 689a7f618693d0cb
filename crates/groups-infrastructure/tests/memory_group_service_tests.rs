// Group service behaviour against the in-memory store

use std::sync::Arc;
use uuid::Uuid;

use groups_core::domain::{Actor, GroupPatch, GroupUpdate, Permission, RelationshipKind};
use groups_core::repositories::GroupRepository;
use groups_core::services::GroupService;
use groups_core::DomainError;
use groups_infrastructure::MemoryGroupRepository;
use groups_shared::config::MemberSeed;

struct Fixture {
    repo: Arc<MemoryGroupRepository>,
    service: GroupService<MemoryGroupRepository>,
    tenant: Uuid,
    admin: Actor,
}

fn fixture() -> Fixture {
    let repo = Arc::new(MemoryGroupRepository::new());
    let tenant = Uuid::new_v4();
    Fixture {
        service: GroupService::new(repo.clone()),
        repo,
        tenant,
        admin: Actor::new(Uuid::new_v4(), tenant, vec![Permission::Admin]),
    }
}

async fn user_in(fx: &Fixture, tenant: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    fx.repo
        .register_member(RelationshipKind::Users, id, tenant)
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn add_twice_then_remove_user() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let user = user_in(&fx, fx.tenant).await;

    let g = fx
        .service
        .add_member(&fx.admin, group.id, RelationshipKind::Users, user)
        .await
        .unwrap();
    assert_eq!(g.member_ids(RelationshipKind::Users), vec![user]);

    let g = fx
        .service
        .add_member(&fx.admin, group.id, RelationshipKind::Users, user)
        .await
        .unwrap();
    assert_eq!(g.member_ids(RelationshipKind::Users), vec![user]);

    let g = fx
        .service
        .remove_member(&fx.admin, group.id, RelationshipKind::Users, user)
        .await
        .unwrap();
    assert!(g.member_ids(RelationshipKind::Users).is_empty());
}

#[tokio::test]
async fn remove_absent_member_is_a_no_op() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();

    let g = fx
        .service
        .remove_member(&fx.admin, group.id, RelationshipKind::Assistants, Uuid::new_v4())
        .await
        .unwrap();
    assert!(g.assistants.is_empty());
    assert_eq!(g.version, group.version);
}

#[tokio::test]
async fn foreign_user_is_rejected_and_not_stored() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let stranger = user_in(&fx, Uuid::new_v4()).await;

    let err = fx
        .service
        .add_member(&fx.admin, group.id, RelationshipKind::Users, stranger)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::RelationshipViolation { kind: RelationshipKind::Users, member_id, .. }
            if member_id == stranger
    ));

    let stored = fx.service.get_group(&fx.admin, group.id).await.unwrap();
    assert!(stored.users.is_empty());
    assert_eq!(stored.version, group.version);
}

#[tokio::test]
async fn update_group_with_foreign_member_is_rejected() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let local = user_in(&fx, fx.tenant).await;
    let stranger = user_in(&fx, Uuid::new_v4()).await;

    let patch = GroupPatch {
        name: Some("Reviewers".to_string()),
        users: Some(vec![local, stranger]),
        ..GroupPatch::default()
    };
    let err = fx
        .service
        .update_group(&fx.admin, group.id, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::RelationshipViolation { .. }));

    let stored = fx.service.get_group(&fx.admin, group.id).await.unwrap();
    assert_eq!(stored.name, "Editors");
    assert!(stored.users.is_empty());
}

#[tokio::test]
async fn update_group_applies_only_present_fields() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let user = user_in(&fx, fx.tenant).await;
    fx.service
        .add_member(&fx.admin, group.id, RelationshipKind::Users, user)
        .await
        .unwrap();

    let patch = GroupPatch {
        name: Some("Reviewers".to_string()),
        ..GroupPatch::default()
    };
    let updated = fx.service.update_group(&fx.admin, group.id, patch).await.unwrap();
    assert_eq!(updated.name, "Reviewers");
    assert_eq!(updated.member_ids(RelationshipKind::Users), vec![user]);

    let cleared = fx
        .service
        .update_group(
            &fx.admin,
            group.id,
            GroupPatch {
                users: Some(vec![]),
                ..GroupPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.name, "Reviewers");
    assert!(cleared.users.is_empty());
}

#[tokio::test]
async fn groups_of_other_tenants_are_not_found() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let outsider = Actor::new(Uuid::new_v4(), Uuid::new_v4(), vec![Permission::Admin]);

    for result in [
        fx.service.get_group(&outsider, group.id).await.map(|_| ()),
        fx.service.delete_group(&outsider, group.id).await,
        fx.service
            .add_member(&outsider, group.id, RelationshipKind::Users, Uuid::new_v4())
            .await
            .map(|_| ()),
    ] {
        assert!(matches!(result, Err(DomainError::GroupNotFound(id)) if id == group.id));
    }

    assert!(fx.service.list_groups(&outsider).await.unwrap().is_empty());
    assert_eq!(fx.service.list_groups(&fx.admin).await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_admin_cannot_read_or_mutate() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let user = user_in(&fx, fx.tenant).await;
    let viewer = Actor::new(Uuid::new_v4(), fx.tenant, vec![Permission::Insights]);

    let err = fx
        .service
        .add_member(&viewer, group.id, RelationshipKind::Users, user)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AuthorizationError { .. }));

    let err = fx.service.get_group(&viewer, group.id).await.unwrap_err();
    assert!(matches!(err, DomainError::AuthorizationError { .. }));

    let stored = fx.service.get_group(&fx.admin, group.id).await.unwrap();
    assert!(stored.users.is_empty());
}

#[tokio::test]
async fn second_delete_is_not_found() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();

    fx.service.delete_group(&fx.admin, group.id).await.unwrap();
    let err = fx.service.delete_group(&fx.admin, group.id).await.unwrap_err();
    assert!(matches!(err, DomainError::GroupNotFound(_)));
}

#[tokio::test]
async fn deleting_a_group_removes_it_from_parents() {
    let fx = fixture();
    let parent = fx.service.create_group(&fx.admin, "Parent").await.unwrap();
    let child = fx.service.create_group(&fx.admin, "Child").await.unwrap();

    let g = fx
        .service
        .add_member(&fx.admin, parent.id, RelationshipKind::Groups, child.id)
        .await
        .unwrap();
    assert_eq!(g.member_ids(RelationshipKind::Groups), vec![child.id]);

    fx.service.delete_group(&fx.admin, child.id).await.unwrap();
    let parent = fx.service.get_group(&fx.admin, parent.id).await.unwrap();
    assert!(parent.groups.is_empty());
}

#[tokio::test]
async fn unknown_member_is_reported() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let ghost = Uuid::new_v4();

    let err = fx
        .service
        .add_member(&fx.admin, group.id, RelationshipKind::Services, ghost)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::MemberNotFound { kind: RelationshipKind::Services, member_id } if member_id == ghost
    ));
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let fx = fixture();
    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let first = user_in(&fx, fx.tenant).await;
    let second = user_in(&fx, fx.tenant).await;

    // Two writers computed their lists from the same read
    let mut a = GroupUpdate::new(&group);
    a.set_members(RelationshipKind::Users, vec![first]);
    let mut b = GroupUpdate::new(&group);
    b.set_members(RelationshipKind::Users, vec![second]);

    fx.repo.update(&a).await.unwrap();
    let err = fx.repo.update(&b).await.unwrap_err();
    assert!(matches!(err, DomainError::ConcurrentModification(id) if id == group.id));

    let stored = fx.service.get_group(&fx.admin, group.id).await.unwrap();
    assert_eq!(stored.member_ids(RelationshipKind::Users), vec![first]);
    assert_eq!(stored.version, group.version + 1);
}

fn seed(kind: &str, id: &str, tenant_id: &str) -> MemberSeed {
    MemberSeed {
        kind: kind.to_string(),
        id: id.to_string(),
        tenant_id: tenant_id.to_string(),
    }
}

#[tokio::test]
async fn seeded_members_can_join_groups() {
    let fx = fixture();
    let service_id = Uuid::new_v4();
    fx.repo
        .seed(&[seed("services", &service_id.to_string(), &fx.tenant.to_string())])
        .await
        .unwrap();

    let group = fx.service.create_group(&fx.admin, "Editors").await.unwrap();
    let g = fx
        .service
        .add_member(&fx.admin, group.id, RelationshipKind::Services, service_id)
        .await
        .unwrap();
    assert_eq!(g.member_ids(RelationshipKind::Services), vec![service_id]);
}

#[tokio::test]
async fn malformed_seeds_are_rejected() {
    let fx = fixture();
    let tenant = fx.tenant.to_string();
    let id = Uuid::new_v4().to_string();

    for bad in [
        seed("groups", &id, &tenant),
        seed("robots", &id, &tenant),
        seed("users", "not-a-uuid", &tenant),
    ] {
        let err = fx.repo.seed(&[bad]).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
