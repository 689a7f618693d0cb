// ============================================================================
// Groups Infrastructure - PostgreSQL User Group Repository
// File: crates/groups-infrastructure/src/database/postgres/group_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use groups_core::domain::{Group, GroupUpdate, MemberRef, RelationshipKind};
use groups_core::error::DomainError;
use groups_core::repositories::GroupRepository;

use super::schema::relationship_table;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserGroupRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<UserGroupRow> for Group {
    fn from(row: UserGroupRow) -> Self {
        Group {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            version: row.version,
            users: Vec::new(),
            assistants: Vec::new(),
            services: Vec::new(),
            groups: Vec::new(),
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MemberRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

fn error_code(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

async fn load_members(conn: &mut PgConnection, group: &mut Group) -> Result<(), DomainError> {
    for kind in RelationshipKind::ALL {
        let sql = relationship_table(kind).select_members();
        let rows: Vec<MemberRow> = sqlx::query_as(&sql)
            .bind(group.id)
            .fetch_all(&mut *conn)
            .await
            .map_err(db_error("loading group members"))?;

        *group.members_mut(kind) = rows
            .into_iter()
            .map(|r| MemberRef::new(r.id, r.tenant_id))
            .collect();
    }
    Ok(())
}

async fn fetch_group(conn: &mut PgConnection, id: Uuid) -> Result<Option<Group>, DomainError> {
    let row: Option<UserGroupRow> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, name, version, created_at, modified_at
        FROM user_groups
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error("finding user group by id"))?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut group: Group = row.into();
    load_members(conn, &mut group).await?;
    Ok(Some(group))
}

async fn replace_members(
    conn: &mut PgConnection,
    group_id: Uuid,
    kind: RelationshipKind,
    ids: &[Uuid],
) -> Result<(), DomainError> {
    let table = relationship_table(kind);

    sqlx::query(&table.delete_members_not_in())
        .bind(group_id)
        .bind(ids.to_vec())
        .execute(&mut *conn)
        .await
        .map_err(db_error("pruning group members"))?;

    let insert = table.insert_member();
    for member_id in ids {
        sqlx::query(&insert)
            .bind(group_id)
            .bind(member_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| match error_code(&e).as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => DomainError::MemberNotFound {
                    kind,
                    member_id: *member_id,
                },
                Some(CHECK_VIOLATION) => DomainError::ValidationError(format!(
                    "User group {} cannot contain itself",
                    group_id
                )),
                _ => db_error("inserting group member")(e),
            })?;
    }

    debug!(group_id = %group_id, kind = kind.as_str(), count = ids.len(), "Group members replaced");
    Ok(())
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn create(&self, group: &Group) -> Result<Group, DomainError> {
        info!("Creating user group: {}", group.name);

        let row: UserGroupRow = sqlx::query_as(
            r#"
            INSERT INTO user_groups (id, tenant_id, name, version, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, tenant_id, name, version, created_at, modified_at
            "#,
        )
        .bind(group.id)
        .bind(group.tenant_id)
        .bind(&group.name)
        .bind(group.version)
        .bind(group.created_at)
        .bind(group.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match error_code(&e).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => {
                DomainError::ValidationError(format!("Tenant {} does not exist", group.tenant_id))
            }
            _ => db_error("creating user group")(e),
        })?;

        info!("User group created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("acquiring connection"))?;

        fetch_group(&mut conn, id).await
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Group>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("acquiring connection"))?;

        let rows: Vec<UserGroupRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, version, created_at, modified_at
            FROM user_groups
            WHERE tenant_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error("listing user groups"))?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            let mut group: Group = row.into();
            load_members(&mut conn, &mut group).await?;
            groups.push(group);
        }
        Ok(groups)
    }

    async fn update(&self, update: &GroupUpdate) -> Result<Group, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("starting transaction"))?;

        let result = sqlx::query(
            r#"
            UPDATE user_groups
            SET
                name = COALESCE($3, name),
                version = version + 1,
                modified_at = NOW()
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(update.id)
        .bind(update.expected_version)
        .bind(&update.name)
        .execute(&mut *tx)
        .await
        .map_err(db_error("updating user group"))?;

        if result.rows_affected() == 0 {
            let current: Option<i64> =
                sqlx::query_scalar("SELECT version FROM user_groups WHERE id = $1")
                    .bind(update.id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_error("reading user group version"))?;

            return Err(match current {
                Some(version) => {
                    warn!(
                        group_id = %update.id,
                        expected = update.expected_version,
                        found = version,
                        "Stale user group version"
                    );
                    DomainError::ConcurrentModification(update.id)
                }
                None => DomainError::GroupNotFound(update.id),
            });
        }

        for kind in RelationshipKind::ALL {
            if let Some(ids) = update.members(kind) {
                replace_members(&mut tx, update.id, kind, ids).await?;
            }
        }

        let group = fetch_group(&mut tx, update.id)
            .await?
            .ok_or(DomainError::GroupNotFound(update.id))?;

        // Dropping the transaction on error rolls the write back
        group.check_relationships()?;

        tx.commit().await.map_err(db_error("committing user group update"))?;
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting user group"))?;

        Ok(result.rows_affected() > 0)
    }
}
