//! Table lookup for the four membership relationships

use groups_core::RelationshipKind;

pub(crate) struct RelationshipTable {
    pub join_table: &'static str,
    pub member_table: &'static str,
    pub member_column: &'static str,
}

pub(crate) fn relationship_table(kind: RelationshipKind) -> RelationshipTable {
    match kind {
        RelationshipKind::Users => RelationshipTable {
            join_table: "user_groups_users",
            member_table: "users",
            member_column: "user_id",
        },
        RelationshipKind::Assistants => RelationshipTable {
            join_table: "user_groups_assistants",
            member_table: "assistants",
            member_column: "assistant_id",
        },
        RelationshipKind::Services => RelationshipTable {
            join_table: "user_groups_services",
            member_table: "services",
            member_column: "service_id",
        },
        RelationshipKind::Groups => RelationshipTable {
            join_table: "user_groups_groups",
            member_table: "user_groups",
            member_column: "member_group_id",
        },
    }
}

impl RelationshipTable {
    pub fn select_members(&self) -> String {
        format!(
            "SELECT m.id, m.tenant_id FROM {join} j JOIN {member} m ON m.id = j.{column} \
             WHERE j.user_group_id = $1 ORDER BY j.created_at, m.id",
            join = self.join_table,
            member = self.member_table,
            column = self.member_column,
        )
    }

    /// Drops every row whose member id is not in the `$2` array.
    pub fn delete_members_not_in(&self) -> String {
        format!(
            "DELETE FROM {} WHERE user_group_id = $1 AND NOT ({} = ANY($2))",
            self.join_table, self.member_column
        )
    }

    pub fn insert_member(&self) -> String {
        format!(
            "INSERT INTO {} (user_group_id, {}, created_at) VALUES ($1, $2, clock_timestamp()) \
             ON CONFLICT DO NOTHING",
            self.join_table, self.member_column
        )
    }
}
