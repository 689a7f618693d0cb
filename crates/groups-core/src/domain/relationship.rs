// ============================================================================
// Groups Core - Relationship Kind
// File: crates/groups-core/src/domain/relationship.rs
// Description: The four membership sets a user group owns
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which membership set of a group an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Users,
    Assistants,
    Services,
    Groups,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 4] = [
        RelationshipKind::Users,
        RelationshipKind::Assistants,
        RelationshipKind::Services,
        RelationshipKind::Groups,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Users => "users",
            RelationshipKind::Assistants => "assistants",
            RelationshipKind::Services => "services",
            RelationshipKind::Groups => "groups",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "users" => Some(RelationshipKind::Users),
            "assistants" => Some(RelationshipKind::Assistants),
            "services" => Some(RelationshipKind::Services),
            "groups" => Some(RelationshipKind::Groups),
            _ => None,
        }
    }

    /// Singular noun used in log lines and error messages.
    pub fn member_noun(&self) -> &'static str {
        match self {
            RelationshipKind::Users => "user",
            RelationshipKind::Assistants => "assistant",
            RelationshipKind::Services => "service",
            RelationshipKind::Groups => "group",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.member_noun())
    }
}
