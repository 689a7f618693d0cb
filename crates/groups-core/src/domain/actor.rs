//! Authenticated caller and its permissions

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Permission enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Admin,
    Assistants,
    Services,
    Collections,
    Websites,
    Insights,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Admin => "admin",
            Permission::Assistants => "assistants",
            Permission::Services => "services",
            Permission::Collections => "collections",
            Permission::Websites => "websites",
            Permission::Insights => "insights",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Permission::Admin),
            "assistants" => Some(Permission::Assistants),
            "services" => Some(Permission::Services),
            "collections" => Some(Permission::Collections),
            "websites" => Some(Permission::Websites),
            "insights" => Some(Permission::Insights),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity performing an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub permissions: Vec<Permission>,
}

impl Actor {
    pub fn new(id: Uuid, tenant_id: Uuid, permissions: Vec<Permission>) -> Self {
        Self {
            id,
            tenant_id,
            permissions,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_admin(&self) -> bool {
        self.has_permission(Permission::Admin)
    }
}
