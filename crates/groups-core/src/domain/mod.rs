//! # Groups Core - Domain Module
//! 
//! Domain entities for the group membership service.

pub mod actor;
pub mod group;
pub mod relationship;

// Re-export all entities and enums
pub use actor::{Actor, Permission};
pub use group::{Group, GroupPatch, GroupUpdate, MemberRef};
pub use relationship::RelationshipKind;
