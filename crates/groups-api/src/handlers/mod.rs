//! HTTP handlers

pub mod files;
pub mod groups;
pub mod health;
