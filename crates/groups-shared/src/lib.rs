//! # Groups Shared
//! 
//! Configuration, telemetry, and common types shared by every crate of the
//! group membership service.

pub mod constants;
pub mod types;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
