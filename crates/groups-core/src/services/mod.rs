//! Domain services (business logic)

pub mod authorization;
pub mod group_service;
pub mod file_size_service;

pub use authorization::ensure_permission;
pub use group_service::GroupService;
pub use file_size_service::{FileSizeService, UploadedFile};
