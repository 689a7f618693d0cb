//! Application-wide constants

pub const API_PREFIX: &str = "/api/v1";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 900;

/// Cumulative size limit for a single upload request (2 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;
