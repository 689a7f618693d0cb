//! Upload validation: MIME allow-list, cumulative size limit, checksums

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::DomainError;

const TEXT_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/markdown",
    "text/csv",
    "text/html",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

const IMAGE_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// An uploaded file held in memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

pub struct FileSizeService;

impl FileSizeService {
    pub fn is_supported_type(content_type: &str) -> bool {
        // Drop parameters such as "; charset=utf-8"
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        TEXT_MIME_TYPES.contains(&essence.as_str()) || IMAGE_MIME_TYPES.contains(&essence.as_str())
    }

    pub fn validate_file_types(files: &[UploadedFile]) -> Result<(), DomainError> {
        for file in files {
            if !Self::is_supported_type(&file.content_type) {
                warn!(file_name = %file.file_name, content_type = %file.content_type, "Unsupported upload type");
                return Err(DomainError::FileNotSupported(format!(
                    "{} files is not supported",
                    file.content_type
                )));
            }
        }
        Ok(())
    }

    pub fn is_too_large(content: &[u8], max_size: u64) -> bool {
        content.len() as u64 > max_size
    }

    /// The limit applies to the sum of all files, not to each file.
    pub fn validate_file_sizes(files: &[UploadedFile], max_total: u64) -> Result<(), DomainError> {
        let mut total: u64 = 0;
        for file in files {
            total = total.saturating_add(file.size());
            if total > max_total {
                warn!(total, max_total, "Upload exceeds size limit");
                return Err(DomainError::FileTooLarge);
            }
        }
        debug!(total, files = files.len(), "Upload size accepted");
        Ok(())
    }

    /// Lowercase hex SHA-256 digest.
    pub fn checksum(content: &[u8]) -> String {
        hex::encode(Sha256::digest(content))
    }
}
