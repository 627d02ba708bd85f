//! Case-file collaborator — upload metadata and per-report listing.
//!
//! `FileStore` is the abstract seam: the default [`memory::InMemoryFileStore`]
//! stands in for a real object store, which swaps in without touching the
//! handlers or the pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub mod handlers;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrStatus {
    Pending,
    Completed,
    Failed,
}

/// Metadata for one uploaded case document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub id: Uuid,
    pub report_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size_bytes: u64,
    pub ocr_status: OcrStatus,
    pub uploaded_at: DateTime<Utc>,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn save(&self, meta: FileMeta) -> Result<(), AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<FileMeta>, AppError>;
    /// Files for one report, oldest upload first.
    async fn list(&self, report_id: &str) -> Result<Vec<FileMeta>, AppError>;
    async fn set_ocr_status(&self, id: Uuid, status: OcrStatus) -> Result<(), AppError>;
}

/// Human-readable size for file listings.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{} KB", bytes.div_ceil(1024))
    } else {
        format!("{} MB", bytes / (1024 * 1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_units() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
    }
}
