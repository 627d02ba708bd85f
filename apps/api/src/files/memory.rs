//! In-memory `FileStore` backing the mock deployment.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::{FileMeta, FileStore, OcrStatus};

#[derive(Default)]
pub struct InMemoryFileStore {
    inner: RwLock<HashMap<Uuid, FileMeta>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn save(&self, meta: FileMeta) -> Result<(), AppError> {
        self.inner.write().await.insert(meta.id, meta);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<FileMeta>, AppError> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn list(&self, report_id: &str) -> Result<Vec<FileMeta>, AppError> {
        let mut files: Vec<FileMeta> = self
            .inner
            .read()
            .await
            .values()
            .filter(|f| f.report_id == report_id)
            .cloned()
            .collect();
        files.sort_by_key(|f| f.uploaded_at);
        Ok(files)
    }

    async fn set_ocr_status(&self, id: Uuid, status: OcrStatus) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let meta = inner
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("File {id} not found")))?;
        meta.ocr_status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn meta(report_id: &str, name: &str, offset_secs: i64) -> FileMeta {
        FileMeta {
            id: Uuid::new_v4(),
            report_id: report_id.to_string(),
            file_name: name.to_string(),
            file_type: "application/pdf".to_string(),
            file_size_bytes: 1024,
            ocr_status: OcrStatus::Pending,
            uploaded_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let store = InMemoryFileStore::new();
        let file = meta("r-1", "保险合同.pdf", 0);
        let id = file.id;
        store.save(file).await.unwrap();
        let loaded = store.get(id).await.unwrap().unwrap();
        assert_eq!(loaded.file_name, "保险合同.pdf");
    }

    #[tokio::test]
    async fn test_list_filters_by_report_and_sorts_by_upload_time() {
        let store = InMemoryFileStore::new();
        store.save(meta("r-1", "second.pdf", 10)).await.unwrap();
        store.save(meta("r-1", "first.pdf", 0)).await.unwrap();
        store.save(meta("r-2", "other.pdf", 5)).await.unwrap();

        let files = store.list("r-1").await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name, "first.pdf");
        assert_eq!(files[1].file_name, "second.pdf");
    }

    #[tokio::test]
    async fn test_set_ocr_status_updates_meta() {
        let store = InMemoryFileStore::new();
        let file = meta("r-1", "photo.jpg", 0);
        let id = file.id;
        store.save(file).await.unwrap();
        store.set_ocr_status(id, OcrStatus::Completed).await.unwrap();
        assert_eq!(
            store.get(id).await.unwrap().unwrap().ocr_status,
            OcrStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_set_ocr_status_on_unknown_file_fails() {
        let store = InMemoryFileStore::new();
        assert!(store
            .set_ocr_status(Uuid::new_v4(), OcrStatus::Completed)
            .await
            .is_err());
    }
}
