//! Axum route handlers for case-file upload, listing, and OCR.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::{format_file_size, FileMeta, OcrStatus};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Single(FileMeta),
    Many(Vec<FileMeta>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListEntry {
    #[serde(flatten)]
    pub meta: FileMeta,
    pub formatted_size: String,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileListEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub file_id: Uuid,
    pub text: String,
    pub confidence: f32,
    pub processed_at: DateTime<Utc>,
}

/// POST /api/v1/files/upload
///
/// Multipart upload of one (`file`) or many (`files`) case documents, with
/// an optional `report_id` text field. Only metadata is retained — the mock
/// store discards the bytes. A single uploaded file is echoed back as one
/// object, several as an array.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut report_id = "unassigned".to_string();
    let mut uploaded: Vec<FileMeta> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("report_id") => {
                report_id = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid report_id field: {e}")))?;
            }
            Some("file") | Some("files") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("unnamed")
                    .to_string();
                let file_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file: {e}")))?;

                uploaded.push(FileMeta {
                    id: Uuid::new_v4(),
                    report_id: String::new(), // set below once report_id is final
                    file_name,
                    file_type,
                    file_size_bytes: bytes.len() as u64,
                    ocr_status: OcrStatus::Pending,
                    uploaded_at: Utc::now(),
                });
            }
            _ => {}
        }
    }

    if uploaded.is_empty() {
        return Err(AppError::Validation("no file selected".to_string()));
    }

    for meta in &mut uploaded {
        meta.report_id = report_id.clone();
        state.files.save(meta.clone()).await?;
    }

    info!("uploaded {} file(s) for report {report_id}", uploaded.len());

    Ok(Json(if uploaded.len() == 1 {
        UploadResponse::Single(uploaded.remove(0))
    } else {
        UploadResponse::Many(uploaded)
    }))
}

/// GET /api/v1/files/list/:report_id
pub async fn handle_list_files(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Json<FileListResponse>, AppError> {
    let files = state.files.list(&report_id).await?;
    let total = files.len();
    let files = files
        .into_iter()
        .map(|meta| FileListEntry {
            formatted_size: format_file_size(meta.file_size_bytes),
            meta,
        })
        .collect();
    Ok(Json(FileListResponse { files, total }))
}

/// POST /api/v1/files/:file_id/ocr
///
/// Runs text recognition over one uploaded document and records the result
/// status on its metadata.
pub async fn handle_ocr(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<OcrResponse>, AppError> {
    let meta = state
        .files
        .get(file_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File {file_id} not found")))?;

    let outcome = match state.ocr.recognize(&meta).await {
        Ok(outcome) => outcome,
        Err(e) => {
            state.files.set_ocr_status(file_id, OcrStatus::Failed).await?;
            return Err(e);
        }
    };

    state
        .files
        .set_ocr_status(file_id, OcrStatus::Completed)
        .await?;

    Ok(Json(OcrResponse {
        file_id,
        text: outcome.text,
        confidence: outcome.confidence,
        processed_at: Utc::now(),
    }))
}
