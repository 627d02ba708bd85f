//! Axum route handler for report export.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::{ExportFormat, ReportDraft};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// POST /api/v1/reports/export?format=pdf|docx|txt
///
/// Renders the supplied report draft into a downloadable document. The
/// draft travels in the request body — report persistence belongs to the
/// caller, so there is nothing to look up here. Defaults to PDF.
pub async fn handle_export_report(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
    Json(draft): Json<ReportDraft>,
) -> Result<Response, AppError> {
    if draft.chapters.is_empty() {
        return Err(AppError::Validation(
            "report draft has no chapters to export".to_string(),
        ));
    }

    let format = query
        .format
        .as_deref()
        .map(ExportFormat::parse)
        .unwrap_or(ExportFormat::Pdf);

    let document = state.exporter.export(&draft, format).await?;

    let disposition = content_disposition(&document.file_name);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.mime_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, document.content.len())
        .body(document.content.into())
        .map_err(|e| AppError::Internal(e.into()))
}

/// Builds an attachment `Content-Disposition` with an RFC 5987 encoded
/// filename — the display name is Chinese, and header values must stay
/// ASCII.
fn content_disposition(file_name: &str) -> HeaderValue {
    let ascii_fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() { c } else { '_' })
        .collect();
    let encoded = percent_encode(file_name);

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{ascii_fallback}\"; filename*=UTF-8''{encoded}"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
