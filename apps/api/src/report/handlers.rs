//! Axum route handlers for chapter generation and the template catalog.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::report::generator::generate;
use crate::report::templates::Template;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateChapterRequest {
    pub chapter_type: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateChapterResponse {
    pub generated_content: String,
    pub chapter_type: String,
    pub generated_at: DateTime<Utc>,
    pub model_used: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SupportedChapter {
    pub id: &'static str,
    pub title: &'static str,
    pub supported: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerationOptionsResponse {
    pub supported_chapters: Vec<SupportedChapter>,
    pub backends: serde_json::Value,
    pub settings: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
    pub total: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/generate/:report_id
///
/// Renders the chapter template for `chapter_type`, prepending the optional
/// free-text context as a framing block. Placeholders stay bracketed — the
/// assessor fills them in the editor. The report id is routing context only;
/// the caller owns the report itself.
pub async fn handle_generate_chapter(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(request): Json<GenerateChapterRequest>,
) -> Result<Json<GenerateChapterResponse>, AppError> {
    if request.chapter_type.trim().is_empty() {
        return Err(AppError::Validation(
            "chapter_type cannot be empty".to_string(),
        ));
    }

    let rendered = generate(&state.templates, &request.chapter_type, &request.context)?;

    info!(
        "generated {} chapter for report {report_id}",
        rendered.source_template_id
    );

    Ok(Json(GenerateChapterResponse {
        generated_content: rendered.text,
        chapter_type: rendered.source_template_id,
        generated_at: rendered.generated_at,
        model_used: "template",
    }))
}

/// GET /api/v1/ai/generate/:report_id
///
/// Lists the chapter types the template backend supports plus the available
/// generation backends. LLM backends stay listed but unavailable until a
/// real generative backend replaces the template engine.
pub async fn handle_generation_options(
    State(state): State<AppState>,
) -> Json<GenerationOptionsResponse> {
    let supported_chapters = state
        .templates
        .list()
        .iter()
        .map(|t| SupportedChapter {
            id: t.id,
            title: t.title,
            supported: true,
        })
        .collect();

    Json(GenerationOptionsResponse {
        supported_chapters,
        backends: json!([
            { "id": "template", "name": "模板生成", "available": true },
            { "id": "openai", "name": "GPT-4", "available": false, "reason": "需要配置API密钥" },
            { "id": "qianwen", "name": "通义千问", "available": false, "reason": "需要配置API密钥" }
        ]),
        settings: json!({
            "max_context_length": 4000,
            "default_model": "template"
        }),
    })
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates: Vec<Template> = state.templates.list().to_vec();
    let total = templates.len();
    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>, AppError> {
    state
        .templates
        .lookup(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}
