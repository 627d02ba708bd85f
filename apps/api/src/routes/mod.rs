pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat_handlers;
use crate::errors::AppError;
use crate::export::handlers as export_handlers;
use crate::files::handlers as files_handlers;
use crate::report::handlers as report_handlers;
use crate::state::AppState;

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI assistant
        .route("/api/v1/ai/chat", post(chat_handlers::handle_chat))
        .route("/api/v1/ai/modes", get(chat_handlers::handle_list_modes))
        .route(
            "/api/v1/ai/generate/:report_id",
            post(report_handlers::handle_generate_chapter)
                .get(report_handlers::handle_generation_options),
        )
        // Template catalog (read-only here; custom-template CRUD lives in the
        // storage collaborator)
        .route(
            "/api/v1/templates",
            get(report_handlers::handle_list_templates).post(not_implemented),
        )
        .route(
            "/api/v1/templates/:id",
            get(report_handlers::handle_get_template)
                .put(not_implemented)
                .delete(not_implemented),
        )
        // Case files
        .route("/api/v1/files/upload", post(files_handlers::handle_upload))
        .route(
            "/api/v1/files/list/:report_id",
            get(files_handlers::handle_list_files),
        )
        .route("/api/v1/files/:file_id/ocr", post(files_handlers::handle_ocr))
        // Reports: persistence belongs to the storage collaborator; export is
        // the only live operation
        .route(
            "/api/v1/reports",
            get(not_implemented).post(not_implemented),
        )
        .route(
            "/api/v1/reports/:id",
            get(not_implemented).put(not_implemented).delete(not_implemented),
        )
        .route(
            "/api/v1/reports/export",
            post(export_handlers::handle_export_report),
        )
        .with_state(state)
}
