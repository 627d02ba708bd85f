mod chat;
mod config;
mod errors;
mod export;
mod files;
mod ocr;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::dispatcher::{ChatTransport, HttpChatTransport};
use crate::chat::modes::ModeRegistry;
use crate::config::Config;
use crate::export::text::PlainTextExporter;
use crate::export::DocumentExporter;
use crate::files::memory::InMemoryFileStore;
use crate::files::FileStore;
use crate::ocr::{MockOcrService, OcrService};
use crate::report::templates::TemplateStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Adjuster API v{}", env!("CARGO_PKG_VERSION"));

    // Static catalogs, loaded once and read-only thereafter
    let templates = Arc::new(TemplateStore::new());
    let modes = Arc::new(ModeRegistry::new());
    info!(
        "Catalogs loaded: {} chapter templates, {} professional modes",
        templates.list().len(),
        modes.list().len()
    );

    // Pluggable collaborators — mock implementations stand in for the real
    // OCR/storage/export services
    let transport: Arc<dyn ChatTransport> = Arc::new(HttpChatTransport::new(
        Duration::from_secs(config.chat_timeout_secs),
    ));
    let ocr: Arc<dyn OcrService> = Arc::new(MockOcrService::new(Duration::from_millis(
        config.mock_ocr_delay_ms,
    )));
    let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
    let exporter: Arc<dyn DocumentExporter> = Arc::new(PlainTextExporter);

    let state = AppState {
        config: config.clone(),
        templates,
        modes,
        transport,
        ocr,
        files,
        exporter,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
