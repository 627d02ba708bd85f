use std::sync::Arc;

use crate::chat::dispatcher::ChatTransport;
use crate::chat::modes::ModeRegistry;
use crate::config::Config;
use crate::export::DocumentExporter;
use crate::files::FileStore;
use crate::ocr::OcrService;
use crate::report::templates::TemplateStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The template catalog and mode registry are loaded once at startup and are
/// read-only thereafter. The four `dyn` slots are pluggable collaborators:
/// production implementations swap in without touching handler or pipeline
/// code.
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration. Collaborators capture their own limits at
    /// construction; kept for handlers that grow runtime knobs.
    #[allow(dead_code)]
    pub config: Config,
    pub templates: Arc<TemplateStore>,
    pub modes: Arc<ModeRegistry>,
    /// Outbound chat-completion transport. Default: reqwest-backed HTTP.
    pub transport: Arc<dyn ChatTransport>,
    /// Text recognition over uploaded documents. Default: canned mock.
    pub ocr: Arc<dyn OcrService>,
    /// Case-file metadata store. Default: in-memory map.
    pub files: Arc<dyn FileStore>,
    /// Report document renderer. Default: formatted plain text.
    pub exporter: Arc<dyn DocumentExporter>,
}
