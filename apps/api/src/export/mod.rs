//! Report export collaborator.
//!
//! `DocumentExporter` is the abstract seam; [`text::PlainTextExporter`]
//! renders the formatted text rendition. Real PDF/DOCX binary generation is
//! out of scope — those formats return the text rendition under the target
//! MIME type until a production exporter swaps in.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;

pub mod handlers;
pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Txt,
}

impl ExportFormat {
    /// Parses a `format` query value; unrecognized values degrade to plain
    /// text.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "word" | "docx" => Self::Docx,
            "txt" => Self::Txt,
            _ => Self::Txt,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Txt => "text/plain; charset=utf-8",
        }
    }
}

/// A report draft supplied by the caller for export. The caller owns
/// persistence; nothing is looked up server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportDraft {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub chapters: Vec<ReportChapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportChapter {
    pub title: String,
    pub content: String,
}

/// A fully rendered export artifact.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: Vec<u8>,
}

#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(
        &self,
        draft: &ReportDraft,
        format: ExportFormat,
    ) -> Result<ExportedDocument, AppError>;
}
