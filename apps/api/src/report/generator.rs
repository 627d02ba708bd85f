//! Chapter generation orchestrator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::report::substitution::render;
use crate::report::templates::TemplateStore;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unsupported chapter type: {0}")]
    UnsupportedChapterType(String),
}

impl ReportError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedChapterType(_) => "UNSUPPORTED_CHAPTER_TYPE",
        }
    }
}

/// Freshly rendered chapter content with provenance. Never mutated; the
/// caller owns persistence.
#[derive(Debug, Clone)]
pub struct RenderedContent {
    pub source_template_id: String,
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

/// Generates chapter content from the static catalog with no field-filling:
/// placeholders stay bracketed for the assessor to complete. Value
/// derivation (OCR extracts, case records) is the caller's job — see
/// [`generate_with_values`].
pub fn generate(
    store: &TemplateStore,
    chapter_type: &str,
    context: &str,
) -> Result<RenderedContent, ReportError> {
    generate_with_values(store, chapter_type, context, &HashMap::new())
}

/// Like [`generate`], but substitutes the caller-supplied values into the
/// template's placeholder tokens. Unknown tokens are left bracketed.
///
/// Non-empty free-text context is prepended as a labeled framing block; it
/// is informational and never substituted into placeholders.
pub fn generate_with_values(
    store: &TemplateStore,
    chapter_type: &str,
    context: &str,
    values: &HashMap<String, String>,
) -> Result<RenderedContent, ReportError> {
    let template = store
        .lookup(chapter_type)
        .ok_or_else(|| ReportError::UnsupportedChapterType(chapter_type.to_string()))?;

    let body = if context.trim().is_empty() {
        template.body.to_string()
    } else {
        format!("基于上下文信息：{}\n\n{}", context, template.body)
    };

    Ok(RenderedContent {
        source_template_id: template.id.to_string(),
        text: render(&body, values),
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let store = TemplateStore::new();
        let first = generate(&store, "loss_assessment", "").unwrap();
        let second = generate(&store, "loss_assessment", "").unwrap();
        assert_eq!(first.text, second.text);
        assert_eq!(first.source_template_id, "loss_assessment");
    }

    #[test]
    fn test_empty_context_yields_template_body_verbatim() {
        let store = TemplateStore::new();
        let rendered = generate(&store, "conclusion", "").unwrap();
        assert_eq!(rendered.text, store.lookup("conclusion").unwrap().body);
        assert!(rendered.text.contains("结论"));
        // Untouched placeholders stay bracketed.
        assert!(rendered.text.contains("[事故性质认定]"));
    }

    #[test]
    fn test_context_prepended_as_framing_block() {
        let store = TemplateStore::new();
        let rendered = generate(&store, "summary", "火灾事故，厂房受损").unwrap();
        assert!(rendered
            .text
            .starts_with("基于上下文信息：火灾事故，厂房受损\n\n"));
        assert!(rendered.text.contains("[出险时间]"));
    }

    #[test]
    fn test_whitespace_context_treated_as_empty() {
        let store = TemplateStore::new();
        let rendered = generate(&store, "summary", "   ").unwrap();
        assert_eq!(rendered.text, store.lookup("summary").unwrap().body);
    }

    #[test]
    fn test_unknown_chapter_rejected() {
        let store = TemplateStore::new();
        let err = generate(&store, "unknown_chapter", "").unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedChapterType(_)));
        assert_eq!(err.kind(), "UNSUPPORTED_CHAPTER_TYPE");
    }

    #[test]
    fn test_caller_supplied_values_fill_placeholders() {
        let store = TemplateStore::new();
        let values = [("出险时间".to_string(), "2024年3月15日".to_string())]
            .into_iter()
            .collect();
        let rendered = generate_with_values(&store, "summary", "", &values).unwrap();
        assert!(rendered.text.contains("出险时间：2024年3月15日"));
        assert!(!rendered.text.contains("[出险时间]"));
        // Values the caller did not supply stay bracketed.
        assert!(rendered.text.contains("[出险地点]"));
    }
}
