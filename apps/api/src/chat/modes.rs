//! Professional modes — named persona/system-prompt bundles for the chat assistant.
//!
//! Mode ids arrive as free strings from the UI. They are validated at this
//! boundary into a closed enum; an unknown or missing id resolves to the
//! default mode instead of failing, so a mistyped mode never breaks an
//! ongoing conversation.

use serde::{Deserialize, Serialize};

use crate::chat::prompts;

/// Closed set of professional modes the assistant can assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfessionalModeId {
    General,
    Investigation,
    Assessment,
    Reporting,
    Legal,
}

impl ProfessionalModeId {
    pub const DEFAULT: Self = Self::General;

    /// Parses a raw mode id, falling back to the default for anything unknown.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "general" => Self::General,
            "investigation" => Self::Investigation,
            "assessment" => Self::Assessment,
            "reporting" => Self::Reporting,
            "legal" => Self::Legal,
            _ => Self::DEFAULT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Investigation => "investigation",
            Self::Assessment => "assessment",
            Self::Reporting => "reporting",
            Self::Legal => "legal",
        }
    }
}

/// A professional mode: id, UI display name, and the long-form system prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ProfessionalMode {
    pub id: ProfessionalModeId,
    pub display_name: &'static str,
    #[serde(skip)]
    pub system_prompt: &'static str,
}

/// Fixed library of professional modes, built once at startup.
#[derive(Debug)]
pub struct ModeRegistry {
    modes: Vec<ProfessionalMode>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self {
            modes: vec![
                ProfessionalMode {
                    id: ProfessionalModeId::General,
                    display_name: "通用公估师助手",
                    system_prompt: prompts::GENERAL_SYSTEM_PROMPT,
                },
                ProfessionalMode {
                    id: ProfessionalModeId::Investigation,
                    display_name: "现场查勘专家",
                    system_prompt: prompts::INVESTIGATION_SYSTEM_PROMPT,
                },
                ProfessionalMode {
                    id: ProfessionalModeId::Assessment,
                    display_name: "损失评估专家",
                    system_prompt: prompts::ASSESSMENT_SYSTEM_PROMPT,
                },
                ProfessionalMode {
                    id: ProfessionalModeId::Reporting,
                    display_name: "报告撰写专家",
                    system_prompt: prompts::REPORTING_SYSTEM_PROMPT,
                },
                ProfessionalMode {
                    id: ProfessionalModeId::Legal,
                    display_name: "法规咨询专家",
                    system_prompt: prompts::LEGAL_SYSTEM_PROMPT,
                },
            ],
        }
    }

    /// Resolves a raw mode id to its mode. Unknown ids resolve to the default
    /// mode — deliberate fallback, not an error path.
    pub fn resolve(&self, raw: &str) -> &ProfessionalMode {
        let id = ProfessionalModeId::parse(raw);
        self.modes
            .iter()
            .find(|m| m.id == id)
            .unwrap_or_else(|| self.default_mode())
    }

    pub fn default_mode(&self) -> &ProfessionalMode {
        // The default mode is always present in the registry.
        &self.modes[0]
    }

    pub fn list(&self) -> &[ProfessionalMode] {
        &self.modes
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
