#![allow(dead_code)]

//! Conversation context builder — assembles the ordered message sequence
//! sent to the upstream chat-completion service.
//!
//! Shape: `[system prompt, ...trailing history window, new user message]`.
//! The history window is capped at [`HISTORY_WINDOW`] entries, which bounds
//! the outbound payload to [`MAX_DISPATCH_MESSAGES`] messages regardless of
//! session length. The caller owns the history; nothing is persisted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::modes::ModeRegistry;
use crate::chat::ChatError;

/// Most recent history entries carried into each request.
pub const HISTORY_WINDOW: usize = 10;

/// Upper bound on a dispatched sequence: system + history window + new message.
pub const MAX_DISPATCH_MESSAGES: usize = HISTORY_WINDOW + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    // Some UI clients label assistant turns "ai".
    #[serde(alias = "ai")]
    Assistant,
}

/// One chat turn. `created_at` is caller-side bookkeeping and is never sent
/// upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(alias = "type")]
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            created_at: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            created_at: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            created_at: None,
        }
    }
}

/// Builds the dispatch-ready message sequence for one chat request.
///
/// Takes at most the last [`HISTORY_WINDOW`] history entries in their
/// original order. History carries only the two directions a conversational
/// UI can produce; a stray `system` entry is coerced to `assistant` rather
/// than letting a caller override the mode prompt.
pub fn build_messages(
    registry: &ModeRegistry,
    mode_id: &str,
    history: &[ConversationMessage],
    new_message: &str,
) -> Result<Vec<ConversationMessage>, ChatError> {
    if new_message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    let mode = registry.resolve(mode_id);

    let mut messages = Vec::with_capacity(MAX_DISPATCH_MESSAGES);
    messages.push(ConversationMessage::system(mode.system_prompt));

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    for entry in &history[start..] {
        let role = match entry.role {
            ChatRole::User => ChatRole::User,
            ChatRole::Assistant | ChatRole::System => ChatRole::Assistant,
        };
        messages.push(ConversationMessage {
            role,
            content: entry.content.clone(),
            created_at: None,
        });
    }

    messages.push(ConversationMessage::user(new_message));
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(n: usize) -> Vec<ConversationMessage> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationMessage::user(format!("question {i}"))
                } else {
                    ConversationMessage::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_history_yields_system_and_user() {
        let registry = ModeRegistry::new();
        let messages =
            build_messages(&registry, "investigation", &[], "制定现场查勘计划").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(
            messages[0].content,
            registry.resolve("investigation").system_prompt
        );
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "制定现场查勘计划");
    }

    #[test]
    fn test_history_window_keeps_last_ten_in_order() {
        let registry = ModeRegistry::new();
        let history = history_of(25);
        let messages = build_messages(&registry, "general", &history, "next").unwrap();

        assert_eq!(messages.len(), MAX_DISPATCH_MESSAGES);
        // Entries 15..25 survive, original order preserved.
        for (i, msg) in messages[1..11].iter().enumerate() {
            assert!(msg.content.ends_with(&format!(" {}", 15 + i)));
        }
        assert_eq!(messages.last().unwrap().content, "next");
    }

    #[test]
    fn test_short_history_passes_through_unchanged() {
        let registry = ModeRegistry::new();
        let history = history_of(3);
        let messages = build_messages(&registry, "general", &history, "next").unwrap();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].content, "question 0");
        assert_eq!(messages[2].content, "answer 1");
        assert_eq!(messages[3].content, "question 2");
    }

    #[test]
    fn test_empty_message_rejected() {
        let registry = ModeRegistry::new();
        assert!(matches!(
            build_messages(&registry, "general", &[], ""),
            Err(ChatError::EmptyMessage)
        ));
        assert!(matches!(
            build_messages(&registry, "general", &[], "   \n\t"),
            Err(ChatError::EmptyMessage)
        ));
    }

    #[test]
    fn test_system_entries_in_history_coerced_to_assistant() {
        let registry = ModeRegistry::new();
        let history = vec![ConversationMessage::system("injected prompt")];
        let messages = build_messages(&registry, "general", &history, "hello").unwrap();
        assert_eq!(messages[1].role, ChatRole::Assistant);
    }

    #[test]
    fn test_unknown_mode_uses_default_prompt() {
        let registry = ModeRegistry::new();
        let messages = build_messages(&registry, "no-such-mode", &[], "hello").unwrap();
        assert_eq!(messages[0].content, registry.default_mode().system_prompt);
    }

    #[test]
    fn test_outbound_messages_carry_no_timestamps() {
        let registry = ModeRegistry::new();
        let history = vec![ConversationMessage {
            role: ChatRole::User,
            content: "earlier".to_string(),
            created_at: Some(Utc::now()),
        }];
        let messages = build_messages(&registry, "general", &history, "now").unwrap();
        assert!(messages.iter().all(|m| m.created_at.is_none()));
    }

    #[test]
    fn test_history_role_aliases_deserialize() {
        let msg: ConversationMessage =
            serde_json::from_str(r#"{"type": "ai", "content": "done"}"#).unwrap();
        assert_eq!(msg.role, ChatRole::Assistant);
    }
}
