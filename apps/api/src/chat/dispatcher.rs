//! Chat request dispatcher — the single point of entry for all upstream
//! chat-completion calls.
//!
//! The upstream endpoint, model, and API key are an explicit [`ModelConfig`]
//! supplied by the caller on every request; the service holds no ambient
//! credential state. Exactly one outbound call per dispatch, never retried —
//! the upstream may be rate-limited or paid-per-call, so retry policy belongs
//! to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::context::ConversationMessage;
use crate::chat::ChatError;

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
const MAX_OUTPUT_TOKENS: u32 = 3000;
const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.9;

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

/// Per-request model configuration supplied by the caller.
#[derive(Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(alias = "apiKey")]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url", alias = "baseUrl")]
    pub base_url: String,
}

// The API key never reaches logs, including through Debug formatting.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

/// Normalized success outcome of one dispatch.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub text: String,
    pub model: String,
    pub tokens_used: u32,
}

/// Raw upstream reply before classification: HTTP status plus body text.
#[derive(Debug, Clone)]
pub struct RawChatResponse {
    pub status: u16,
    pub body: String,
}

/// Transport seam for the one outbound call. The production implementation
/// is [`HttpChatTransport`]; tests substitute a recording fake to prove the
/// credential gate performs zero network calls.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn execute(
        &self,
        endpoint: &str,
        api_key: &str,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<RawChatResponse, ChatError>;
}

/// reqwest-backed transport with a hard request timeout.
pub struct HttpChatTransport {
    client: reqwest::Client,
}

impl HttpChatTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn execute(
        &self,
        endpoint: &str,
        api_key: &str,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<RawChatResponse, ChatError> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::UpstreamTimeout
                } else {
                    ChatError::NetworkUnreachable
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::UpstreamTimeout
            } else {
                ChatError::NetworkUnreachable
            }
        })?;

        Ok(RawChatResponse { status, body })
    }
}

/// Dispatches one assembled message sequence to the upstream service.
///
/// Validates the credential before any I/O, issues a single call through the
/// transport, and classifies the outcome into the closed [`ChatError`]
/// taxonomy. The message sequence is not mutated.
pub async fn dispatch(
    transport: &dyn ChatTransport,
    messages: &[ConversationMessage],
    config: &ModelConfig,
) -> Result<ChatOutcome, ChatError> {
    if config.api_key.trim().is_empty() {
        return Err(ChatError::MissingCredential);
    }

    let request = ChatCompletionRequest {
        model: &config.model,
        messages,
        max_tokens: MAX_OUTPUT_TOKENS,
        temperature: TEMPERATURE,
        top_p: TOP_P,
        stream: false,
    };

    let endpoint = format!(
        "{}{}",
        config.base_url.trim_end_matches('/'),
        CHAT_COMPLETIONS_PATH
    );

    let raw = transport.execute(&endpoint, &config.api_key, &request).await?;

    match raw.status {
        200..=299 => {
            let parsed: ChatCompletionResponse = serde_json::from_str(&raw.body)
                .map_err(|_| ChatError::MalformedUpstreamResponse)?;

            let text = parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or(ChatError::MalformedUpstreamResponse)?;
            if text.trim().is_empty() {
                return Err(ChatError::MalformedUpstreamResponse);
            }

            let tokens_used = parsed.usage.map(|u| u.total_tokens).unwrap_or(0);
            let model = parsed.model.unwrap_or_else(|| config.model.clone());

            debug!("chat dispatch succeeded: model={model}, total_tokens={tokens_used}");

            Ok(ChatOutcome {
                text,
                model,
                tokens_used,
            })
        }
        401 => Err(ChatError::UpstreamUnauthorized),
        429 => Err(ChatError::UpstreamRateLimited),
        status => Err(ChatError::UpstreamServerError {
            status,
            detail: extract_error_message(&raw.body),
        }),
    }
}

/// Pulls the upstream `{error:{message}}` out of an error body, falling back
/// to a truncated copy of the raw body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<UpstreamErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            let mut detail: String = trimmed.chars().take(200).collect();
            if detail.len() < trimmed.len() {
                detail.push('…');
            }
            detail
        })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Fake transport that records every invocation and replays a canned
    /// response.
    struct FakeTransport {
        calls: AtomicUsize,
        endpoints: Mutex<Vec<String>>,
        status: u16,
        body: String,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                endpoints: Mutex::new(Vec::new()),
                status,
                body: body.to_string(),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatTransport for FakeTransport {
        async fn execute(
            &self,
            endpoint: &str,
            _api_key: &str,
            _request: &ChatCompletionRequest<'_>,
        ) -> Result<RawChatResponse, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.endpoints.lock().unwrap().push(endpoint.to_string());
            Ok(RawChatResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn config(api_key: &str) -> ModelConfig {
        ModelConfig {
            api_key: api_key.to_string(),
            model: default_model(),
            base_url: default_base_url(),
        }
    }

    fn messages() -> Vec<ConversationMessage> {
        vec![
            ConversationMessage::system("prompt"),
            ConversationMessage::user("hello"),
        ]
    }

    const SUCCESS_BODY: &str = r#"{
        "choices": [{"message": {"role": "assistant", "content": "您好，请提供案件资料。"}}],
        "usage": {"prompt_tokens": 40, "completion_tokens": 12, "total_tokens": 52},
        "model": "deepseek-chat"
    }"#;

    #[tokio::test]
    async fn test_missing_credential_performs_zero_network_calls() {
        let transport = FakeTransport::replying(200, SUCCESS_BODY);
        let err = dispatch(&transport, &messages(), &config(""))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MissingCredential));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_credential_also_rejected() {
        let transport = FakeTransport::replying(200, SUCCESS_BODY);
        let err = dispatch(&transport, &messages(), &config("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MissingCredential));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_success_extracts_first_completion() {
        let transport = FakeTransport::replying(200, SUCCESS_BODY);
        let outcome = dispatch(&transport, &messages(), &config("sk-test"))
            .await
            .unwrap();
        assert_eq!(outcome.text, "您好，请提供案件资料。");
        assert_eq!(outcome.tokens_used, 52);
        assert_eq!(outcome.model, "deepseek-chat");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_endpoint_joins_base_url_without_double_slash() {
        let transport = FakeTransport::replying(200, SUCCESS_BODY);
        let mut cfg = config("sk-test");
        cfg.base_url = "https://api.deepseek.com/".to_string();
        dispatch(&transport, &messages(), &cfg).await.unwrap();
        assert_eq!(
            transport.endpoints.lock().unwrap()[0],
            "https://api.deepseek.com/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_401_classified_as_unauthorized() {
        let transport = FakeTransport::replying(401, r#"{"error":{"message":"bad key"}}"#);
        let err = dispatch(&transport, &messages(), &config("sk-bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::UpstreamUnauthorized));
    }

    #[tokio::test]
    async fn test_429_classified_as_rate_limited() {
        let transport = FakeTransport::replying(429, "{}");
        let err = dispatch(&transport, &messages(), &config("sk-test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::UpstreamRateLimited));
    }

    #[tokio::test]
    async fn test_500_carries_upstream_detail() {
        let transport =
            FakeTransport::replying(500, r#"{"error":{"message":"internal overload"}}"#);
        let err = dispatch(&transport, &messages(), &config("sk-test"))
            .await
            .unwrap_err();
        match err {
            ChatError::UpstreamServerError { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "internal overload");
            }
            other => panic!("expected UpstreamServerError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_malformed() {
        let transport = FakeTransport::replying(200, r#"{"choices": []}"#);
        let err = dispatch(&transport, &messages(), &config("sk-test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MalformedUpstreamResponse));
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_malformed() {
        let transport = FakeTransport::replying(200, "<html>gateway</html>");
        let err = dispatch(&transport, &messages(), &config("sk-test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MalformedUpstreamResponse));
    }

    #[tokio::test]
    async fn test_blank_completion_is_malformed() {
        let body = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        let transport = FakeTransport::replying(200, body);
        let err = dispatch(&transport, &messages(), &config("sk-test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MalformedUpstreamResponse));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", config("sk-very-secret"));
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn test_error_detail_falls_back_to_truncated_body() {
        let detail = extract_error_message("upstream exploded");
        assert_eq!(detail, "upstream exploded");
    }
}
