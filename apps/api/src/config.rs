use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Holds no credentials: the chat API key is supplied by the caller on
/// every request and never lives in process state.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on the single outbound chat-completion call.
    pub chat_timeout_secs: u64,
    /// Simulated processing latency of the mock OCR collaborator.
    pub mock_ocr_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            chat_timeout_secs: env_or("CHAT_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("CHAT_TIMEOUT_SECS must be a number of seconds")?,
            mock_ocr_delay_ms: env_or("MOCK_OCR_DELAY_MS", "2000")
                .parse::<u64>()
                .context("MOCK_OCR_DELAY_MS must be a number of milliseconds")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
