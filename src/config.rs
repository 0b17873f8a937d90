//! Configuration loading from environment variables via dotenvy.
//! Only the chat-completion API key is required; everything else has a default.

use crate::error::SommelierError;

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat-completion API key — sourced from `OPENAI_API_KEY`
    pub openai_api_key: String,
    /// Base URL for the chat-completion API — sourced from `OPENAI_BASE_URL`
    pub openai_base_url: String,
    /// Model identifier — sourced from `OPENAI_MODEL`
    pub openai_model: String,
    /// Upper bound on generated tokens — sourced from `OPENAI_MAX_TOKENS`
    pub max_tokens: u32,
    /// Sampling temperature — sourced from `OPENAI_TEMPERATURE`, clamped to `0.0..=2.0`
    pub temperature: f32,
    /// Cloud text-to-speech key — sourced from `GOOGLE_TTS_API_KEY`.
    /// `None` disables the `/tts` endpoint.
    pub tts_api_key: Option<String>,
    /// Base URL for the text-to-speech API — sourced from `GOOGLE_TTS_BASE_URL`
    pub tts_base_url: String,
    /// BCP-47 language code for the voice — sourced from `TTS_LANGUAGE_CODE`
    pub tts_language_code: String,
    /// Voice name — sourced from `TTS_VOICE_NAME`
    pub tts_voice_name: String,
    /// Speaking rate multiplier — sourced from `TTS_SPEAKING_RATE`
    pub tts_speaking_rate: f32,
    /// Pause inserted between sentences in SSML — sourced from `SSML_BREAK_MS`
    pub ssml_break_ms: u32,
    /// Menu PDF read once at startup — sourced from `MENU_PDF_PATH`
    pub menu_pdf_path: String,
    /// Append-only conversation log — sourced from `CHAT_LOG_PATH`
    pub chat_log_path: String,
    /// Experiences page to scrape at startup — sourced from `EXPERIENCES_URL`
    pub experiences_url: Option<String>,
    /// CSS selector for experience entries — sourced from `EXPERIENCES_SELECTOR`
    pub experiences_selector: String,
    /// Listen address — sourced from `BIND_ADDR`
    pub bind_addr: String,
}

impl Config {
    /// `true` when a text-to-speech key is configured.
    pub fn tts_enabled(&self) -> bool {
        self.tts_api_key.is_some()
    }
}

/// Load configuration purely from already-set environment variables.
///
/// Does **not** call `dotenvy::dotenv()` — useful in tests that need to
/// control the env precisely via [`std::env::set_var`] / [`std::env::remove_var`].
///
/// # Errors
/// Returns [`SommelierError::Config`] if required variables are missing or invalid.
pub fn load_config_from_env() -> Result<Config, SommelierError> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| SommelierError::Config("OPENAI_API_KEY not set".to_string()))?;

    if api_key.trim().is_empty() {
        return Err(SommelierError::Config("OPENAI_API_KEY is empty".to_string()));
    }

    let openai_base_url = require_http_url(
        "OPENAI_BASE_URL",
        env_or("OPENAI_BASE_URL", "https://api.openai.com"),
    )?;
    let tts_base_url = require_http_url(
        "GOOGLE_TTS_BASE_URL",
        env_or("GOOGLE_TTS_BASE_URL", "https://texttospeech.googleapis.com"),
    )?;

    let openai_model = env_or("OPENAI_MODEL", "gpt-4-turbo");

    let max_tokens = std::env::var("OPENAI_MAX_TOKENS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_MAX_TOKENS);

    let temperature = std::env::var("OPENAI_TEMPERATURE")
        .ok()
        .and_then(|v| v.parse::<f32>().ok())
        .filter(|v| (0.0..=2.0).contains(v))
        .unwrap_or(DEFAULT_TEMPERATURE);

    let tts_api_key = std::env::var("GOOGLE_TTS_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let tts_speaking_rate = std::env::var("TTS_SPEAKING_RATE")
        .ok()
        .and_then(|v| v.parse::<f32>().ok())
        .filter(|v| (0.25..=4.0).contains(v))
        .unwrap_or(1.0);

    let ssml_break_ms = std::env::var("SSML_BREAK_MS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_SSML_BREAK_MS);

    let experiences_url = std::env::var("EXPERIENCES_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());

    Ok(Config {
        openai_api_key: api_key,
        openai_base_url,
        openai_model,
        max_tokens,
        temperature,
        tts_api_key,
        tts_base_url,
        tts_language_code: env_or("TTS_LANGUAGE_CODE", "en-US"),
        tts_voice_name: env_or("TTS_VOICE_NAME", "en-US-Wavenet-F"),
        tts_speaking_rate,
        ssml_break_ms,
        menu_pdf_path: env_or("MENU_PDF_PATH", "menu.pdf"),
        chat_log_path: env_or("CHAT_LOG_PATH", "chat_logs.txt"),
        experiences_url,
        experiences_selector: env_or("EXPERIENCES_SELECTOR", ".experience"),
        bind_addr: env_or("BIND_ADDR", "0.0.0.0:5000"),
    })
}

/// Load configuration from the environment (`.env` + system env vars).
///
/// Loads `.env` via `dotenvy` first (ignoring errors if the file is absent),
/// then delegates to [`load_config_from_env`].
///
/// # Errors
/// Returns [`SommelierError::Config`] if required variables are missing or invalid.
pub fn load_config() -> Result<Config, SommelierError> {
    let _ = dotenvy::dotenv();
    load_config_from_env()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn require_http_url(key: &str, url: String) -> Result<String, SommelierError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SommelierError::Config(format!(
            "{key} must start with http:// or https://"
        )));
    }

    // API keys travel in headers or the query string; flag cleartext endpoints.
    if url.starts_with("http://") {
        tracing::warn!(
            variable = key,
            "plaintext http:// endpoint configured; API key will be sent without TLS"
        );
    }

    Ok(url.trim_end_matches('/').to_string())
}

// ── Limits and fallbacks ───────────────────────────────────────────────────

/// Default completion length, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default pause between SSML sentences, in milliseconds.
pub const DEFAULT_SSML_BREAK_MS: u32 = 400;

/// Number of recent chat turns kept in memory and replayed into the prompt.
pub const MAX_HISTORY_TURNS: usize = 10;

/// Maximum allowed length (characters) of a chat message.
pub const MAX_MESSAGE_LENGTH: usize = 4_000;

/// Maximum SSML payload accepted by the speech API, in bytes.
pub const MAX_TTS_TEXT_LENGTH: usize = 5_000;

/// Placeholder used in the prompt when the menu PDF cannot be read.
pub const NO_MENU_TEXT: &str = "No menu information available.";

/// Placeholder returned when the experiences page has no matching elements.
pub const NO_EXPERIENCES_TEXT: &str = "No experiences found.";

/// Placeholder returned when matching elements carry no text.
pub const NO_EXPERIENCES_ON_PAGE_TEXT: &str = "No experiences found on the page.";
