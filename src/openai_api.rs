//! Chat-completion HTTP client using reqwest.
//!
//! The model only generates text; prompt assembly and reply cleanup stay in
//! Rust. Maps 401, 429 and 5xx responses to readable errors.

use serde_json::json;

use crate::{
    config::Config,
    error::SommelierError,
    types::{ChatCompletion, ChatMessage},
};

/// HTTP client for the chat-completions endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatClient {
    /// Create a new `ChatClient` with default reqwest settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    // ── Public API ─────────────────────────────────────────────────────────

    /// Send `system` + `user_content` and return the model's reply.
    pub async fn complete(
        &self,
        config: &Config,
        system: &str,
        user_content: &str,
    ) -> Result<ChatCompletion, SommelierError> {
        let messages = vec![ChatMessage::system(system), ChatMessage::user(user_content)];
        self.send_messages(config, &messages).await
    }

    /// Send a prepared message list and return the model's reply.
    pub async fn send_messages(
        &self,
        config: &Config,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletion, SommelierError> {
        let body = build_body(config, messages);
        let raw = self.post(config, body).await?;
        parse_response(raw)
    }

    // ── Private helpers ────────────────────────────────────────────────────

    /// Execute the POST request and surface structured HTTP errors.
    async fn post(
        &self,
        config: &Config,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, SommelierError> {
        let url = format!("{}/v1/chat/completions", config.openai_base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.openai_api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<serde_json::Value>().await?);
        }

        // Read body for diagnostics before consuming the response.
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "(unreadable body)".to_string());

        Err(map_http_error(status.as_u16(), &error_body))
    }
}

/// Build the JSON request body.
fn build_body(config: &Config, messages: &[ChatMessage]) -> serde_json::Value {
    json!({
        "model":       config.openai_model,
        "messages":    messages,
        "max_tokens":  config.max_tokens,
        "temperature": config.temperature,
    })
}

/// Parse the raw chat-completion JSON into a [`ChatCompletion`].
fn parse_response(json: serde_json::Value) -> Result<ChatCompletion, SommelierError> {
    let text = json
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            SommelierError::ChatApi("response has no choices[0].message.content".to_string())
        })?
        .to_string();

    let model = json
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let finish_reason = json
        .pointer("/choices/0/finish_reason")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let prompt_tokens = json
        .pointer("/usage/prompt_tokens")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let completion_tokens = json
        .pointer("/usage/completion_tokens")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    Ok(ChatCompletion {
        text,
        model,
        finish_reason,
        prompt_tokens,
        completion_tokens,
    })
}

// ── HTTP error mapping ────────────────────────────────────────────────────────

/// Maximum number of characters from an HTTP error body included in error messages.
pub(crate) const MAX_ERROR_BODY_LEN: usize = 200;

/// Truncate an upstream error body on a char boundary.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY_LEN {
        let truncated: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
        format!("{truncated}…[truncated]")
    } else {
        body.to_string()
    }
}

fn map_http_error(status: u16, body: &str) -> SommelierError {
    let safe_body = truncate_body(body);

    match status {
        401 => SommelierError::ChatApi("Unauthorized: check OPENAI_API_KEY".to_string()),
        429 => SommelierError::ChatApi("Rate limited by chat-completion API".to_string()),
        s if s >= 500 => {
            SommelierError::ChatApi(format!("Chat API server error {s}: {safe_body}"))
        }
        s => SommelierError::ChatApi(format!("HTTP {s}: {safe_body}")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
