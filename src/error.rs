//! Custom error types for the sommelier backend.

use thiserror::Error;

/// Unified error type propagated through every request path.
#[derive(Debug, Error)]
pub enum SommelierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input validation error: {0}")]
    InputValidation(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Chat API error: {0}")]
    ChatApi(String),

    #[error("Text-to-speech API error: {0}")]
    TtsApi(String),

    #[error("Text-to-speech is not configured (set GOOGLE_TTS_API_KEY)")]
    TtsDisabled,

    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("Chat log error: {0}")]
    ChatLog(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SommelierError {
    /// HTTP status code the server answers with when this error reaches a handler.
    pub fn status_code(&self) -> u16 {
        match self {
            SommelierError::InputValidation(_) => 400,
            SommelierError::TtsDisabled => 503,
            SommelierError::ChatApi(_) | SommelierError::TtsApi(_) | SommelierError::Http(_) => {
                502
            }
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = SommelierError::InputValidation("empty".to_string());
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        assert_eq!(SommelierError::ChatApi("x".into()).status_code(), 502);
        assert_eq!(SommelierError::TtsApi("x".into()).status_code(), 502);
    }

    #[test]
    fn disabled_tts_maps_to_unavailable() {
        assert_eq!(SommelierError::TtsDisabled.status_code(), 503);
    }

    #[test]
    fn local_failures_map_to_internal_error() {
        assert_eq!(SommelierError::ChatLog("disk".into()).status_code(), 500);
    }
}
