//! Cloud text-to-speech client (REST `text:synthesize`).
//!
//! Takes SSML built by [`crate::speech::to_ssml`] and returns MP3 bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

use crate::{config::Config, error::SommelierError, openai_api::truncate_body};

/// HTTP client for the speech synthesis endpoint.
#[derive(Clone)]
pub struct TtsClient {
    client: reqwest::Client,
}

impl Default for TtsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TtsClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Synthesize `ssml` into MP3 audio.
    ///
    /// # Errors
    /// [`SommelierError::TtsDisabled`] when no key is configured,
    /// [`SommelierError::TtsApi`] for non-2xx responses or a missing/invalid
    /// `audioContent` field.
    pub async fn synthesize(&self, config: &Config, ssml: &str) -> Result<Vec<u8>, SommelierError> {
        let api_key = config
            .tts_api_key
            .as_deref()
            .ok_or(SommelierError::TtsDisabled)?;

        let url = format!("{}/v1/text:synthesize", config.tts_base_url);
        let body = build_body(config, ssml);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(redact_url)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "(unreadable body)".to_string());
            return Err(map_http_error(status.as_u16(), &error_body));
        }

        let json = response
            .json::<serde_json::Value>()
            .await
            .map_err(redact_url)?;
        decode_audio(&json)
    }
}

/// The request URL carries the API key as a query parameter; never surface it.
fn redact_url(e: reqwest::Error) -> SommelierError {
    SommelierError::Http(e.without_url())
}

fn build_body(config: &Config, ssml: &str) -> serde_json::Value {
    json!({
        "input": { "ssml": ssml },
        "voice": {
            "languageCode": config.tts_language_code,
            "name":         config.tts_voice_name,
        },
        "audioConfig": {
            "audioEncoding": "MP3",
            "speakingRate":  config.tts_speaking_rate,
        },
    })
}

fn decode_audio(json: &serde_json::Value) -> Result<Vec<u8>, SommelierError> {
    let encoded = json
        .get("audioContent")
        .and_then(|v| v.as_str())
        .ok_or_else(|| SommelierError::TtsApi("response has no audioContent".to_string()))?;

    STANDARD
        .decode(encoded)
        .map_err(|e| SommelierError::TtsApi(format!("audioContent is not base64: {e}")))
}

fn map_http_error(status: u16, body: &str) -> SommelierError {
    let safe_body = truncate_body(body);

    match status {
        400 => SommelierError::TtsApi(format!("Rejected SSML or voice settings: {safe_body}")),
        401 | 403 => SommelierError::TtsApi("Unauthorized: check GOOGLE_TTS_API_KEY".to_string()),
        429 => SommelierError::TtsApi("Rate limited by text-to-speech API".to_string()),
        s if s >= 500 => SommelierError::TtsApi(format!("TTS server error {s}: {safe_body}")),
        s => SommelierError::TtsApi(format!("HTTP {s}: {safe_body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_audio_content() {
        let json = json!({ "audioContent": STANDARD.encode(b"ID3fake") });
        assert_eq!(decode_audio(&json).unwrap(), b"ID3fake");
    }

    #[test]
    fn missing_audio_content_is_error() {
        let err = decode_audio(&json!({})).unwrap_err();
        assert!(err.to_string().contains("audioContent"));
    }

    #[test]
    fn invalid_base64_is_error() {
        let err = decode_audio(&json!({ "audioContent": "@@not base64@@" })).unwrap_err();
        assert!(matches!(err, SommelierError::TtsApi(_)));
    }

    #[test]
    fn map_403() {
        assert!(map_http_error(403, "").to_string().contains("Unauthorized"));
    }
}
