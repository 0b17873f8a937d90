//! HTTP API server using axum.
//!
//! Routes:
//! - `GET  /`, `GET /chatbot` — embedded chat page
//! - `GET  /health`           — liveness and feature flags
//! - `POST /chat`             — one chat turn
//! - `POST /tts`              — reply text to MP3
//! - `POST /history/clear`    — forget recent turns

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    chat_log::ChatLog,
    config::{Config, MAX_MESSAGE_LENGTH, MAX_TTS_TEXT_LENGTH, NO_MENU_TEXT},
    error::SommelierError,
    experiences::{has_experiences, ExperienceScraper},
    history::{ChatHistory, ChatTurn},
    menu::load_menu_text_or_fallback,
    openai_api::ChatClient,
    prompt::SystemPrompt,
    speech::{clean_reply, to_ssml},
    tts_api::TtsClient,
    types::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, TtsRequest},
};

const CHATBOT_PAGE: &str = include_str!("../templates/chatbot.html");

/// Shared state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub menu_text: String,
    pub experiences: String,
    pub history: Mutex<ChatHistory>,
    pub chat_client: ChatClient,
    pub tts_client: TtsClient,
    pub chat_log: ChatLog,
}

impl AppState {
    pub fn new(config: Config, menu_text: String, experiences: String) -> Self {
        let chat_log = ChatLog::new(&config.chat_log_path);
        Self {
            config,
            menu_text,
            experiences,
            history: Mutex::new(ChatHistory::new()),
            chat_client: ChatClient::new(),
            tts_client: TtsClient::new(),
            chat_log,
        }
    }

    fn experiences_loaded(&self) -> bool {
        has_experiences(&self.experiences)
    }
}

impl IntoResponse for SommelierError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error = match self {
            SommelierError::InputValidation(msg) => msg,
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Build the router with permissive CORS (the chat widget is embedded on another origin).
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(chatbot_page))
        .route("/chatbot", get(chatbot_page))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/tts", post(tts))
        .route("/history/clear", post(clear_history))
        .layer(cors)
        .with_state(state)
}

/// Load the menu, scrape experiences, then serve until Ctrl+C.
pub async fn serve(config: Config) -> Result<(), SommelierError> {
    let menu_path = config.menu_pdf_path.clone();
    let menu_text =
        match tokio::task::spawn_blocking(move || load_menu_text_or_fallback(menu_path)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Menu loader task failed (using fallback): {}", e);
                NO_MENU_TEXT.to_string()
            }
        };

    let experiences = match &config.experiences_url {
        Some(url) => {
            ExperienceScraper::new()?
                .scrape_or_fallback(url, &config.experiences_selector)
                .await
        }
        None => String::new(),
    };

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, menu_text, experiences));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Sommelier API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn chatbot_page() -> Html<&'static str> {
    Html(CHATBOT_PAGE)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let history_turns = state.history.lock().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        tts_enabled: state.config.tts_enabled(),
        experiences_loaded: state.experiences_loaded(),
        history_turns,
    })
}

/// POST /chat — build the prompt, ask the model, log and remember the turn.
async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<ChatRequest>>,
) -> Result<Json<ChatResponse>, SommelierError> {
    let message = validate_text(
        payload.and_then(|Json(req)| req.message),
        "Message field is required",
        MAX_MESSAGE_LENGTH,
    )?;

    let start = Instant::now();

    // Snapshot the prompt so the history lock is not held across the API call.
    let prompt = {
        let history = state.history.lock().await;
        SystemPrompt::new(&state.menu_text, &state.experiences, &history)
    };

    let completion = state
        .chat_client
        .send_messages(&state.config, &prompt.messages(&message))
        .await
        .map_err(|e| {
            tracing::error!("chat completion failed: {}", e);
            e
        })?;

    let reply = clean_reply(&completion.text);

    if let Err(e) = state.chat_log.append(&message, &reply).await {
        tracing::warn!(path = %state.chat_log.path().display(), "Chat log write failed: {}", e);
    }

    let total_turns = {
        let mut history = state.history.lock().await;
        history.push(ChatTurn::new(message, reply.clone()));
        history.total_turns()
    };

    tracing::info!(
        model = %completion.model,
        prompt_tokens = completion.prompt_tokens,
        completion_tokens = completion.completion_tokens,
        latency_ms = start.elapsed().as_millis() as u64,
        total_turns,
        "chat_turn_ok"
    );

    Ok(Json(ChatResponse { reply }))
}

/// POST /tts — SSML-wrap the text and return MP3 audio.
async fn tts(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<TtsRequest>>,
) -> Result<Response, SommelierError> {
    let text = validate_text(
        payload.and_then(|Json(req)| req.text),
        "Text field is required",
        MAX_TTS_TEXT_LENGTH,
    )?;

    if !state.config.tts_enabled() {
        return Err(SommelierError::TtsDisabled);
    }

    let ssml = to_ssml(&clean_reply(&text), state.config.ssml_break_ms);
    if ssml.len() > MAX_TTS_TEXT_LENGTH {
        return Err(SommelierError::InputValidation(
            "Text is too long to synthesize".to_string(),
        ));
    }

    let audio = state
        .tts_client
        .synthesize(&state.config, &ssml)
        .await
        .map_err(|e| {
            tracing::error!("speech synthesis failed: {}", e);
            e
        })?;

    tracing::info!(bytes = audio.len(), "tts_ok");

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

async fn clear_history(State(state): State<Arc<AppState>>) -> StatusCode {
    state.history.lock().await.clear();
    StatusCode::NO_CONTENT
}

/// Trim `raw`; reject missing, blank or oversized input.
fn validate_text(
    raw: Option<String>,
    missing_msg: &str,
    max_len: usize,
) -> Result<String, SommelierError> {
    let text = raw.map(|t| t.trim().to_string()).unwrap_or_default();
    if text.is_empty() {
        return Err(SommelierError::InputValidation(missing_msg.to_string()));
    }
    if text.chars().count() > max_len {
        return Err(SommelierError::InputValidation(format!(
            "Input too long (max {max_len} characters)"
        )));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_missing_and_blank() {
        assert!(validate_text(None, "required", 10).is_err());
        assert!(validate_text(Some("   ".into()), "required", 10).is_err());
    }

    #[test]
    fn validate_trims_and_limits() {
        assert_eq!(validate_text(Some(" hi ".into()), "r", 10).unwrap(), "hi");
        let err = validate_text(Some("x".repeat(11)), "r", 10).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn validation_error_body_is_bare_message() {
        let resp = SommelierError::InputValidation("Message field is required".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
