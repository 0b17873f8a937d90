//! Tests for [`cork_sommelier::openai_api`] against a mocked endpoint.

use cork_sommelier::config::Config;
use cork_sommelier::error::SommelierError;
use cork_sommelier::openai_api::ChatClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(base_url: &str) -> Config {
    Config {
        openai_api_key: "test-key".to_string(),
        openai_base_url: base_url.to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        max_tokens: 120,
        temperature: 0.2,
        tts_api_key: None,
        tts_base_url: base_url.to_string(),
        tts_language_code: "en-US".to_string(),
        tts_voice_name: "en-US-Wavenet-F".to_string(),
        tts_speaking_rate: 1.0,
        ssml_break_ms: 400,
        menu_pdf_path: "menu.pdf".to_string(),
        chat_log_path: "chat_logs.txt".to_string(),
        experiences_url: None,
        experiences_selector: ".experience".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
    }
}

/// Test 1: complete() sends model settings and returns the reply text.
#[tokio::test]
async fn test_complete_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "Chenin Blanc."}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 30, "completion_tokens": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config_for(&server.uri());
    let reply = ChatClient::new()
        .complete(&cfg, "You are a sommelier.", "Something for sushi?")
        .await
        .unwrap();
    assert_eq!(reply.text, "Chenin Blanc.");
    assert_eq!(reply.model, "gpt-4o-mini");

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["max_tokens"], 120);
    assert_eq!(sent["messages"][0]["content"], "You are a sommelier.");
    assert_eq!(sent["messages"][1]["content"], "Something for sushi?");
}

/// Test 2: 401 surfaces as a ChatApi error naming the key variable.
#[tokio::test]
async fn test_complete_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .complete(&config_for(&server.uri()), "sys", "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, SommelierError::ChatApi(_)));
    assert!(err.to_string().contains("OPENAI_API_KEY"));
    assert_eq!(err.status_code(), 502);
}

/// Test 3: 500 bodies are included in the message.
#[tokio::test]
async fn test_complete_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .complete(&config_for(&server.uri()), "sys", "hi")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("upstream exploded"));
}
