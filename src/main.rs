//! Sommelier backend entry point.
//!
//! Loads configuration, reads the menu PDF, optionally scrapes the
//! experiences page, then serves the chat and text-to-speech API until
//! Ctrl+C.

use cork_sommelier::{config::load_config, server};

#[tokio::main]
async fn main() {
    // Structured logging; default level INFO, override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration from .env / system environment.
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Please check your .env file. See .env.example for required variables.");
            std::process::exit(1);
        }
    };

    tracing::info!(
        model = %config.openai_model,
        tts_enabled = config.tts_enabled(),
        experiences = config.experiences_url.is_some(),
        "sommelier starting"
    );

    if let Err(e) = server::serve(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
