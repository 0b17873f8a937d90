//! Free the Cork sommelier backend — re-exports all modules for integration testing.
//!
//! The binary (`main.rs`) and integration tests (`tests/`) both import from
//! this crate root.

pub mod chat_log;
pub mod config;
pub mod error;
pub mod experiences;
pub mod history;
pub mod menu;
pub mod openai_api;
pub mod prompt;
pub mod server;
pub mod speech;
pub mod tts_api;
pub mod types;
