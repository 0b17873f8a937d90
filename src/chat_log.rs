//! Append-only conversation log on disk.
//!
//! Each chat exchange becomes one entry:
//!
//! ```text
//! [2024-05-01T19:42:07.123456] User: something red for steak?
//! AI: The Malbec is a classic pairing.
//! ```
//!
//! # Invariants
//! - The file is only ever opened in append mode; existing entries are never rewritten.
//! - Appends are serialized, so concurrent requests never interleave entries.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::error::SommelierError;

/// Flat-file conversation log.
pub struct ChatLog {
    path: PathBuf,
    /// Guards the append so entries stay contiguous; counts entries written.
    written: Mutex<u64>,
}

impl ChatLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: Mutex::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one user/assistant exchange with the current local timestamp.
    pub async fn append(&self, user: &str, reply: &str) -> Result<(), SommelierError> {
        let entry = format_entry(&timestamp_now(), user, reply);

        let mut written = self.written.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                SommelierError::ChatLog(format!("cannot open {}: {e}", self.path.display()))
            })?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;
        *written += 1;

        Ok(())
    }

    /// Number of entries appended by this process.
    pub async fn entries_written(&self) -> u64 {
        *self.written.lock().await
    }
}

/// Local time in ISO-8601 with microseconds and no offset.
fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn format_entry(timestamp: &str, user: &str, reply: &str) -> String {
    format!("[{timestamp}] User: {user}\nAI: {reply}\n")
}
