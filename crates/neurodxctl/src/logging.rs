//! Invocation log for neurodxctl
//!
//! One JSON line per command, appended to an XDG state file.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Log entry for each neurodxctl invocation
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 timestamp
    pub ts: String,

    /// Request ID (UUID)
    pub req_id: String,

    /// Command name
    pub command: String,

    pub exit_code: i32,

    pub duration_ms: u64,

    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEntry {
    pub fn new(command: &str, exit_code: i32, duration_ms: u64, error: Option<String>) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            req_id: uuid::Uuid::new_v4().to_string(),
            command: command.to_string(),
            exit_code,
            duration_ms,
            ok: exit_code == 0,
            error,
        }
    }

    /// Discover log file path with fallback chain
    ///
    /// Priority:
    /// 1. $NEURODXCTL_LOG_FILE environment variable (explicit override)
    /// 2. $XDG_STATE_HOME/neurodx/ctl.jsonl (XDG standard)
    /// 3. ~/.local/state/neurodx/ctl.jsonl (XDG fallback)
    pub fn discover_log_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("NEURODXCTL_LOG_FILE") {
            return Some(PathBuf::from(path));
        }

        if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
            return Some(PathBuf::from(xdg_state).join("neurodx/ctl.jsonl"));
        }

        if let Ok(home) = std::env::var("HOME") {
            return Some(PathBuf::from(home).join(".local/state/neurodx/ctl.jsonl"));
        }

        None
    }

    /// Append to the discovered log file. Logging never fails the command,
    /// so errors are reported to the caller to ignore or trace.
    pub fn write(&self) -> Result<(), std::io::Error> {
        match Self::discover_log_path() {
            Some(path) => self.write_to(&path),
            None => Ok(()),
        }
    }

    pub fn write_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}
