//! Configuration management.
//!
//! Loads settings from a TOML file or uses defaults. Every field has a
//! default, so a partial file only overrides what it names.

use crate::error::{NeuroError, Result};
use crate::knowledge::{KnowledgeBase, KnowledgeEntry};
use crate::matcher::{DEFAULT_FALLBACK_ANSWER, DEFAULT_OVERRIDE_KEYWORD, DEFAULT_OVERRIDE_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// System-wide config file path
pub const CONFIG_PATH: &str = "/etc/neurodx/config.toml";

/// Environment override for the config file path
pub const CONFIG_ENV: &str = "NEURODX_CONFIG";

/// HTTP host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Largest scan upload accepted, in bytes
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:7870".to_string()
}

fn default_max_upload() -> usize {
    64 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

/// Chatbot wording and override rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_override_keyword")]
    pub override_keyword: String,

    /// `{label}` is replaced with the diagnosis label
    #[serde(default = "default_override_template")]
    pub override_template: String,

    #[serde(default = "default_fallback_answer")]
    pub fallback_answer: String,
}

fn default_override_keyword() -> String {
    DEFAULT_OVERRIDE_KEYWORD.to_string()
}

fn default_override_template() -> String {
    DEFAULT_OVERRIDE_TEMPLATE.to_string()
}

fn default_fallback_answer() -> String {
    DEFAULT_FALLBACK_ANSWER.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            override_keyword: default_override_keyword(),
            override_template: default_override_template(),
            fallback_answer: default_fallback_answer(),
        }
    }
}

/// Mock prediction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Fixed RNG seed; unset means a fresh seed per process
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    #[serde(default = "default_max_confidence")]
    pub max_confidence: f64,
}

fn default_min_confidence() -> f64 {
    0.7
}

fn default_max_confidence() -> f64 {
    0.99
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            min_confidence: default_min_confidence(),
            max_confidence: default_max_confidence(),
        }
    }
}

impl PredictionConfig {
    /// Both bounds finite, within [0, 1], and min <= max
    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.min_confidence)
            || !in_unit(self.max_confidence)
            || self.min_confidence > self.max_confidence
        {
            return Err(NeuroError::Config(format!(
                "prediction confidence range [{}, {}] must lie within [0, 1]",
                self.min_confidence, self.max_confidence
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_path")]
    pub output_path: PathBuf,
}

fn default_report_path() -> PathBuf {
    PathBuf::from("diagnosis_report.txt")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_report_path(),
        }
    }
}

/// Full configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    #[serde(default)]
    pub report: ReportConfig,

    /// Replaces the built-in knowledge base when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge: Vec<KnowledgeEntry>,
}

impl Config {
    /// Load config, or return defaults when no file is found.
    ///
    /// Priority:
    /// 1. Explicit path (must exist)
    /// 2. $NEURODX_CONFIG (must exist)
    /// 3. /etc/neurodx/config.toml (if present)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from_path(Path::new(&path));
        }

        let system = Path::new(CONFIG_PATH);
        if system.exists() {
            return Self::load_from_path(system);
        }

        warn!("Config not found, using defaults");
        Ok(Config::default())
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| NeuroError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chat.override_keyword.trim().is_empty() {
            return Err(NeuroError::Config(
                "chat.override_keyword must not be empty".to_string(),
            ));
        }

        self.prediction.validate()?;

        if self.server.bind_addr.trim().is_empty() {
            return Err(NeuroError::Config("server.bind_addr must not be empty".to_string()));
        }

        Ok(())
    }

    /// Knowledge base from config entries, falling back to the built-in set
    pub fn knowledge_base(&self) -> Result<KnowledgeBase> {
        if self.knowledge.is_empty() {
            return Ok(KnowledgeBase::builtin());
        }
        KnowledgeBase::new(self.knowledge.clone())
    }

    /// Write the default config (for `init`-style setup)
    pub fn save_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| NeuroError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Saved default config to {}", path.display());
        Ok(())
    }
}
