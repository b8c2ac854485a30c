//! Configuration for the FAQ ranking service
//!
//! Defaults are overridden first by an optional TOML file named by
//! `FAQ_RANK_CONFIG`, then by the `PORT`, `FAQ_URL` and `FEEDBACK_PATH`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "FAQ_RANK_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// FAQ page source
    pub source: SourceConfig,
    /// Question-answering model configuration
    pub scorer: ScorerConfig,
    /// Feedback persistence
    pub feedback: FeedbackConfig,
    /// Ranking behavior
    pub ranking: RankingConfig,
}

impl RankerConfig {
    /// Load configuration from defaults, the optional config file, and the environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file; missing sections fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }
        if let Some(url) = lookup("FAQ_URL") {
            self.source.url = url;
        }
        if let Some(path) = lookup("FEEDBACK_PATH") {
            self.feedback.path = PathBuf::from(path);
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// FAQ page source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Page to scrape
    pub url: String,
    /// CSS selector for question blocks
    pub question_selector: String,
    /// CSS selector for answer blocks
    pub answer_selector: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Extra fetch attempts after the first failure (0 = fail immediately)
    pub max_retries: u32,
    /// Backoff before retry `n` is `n * retry_backoff_ms`
    pub retry_backoff_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "https://www.python.org/doc/faq/general/".to_string(),
            question_selector: "section > h3".to_string(),
            answer_selector: "section > h3 + p".to_string(),
            timeout_secs: 30,
            max_retries: 0,
            retry_backoff_ms: 2000,
        }
    }
}

/// Extractive question-answering model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Hugging Face repository holding `onnx/model.onnx` and `tokenizer.json`
    pub model: String,
    /// Cache directory for models
    pub cache_dir: PathBuf,
    /// Maximum tokens for the question + context pair
    pub max_length: usize,
    /// Longest answer span considered, in tokens
    pub max_answer_tokens: usize,
    /// Feed `token_type_ids` to the model (BERT yes, DistilBERT/RoBERTa no)
    pub use_token_type_ids: bool,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
    /// Per-candidate scoring timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            model: "Xenova/distilbert-base-cased-distilled-squad".to_string(),
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("faq-rank")
                .join("models"),
            max_length: 384,
            max_answer_tokens: 30,
            use_token_type_ids: false,
            intra_threads: 4,
            timeout_secs: 30,
        }
    }
}

/// Feedback store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// JSON file holding all feedback entries
    pub path: PathBuf,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("feedback.json"),
        }
    }
}

/// Ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Candidates scored concurrently per ranking
    pub scoring_concurrency: usize,
    /// Append chosen answers to the live corpus instead of waiting for a restart
    pub enrich_live_corpus: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            scoring_concurrency: 4,
            enrich_live_corpus: false,
        }
    }
}
