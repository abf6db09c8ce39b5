//! Sub-configuration structs with defaults matching the production run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inference service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Chat-completions endpoint
    pub endpoint: String,

    /// Vision model identifier
    pub model: String,

    /// File holding the API key, relative to the working directory
    pub key_file: PathBuf,

    /// File holding the prompt text, relative to the working directory
    pub prompt_file: PathBuf,

    /// Output-length cap per completion
    pub max_tokens: u32,

    /// Completions requested per image
    pub samples_per_image: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            key_file: PathBuf::from("API_KEY"),
            prompt_file: PathBuf::from("prompt.txt"),
            max_tokens: 50,
            samples_per_image: 5,
        }
    }
}

/// Rate limiting and pacing settings.
///
/// The delay and cap are empirically tuned for the external service's
/// rate limits, which is why they are configuration rather than constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Maximum simultaneous in-flight requests across a whole run
    pub max_parallel_requests: usize,

    /// Fixed delay after acquiring a slot, before each request is sent
    pub pacing_delay_ms: u64,

    /// Per-request timeout
    pub request_timeout_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_parallel_requests: 100,
            pacing_delay_ms: 1000,
            request_timeout_ms: 60_000,
        }
    }
}

/// Similarity scoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Sentence-embedding model name (e.g., "all-MiniLM-L6-v2")
    pub model: String,

    /// Directory where embedding models are cached
    pub cache_dir: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model: "all-MiniLM-L6-v2".to_string(),
            cache_dir: "~/.curator/models".to_string(),
        }
    }
}

/// Directory layout and file naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Per-directory ledger file name
    pub ledger_file: String,

    /// Per-directory label file name
    pub labels_file: String,

    /// Combined output file name written next to the subdirectories
    pub aggregate_file: String,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            ledger_file: "results.csv".to_string(),
            labels_file: "labels.txt".to_string(),
            aggregate_file: "all_results.csv".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
