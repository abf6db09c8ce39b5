//! Semantic similarity scoring via sentence embeddings.
//!
//! Wraps a fastembed `TextEmbedding` model behind a `Mutex` (its `embed()`
//! requires `&mut self`) and exposes a single cosine-similarity scoring
//! operation used to compare model responses against ground-truth labels.

use std::path::Path;
use std::sync::Mutex;

use fastembed::{InitOptions, TextEmbedding};

use crate::config::ScoringConfig;
use crate::error::{CurationError, CurationResult};
use crate::math;

/// Anything that can score the semantic similarity of two text spans.
///
/// The curation loop only depends on this trait, so tests can substitute
/// a fixed-value scorer without downloading a model.
pub trait SimilarityScorer: Send + Sync {
    /// Cosine similarity between `a` and `b`, in [-1, 1].
    fn score(&self, a: &str, b: &str) -> CurationResult<f32>;
}

/// Sentence-embedding scorer backed by a pretrained fastembed model.
pub struct EmbeddingScorer {
    model: Mutex<TextEmbedding>,
    model_name: String,
}

impl EmbeddingScorer {
    /// Load the embedding model, downloading it into `cache_dir` on first use.
    pub fn new(config: &ScoringConfig, cache_dir: &Path) -> CurationResult<Self> {
        let model_enum = parse_model_name(&config.model)?;

        std::fs::create_dir_all(cache_dir).map_err(|e| CurationError::Scoring {
            message: format!("failed to create model cache directory: {e}"),
        })?;

        let options = InitOptions::new(model_enum)
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);

        let model = TextEmbedding::try_new(options).map_err(|e| CurationError::Scoring {
            message: format!("failed to initialize embedding model: {e}"),
        })?;

        tracing::debug!("Loaded embedding model {}", config.model);

        Ok(Self {
            model: Mutex::new(model),
            model_name: config.model.clone(),
        })
    }

    /// Model name this scorer was built with.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl SimilarityScorer for EmbeddingScorer {
    fn score(&self, a: &str, b: &str) -> CurationResult<f32> {
        if a.trim().is_empty() || b.trim().is_empty() {
            return Err(CurationError::Scoring {
                message: "cannot embed an empty string".to_string(),
            });
        }

        let mut model = self.model.lock().map_err(|e| CurationError::Scoring {
            message: format!("embedding model lock poisoned: {e}"),
        })?;

        let embeddings = model
            .embed(vec![a, b], None)
            .map_err(|e| CurationError::Scoring {
                message: format!("embedding failed: {e}"),
            })?;

        let [ea, eb] = embeddings.as_slice() else {
            return Err(CurationError::Scoring {
                message: format!("expected 2 embeddings, got {}", embeddings.len()),
            });
        };

        math::cosine_similarity(ea, eb).ok_or_else(|| CurationError::Scoring {
            message: "degenerate embedding (zero norm)".to_string(),
        })
    }
}

/// Parse a model name string to the fastembed enum.
fn parse_model_name(name: &str) -> CurationResult<fastembed::EmbeddingModel> {
    match name.to_lowercase().as_str() {
        "all-minilm-l6-v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l6-v2-q" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2Q),
        "bge-small-en-v1.5" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        "bge-large-en-v1.5" => Ok(fastembed::EmbeddingModel::BGELargeENV15),
        _ => Err(CurationError::Scoring {
            message: format!(
                "unknown embedding model '{name}'. Supported: all-MiniLM-L6-v2, \
                 bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5"
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_name_case_insensitive() {
        assert!(parse_model_name("All-MiniLM-L6-v2").is_ok());
        assert!(parse_model_name("bge-small-en-v1.5").is_ok());
    }

    #[test]
    fn test_parse_model_name_unknown() {
        let err = parse_model_name("word2vec").unwrap_err();
        assert!(err.to_string().contains("word2vec"));
    }

    // Integration tests require a model download - run with --ignored
    #[test]
    #[ignore = "requires model download"]
    fn test_score_related_above_unrelated() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = EmbeddingScorer::new(&ScoringConfig::default(), dir.path()).unwrap();

        let related = scorer.score("a photo of a dog", "golden retriever").unwrap();
        let unrelated = scorer.score("a photo of a dog", "suspension bridge").unwrap();
        assert!(related > unrelated);
        assert!((-1.0..=1.0).contains(&related));
        assert!((-1.0..=1.0).contains(&unrelated));
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_score_deterministic_within_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = EmbeddingScorer::new(&ScoringConfig::default(), dir.path()).unwrap();

        let first = scorer.score("red barn", "old farm building").unwrap();
        let second = scorer.score("red barn", "old farm building").unwrap();
        assert!((first - second).abs() < 1e-4);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_score_empty_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = EmbeddingScorer::new(&ScoringConfig::default(), dir.path()).unwrap();
        assert!(scorer.score("", "cat").is_err());
    }
}
