//! Directory and batch curation.
//!
//! A [`Curator`] walks a data directory, queries the inference service for
//! each image not already in the ledger, scores the responses against the
//! ground-truth label, and persists the ledger after every image so an
//! interrupted run resumes where it left off.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{Config, CurationConfig};
use crate::dispatch::{DispatchOptions, Dispatcher, OpenAiBackend};
use crate::error::{CurationError, CurationResult};
use crate::labels::LabelSet;
use crate::ledger::{LedgerRow, ResultLedger};
use crate::scoring::{EmbeddingScorer, SimilarityScorer};
use crate::text;

/// Runs the query-score-record loop over data directories.
pub struct Curator {
    dispatcher: Dispatcher,
    scorer: Box<dyn SimilarityScorer>,
    ledger_file: String,
    labels_file: String,
}

impl Curator {
    /// Build a curator from configuration: reads credentials and the prompt,
    /// constructs the HTTP backend, and loads the embedding model.
    pub fn new(config: &Config) -> CurationResult<Self> {
        let api_key = read_api_key(&config.query.key_file)?;
        let prompt = read_prompt(&config.query.prompt_file)?;

        let backend = OpenAiBackend::new(
            &api_key,
            &config.query.model,
            &config.query.endpoint,
            Duration::from_millis(config.throttle.request_timeout_ms),
        );

        let dispatcher = Dispatcher::new(
            Box::new(backend),
            &prompt,
            config.query.max_tokens,
            DispatchOptions {
                samples_per_image: config.query.samples_per_image,
                max_parallel_requests: config.throttle.max_parallel_requests,
                pacing_delay_ms: config.throttle.pacing_delay_ms,
            },
        );

        let scorer = EmbeddingScorer::new(&config.scoring, &config.scoring_cache_dir())?;

        Ok(Self {
            dispatcher,
            scorer: Box::new(scorer),
            ledger_file: config.curation.ledger_file.clone(),
            labels_file: config.curation.labels_file.clone(),
        })
    }

    /// Assemble a curator from pre-built parts. Lets tests substitute a
    /// scripted backend and a fixed-value scorer.
    pub fn from_parts(
        dispatcher: Dispatcher,
        scorer: Box<dyn SimilarityScorer>,
        curation: &CurationConfig,
    ) -> Self {
        Self {
            dispatcher,
            scorer,
            ledger_file: curation.ledger_file.clone(),
            labels_file: curation.labels_file.clone(),
        }
    }

    /// Curate every subdirectory of `root`, in lexicographic order.
    ///
    /// Returns the total number of images processed this run across all
    /// subdirectories. The first failing directory aborts the batch; its
    /// ledger has already been persisted up to the failure point.
    pub async fn process_all(&self, root: &Path) -> CurationResult<usize> {
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();

        tracing::info!("Curating {} directories under {}", dirs.len(), root.display());

        let mut total = 0;
        for dir in &dirs {
            total += self.process_directory(dir).await?;
        }
        Ok(total)
    }

    /// Curate one directory.
    ///
    /// Returns the number of images processed this run, which is zero for a
    /// directory whose ledger is already complete. If the service starts
    /// rate limiting, the ledger is flushed and the count reported is one
    /// less than the number completed, signalling the stop to the caller.
    pub async fn process_directory(&self, dir: &Path) -> CurationResult<usize> {
        let started = std::time::Instant::now();
        let labels = LabelSet::load(&dir.join(&self.labels_file))?;
        let files = list_image_files(dir)?;

        // One label per image, or one short when the listing picked up a
        // stray non-image artifact.
        if labels.len() != files.len() && labels.len() != files.len().saturating_sub(1) {
            return Err(CurationError::LabelCountMismatch {
                dir: dir.to_path_buf(),
                labels: labels.len(),
                files: files.len(),
            });
        }

        let ledger_path = dir.join(&self.ledger_file);
        let mut ledger = if ledger_path.exists() {
            let loaded = ResultLedger::load(&ledger_path)?;
            if loaded.samples() != self.dispatcher.samples_per_image() {
                return Err(CurationError::Ledger {
                    path: ledger_path,
                    message: format!(
                        "ledger has {} samples per image, run is configured for {}",
                        loaded.samples(),
                        self.dispatcher.samples_per_image()
                    ),
                });
            }
            tracing::info!(
                "Resuming {}: {} of {} images already curated",
                dir.display(),
                loaded.len(),
                files.len()
            );
            loaded
        } else {
            ResultLedger::new(self.dispatcher.samples_per_image())
        };

        let mut processed = 0usize;
        for (i, file) in files.iter().enumerate() {
            if ledger.contains(file) {
                tracing::debug!("Skipping {file}: already in ledger");
                continue;
            }
            let Some(label) = labels.get(i) else {
                tracing::warn!("No label for {file}, skipping");
                continue;
            };
            let actual_label = text::normalize(label);

            let responses = match self.dispatcher.query(&dir.join(file)).await {
                Ok(responses) => responses,
                Err(CurationError::RateLimited) => {
                    // Stop-and-resume policy: flush what we have and report
                    // one less than the success count, marking the aborted
                    // image as unpaid work for the operator.
                    tracing::warn!(
                        "Rate limited while querying {file}; stopping with {processed} images done"
                    );
                    ledger.save(&ledger_path)?;
                    return Ok(processed.saturating_sub(1));
                }
                Err(e) => return Err(e),
            };

            let responses: Vec<String> =
                responses.iter().map(|r| text::normalize(r)).collect();
            let mut similarities = Vec::with_capacity(responses.len());
            for response in &responses {
                similarities.push(self.scorer.score(response, &actual_label)?);
            }

            tracing::info!(
                "Curated {file}: label '{actual_label}', best similarity {:.3}",
                similarities.iter().cloned().fold(f32::MIN, f32::max)
            );

            ledger.push(LedgerRow {
                directory: dir.display().to_string(),
                image_file: file.clone(),
                actual_label,
                responses,
                similarities,
            });
            processed += 1;
            // Flush after every image so a crash never loses completed work
            ledger.save(&ledger_path)?;
        }

        ledger.save(&ledger_path)?;
        if processed > 0 {
            let elapsed = started.elapsed();
            tracing::info!(
                "Finished {} in {:.1?}: {processed} images, {:.1?} per image",
                dir.display(),
                elapsed,
                elapsed / processed as u32
            );
        }
        Ok(processed)
    }
}

/// List image files in `dir`: sorted file names, excluding text and CSV
/// artifacts (labels, ledgers) that live alongside the images.
fn list_image_files(dir: &Path) -> CurationResult<Vec<String>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(".txt") || name.contains(".csv") {
            continue;
        }
        files.push(name);
    }
    files.sort();
    Ok(files)
}

fn read_api_key(path: &PathBuf) -> CurationResult<String> {
    let key = std::fs::read_to_string(path)
        .map_err(|_| CurationError::MissingCredentials { path: path.clone() })?
        .trim()
        .to_string();
    if key.is_empty() {
        return Err(CurationError::MissingCredentials { path: path.clone() });
    }
    Ok(key)
}

fn read_prompt(path: &PathBuf) -> CurationResult<String> {
    let prompt = std::fs::read_to_string(path)
        .map_err(|e| CurationError::Prompt {
            path: path.clone(),
            message: e.to_string(),
        })?
        .trim()
        .to_string();
    if prompt.is_empty() {
        return Err(CurationError::Prompt {
            path: path.clone(),
            message: "prompt file is empty".to_string(),
        });
    }
    Ok(prompt)
}
