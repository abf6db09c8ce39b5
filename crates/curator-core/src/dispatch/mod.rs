//! Concurrent query dispatch against the inference service.
//!
//! For each image the dispatcher issues `samples_per_image` completions
//! concurrently, all gated by one semaphore shared across the whole run
//! so total in-flight load stays bounded no matter how many images a
//! directory holds.

mod backend;
mod openai;

pub use backend::{CompletionRequest, ImageInput, VisionBackend};
pub use openai::OpenAiBackend;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future;
use tokio::sync::Semaphore;

use crate::error::{CurationError, CurationResult};

/// Knobs for the dispatcher, taken from `[query]` and `[throttle]` config.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Completions requested per image
    pub samples_per_image: usize,
    /// Maximum simultaneous in-flight requests
    pub max_parallel_requests: usize,
    /// Fixed delay after acquiring a slot, before sending
    pub pacing_delay_ms: u64,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            samples_per_image: 5,
            max_parallel_requests: 100,
            pacing_delay_ms: 1000,
        }
    }
}

/// Issues repeated completions for one image at a time.
///
/// Create one dispatcher per run: the limiter inside it is the shared
/// concurrency bound for every request the run makes.
pub struct Dispatcher {
    backend: Arc<dyn VisionBackend>,
    limiter: Arc<Semaphore>,
    prompt: String,
    max_tokens: u32,
    samples: usize,
    pacing: Duration,
}

impl Dispatcher {
    pub fn new(backend: Box<dyn VisionBackend>, prompt: &str, max_tokens: u32, options: DispatchOptions) -> Self {
        Self {
            backend: Arc::from(backend),
            limiter: Arc::new(Semaphore::new(options.max_parallel_requests)),
            prompt: prompt.to_string(),
            max_tokens,
            samples: options.samples_per_image,
            pacing: Duration::from_millis(options.pacing_delay_ms),
        }
    }

    /// Number of responses `query` returns per image.
    pub fn samples_per_image(&self) -> usize {
        self.samples
    }

    /// Query the service `samples_per_image` times for one image.
    ///
    /// All samples are awaited jointly; the first failure drops the
    /// sibling requests and no partial results are returned. A missing
    /// completion path in any response surfaces as
    /// `CurationError::RateLimited`.
    pub async fn query(&self, image_path: &Path) -> CurationResult<Vec<String>> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|e| CurationError::ImageRead {
                path: image_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let format = image_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_else(|| "jpeg".to_string());

        let request = CompletionRequest {
            image: ImageInput::from_bytes(&bytes, &format),
            prompt: self.prompt.clone(),
            max_tokens: self.max_tokens,
        };

        future::try_join_all((0..self.samples).map(|_| self.sample(&request))).await
    }

    /// One completion attempt: acquire a limiter slot, pace, send.
    async fn sample(&self, request: &CompletionRequest) -> CurationResult<String> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| CurationError::Http {
                message: "concurrency limiter closed".to_string(),
            })?;

        tokio::time::sleep(self.pacing).await;

        match tokio::time::timeout(self.backend.timeout(), self.backend.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(CurationError::Http {
                message: format!(
                    "request to {} timed out after {:?}",
                    self.backend.name(),
                    self.backend.timeout()
                ),
            }),
        }
    }
}
