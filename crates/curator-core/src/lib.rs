//! Curator Core - Image-dataset curation library.
//!
//! Curator grades labeled image collections by querying a multimodal
//! inference service for descriptions of each image and scoring those
//! descriptions against the ground-truth label with sentence embeddings.
//!
//! # Architecture
//!
//! ```text
//! Directory → List Images + Labels → Query (N samples) → Normalize →
//!     Score (cosine similarity) → Ledger (CSV) → Aggregate
//! ```
//!
//! Each directory carries its own crash-safe CSV ledger; runs resume by
//! skipping images that already have a row.
//!
//! # Usage
//!
//! ```rust,ignore
//! use curator_core::{Config, Curator};
//!
//! #[tokio::main]
//! async fn main() -> curator_core::Result<()> {
//!     let config = Config::load()?;
//!     let curator = Curator::new(&config)?;
//!
//!     let processed = curator.process_all("./data".as_ref()).await?;
//!     println!("Processed {processed} images");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod aggregate;
pub mod config;
pub mod curate;
pub mod dispatch;
pub mod error;
pub mod labels;
pub mod ledger;
pub mod math;
pub mod scoring;
pub mod text;

// Re-exports for convenient access
pub use aggregate::aggregate;
pub use config::Config;
pub use curate::Curator;
pub use dispatch::{DispatchOptions, Dispatcher, OpenAiBackend, VisionBackend};
pub use error::{ConfigError, CurationError, CurationResult, CuratorError, Result};
pub use labels::LabelSet;
pub use ledger::{LedgerRow, ResultLedger};
pub use scoring::{EmbeddingScorer, SimilarityScorer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
