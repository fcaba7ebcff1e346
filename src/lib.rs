// src/lib.rs
// Public library surface for the service binary, the batch CLI and tests.

pub mod arbitrate;
pub mod classifier;
pub mod config;
pub mod features;
pub mod locale;
pub mod normalize;
pub mod scoring;
pub mod signals;
pub mod specs;

// Batch driving & explainability on top of the pipeline
pub mod batch;
pub mod explain;
pub mod overview;

// Service plumbing
pub mod api;
pub mod handle;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::classifier::{ClassificationResult, Classifier};
pub use crate::config::{ClassifierConfig, ConfigError};
pub use crate::handle::ClassifierHandle;
pub use crate::locale::Locale;
