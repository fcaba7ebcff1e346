// src/config/error.rs
use std::path::PathBuf;

/// Construction-time failures. The classifier never runs on a config that
/// produced one of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {document}: {source}")]
    Parse {
        document: &'static str,
        source: serde_json::Error,
    },

    #[error("category `{category}` in {document}: {reason}")]
    InvalidCategory {
        document: &'static str,
        category: String,
        reason: String,
    },

    #[error("form_factor_lock `{tag}` targets unknown category `{category}`")]
    UnknownLockCategory { tag: String, category: String },

    #[error("fallback category `{0}` is not defined in the scoring model")]
    UnknownFallbackCategory(String),

    #[error("validation error: {0}")]
    Validation(String),
}
