// src/classifier.rs
//! # Classifier
//! Runs the five stages over one title:
//! normalize → signals + specs → union → score → arbitrate.
//!
//! A `Classifier` owns an immutable `ClassifierConfig`; `classify` takes
//! `&self`, holds no mutable state, and never fails. Sharing one instance
//! across threads needs no locking.

use serde::Serialize;
use tracing::debug;

use crate::arbitrate::{arbitrate, DecisionReason};
use crate::config::{ClassifierConfig, ConfigError};
use crate::features::FeatureVector;
use crate::locale::Locale;
use crate::normalize::normalize_title;
use crate::scoring::{score, CategoryScores};
use crate::signals::extract_signals;
use crate::specs::extract_specs;

/// Everything the pipeline computed for one title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub clean_title: String,
    pub predicted_category: String,
    pub decision_reason: String,
    #[serde(skip)]
    pub decision: DecisionReason,
    pub scores_all: CategoryScores,
    pub features_bool: FeatureVector,
    pub features_num: FeatureVector,
}

impl ClassificationResult {
    /// Boolean and numeric features together, as seen by scoring.
    pub fn feature_vector(&self) -> FeatureVector {
        self.features_bool.merged(&self.features_num)
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Validate `config` and build a classifier around it.
    pub fn new(config: ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load and validate the config from $CLASSIFIER_CONFIG_DIR (or `config/`).
    pub fn from_default_dir() -> Result<Self, ConfigError> {
        Self::new(ClassifierConfig::load_default()?)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one title. A missing title classifies as the empty string.
    pub fn classify(&self, title: Option<&str>, locale: Locale) -> ClassificationResult {
        let clean_title = normalize_title(title);

        let features_bool = extract_signals(&self.config.signals, &clean_title, locale);
        let features_num = extract_specs(&clean_title);
        let features = features_bool.merged(&features_num);

        let scores_all = score(&self.config.scoring, &features);
        let verdict = arbitrate(&self.config.filters, &scores_all, &features, &clean_title);

        debug!(
            target: "classifier",
            id = %title_id(&clean_title),
            %locale,
            category = %verdict.category,
            rule = verdict.reason.rule(),
            "classified"
        );

        ClassificationResult {
            decision_reason: verdict.reason.to_string(),
            decision: verdict.reason,
            predicted_category: verdict.category,
            clean_title,
            scores_all,
            features_bool,
            features_num,
        }
    }

    /// Convenience for callers holding a raw site code ("jp", "US", ...).
    pub fn classify_for_site(&self, title: Option<&str>, site: Option<&str>) -> ClassificationResult {
        self.classify(title, Locale::from_site(site))
    }
}

/// Short stable id for log lines, so raw titles stay out of the logs.
pub(crate) fn title_id(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
