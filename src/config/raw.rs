// src/config/raw.rs
// Serde shapes of the three JSON documents, before validation.
// Object maps are serde_json::Map (preserve_order) so the file's key order
// survives into the typed config.

use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// `signals.json`: tag -> { "CN": [...], "US": [...], "JP": [...] }.
pub(crate) type RawSignals = Map<String, Value>;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawLocaleKeywords {
    #[serde(rename = "CN", default)]
    pub cn: Vec<String>,
    #[serde(rename = "US", default)]
    pub us: Vec<String>,
    #[serde(rename = "JP", default)]
    pub jp: Vec<String>,
}

/// `scoring_models.json`: category -> { base_score, weights }.
pub(crate) type RawScoringModels = Map<String, Value>;

#[derive(Debug, Deserialize)]
pub(crate) struct RawCategoryModel {
    pub base_score: f64,
    pub weights: Map<String, Value>,
}

/// `hard_filters.json`. Every section is optional.
#[derive(Debug, Deserialize)]
pub(crate) struct RawHardFilters {
    #[serde(default)]
    pub accessories: Vec<String>,
    #[serde(default)]
    pub form_factor_lock: Map<String, Value>,
    #[serde(default = "default_min_score_threshold")]
    pub min_score_threshold: Number,
    #[serde(default = "default_fallback_category")]
    pub fallback_category: String,
}

pub(crate) fn default_min_score_threshold() -> Number {
    Number::from(30)
}

pub(crate) fn default_fallback_category() -> String {
    "灯光类-其他".to_string()
}
