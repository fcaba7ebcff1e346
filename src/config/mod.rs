// src/config/mod.rs
//! Classifier configuration: the signal dictionary, the per-category scoring
//! model and the hard-filter rules.
//!
//! Loading is two-step: the JSON documents are parsed into loose serde shapes
//! (`raw`), then validated into the typed records in `types`. A `ClassifierConfig`
//! is immutable once built; reconfiguring means building a new one.

mod error;
mod raw;
mod types;

pub use error::ConfigError;
pub use types::{
    CategoryScoringModel, HardFilterRules, LocaleKeywords, ScoreThreshold, ScoringModel,
    SignalDictionary,
};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::specs::SPEC_FEATURES;

pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const ENV_CONFIG_DIR: &str = "CLASSIFIER_CONFIG_DIR";

pub const SIGNALS_FILE: &str = "signals.json";
pub const SCORING_FILE: &str = "scoring_models.json";
pub const FILTERS_FILE: &str = "hard_filters.json";

/// The three documents, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub signals: SignalDictionary,
    pub scoring: ScoringModel,
    pub filters: HardFilterRules,
}

/// Paths of the three documents inside a config directory.
pub fn config_paths(dir: &Path) -> [PathBuf; 3] {
    [
        dir.join(SIGNALS_FILE),
        dir.join(SCORING_FILE),
        dir.join(FILTERS_FILE),
    ]
}

/// Resolve the config directory: $CLASSIFIER_CONFIG_DIR, else `config/`.
pub fn config_dir_from_env() -> PathBuf {
    std::env::var(ENV_CONFIG_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR))
}

impl ClassifierConfig {
    /// Load from the directory named by $CLASSIFIER_CONFIG_DIR (or `config/`).
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_dir(config_dir_from_env())
    }

    /// Load `signals.json`, `scoring_models.json` and `hard_filters.json` from `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let [signals_path, scoring_path, filters_path] = config_paths(dir.as_ref());
        let signals = read(&signals_path)?;
        let scoring = read(&scoring_path)?;
        let filters = read(&filters_path)?;

        let cfg = Self::from_json_strs(&signals, &scoring, &filters)?;
        info!(
            dir = %dir.as_ref().display(),
            categories = cfg.scoring.len(),
            signals = cfg.signals.len(),
            accessories = cfg.filters.accessories.len(),
            "classifier config loaded"
        );
        Ok(cfg)
    }

    /// Parse and validate the three documents from JSON text.
    pub fn from_json_strs(signals: &str, scoring: &str, filters: &str) -> Result<Self, ConfigError> {
        let raw_signals: raw::RawSignals =
            serde_json::from_str(signals).map_err(|source| ConfigError::Parse {
                document: SIGNALS_FILE,
                source,
            })?;
        let raw_scoring: raw::RawScoringModels =
            serde_json::from_str(scoring).map_err(|source| ConfigError::Parse {
                document: SCORING_FILE,
                source,
            })?;
        let raw_filters: raw::RawHardFilters =
            serde_json::from_str(filters).map_err(|source| ConfigError::Parse {
                document: FILTERS_FILE,
                source,
            })?;

        let signals = build_signals(raw_signals)?;
        let scoring = build_scoring(raw_scoring)?;
        let filters = build_filters(raw_filters)?;

        let cfg = Self {
            signals,
            scoring,
            filters,
        };
        cfg.validate()?;
        cfg.warn_suspicious();
        Ok(cfg)
    }

    /// Cross-document checks that make a config unusable. Logs nothing, so
    /// it is cheap to repeat on an already loaded config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.is_empty() {
            return Err(ConfigError::Validation(
                "scoring model defines no categories".into(),
            ));
        }

        for (tag, category) in &self.filters.form_factor_lock {
            if !self.scoring.contains(category) {
                return Err(ConfigError::UnknownLockCategory {
                    tag: tag.clone(),
                    category: category.clone(),
                });
            }
        }

        if !self.scoring.contains(&self.filters.fallback_category) {
            return Err(ConfigError::UnknownFallbackCategory(
                self.filters.fallback_category.clone(),
            ));
        }

        Ok(())
    }

    /// Count and log references that are tolerated but can never have an effect.
    fn warn_suspicious(&self) -> usize {
        let mut warnings = 0;

        for (tag, _) in &self.filters.form_factor_lock {
            if !self.signals.contains(tag) {
                warn!(%tag, "form_factor_lock tag is not a configured signal; it can never fire");
                warnings += 1;
            }
        }

        for model in self.scoring.iter() {
            for (feature, _) in &model.weights {
                if !self.signals.contains(feature) && !SPEC_FEATURES.contains(&feature.as_str()) {
                    warn!(
                        category = %model.name,
                        %feature,
                        "weight references an unknown feature; it always contributes 0"
                    );
                    warnings += 1;
                }
            }
        }

        warnings
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn build_signals(raw: raw::RawSignals) -> Result<SignalDictionary, ConfigError> {
    let mut tags = Vec::with_capacity(raw.len());
    for (tag, value) in raw {
        let kw: raw::RawLocaleKeywords =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidCategory {
                document: SIGNALS_FILE,
                category: tag.clone(),
                reason: e.to_string(),
            })?;
        let keywords = LocaleKeywords {
            cn: clean_keywords(&tag, "CN", kw.cn),
            us: clean_keywords(&tag, "US", kw.us),
            jp: clean_keywords(&tag, "JP", kw.jp),
        };
        tags.push((tag, keywords));
    }
    Ok(SignalDictionary::new(tags))
}

/// Drop empty keywords (an empty substring matches every title) and flag
/// keywords that cannot match lowercased text.
fn clean_keywords(tag: &str, locale: &str, keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .filter(|kw| {
            if kw.is_empty() {
                warn!(%tag, %locale, "dropping empty keyword");
                return false;
            }
            if kw.chars().any(char::is_uppercase) {
                warn!(%tag, %locale, keyword = %kw, "keyword has uppercase letters and will never match");
            }
            true
        })
        .collect()
}

fn build_scoring(raw: raw::RawScoringModels) -> Result<ScoringModel, ConfigError> {
    let mut categories = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        let model: raw::RawCategoryModel =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidCategory {
                document: SCORING_FILE,
                category: name.clone(),
                reason: e.to_string(),
            })?;
        let weights = numeric_entries(&name, model.weights)?;
        categories.push(CategoryScoringModel {
            name,
            base_score: model.base_score,
            weights,
        });
    }
    Ok(ScoringModel::new(categories))
}

fn numeric_entries(category: &str, map: Map<String, Value>) -> Result<Vec<(String, f64)>, ConfigError> {
    map.into_iter()
        .map(|(feature, v)| match v.as_f64() {
            Some(w) => Ok((feature, w)),
            None => Err(ConfigError::InvalidCategory {
                document: SCORING_FILE,
                category: category.to_string(),
                reason: format!("weight `{feature}` is not a number: {v}"),
            }),
        })
        .collect()
}

fn build_filters(raw: raw::RawHardFilters) -> Result<HardFilterRules, ConfigError> {
    let accessories = raw
        .accessories
        .into_iter()
        .filter(|a| {
            if a.trim().is_empty() {
                warn!("dropping empty accessory term");
                return false;
            }
            true
        })
        .collect();

    let form_factor_lock = raw
        .form_factor_lock
        .into_iter()
        .map(|(tag, v)| match v {
            Value::String(category) => Ok((tag, category)),
            other => Err(ConfigError::Validation(format!(
                "form_factor_lock `{tag}` must map to a category name, got {other}"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HardFilterRules {
        accessories,
        form_factor_lock,
        min_score_threshold: raw.min_score_threshold.into(),
        fallback_category: raw.fallback_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNALS: &str = r#"{
        "tag_is_ring": { "US": ["ring light"], "JP": ["リングライト"] },
        "tag_has_rgb": { "US": ["rgb", ""] }
    }"#;

    const SCORING: &str = r#"{
        "环形灯": { "base_score": 10, "weights": { "tag_is_ring": 60 } },
        "平板灯": { "base_score": 12.5, "weights": { "tag_has_rgb": 5, "f_wattage": 10 } },
        "灯光类-其他": { "base_score": 0, "weights": {} }
    }"#;

    #[test]
    fn parses_and_keeps_file_order() {
        let cfg = ClassifierConfig::from_json_strs(SIGNALS, SCORING, "{}").expect("valid");
        assert_eq!(
            cfg.scoring.names().collect::<Vec<_>>(),
            vec!["环形灯", "平板灯", "灯光类-其他"]
        );
        let tags: Vec<_> = cfg.signals.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec!["tag_is_ring", "tag_has_rgb"]);
        assert_eq!(cfg.scoring.get("平板灯").unwrap().base_score, 12.5);
    }

    #[test]
    fn missing_filter_sections_use_defaults() {
        let cfg = ClassifierConfig::from_json_strs(SIGNALS, SCORING, "{}").unwrap();
        assert!(cfg.filters.accessories.is_empty());
        assert!(cfg.filters.form_factor_lock.is_empty());
        assert_eq!(cfg.filters.min_score_threshold.value(), 30.0);
        assert_eq!(cfg.filters.min_score_threshold.to_string(), "30");
        assert_eq!(cfg.filters.fallback_category, "灯光类-其他");
    }

    #[test]
    fn suspicious_references_warn_but_load() {
        let cfg = ClassifierConfig::from_json_strs(
            SIGNALS,
            r#"{
                "环形灯": { "base_score": 10, "weights": { "tag_is_ring": 60, "tag_is_ghost": 5, "f_cri": 5 } },
                "灯光类-其他": { "base_score": 0, "weights": {} }
            }"#,
            r#"{ "form_factor_lock": { "tag_is_nothing": "环形灯" } }"#,
        )
        .expect("tolerated problems still load");
        assert_eq!(cfg.warn_suspicious(), 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn threshold_keeps_its_written_form() {
        let cfg =
            ClassifierConfig::from_json_strs(SIGNALS, SCORING, r#"{ "min_score_threshold": 30.0 }"#).unwrap();
        assert_eq!(cfg.filters.min_score_threshold.to_string(), "30.0");

        let cfg =
            ClassifierConfig::from_json_strs(SIGNALS, SCORING, r#"{ "min_score_threshold": 45 }"#).unwrap();
        assert_eq!(cfg.filters.min_score_threshold.to_string(), "45");
        assert_eq!(cfg.filters.min_score_threshold.value(), 45.0);

        let err = ClassifierConfig::from_json_strs(SIGNALS, SCORING, r#"{ "min_score_threshold": "30" }"#);
        assert!(err.is_err());
    }

    #[test]
    fn empty_keywords_are_dropped() {
        let cfg = ClassifierConfig::from_json_strs(SIGNALS, SCORING, "{}").unwrap();
        let rgb = cfg.signals.get("tag_has_rgb").unwrap();
        assert_eq!(rgb.us, vec!["rgb".to_string()]);
        assert!(rgb.cn.is_empty());
    }

    #[test]
    fn lock_to_unknown_category_is_fatal() {
        let filters = r#"{ "form_factor_lock": { "tag_is_ring": "不存在" } }"#;
        let err = ClassifierConfig::from_json_strs(SIGNALS, SCORING, filters).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLockCategory { .. }), "{err}");
    }

    #[test]
    fn missing_fallback_category_is_fatal() {
        let scoring = r#"{ "环形灯": { "base_score": 10, "weights": {} } }"#;
        let err = ClassifierConfig::from_json_strs(SIGNALS, scoring, "{}").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFallbackCategory(_)), "{err}");
    }

    #[test]
    fn missing_base_score_is_fatal() {
        let scoring = r#"{ "灯光类-其他": { "weights": {} } }"#;
        let err = ClassifierConfig::from_json_strs(SIGNALS, scoring, "{}").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCategory { .. }), "{err}");
    }

    #[test]
    fn non_numeric_weight_is_fatal() {
        let scoring = r#"{ "灯光类-其他": { "base_score": 0, "weights": { "tag_has_rgb": "high" } } }"#;
        let err = ClassifierConfig::from_json_strs(SIGNALS, scoring, "{}").unwrap_err();
        assert!(err.to_string().contains("tag_has_rgb"), "{err}");
    }

    #[test]
    fn malformed_json_names_the_document() {
        let err = ClassifierConfig::from_json_strs("{", SCORING, "{}").unwrap_err();
        assert!(
            matches!(err, ConfigError::Parse { document: SIGNALS_FILE, .. }),
            "{err}"
        );
    }

    #[test]
    fn load_dir_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClassifierConfig::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "{err}");
    }

    #[test]
    fn shipped_config_is_valid() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_DIR);
        let cfg = ClassifierConfig::load_dir(dir).expect("shipped config must load");
        assert_eq!(cfg.scoring.len(), 11);
        assert_eq!(cfg.filters.lock_tag_for("环形灯"), Some("tag_is_ring"));
    }
}
