// src/config/types.rs
//! Validated, read-only configuration records.

use std::fmt;

use serde::Serialize;
use serde_json::Number;

use crate::locale::Locale;

/// Keyword substrings for one signal tag, split by locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocaleKeywords {
    #[serde(rename = "CN")]
    pub cn: Vec<String>,
    #[serde(rename = "US")]
    pub us: Vec<String>,
    #[serde(rename = "JP")]
    pub jp: Vec<String>,
}

impl LocaleKeywords {
    pub fn for_locale(&self, locale: Locale) -> &[String] {
        match locale {
            Locale::Cn => &self.cn,
            Locale::Us => &self.us,
            Locale::Jp => &self.jp,
        }
    }

    /// Keywords searched for `locale`: its own list followed by the US list.
    pub fn candidates(&self, locale: Locale) -> impl Iterator<Item = &str> {
        let extra: &[String] = if locale == Locale::Us { &[] } else { &self.us };
        self.for_locale(locale)
            .iter()
            .chain(extra.iter())
            .map(String::as_str)
    }
}

/// Signal tag -> locale keywords, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalDictionary {
    tags: Vec<(String, LocaleKeywords)>,
}

impl SignalDictionary {
    pub fn new(tags: Vec<(String, LocaleKeywords)>) -> Self {
        Self { tags }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocaleKeywords)> {
        self.tags.iter().map(|(t, k)| (t.as_str(), k))
    }

    pub fn get(&self, tag: &str) -> Option<&LocaleKeywords> {
        self.tags.iter().find(|(t, _)| t == tag).map(|(_, k)| k)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// One category: `score = base_score + Σ feature * weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScoringModel {
    pub name: String,
    pub base_score: f64,
    /// Feature name -> signed weight, in file order.
    pub weights: Vec<(String, f64)>,
}

impl CategoryScoringModel {
    pub fn weight(&self, feature: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|(f, _)| f == feature)
            .map(|(_, w)| *w)
    }
}

/// All categories in file order. The order is the argmax tie-break order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringModel {
    categories: Vec<CategoryScoringModel>,
}

impl ScoringModel {
    pub fn new(categories: Vec<CategoryScoringModel>) -> Self {
        Self { categories }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryScoringModel> {
        self.categories.iter()
    }

    pub fn get(&self, name: &str) -> Option<&CategoryScoringModel> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Minimum winning score, kept as the number the config wrote so reason
/// text shows `30` for `30` and `30.0` for `30.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreThreshold(Number);

impl ScoreThreshold {
    /// `None` for NaN or infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or(0.0)
    }
}

impl From<Number> for ScoreThreshold {
    fn from(n: Number) -> Self {
        Self(n)
    }
}

impl From<i64> for ScoreThreshold {
    fn from(n: i64) -> Self {
        Self(Number::from(n))
    }
}

impl fmt::Display for ScoreThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Hard overrides applied after scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct HardFilterRules {
    /// Substrings that reject a title outright.
    pub accessories: Vec<String>,
    /// Signal tag -> forced category, in file order (first hit wins).
    pub form_factor_lock: Vec<(String, String)>,
    pub min_score_threshold: ScoreThreshold,
    /// Category returned by the accessory and low-score rules.
    pub fallback_category: String,
}

impl Default for HardFilterRules {
    fn default() -> Self {
        Self {
            accessories: Vec::new(),
            form_factor_lock: Vec::new(),
            min_score_threshold: super::raw::default_min_score_threshold().into(),
            fallback_category: super::raw::default_fallback_category(),
        }
    }
}

impl HardFilterRules {
    /// The form-lock tag that forces `category`, if any.
    pub fn lock_tag_for(&self, category: &str) -> Option<&str> {
        self.form_factor_lock
            .iter()
            .find(|(_, c)| c == category)
            .map(|(t, _)| t.as_str())
    }
}
