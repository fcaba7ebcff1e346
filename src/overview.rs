// src/overview.rs
//! Read-only views of the rule set for browsing: per-category detail and a
//! global summary.

use serde::Serialize;

use crate::config::{ClassifierConfig, LocaleKeywords, ScoreThreshold};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub name: String,
    pub base_score: f64,
    /// Highest weight first.
    pub positive_weights: Vec<(String, f64)>,
    /// Most negative first.
    pub negative_weights: Vec<(String, f64)>,
    /// Keyword lists of the signal tags this category weights.
    pub keywords: Vec<(String, LocaleKeywords)>,
    /// Signal tag that forces this category, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_lock: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RulesSummary {
    pub categories_count: usize,
    pub signals_count: usize,
    pub accessories_count: usize,
    pub min_score_threshold: ScoreThreshold,
    pub fallback_category: String,
}

/// Category names in config order.
pub fn categories(config: &ClassifierConfig) -> Vec<String> {
    config.scoring.names().map(str::to_string).collect()
}

pub fn category_info(config: &ClassifierConfig, name: &str) -> Option<CategoryInfo> {
    let model = config.scoring.get(name)?;

    let mut positive_weights: Vec<(String, f64)> = model
        .weights
        .iter()
        .filter(|(_, w)| *w > 0.0)
        .cloned()
        .collect();
    positive_weights.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut negative_weights: Vec<(String, f64)> = model
        .weights
        .iter()
        .filter(|(_, w)| *w < 0.0)
        .cloned()
        .collect();
    negative_weights.sort_by(|a, b| a.1.total_cmp(&b.1));

    let keywords = config
        .signals
        .iter()
        .filter(|(tag, _)| model.weight(tag).is_some())
        .map(|(tag, kw)| (tag.to_string(), kw.clone()))
        .collect();

    Some(CategoryInfo {
        name: model.name.clone(),
        base_score: model.base_score,
        positive_weights,
        negative_weights,
        keywords,
        form_lock: config.filters.lock_tag_for(name).map(str::to_string),
    })
}

pub fn rules_summary(config: &ClassifierConfig) -> RulesSummary {
    RulesSummary {
        categories_count: config.scoring.len(),
        signals_count: config.signals.len(),
        accessories_count: config.filters.accessories.len(),
        min_score_threshold: config.filters.min_score_threshold.clone(),
        fallback_category: config.filters.fallback_category.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClassifierConfig {
        ClassifierConfig::from_json_strs(
            r#"{
                "tag_is_ring": { "US": ["ring light"], "JP": ["リングライト"] },
                "tag_is_phone": { "US": ["phone"] },
                "tag_is_panel": { "US": ["panel"] }
            }"#,
            r#"{
                "环形灯": { "base_score": 10, "weights": { "tag_is_phone": 5, "tag_is_ring": 60, "tag_is_panel": -30, "f_wattage": -10 } },
                "灯光类-其他": { "base_score": 0, "weights": {} }
            }"#,
            r#"{ "accessories": ["softbox"], "form_factor_lock": { "tag_is_ring": "环形灯" } }"#,
        )
        .unwrap()
    }

    #[test]
    fn category_info_sorts_weights_and_collects_keywords() {
        let info = category_info(&config(), "环形灯").unwrap();
        assert_eq!(
            info.positive_weights,
            vec![("tag_is_ring".to_string(), 60.0), ("tag_is_phone".to_string(), 5.0)]
        );
        assert_eq!(
            info.negative_weights,
            vec![("tag_is_panel".to_string(), -30.0), ("f_wattage".to_string(), -10.0)]
        );
        let tags: Vec<_> = info.keywords.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tags, vec!["tag_is_ring", "tag_is_phone", "tag_is_panel"]);
        assert_eq!(info.form_lock.as_deref(), Some("tag_is_ring"));
    }

    #[test]
    fn unknown_category_has_no_info() {
        assert!(category_info(&config(), "不存在").is_none());
    }

    #[test]
    fn summary_counts() {
        let s = rules_summary(&config());
        assert_eq!(s.categories_count, 2);
        assert_eq!(s.signals_count, 3);
        assert_eq!(s.accessories_count, 1);
        assert_eq!(s.min_score_threshold.value(), 30.0);
        assert_eq!(categories(&config()), vec!["环形灯", "灯光类-其他"]);
    }
}
