// src/explain.rs
//! Explainability helpers built on top of a `ClassificationResult`:
//! score ranking, active-feature summary and per-category score breakdown.

use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::features::FeatureVector;
use crate::scoring::{round2, CategoryScores};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScore {
    pub rank: usize,
    pub category: String,
    pub score: f64,
}

/// Categories by score, highest first. Equal scores keep config order.
pub fn score_ranking(scores: &CategoryScores) -> Vec<RankedScore> {
    let mut sorted: Vec<(&str, f64)> = scores.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, (category, score))| RankedScore {
            rank: i + 1,
            category: category.to_string(),
            score,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Bool,
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub name: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
}

/// Active signals (exactly 1.0) followed by non-zero numeric specs.
pub fn feature_summary(features_bool: &FeatureVector, features_num: &FeatureVector) -> Vec<FeatureSummary> {
    let bools = features_bool
        .iter()
        .filter(|(_, v)| *v == 1.0)
        .map(|(name, value)| FeatureSummary {
            name: name.to_string(),
            value,
            kind: FeatureKind::Bool,
        });
    let nums = features_num
        .iter()
        .filter(|(_, v)| *v > 0.0)
        .map(|(name, value)| FeatureSummary {
            name: name.to_string(),
            value,
            kind: FeatureKind::Numeric,
        });
    bools.chain(nums).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub feature: String,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDetails {
    pub category: String,
    pub base_score: f64,
    pub breakdown: Vec<Contribution>,
    pub total: f64,
}

/// Why `category` scored what it did. `None` for unknown categories.
///
/// Only features that actually moved the score are listed; `total` is read
/// back from `scores` so it matches the rounded figure the caller saw.
pub fn score_details(
    config: &ClassifierConfig,
    category: &str,
    scores: &CategoryScores,
    features: &FeatureVector,
) -> Option<ScoreDetails> {
    let model = config.scoring.get(category)?;
    let breakdown = model
        .weights
        .iter()
        .filter(|(_, w)| *w != 0.0)
        .filter_map(|(feature, weight)| {
            let value = features.get(feature);
            let contribution = value * weight;
            (contribution != 0.0).then(|| Contribution {
                feature: feature.clone(),
                value,
                weight: *weight,
                contribution: round2(contribution),
            })
        })
        .collect();

    Some(ScoreDetails {
        category: model.name.clone(),
        base_score: model.base_score,
        breakdown,
        total: scores.get(category).unwrap_or(0.0),
    })
}
