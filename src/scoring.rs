// src/scoring.rs
//! Additive vector scoring:
//! `score(category) = base_score + Σ feature_vector[feature] * weight`,
//! rounded to two decimals, computed for every configured category.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::ScoringModel;
use crate::features::FeatureVector;

/// Per-category scores in scoring-model order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScores(Vec<(String, f64)>);

impl CategoryScores {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.iter().find(|(c, _)| c == category).map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(c, s)| (c.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest score. Ties go to the category listed first in the scoring
    /// model, so reordering the config file can change the winner.
    pub fn argmax(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (c, s) in self.iter() {
            match best {
                Some((_, b)) if s <= b => {}
                _ => best = Some((c, s)),
            }
        }
        best
    }
}

impl Serialize for CategoryScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (c, s) in &self.0 {
            map.serialize_entry(c, s)?;
        }
        map.end()
    }
}

/// Score every category. Features missing from `features` contribute 0.
pub fn score(model: &ScoringModel, features: &FeatureVector) -> CategoryScores {
    CategoryScores(
        model
            .iter()
            .map(|cat| {
                let total = cat
                    .weights
                    .iter()
                    .fold(cat.base_score, |acc, (f, w)| acc + features.get(f) * w);
                (cat.name.clone(), round2(total))
            })
            .collect(),
    )
}

#[inline]
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
