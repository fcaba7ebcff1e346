// src/arbitrate.rs
//! # Arbitration
//! Ordered hard rules that turn raw scores into exactly one category.
//! First match wins:
//!
//! 1. Accessory kill: an accessory term appears in the title → fallback.
//! 2. Form-factor lock: a lock tag is 1.0 → its category (first tag in config order).
//! 3. Highest score (ties → first category in config order).
//! 4. Minimum-score gate: winner below threshold → fallback.
//! 5. Otherwise the winner.
//!
//! Pure and total: never fails, whatever the title or scores.

use serde::Serialize;
use std::fmt;

use crate::config::{HardFilterRules, ScoreThreshold};
use crate::features::FeatureVector;
use crate::scoring::CategoryScores;

/// Which rule decided, with the evidence it used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DecisionReason {
    AccessoryKill { term: String },
    FormLock { tag: String },
    LowScore { score: f64, threshold: ScoreThreshold },
    HighScore { category: String, score: f64 },
}

impl DecisionReason {
    /// Short label, used for metrics.
    pub fn rule(&self) -> &'static str {
        match self {
            DecisionReason::AccessoryKill { .. } => "accessory_kill",
            DecisionReason::FormLock { .. } => "form_lock",
            DecisionReason::LowScore { .. } => "low_score",
            DecisionReason::HighScore { .. } => "high_score",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionReason::AccessoryKill { term } => write!(f, "Accessory Kill: {term}"),
            DecisionReason::FormLock { tag } => write!(f, "Form Lock: {tag}"),
            DecisionReason::LowScore { score, threshold } => {
                write!(f, "Low Score: {} < {threshold}", ScoreDisplay(*score))
            }
            DecisionReason::HighScore { category, score } => {
                write!(f, "High Score: {category} ({})", ScoreDisplay(*score))
            }
        }
    }
}

/// Whole numbers keep one decimal ("30.0"), others print as-is ("22.5").
struct ScoreDisplay(f64);

impl fmt::Display for ScoreDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Final category plus the reason it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub category: String,
    pub reason: DecisionReason,
}

/// Apply the rule ladder. `clean_title` must already be normalized.
pub fn arbitrate(
    rules: &HardFilterRules,
    scores: &CategoryScores,
    features: &FeatureVector,
    clean_title: &str,
) -> Verdict {
    let fallback = || rules.fallback_category.clone();

    // 1) Accessory kill ignores scores entirely.
    let title = clean_title.to_lowercase();
    if let Some(term) = rules
        .accessories
        .iter()
        .find(|acc| title.contains(acc.to_lowercase().as_str()))
    {
        return Verdict {
            category: fallback(),
            reason: DecisionReason::AccessoryKill { term: term.clone() },
        };
    }

    // 2) Form-factor lock, first tag in config order.
    if let Some((tag, category)) = rules
        .form_factor_lock
        .iter()
        .find(|(tag, _)| features.is_set(tag))
    {
        return Verdict {
            category: category.clone(),
            reason: DecisionReason::FormLock { tag: tag.clone() },
        };
    }

    // 3) Highest score. An empty score table behaves like a zero score.
    let (winner, best) = scores
        .argmax()
        .map(|(c, s)| (c.to_string(), s))
        .unwrap_or_else(|| (fallback(), 0.0));

    // 4) Minimum-score gate.
    if best < rules.min_score_threshold.value() {
        return Verdict {
            category: fallback(),
            reason: DecisionReason::LowScore {
                score: best,
                threshold: rules.min_score_threshold.clone(),
            },
        };
    }

    // 5) Winner.
    Verdict {
        reason: DecisionReason::HighScore {
            category: winner.clone(),
            score: best,
        },
        category: winner,
    }
}
