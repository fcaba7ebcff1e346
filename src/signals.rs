// src/signals.rs
//! Boolean signal extraction by literal substring matching.
//!
//! For each tag the candidate keywords are the locale's list plus the US
//! list. A tag fires (1.0) when any candidate occurs anywhere in the title,
//! including inside a longer word; otherwise it is 0.0.

use crate::config::SignalDictionary;
use crate::features::FeatureVector;
use crate::locale::Locale;

/// Evaluate every tag of `signals` against an already-normalized title.
pub fn extract_signals(signals: &SignalDictionary, clean_title: &str, locale: Locale) -> FeatureVector {
    signals
        .iter()
        .map(|(tag, keywords)| {
            let hit = keywords.candidates(locale).any(|kw| clean_title.contains(kw));
            (tag, if hit { 1.0 } else { 0.0 })
        })
        .collect()
}
