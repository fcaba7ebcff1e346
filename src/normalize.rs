// src/normalize.rs
//! Title normalization: NFKC width folding, lowercase, noise removal and
//! whitespace collapsing. Total over its input; `None` yields "".

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// Keep word chars, whitespace, '.', '-' and the katakana long-vowel mark.
static NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.\-ー]").expect("noise regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Normalize an optional raw title. Missing titles normalize to "".
pub fn normalize_title(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

/// Canonical form used by every later stage.
///
/// Noise characters are replaced by a space rather than deleted, so
/// `"LED!ライト"` becomes `"led ライト"`.
pub fn normalize(raw: &str) -> String {
    let folded: String = raw.nfkc().collect();
    let lower = folded.to_lowercase();
    let cleaned = NOISE.replace_all(&lower, " ");
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}
