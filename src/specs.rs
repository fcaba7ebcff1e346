// src/specs.rs
//! Numeric spec extraction: wattage, illuminance, colour temperature and CRI.
//!
//! Each feature scans the whole title independently and uses only the
//! leftmost match. Values are divided by a saturation divisor and clamped to
//! 1.0; CRI is divided but not clamped. No match yields 0.0.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::features::FeatureVector;

pub const F_WATTAGE: &str = "f_wattage";
pub const F_LUX: &str = "f_lux";
pub const F_KELVIN: &str = "f_kelvin";
pub const F_CRI: &str = "f_cri";

/// Every numeric feature this module produces.
pub const SPEC_FEATURES: [&str; 4] = [F_WATTAGE, F_LUX, F_KELVIN, F_CRI];

const WATTAGE_SATURATION: f64 = 300.0;
const LUX_SATURATION: f64 = 20_000.0;
const KELVIN_SATURATION: f64 = 10_000.0;
const CRI_SCALE: f64 = 100.0;

static WATTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:w|watt|ワット|ｗ)").expect("wattage regex"));
// Digit groups may be split by commas or spaces ("5,000" normalizes to "5 000").
static LUX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+[,\s]*[0-9]*)\s*(?:lux|ルクス)").expect("lux regex"));
static KELVIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:k|kelvin|ケルビン)").expect("kelvin regex"));
static CRI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:cri|tlci)\s*:?\s*([0-9]+)").expect("cri regex"));

/// Extract all four numeric features. Every key is always present.
pub fn extract_specs(clean_title: &str) -> FeatureVector {
    let mut out = FeatureVector::new();
    out.insert(
        F_WATTAGE,
        first_number(&WATTAGE, clean_title)
            .map(|w| saturate(w, WATTAGE_SATURATION))
            .unwrap_or(0.0),
    );
    out.insert(
        F_LUX,
        first_number(&LUX, clean_title)
            .map(|l| saturate(l, LUX_SATURATION))
            .unwrap_or(0.0),
    );
    out.insert(
        F_KELVIN,
        first_number(&KELVIN, clean_title)
            .map(|k| saturate(k, KELVIN_SATURATION))
            .unwrap_or(0.0),
    );
    out.insert(
        F_CRI,
        first_number(&CRI, clean_title)
            .map(|c| c / CRI_SCALE)
            .unwrap_or(0.0),
    );
    out
}

/// Leftmost match of `re`, capture group 1, with grouping separators removed.
fn first_number(re: &Regex, text: &str) -> Option<f64> {
    let caps = re.captures(text)?;
    let digits: String = caps
        .get(1)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse::<f64>().ok()
}

fn saturate(value: f64, divisor: f64) -> f64 {
    (value / divisor).min(1.0)
}
