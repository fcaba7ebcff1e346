// src/features.rs
//! Feature vectors: feature name -> value. Boolean signals (`tag_*`) are 0.0
//! or 1.0, numeric specs (`f_*`) lie in [0, 1] (CRI may exceed 1). Scoring
//! treats both the same way.
//!
//! Entries keep insertion order, so serialized vectors list signal tags in
//! dictionary order followed by the spec features.

use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector(Vec<(String, f64)>);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`. An existing entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    fn lookup(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }

    /// Missing features read as 0.0.
    pub fn get(&self, name: &str) -> f64 {
        self.lookup(name).unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// True only for an exact 1.0 (an active boolean signal).
    pub fn is_set(&self, name: &str) -> bool {
        self.lookup(name) == Some(1.0)
    }

    /// Union of `self` and `other`; on a name clash `other` wins.
    pub fn merged(&self, other: &FeatureVector) -> FeatureVector {
        let mut out = self.clone();
        for (k, v) in &other.0 {
            out.insert(k.as_str(), *v);
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reads_as_zero() {
        let v = FeatureVector::new();
        assert_eq!(v.get("tag_is_ring"), 0.0);
        assert!(!v.is_set("tag_is_ring"));
    }

    #[test]
    fn merge_prefers_right_hand_side() {
        let a: FeatureVector = [("tag_has_rgb", 1.0), ("shared", 1.0)].into_iter().collect();
        let b: FeatureVector = [("f_wattage", 0.4), ("shared", 0.5)].into_iter().collect();
        let m = a.merged(&b);
        assert_eq!(m.len(), 3);
        assert_eq!(m.get("shared"), 0.5);
        assert!(m.is_set("tag_has_rgb"));
    }

    #[test]
    fn keeps_insertion_order() {
        let mut v: FeatureVector = [("tag_is_ring", 1.0), ("tag_has_rgb", 0.0), ("f_cri", 0.9)]
            .into_iter()
            .collect();
        v.insert("tag_is_ring", 0.0);
        let names: Vec<_> = v.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["tag_is_ring", "tag_has_rgb", "f_cri"]);
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"tag_is_ring":0.0,"tag_has_rgb":0.0,"f_cri":0.9}"#
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let v: FeatureVector = [("f_cri", 0.96)].into_iter().collect();
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"f_cri":0.96}"#);
    }
}
