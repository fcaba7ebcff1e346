// src/locale.rs
//! Marketplace locale used to pick keyword lists.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Locale {
    Cn,
    #[default]
    Us,
    Jp,
}

impl Locale {
    /// Case-insensitive, whitespace-tolerant. Anything unrecognized is US.
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "CN" => Locale::Cn,
            "JP" => Locale::Jp,
            _ => Locale::Us,
        }
    }

    pub fn from_site(site: Option<&str>) -> Self {
        site.map(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Cn => "CN",
            Locale::Us => "US",
            Locale::Jp => "JP",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
