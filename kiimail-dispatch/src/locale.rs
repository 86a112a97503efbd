use serde::{Deserialize, Serialize};
use std::fmt;

/// Language of a template translation, passed explicitly to every lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Builds a locale from an ISO code such as `fr` or `en-GB`, normalised to lowercase
    pub fn new(iso: &str) -> Self {
        Locale(iso.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(iso: &str) -> Self {
        Locale::new(iso)
    }
}
