//! Lab-specific URL and category overrides
//!
//! Some labs never publish `lava-json-*.json` results, only `boot-*.json`.
//! Rules here detect such URLs by a marker substring and rewrite both the URL
//! and the sample category before the download is attempted.

use crate::types::Category;
use serde::{Deserialize, Serialize};

/// Marker of the lab that publishes boot logs instead of LAVA json
pub const DEFAULT_NON_LAVA_LAB: &str = "lab-baylibre-seattle";

/// A single data-driven rewrite rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    /// Substring that must appear in the URL for the rule to fire
    pub marker: String,
    /// URL substring to replace
    pub from: String,
    /// Replacement for `from`
    pub to: String,
    /// Category the sample is saved under when the rule fires
    pub category: Category,
}

impl OverrideRule {
    /// Rule for a lab that only produces `boot-*` files
    pub fn non_lava_lab(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            from: "lava-json-".to_string(),
            to: "boot-".to_string(),
            category: Category::Boot,
        }
    }

    /// Whether the URL is subject to this rule
    pub fn matches(&self, url: &str) -> bool {
        !self.marker.is_empty() && url.contains(&self.marker)
    }

    /// Apply the rule unconditionally
    pub fn rewrite(&self, url: &str) -> (Category, String) {
        (self.category, url.replace(&self.from, &self.to))
    }
}

/// Ordered set of override rules, first match wins
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideRules(Vec<OverrideRule>);

impl OverrideRules {
    /// Build from an explicit list of rules
    pub fn new(rules: Vec<OverrideRule>) -> Self {
        Self(rules)
    }

    /// Single non-lava-lab rule for `marker`
    pub fn non_lava_lab(marker: impl Into<String>) -> Self {
        Self(vec![OverrideRule::non_lava_lab(marker)])
    }

    /// First rule matching the URL, if any
    pub fn find(&self, url: &str) -> Option<&OverrideRule> {
        self.0.iter().find(|rule| rule.matches(url))
    }

    /// Whether any rule matches the URL
    pub fn matches(&self, url: &str) -> bool {
        self.find(url).is_some()
    }

    /// Effective category and URL for a descriptor
    ///
    /// Returns the input unchanged when no rule matches.
    pub fn rewrite(&self, category: Category, url: &str) -> (Category, String) {
        match self.find(url) {
            Some(rule) => rule.rewrite(url),
            None => (category, url.to_string()),
        }
    }

    /// Configured rules
    pub fn rules(&self) -> &[OverrideRule] {
        &self.0
    }

    /// Whether no rule is configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
