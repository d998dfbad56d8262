use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use strsim::levenshtein;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// named criteria sets, kept as written so they can be shown and verified
    #[serde(default)]
    pub rules: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub settings: Settings,
}

pub const DEFAULT_FUZZY_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// rule used by `check` when neither --rule nor --criteria is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rule: Option<String>,
    /// maximum edit distance for "did you mean" rule suggestions
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: usize,
}

fn default_fuzzy_threshold() -> usize {
    DEFAULT_FUZZY_THRESHOLD
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_rule: None,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl Config {
    pub fn rule(&self, name: &str) -> Option<&JsonValue> {
        self.rules.get(name)
    }

    /// rule names close to `name`, best match first
    pub fn similar_rule_names(&self, name: &str) -> Vec<String> {
        let query = name.to_lowercase();

        let mut candidates: Vec<_> = self
            .rules
            .keys()
            .map(|rule| {
                let lower = rule.to_lowercase();
                let distance = if lower.starts_with(&query) {
                    0
                } else {
                    levenshtein(&query, &lower)
                };
                (rule, distance)
            })
            .filter(|(_, distance)| *distance <= self.settings.fuzzy_threshold)
            .collect();

        candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        candidates.into_iter().map(|(rule, _)| rule.clone()).collect()
    }
}
