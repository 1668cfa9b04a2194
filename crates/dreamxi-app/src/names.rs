// Canonical roster name <-> scorecard short name alignment.

use std::collections::HashMap;

/// Lookup table from the names used on squad sheets and playing elevens to the
/// abbreviated names used in ball-by-ball scorecards.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    short: HashMap<String, String>,
}

impl NameMap {
    pub fn new(table: HashMap<String, String>) -> Self {
        NameMap {
            short: table
                .into_iter()
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .collect(),
        }
    }

    /// Scorecard name for `name`, or `name` itself (trimmed) when unmapped.
    pub fn to_short<'a>(&'a self, name: &'a str) -> &'a str {
        let name = name.trim();
        self.short.get(name).map_or(name, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short.is_empty()
    }
}
