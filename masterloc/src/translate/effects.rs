//! Pattern substitution for effect notation
//!
//! The `description_effect` field carries semi-structured battle-effect
//! notation rather than prose. It is rewritten with an ordered rule set
//! instead of being sent through memory or machine translation.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::Result;

/// Ordered, longest-match-first substring rewriting.
#[derive(Debug, Clone, Default)]
pub struct EffectPatterns {
    rules: Vec<(String, String)>,
}

impl EffectPatterns {
    /// Build from `(pattern, replacement)` pairs.
    ///
    /// Rules are sorted once by descending pattern length so a shorter
    /// pattern that is a subset of a longer one cannot pre-empt the longer,
    /// more specific rewrite. The sort is stable: equal-length rules keep
    /// their load order.
    pub fn new(rules: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut rules: Vec<_> = rules.into_iter().collect();
        rules.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { rules }
    }

    /// Load rules from a JSON object file mapping patterns to replacements.
    ///
    /// A missing file yields an empty rule set with a warning; effect fields
    /// then pass through unchanged.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::warn!("effect pattern file {path:?} does not exist; no rules loaded");
            return Ok(Self::default());
        }
        let raw: IndexMap<String, String> = serde_json::from_str(&fs::read_to_string(path)?)?;
        tracing::debug!("loaded {} effect patterns from {path:?}", raw.len());
        Ok(Self::new(raw))
    }

    /// Apply every rule in order, each substituting all occurrences in the
    /// running result. Pure; safe to reuse across calls.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (pattern, replacement) in &self.rules {
            if result.contains(pattern.as_str()) {
                result = result.replace(pattern.as_str(), replacement);
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
