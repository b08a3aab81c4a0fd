//! Field-level translation decisions

use std::collections::HashSet;

use serde_json::Value;

use super::effects::EffectPatterns;
use super::memory::TranslationMemory;
use super::provider::{ProviderError, RetryPolicy, TranslationProvider};
use crate::error::Result;

/// Composes the translation memory, the effect pattern engine and the
/// machine-translation capability into one field-level decision.
///
/// Decision order, first match wins:
/// 1. non-string or empty input is returned unchanged ([`Resolver::resolve_value`]),
/// 2. `command.description_effect` goes through the pattern engine exclusively,
/// 3. an exact translation-memory hit is returned,
/// 4. tables on the premium whitelist route to the primary provider under the
///    retry policy; everything else routes to the fallback with no retry.
pub struct Resolver {
    memory: TranslationMemory,
    effects: EffectPatterns,
    primary: Option<Box<dyn TranslationProvider>>,
    fallback: Box<dyn TranslationProvider>,
    premium_tables: HashSet<String>,
    retry: RetryPolicy,
    target_lang: String,
}

impl Resolver {
    /// Build a resolver, validating the primary provider once.
    ///
    /// An unreachable or invalid primary provider degrades all its routed
    /// tables to the fallback for the remainder of the run.
    pub fn new(
        memory: TranslationMemory,
        effects: EffectPatterns,
        primary: Option<Box<dyn TranslationProvider>>,
        fallback: Box<dyn TranslationProvider>,
        premium_tables: impl IntoIterator<Item = String>,
        retry: RetryPolicy,
        target_lang: impl Into<String>,
    ) -> Self {
        let primary = primary.and_then(|provider| match provider.validate() {
            Ok(()) => Some(provider),
            Err(e) => {
                tracing::warn!(
                    "primary provider '{}' unavailable, routing its tables to the fallback: {e}",
                    provider.name()
                );
                None
            }
        });
        if let Err(e) = fallback.validate() {
            // There is nothing to degrade to; failures will surface per field.
            tracing::warn!("fallback provider '{}' failed validation: {e}", fallback.name());
        }
        Self {
            memory,
            effects,
            primary,
            fallback,
            premium_tables: premium_tables.into_iter().collect(),
            retry,
            target_lang: target_lang.into(),
        }
    }

    /// Translate one string field of one table.
    pub fn resolve(&self, table: &str, field: &str, text: &str) -> Result<String> {
        // Effect notation never touches memory or a provider, even when an
        // exact dictionary match for the same raw text exists elsewhere.
        if table == "command" && field == "description_effect" {
            return Ok(self.effects.apply(text));
        }

        if let Some(hit) = self.memory.lookup(text) {
            return Ok(hit.to_string());
        }

        match &self.primary {
            Some(primary) if self.premium_tables.contains(table) => {
                let translated = self
                    .retry
                    .run(|| primary.translate(text, &self.target_lang))?;
                Ok(translated)
            }
            _ => Ok(self.fallback.translate(text, &self.target_lang)?),
        }
    }

    /// [`Resolver::resolve`] lifted to record field values: non-string and
    /// empty values are returned unchanged with no translation attempted.
    pub fn resolve_value(&self, table: &str, field: &str, value: &Value) -> Result<Value> {
        match value {
            Value::String(text) if !text.is_empty() => {
                Ok(Value::String(self.resolve(table, field, text)?))
            }
            other => Ok(other.clone()),
        }
    }

    /// Whether the premium provider survived validation.
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }
}
