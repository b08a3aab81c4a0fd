#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use masterloc::prelude::*;

/// Machine-translation stand-in: prefixes text with `en:` and counts calls.
struct MockProvider {
    calls: Arc<AtomicUsize>,
    /// Fail terminally whenever this exact text is submitted.
    fail_on: Option<&'static str>,
    /// Panic on the nth call (1-based), simulating a crash mid-run.
    panic_on_call: Option<usize>,
}

impl TranslationProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn translate(&self, text: &str, _target_lang: &str) -> std::result::Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.panic_on_call == Some(call) {
            panic!("provider crashed mid-run");
        }
        if self.fail_on == Some(text) {
            return Err(ProviderError::Terminal("rejected input".into()));
        }
        Ok(format!("en:{text}"))
    }
}

fn resolver_from(provider: MockProvider, memory: TranslationMemory) -> Resolver {
    Resolver::new(
        memory,
        EffectPatterns::default(),
        None,
        Box::new(provider),
        Vec::new(),
        RetryPolicy {
            max_attempts: 1,
            delay: Duration::ZERO,
        },
        "EN-US",
    )
}

/// Resolver backed by a counting mock provider.
pub fn counting_resolver() -> (Resolver, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = MockProvider {
        calls: Arc::clone(&calls),
        fail_on: None,
        panic_on_call: None,
    };
    (resolver_from(provider, TranslationMemory::new()), calls)
}

/// Resolver whose provider fails terminally for one specific input.
pub fn failing_resolver(fail_on: &'static str) -> (Resolver, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = MockProvider {
        calls: Arc::clone(&calls),
        fail_on: Some(fail_on),
        panic_on_call: None,
    };
    (resolver_from(provider, TranslationMemory::new()), calls)
}

/// Resolver whose provider panics on the nth call.
pub fn panicking_resolver(panic_on_call: usize) -> (Resolver, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = MockProvider {
        calls: Arc::clone(&calls),
        fail_on: None,
        panic_on_call: Some(panic_on_call),
    };
    (resolver_from(provider, TranslationMemory::new()), calls)
}

/// A trimmed-down configuration for pipeline tests.
pub fn test_config() -> SyncConfig {
    SyncConfig {
        tables: vec![
            "item".into(),
            "command".into(),
            "leaderskill".into(),
            "character".into(),
        ],
        translatable_fields: vec![
            "name".into(),
            "description".into(),
            "description_effect".into(),
        ],
        watched_tables: vec!["command".into(), "leaderskill".into()],
        watched_fields: vec!["description".into(), "description_effect".into()],
        new_entry_tables: vec!["command".into()],
        premium_tables: Vec::new(),
        batch_size: 100,
        target_lang: "EN-US".into(),
    }
}

pub fn table(name: &str, records: serde_json::Value) -> Table {
    Table {
        name: name.to_string(),
        records: serde_json::from_value(records).unwrap(),
    }
}
