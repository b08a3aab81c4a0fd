//! Table synchronization pipeline: resumability, idempotence, checkpoints.

mod common;

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;

use masterloc::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

use common::{counting_resolver, failing_resolver, panicking_resolver, table, test_config};

struct Env {
    _root: TempDir,
    raw: TableStore,
    translated: TableStore,
    new_entries: std::path::PathBuf,
}

fn env() -> Env {
    let root = TempDir::new().unwrap();
    Env {
        raw: TableStore::new(root.path().join("updated")),
        translated: TableStore::new(root.path().join("source_translated")),
        new_entries: root.path().join("new_entries"),
        _root: root,
    }
}

fn synchronizer<'a>(
    resolver: &'a Resolver,
    config: &'a SyncConfig,
    env: &Env,
) -> TableSynchronizer<'a> {
    TableSynchronizer::new(
        resolver,
        config,
        env.raw.clone(),
        env.translated.clone(),
        &env.new_entries,
        RunContext::with_run_id("test-run"),
    )
}

#[test]
fn test_sync_translates_new_records_and_keeps_raw_fields() {
    let env = env();
    let (resolver, calls) = counting_resolver();
    let config = test_config();

    env.raw
        .save(&table(
            "item",
            json!([
                {"id": 1, "name": "薬草", "description": "HPを回復", "price": 50, "rarity": null},
                {"id": 2, "name": "毒消し", "description": "", "price": 80}
            ]),
        ))
        .unwrap();

    let report = synchronizer(&resolver, &config, &env).sync_table("item").unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.newly_translated, 2);
    assert_eq!(report.unresolved_fields, 0);

    let translated = env.translated.load("item").unwrap();
    let first = &translated.records[0];
    assert_eq!(first.get("name"), Some(&json!("en:薬草")));
    assert_eq!(first.get("description"), Some(&json!("en:HPを回復")));
    // Non-translatable and non-string fields carry over untouched.
    assert_eq!(first.get("price"), Some(&json!(50)));
    assert_eq!(first.get("rarity"), Some(&json!(null)));
    // Empty strings are never submitted to a provider.
    assert_eq!(translated.records[1].get("description"), Some(&json!("")));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_second_run_is_idempotent_and_byte_identical() {
    let env = env();
    let (resolver, calls) = counting_resolver();
    let config = test_config();

    env.raw
        .save(&table(
            "item",
            json!([{"id": 1, "name": "剣"}, {"id": 2, "name": "盾"}]),
        ))
        .unwrap();

    let sync = synchronizer(&resolver, &config, &env);
    sync.sync_table("item").unwrap();
    let first_bytes = fs::read(env.translated.table_path("item")).unwrap();
    let calls_after_first = calls.load(Ordering::SeqCst);

    let report = sync.sync_table("item").unwrap();
    let second_bytes = fs::read(env.translated.table_path("item")).unwrap();

    assert_eq!(report.newly_translated, 0);
    assert_eq!(calls.load(Ordering::SeqCst), calls_after_first);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn test_new_entries_ledger_for_tracked_table_only() {
    let env = env();
    let (resolver, _calls) = counting_resolver();
    let config = test_config();

    env.raw
        .save(&table("command", json!([{"id": 10, "name": "斬撃"}])))
        .unwrap();
    env.raw
        .save(&table("item", json!([{"id": 1, "name": "薬草"}])))
        .unwrap();

    let sync = synchronizer(&resolver, &config, &env);
    sync.sync_table("command").unwrap();
    sync.sync_table("item").unwrap();

    // "command" is tracked, "item" is not.
    let run_dir = env.new_entries.join("test-run");
    assert!(run_dir.join("command_new_entries.json").is_file());
    assert!(!run_dir.join("item_new_entries.json").exists());

    let ledger: Vec<Record> =
        serde_json::from_str(&fs::read_to_string(run_dir.join("command_new_entries.json")).unwrap())
            .unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].get("name"), Some(&json!("en:斬撃")));
}

#[test]
fn test_already_translated_ids_are_never_resubmitted() {
    let env = env();
    let (resolver, calls) = counting_resolver();
    let config = test_config();

    env.translated
        .save(&table("item", json!([{"id": 1, "name": "Herb"}])))
        .unwrap();
    env.raw
        .save(&table(
            "item",
            json!([{"id": 1, "name": "薬草"}, {"id": 2, "name": "盾"}]),
        ))
        .unwrap();

    let report = synchronizer(&resolver, &config, &env).sync_table("item").unwrap();
    assert_eq!(report.newly_translated, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let translated = env.translated.load("item").unwrap();
    // The pre-existing translation was not regenerated.
    assert_eq!(translated.records[0].get("name"), Some(&json!("Herb")));
}

#[test]
fn test_terminal_failure_keeps_raw_value_and_is_counted() {
    let env = env();
    let (resolver, _calls) = failing_resolver("呪いの言葉");
    let config = test_config();

    env.raw
        .save(&table(
            "item",
            json!([{"id": 1, "name": "呪いの言葉", "description": "説明"}]),
        ))
        .unwrap();

    let report = synchronizer(&resolver, &config, &env).sync_table("item").unwrap();
    assert_eq!(report.unresolved_fields, 1);

    let translated = env.translated.load("item").unwrap();
    assert_eq!(translated.records[0].get("name"), Some(&json!("呪いの言葉")));
    assert_eq!(translated.records[0].get("description"), Some(&json!("en:説明")));
}

#[test]
fn test_crash_before_batch_boundary_leaves_previous_file_untouched() {
    let env = env();
    let (resolver, _calls) = panicking_resolver(1);
    let config = test_config(); // batch_size 100

    env.translated
        .save(&table("item", json!([{"id": 1, "name": "Herb"}])))
        .unwrap();
    let before = fs::read(env.translated.table_path("item")).unwrap();

    env.raw
        .save(&table(
            "item",
            json!([{"id": 1, "name": "薬草"}, {"id": 2, "name": "盾"}]),
        ))
        .unwrap();

    let sync = synchronizer(&resolver, &config, &env);
    let outcome = catch_unwind(AssertUnwindSafe(|| sync.sync_table("item")));
    assert!(outcome.is_err());

    let after = fs::read(env.translated.table_path("item")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_checkpoint_allows_resuming_after_crash() {
    let env = env();
    let mut config = test_config();
    config.batch_size = 2;

    env.raw
        .save(&table(
            "item",
            json!([
                {"id": 1, "name": "a"},
                {"id": 2, "name": "b"},
                {"id": 3, "name": "c"},
                {"id": 4, "name": "d"}
            ]),
        ))
        .unwrap();

    // Crashes while translating the third record, after one checkpoint.
    let (resolver, _calls) = panicking_resolver(3);
    let sync = synchronizer(&resolver, &config, &env);
    let outcome = catch_unwind(AssertUnwindSafe(|| sync.sync_table("item")));
    assert!(outcome.is_err());

    let checkpointed = env.translated.load("item").unwrap();
    assert_eq!(checkpointed.len(), 2);

    // A fresh run picks up where the checkpoint left off.
    let (resolver, calls) = counting_resolver();
    let report = synchronizer(&resolver, &config, &env).sync_table("item").unwrap();
    assert_eq!(report.total, 4);
    assert_eq!(report.newly_translated, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_missing_raw_table_is_fatal_for_that_table() {
    let env = env();
    let (resolver, _calls) = counting_resolver();
    let config = test_config();

    let result = synchronizer(&resolver, &config, &env).sync_table("ghost");
    assert!(matches!(result, Err(Error::TableNotFound { .. })));
}

#[test]
fn test_corrupt_translated_table_restarts_from_empty() {
    let env = env();
    let (resolver, _calls) = counting_resolver();
    let config = test_config();

    env.raw
        .save(&table("item", json!([{"id": 1, "name": "薬草"}])))
        .unwrap();
    fs::create_dir_all(env.translated.dir()).unwrap();
    fs::write(env.translated.table_path("item"), "[{\"id\":").unwrap();

    let report = synchronizer(&resolver, &config, &env).sync_table("item").unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.newly_translated, 1);
}
