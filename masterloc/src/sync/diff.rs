//! Targeted re-translation of changed watched fields

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde_json::Value;

use super::characters::CharacterIndex;
use crate::config::SyncConfig;
use crate::masters::store::TableStore;
use crate::masters::{RecordId, Table};
use crate::translate::Resolver;
use crate::Result;

/// Outcome of reconciling one old/new snapshot pair.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub table: String,
    /// Watched fields rewritten with a fresh translation.
    pub updated_fields: usize,
    /// Watched fields whose re-translation failed; previous value kept.
    pub failed_fields: usize,
    pub elapsed: Duration,
}

/// Compares two raw snapshots of a watched table and re-translates only the
/// fields that changed upstream.
///
/// Ids absent from the new snapshot are treated as removed: they are never
/// re-added, and their records in the translated table are never erased.
pub struct ChangeDiffEngine<'a> {
    resolver: &'a Resolver,
    config: &'a SyncConfig,
    translated: TableStore,
    characters: Option<CharacterIndex>,
}

impl<'a> ChangeDiffEngine<'a> {
    pub fn new(resolver: &'a Resolver, config: &'a SyncConfig, translated: TableStore) -> Self {
        Self {
            resolver,
            config,
            translated,
            characters: None,
        }
    }

    /// Attach parent-entity enrichment for audit logging.
    pub fn with_characters(mut self, characters: CharacterIndex) -> Self {
        self.characters = Some(characters);
        self
    }

    /// Reconcile `old` and `new` snapshots of `name`, patching the persisted
    /// translated table in place. The table is persisted atomically even when
    /// nothing changed, so the snapshot pair always reads as reconciled.
    pub fn diff_and_translate(&self, name: &str, old: &Table, new: &Table) -> Result<UpdateReport> {
        let start = Instant::now();
        tracing::info!("checking '{name}' for upstream changes");

        let mut translated = self.translated.load_or_empty(name);
        let mut translated_index: IndexMap<RecordId, usize> = translated.index_by_id();
        let new_index = new.index_by_id();

        let mut updated = 0usize;
        let mut failed = 0usize;

        for (id, old_position) in old.index_by_id() {
            // Removed upstream: skip, but never erase the translated record.
            let Some(&new_position) = new_index.get(&id) else {
                continue;
            };
            let old_record = &old.records[old_position];
            let new_record = &new.records[new_position];

            for field in &self.config.watched_fields {
                let Some(new_value) = new_record.get(field) else {
                    continue;
                };
                if old_record.get(field) == Some(new_value) {
                    continue;
                }

                self.log_update(name, &id);
                match self.resolver.resolve_value(name, field, new_value) {
                    Ok(resolved) => {
                        let position = *translated_index.entry(id.clone()).or_insert_with(|| {
                            translated.records.push(new_record.clone());
                            translated.records.len() - 1
                        });
                        translated.records[position].set(field.clone(), resolved);
                        updated += 1;
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::error!(
                            "keeping previous value: {}",
                            e.for_field(name, field, &id)
                        );
                    }
                }
            }
        }

        self.translated.save(&translated)?;

        let report = UpdateReport {
            table: name.to_string(),
            updated_fields: updated,
            failed_fields: failed,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "finished checking '{name}': {} fields updated, {} failed in {:.2?}",
            report.updated_fields,
            report.failed_fields,
            report.elapsed
        );
        Ok(report)
    }

    fn log_update(&self, table: &str, id: &RecordId) {
        let Some(characters) = &self.characters else {
            tracing::info!("updating {table} record {id}");
            return;
        };
        let owner = match table {
            "leaderskill" => characters.find_by_leader_skill(id),
            "command" => characters.find_by_command(id),
            _ => None,
        };
        let owner_name = owner
            .and_then(|character| character.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("N/A");
        tracing::info!("updating {table} record {id} (character: {owner_name})");
    }
}
