//! Resumable per-table translation

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::SyncConfig;
use crate::masters::store::{save_new_entries, TableStore};
use crate::masters::{Record, RecordId};
use crate::state::RunContext;
use crate::translate::Resolver;
use crate::Result;

/// Outcome of one table synchronization.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub table: String,
    /// Records in the translated table after the run.
    pub total: usize,
    /// Records first translated during this run.
    pub newly_translated: usize,
    /// Fields whose translation failed terminally and kept their raw value.
    pub unresolved_fields: usize,
    pub elapsed: Duration,
}

/// Translates every not-yet-translated record of a raw table, checkpointing
/// the accumulated output atomically every `batch_size` records.
///
/// Idempotent: a record id already present in the translated table is never
/// re-translated, so a second run over unchanged input performs zero
/// resolver calls and rewrites a byte-identical file.
pub struct TableSynchronizer<'a> {
    resolver: &'a Resolver,
    config: &'a SyncConfig,
    raw: TableStore,
    translated: TableStore,
    new_entries_dir: PathBuf,
    run: RunContext,
}

impl<'a> TableSynchronizer<'a> {
    pub fn new(
        resolver: &'a Resolver,
        config: &'a SyncConfig,
        raw: TableStore,
        translated: TableStore,
        new_entries_dir: impl Into<PathBuf>,
        run: RunContext,
    ) -> Self {
        Self {
            resolver,
            config,
            raw,
            translated,
            new_entries_dir: new_entries_dir.into(),
            run,
        }
    }

    /// Synchronize one table from its raw snapshot.
    pub fn sync_table(&self, name: &str) -> Result<SyncReport> {
        let start = Instant::now();
        tracing::info!("translating table '{name}'");

        let raw = self.raw.load(name)?;
        let mut translated = self.translated.load_or_empty(name);
        let mut done: HashSet<RecordId> =
            translated.records.iter().filter_map(Record::id).collect();

        let batch_size = self.config.batch_size.max(1);
        let mut new_entries: Vec<Record> = Vec::new();
        let mut unresolved = 0usize;
        let mut processed = 0usize;

        for record in &raw.records {
            processed += 1;

            match record.id() {
                Some(id) if done.contains(&id) => {}
                Some(id) => {
                    let mut merged = record.clone();
                    for field in &self.config.translatable_fields {
                        let Some(value) = merged.get(field).cloned() else {
                            continue;
                        };
                        match self.resolver.resolve_value(name, field, &value) {
                            Ok(resolved) => merged.set(field.clone(), resolved),
                            Err(e) => {
                                unresolved += 1;
                                tracing::error!(
                                    "keeping raw value: {}",
                                    e.for_field(name, field, &id)
                                );
                            }
                        }
                    }
                    done.insert(id);
                    translated.records.push(merged.clone());
                    new_entries.push(merged);
                }
                None => tracing::warn!("table '{name}' has a record without id, skipped"),
            }

            // Crash-recovery checkpoint: killing the process loses at most
            // one sub-batch of provider work.
            if processed % batch_size == 0 {
                self.translated.save(&translated)?;
            }
        }

        self.translated.save(&translated)?;

        if !new_entries.is_empty() && self.config.tracks_new_entries(name) {
            let path = save_new_entries(&self.new_entries_dir, &self.run.run_id, name, &new_entries)?;
            tracing::info!("recorded {} new entries at {path:?}", new_entries.len());
        }

        let report = SyncReport {
            table: name.to_string(),
            total: translated.len(),
            newly_translated: new_entries.len(),
            unresolved_fields: unresolved,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "finished '{name}': {} total entries, {} new, {} unresolved fields in {:.2?}",
            report.total,
            report.newly_translated,
            report.unresolved_fields,
            report.elapsed
        );
        Ok(report)
    }
}
