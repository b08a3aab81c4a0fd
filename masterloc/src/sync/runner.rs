//! End-to-end run sequencing over one synchronization root
//!
//! Wires stores, synchronizer and diff engine together the way a full run
//! uses them: bulk-translate pending snapshots, scan upstream for changed
//! files, reconcile watched tables, promote delta snapshots into baselines.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};

use super::characters::CharacterIndex;
use super::diff::{ChangeDiffEngine, UpdateReport};
use super::table::{SyncReport, TableSynchronizer};
use crate::config::{SyncConfig, SyncPaths};
use crate::masters::store::TableStore;
use crate::state::{RunContext, StatePort};
use crate::translate::Resolver;
use crate::Result;

/// Sequences engine operations for one run. Tables are independent units of
/// work: a failure in one is reported and does not abort its siblings.
pub struct SyncRunner<'a> {
    resolver: &'a Resolver,
    config: &'a SyncConfig,
    paths: SyncPaths,
    state: &'a dyn StatePort,
    run: RunContext,
}

impl<'a> SyncRunner<'a> {
    pub fn new(
        resolver: &'a Resolver,
        config: &'a SyncConfig,
        paths: SyncPaths,
        state: &'a dyn StatePort,
        run: RunContext,
    ) -> Self {
        Self {
            resolver,
            config,
            paths,
            state,
            run,
        }
    }

    /// Translate every configured table that has a pending raw snapshot in
    /// the updated directory. Watched tables' snapshots are promoted into the
    /// source directory afterwards so future diffs have a baseline.
    pub fn sync_all(&self) -> Result<Vec<SyncReport>> {
        let updated = TableStore::new(&self.paths.updated_dir);
        let translated = TableStore::new(&self.paths.translated_dir);
        let sync = TableSynchronizer::new(
            self.resolver,
            self.config,
            updated.clone(),
            translated,
            &self.paths.new_entries_dir,
            self.run.clone(),
        );

        let mut reports = Vec::new();
        for name in updated.list()? {
            if !self.config.is_translated_table(&name) {
                continue;
            }
            match sync.sync_table(&name) {
                Ok(report) => {
                    // Promote only a successfully synchronized snapshot; a
                    // failed delta must never replace a good baseline.
                    if self.config.is_watched_table(&name) {
                        self.promote_snapshot(&name)?;
                    }
                    reports.push(report);
                }
                Err(e) => tracing::error!("table '{name}' failed, continuing with siblings: {e}"),
            }
        }

        let mut state = self.state.load()?;
        if state.initial_setup.is_none() {
            state.initial_setup = Some(self.run.started);
        }
        state.last_execution = Some(self.run.started);
        self.state.store(&state)?;

        Ok(reports)
    }

    /// Reconcile every watched table that has a delta snapshot, then promote
    /// the delta to become the new baseline.
    pub fn update_watched(&self) -> Result<Vec<UpdateReport>> {
        let source = TableStore::new(&self.paths.source_dir);
        let updated = TableStore::new(&self.paths.updated_dir);
        let translated = TableStore::new(&self.paths.translated_dir);

        let mut engine = ChangeDiffEngine::new(self.resolver, self.config, translated);
        if let Some(characters) = self.build_character_index() {
            engine = engine.with_characters(characters);
        }

        let mut reports = Vec::new();
        for name in &self.config.watched_tables {
            if !updated.exists(name) {
                continue;
            }
            let old = match source.load(name) {
                Ok(table) => table,
                Err(e) => {
                    tracing::warn!("no baseline snapshot for '{name}', cannot diff: {e}");
                    continue;
                }
            };
            let new = match updated.load(name) {
                Ok(table) => table,
                Err(e) => {
                    tracing::error!("cannot read delta snapshot for '{name}', leaving it in place: {e}");
                    continue;
                }
            };
            match engine.diff_and_translate(name, &old, &new) {
                Ok(report) => {
                    reports.push(report);
                    self.promote_snapshot(name)?;
                }
                Err(e) => tracing::error!("diff of '{name}' failed, continuing: {e}"),
            }
        }

        let mut state = self.state.load()?;
        state.last_execution = Some(self.run.started);
        self.state.store(&state)?;

        Ok(reports)
    }

    /// Best-effort construction of the parent-entity index; absence only
    /// costs log detail.
    fn build_character_index(&self) -> Option<CharacterIndex> {
        let translated = TableStore::new(&self.paths.translated_dir);
        let characters = translated.load("character").ok()?;
        let links = TableStore::new(&self.paths.updated_dir)
            .load("charactercommand")
            .or_else(|_| TableStore::new(&self.paths.source_dir).load("charactercommand"))
            .ok()?;
        Some(CharacterIndex::build(characters, &links))
    }

    /// Move a delta snapshot into the source directory so it becomes the
    /// baseline for the next diff.
    fn promote_snapshot(&self, name: &str) -> Result<()> {
        let from = TableStore::new(&self.paths.updated_dir).table_path(name);
        let to = TableStore::new(&self.paths.source_dir).table_path(name);
        if !from.is_file() {
            return Ok(());
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        if fs::rename(&from, &to).is_err() {
            // Cross-device fallback
            fs::copy(&from, &to)?;
            fs::remove_file(&from)?;
        }
        tracing::debug!("promoted snapshot '{name}' to baseline");
        Ok(())
    }
}

/// Scan `masters_dir` for files modified after the last recorded run and
/// store the changed list in the run state.
pub fn find_updated(state: &dyn StatePort, masters_dir: &Path) -> Result<Vec<String>> {
    let mut run_state = state.load()?;
    let cutoff = run_state.cutoff();
    tracing::info!(
        "looking for files updated after {}",
        cutoff.map_or_else(|| "the beginning".to_string(), |t| t.to_string())
    );

    let mut changed = Vec::new();
    for entry in fs::read_dir(masters_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let modified: DateTime<Local> = entry.metadata()?.modified()?.into();
        if cutoff.map_or(true, |cutoff| modified > cutoff) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                tracing::info!("upstream file changed: {name}");
                changed.push(name.to_string());
            }
        }
    }
    changed.sort();

    run_state.updated_files = changed.clone();
    state.store(&run_state)?;
    Ok(changed)
}
