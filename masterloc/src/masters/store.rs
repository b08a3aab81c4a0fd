//! Table persistence with atomic replace
//!
//! Tables persist as UTF-8 JSON arrays of ordered field mappings, pretty
//! printed with non-ASCII text left unescaped so diffs stay reviewable.
//! Every write goes to a temporary file in the destination directory first
//! and is renamed over the target, so a crash mid-write can never leave a
//! half-written table behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use super::{Record, Table};
use crate::error::{Error, Result};

/// A directory of persisted tables, one `{name}.json` file per table.
#[derive(Debug, Clone)]
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.table_path(name).is_file()
    }

    /// Names of every table present in the store, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json")
            })
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Load a table. A missing backing file is an error, fatal for this one
    /// table operation only.
    pub fn load(&self, name: &str) -> Result<Table> {
        let path = self.table_path(name);
        if !path.is_file() {
            return Err(Error::TableNotFound {
                name: name.to_string(),
                path,
            });
        }
        let records: Vec<Record> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        Ok(Table {
            name: name.to_string(),
            records,
        })
    }

    /// Load a table, recovering from a missing or corrupt file by starting
    /// from empty. Corruption is logged so operators notice the potential
    /// data loss.
    pub fn load_or_empty(&self, name: &str) -> Table {
        match self.load(name) {
            Ok(table) => table,
            Err(Error::TableNotFound { .. }) => Table::new(name),
            Err(e) => {
                tracing::warn!("could not decode existing table '{name}', starting from empty: {e}");
                Table::new(name)
            }
        }
    }

    /// Persist a table atomically (write-temp-then-rename).
    pub fn save(&self, table: &Table) -> Result<()> {
        write_json_atomic(&self.table_path(&table.name), &table.records)
    }
}

/// Write `value` as pretty JSON to `path` via a temp file in the same
/// directory followed by an atomic rename.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Persist the per-run new-entries ledger for one tracked table:
/// `{dir}/{run_id}/{table}_new_entries.json`.
pub fn save_new_entries(
    dir: &Path,
    run_id: &str,
    table: &str,
    records: &[Record],
) -> Result<PathBuf> {
    let path = dir
        .join(run_id)
        .join(format!("{table}_new_entries.json"));
    write_json_atomic(&path, &records)?;
    Ok(path)
}
