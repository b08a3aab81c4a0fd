//! Exact-match translation memory
//!
//! Built once by merging every dictionary file in a directory. Matching is
//! exact, case- and whitespace-sensitive.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Source-string to target-string cache.
#[derive(Debug, Clone, Default)]
pub struct TranslationMemory {
    entries: HashMap<String, String>,
}

impl TranslationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every `*.json` dictionary file in `dir`.
    ///
    /// Files are merged in lexicographic filename order so key collisions
    /// resolve the same way on every run: later files win. A file that fails
    /// to parse is skipped with a warning; the memory still initializes with
    /// whatever parsed successfully.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut memory = Self::new();
        if !dir.is_dir() {
            tracing::warn!("dictionary directory {dir:?} does not exist; memory is empty");
            return Ok(memory);
        }

        let mut files: Vec<_> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json")
            })
            .collect();
        files.sort();

        for path in files {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("skipping unreadable dictionary {path:?}: {e}");
                    continue;
                }
            };
            match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(entries) => {
                    tracing::debug!("merged {} entries from {path:?}", entries.len());
                    memory.entries.extend(entries);
                }
                Err(e) => tracing::warn!("skipping invalid dictionary {path:?}: {e}"),
            }
        }

        tracing::info!("translation memory holds {} entries", memory.entries.len());
        Ok(memory)
    }

    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.entries.insert(source.into(), target.into());
    }

    pub fn has(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }

    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.entries.get(text).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
