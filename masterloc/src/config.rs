//! Synchronizer configuration
//!
//! Which tables are translated, which fields are touched, and where
//! everything lives on disk. Defaults carry the known table and field sets
//! of the upstream game data; a TOML file can override any of them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Table and field selection plus run tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tables kept in translated form.
    pub tables: Vec<String>,
    /// Fields rewritten by the resolver when present and non-empty.
    pub translatable_fields: Vec<String>,
    /// Tables checked field-by-field for upstream changes between releases.
    pub watched_tables: Vec<String>,
    /// Fields whose cross-snapshot change triggers re-translation.
    pub watched_fields: Vec<String>,
    /// Tables whose first-seen records are written to the per-run ledger.
    pub new_entry_tables: Vec<String>,
    /// Tables routed to the premium provider when it is available.
    pub premium_tables: Vec<String>,
    /// Records per checkpoint during a table sync.
    pub batch_size: usize,
    /// Target language passed to providers.
    pub target_lang: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tables: strings(&[
                "achievement", "agenda", "area", "arenacategory", "beginnermission",
                "charactermission", "character", "characterclassname", "characterintroduction",
                "command",
                "customdailymission", "custommonthlymission", "custompartskind", "customtotalmission",
                "drink", "drinkskill",
                "episode",
                "equipment", "equipmenteffecttype",
                "eventmission", "eventmissiondaily", "eventmissionrepetition",
                "help", "hospital",
                "innocent", "innocentrecipe",
                "item", "iteminformation",
                "kingdomrank", "leaderskill", "liqueur",
                "memory", "memoryeffecttype", "museum", "potentialclass", "product", "ritualtrainings",
                "stage", "stagemission", "survey", "tower",
                "travelbenefit", "travelnegativeeffect",
                "trophy", "trophydaily", "trophydailyrequest", "trophyrepetition", "trophyweekly",
                "weapon",
            ]),
            translatable_fields: strings(&[
                "ability_description", "body", "category", "class_name", "class_name_1",
                "class_name_2", "class_name_3", "class_name_4", "class_name_5",
                "description", "description_effect", "description_format",
                "get_areas", "name", "name_battle", "release_content_description",
                "resource_name", "title",
            ]),
            watched_tables: strings(&["command", "leaderskill"]),
            watched_fields: strings(&["description", "description_effect", "description_format"]),
            new_entry_tables: strings(&["character", "command", "leaderskill"]),
            premium_tables: strings(&["stage", "character", "memory", "episode", "command"]),
            batch_size: 100,
            target_lang: "EN-US".to_string(),
        }
    }
}

impl SyncConfig {
    /// Load a TOML override file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = toml::from_str(&fs::read_to_string(path)?)?;
        Ok(config)
    }

    pub fn is_translated_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t == name)
    }

    pub fn is_watched_table(&self, name: &str) -> bool {
        self.watched_tables.iter().any(|t| t == name)
    }

    pub fn tracks_new_entries(&self, name: &str) -> bool {
        self.new_entry_tables.iter().any(|t| t == name)
    }
}

/// Filesystem layout for one synchronization root.
#[derive(Debug, Clone)]
pub struct SyncPaths {
    /// Baseline raw snapshots of watched tables (last synchronized upstream).
    pub source_dir: PathBuf,
    /// Persisted translated tables.
    pub translated_dir: PathBuf,
    /// Freshly extracted delta snapshots awaiting translation/diffing.
    pub updated_dir: PathBuf,
    /// Per-run new-entries ledgers.
    pub new_entries_dir: PathBuf,
    /// Exact-match dictionary sources.
    pub dictionaries_dir: PathBuf,
    /// Effect pattern rule file.
    pub effect_patterns: PathBuf,
    /// Run metadata file.
    pub state_file: PathBuf,
}

impl SyncPaths {
    /// Standard layout under one root directory.
    pub fn rooted(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            source_dir: root.join("source"),
            translated_dir: root.join("source_translated"),
            updated_dir: root.join("updated"),
            new_entries_dir: root.join("new_entries"),
            dictionaries_dir: root.join("dictionaries"),
            effect_patterns: root.join("pattern_dictionaries").join("effects.json"),
            state_file: root.join("state.json"),
        }
    }
}
