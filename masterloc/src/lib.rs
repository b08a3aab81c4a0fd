//! # masterloc
//!
//! An incremental localization synchronization engine for live game data.
//!
//! The engine keeps a localized mirror of a game's master tables and texture
//! atlases in step with an upstream source that changes between releases:
//!
//! - **Master tables** - schema-free records keyed by `id`, translated field
//!   by field through a layered resolution chain (exact-match translation
//!   memory, pattern rewriting for effect notation, machine-translation
//!   providers) with periodic atomic checkpoints so a crashed run can resume.
//! - **Change diffing** - when a watched table ships a new snapshot, only the
//!   records whose watched fields actually changed are re-translated.
//! - **Sprite atlases** - localized sprite regions are transplanted from a
//!   reference atlas into a newly released atlas by name, with rectangle
//!   origin flipping and dimension checks.
//!
//! ## Translating a table
//!
//! ```no_run
//! use masterloc::config::{SyncConfig, SyncPaths};
//! use masterloc::masters::store::TableStore;
//! use masterloc::state::RunContext;
//! use masterloc::sync::TableSynchronizer;
//! use masterloc::translate::{EffectPatterns, Resolver, RetryPolicy, TranslationMemory};
//! # fn provider() -> Box<dyn masterloc::translate::TranslationProvider> { unimplemented!() }
//!
//! let config = SyncConfig::default();
//! let paths = SyncPaths::rooted("./data");
//! let memory = TranslationMemory::load_dir(&paths.dictionaries_dir)?;
//! let effects = EffectPatterns::load(&paths.effect_patterns)?;
//! let resolver = Resolver::new(
//!     memory,
//!     effects,
//!     None,
//!     provider(),
//!     config.premium_tables.clone(),
//!     RetryPolicy::default(),
//!     &config.target_lang,
//! );
//!
//! let sync = TableSynchronizer::new(
//!     &resolver,
//!     &config,
//!     TableStore::new(&paths.updated_dir),
//!     TableStore::new(&paths.translated_dir),
//!     &paths.new_entries_dir,
//!     RunContext::begin(),
//! );
//! let report = sync.sync_table("command")?;
//! println!("{} new entries", report.newly_translated);
//! # Ok::<(), masterloc::Error>(())
//! ```
//!
//! ## Patching an atlas
//!
//! ```no_run
//! use masterloc::atlas::{load_atlas, patch_atlas, save_atlas};
//!
//! let reference = load_atlas("localized/ui_atlas")?;
//! let mut target = load_atlas("release/ui_atlas")?;
//! let report = patch_atlas(&reference, &mut target);
//! println!("{} regions patched, {} skipped", report.patched, report.skipped.len());
//! save_atlas(&target, "patched/ui_atlas")?;
//! # Ok::<(), masterloc::Error>(())
//! ```

pub mod atlas;
pub mod config;
pub mod error;
pub mod masters;
pub mod state;
pub mod sync;
pub mod translate;

pub use error::{Error, Result};

/// Convenient access to the commonly used types.
pub mod prelude {
    pub use crate::atlas::{load_atlas, patch_atlas, save_atlas, PatchReport, Sprite, SpriteAtlas, SpriteRect};
    pub use crate::config::{SyncConfig, SyncPaths};
    pub use crate::error::{Error, Result};
    pub use crate::masters::store::TableStore;
    pub use crate::masters::{Record, RecordId, Table};
    pub use crate::state::{JsonStateFile, RunContext, RunState, StatePort};
    pub use crate::sync::{
        find_updated, ChangeDiffEngine, SyncReport, SyncRunner, TableSynchronizer, UpdateReport,
    };
    pub use crate::translate::{
        EffectPatterns, ProviderError, Resolver, RetryPolicy, TranslationMemory,
        TranslationProvider,
    };
}
