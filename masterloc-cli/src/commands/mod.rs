use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;

use masterloc::config::{SyncConfig, SyncPaths};
use masterloc::translate::{EffectPatterns, Resolver, RetryPolicy, TranslationMemory};

use crate::providers::ExecProvider;

pub mod find_updated;
pub mod patch_atlas;
pub mod sync;
pub mod update;

#[derive(Subcommand)]
pub enum Commands {
    /// Translate every table with a pending raw snapshot
    Sync {
        /// Synchronization root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// TOML configuration override file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fallback translator command line (text on stdin, translation on stdout)
        #[arg(short, long)]
        translator: String,

        /// Premium translator command line for whitelisted tables
        #[arg(short, long)]
        premium: Option<String>,
    },

    /// List upstream master files modified since the last run
    FindUpdated {
        /// Synchronization root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Directory holding the upstream master files
        #[arg(short, long)]
        masters: PathBuf,
    },

    /// Re-translate changed fields of watched tables and promote baselines
    Update {
        /// Synchronization root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// TOML configuration override file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fallback translator command line (text on stdin, translation on stdout)
        #[arg(short, long)]
        translator: String,

        /// Premium translator command line for whitelisted tables
        #[arg(short, long)]
        premium: Option<String>,
    },

    /// Transplant localized sprite regions into a new atlas release
    PatchAtlas {
        /// Directory of the localized reference atlas
        #[arg(short, long)]
        reference: PathBuf,

        /// Directory of the newly released atlas
        #[arg(short, long)]
        target: PathBuf,

        /// Output directory (defaults to patching the target in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Sync { root, config, translator, premium } => {
                sync::execute(root, config.as_deref(), translator, premium.as_deref())
            }
            Commands::FindUpdated { root, masters } => {
                find_updated::execute(root, masters)
            }
            Commands::Update { root, config, translator, premium } => {
                update::execute(root, config.as_deref(), translator, premium.as_deref())
            }
            Commands::PatchAtlas { reference, target, output } => {
                patch_atlas::execute(reference, target, output.as_deref())
            }
        }
    }
}

pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<SyncConfig> {
    match path {
        Some(path) => {
            SyncConfig::load(path).with_context(|| format!("loading configuration {path:?}"))
        }
        None => Ok(SyncConfig::default()),
    }
}

pub(crate) fn build_resolver(
    config: &SyncConfig,
    paths: &SyncPaths,
    translator: &str,
    premium: Option<&str>,
) -> anyhow::Result<Resolver> {
    let memory = TranslationMemory::load_dir(&paths.dictionaries_dir)?;
    let effects = EffectPatterns::load(&paths.effect_patterns)?;

    let fallback = ExecProvider::from_command_line("translator", translator)
        .context("empty translator command line")?;
    let primary = premium
        .map(|command_line| {
            ExecProvider::from_command_line("premium", command_line)
                .context("empty premium translator command line")
        })
        .transpose()?
        .map(|provider| Box::new(provider) as Box<dyn masterloc::translate::TranslationProvider>);

    Ok(Resolver::new(
        memory,
        effects,
        primary,
        Box::new(fallback),
        config.premium_tables.clone(),
        RetryPolicy::default(),
        &config.target_lang,
    ))
}
