//! Run metadata and its persistence port
//!
//! Components receive an explicit [`RunContext`] value and a [`StatePort`]
//! instead of reaching for ambient global state.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::masters::store::write_json_atomic;

/// Durable metadata shared between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunState {
    /// When the initial bulk translation completed.
    pub initial_setup: Option<DateTime<Local>>,
    /// When the last run finished.
    pub last_execution: Option<DateTime<Local>>,
    /// Upstream files found changed by the last scan.
    pub updated_files: Vec<String>,
}

impl RunState {
    /// The timestamp new upstream changes are compared against.
    pub fn cutoff(&self) -> Option<DateTime<Local>> {
        self.last_execution.or(self.initial_setup)
    }
}

/// Injected persistence for [`RunState`].
pub trait StatePort {
    fn load(&self) -> Result<RunState>;
    fn store(&self, state: &RunState) -> Result<()>;
}

/// JSON file implementation of [`StatePort`]. A missing file reads as the
/// default state; a corrupt one recovers to default with a warning.
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatePort for JsonStateFile {
    fn load(&self) -> Result<RunState> {
        if !self.path.is_file() {
            return Ok(RunState::default());
        }
        let text = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&text) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!("could not decode run state {:?}, starting fresh: {e}", self.path);
                Ok(RunState::default())
            }
        }
    }

    fn store(&self, state: &RunState) -> Result<()> {
        write_json_atomic(&self.path, state)
    }
}

/// Identity of one engine run, used to scope per-run artifacts.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started: DateTime<Local>,
}

impl RunContext {
    /// Begin a run now.
    pub fn begin() -> Self {
        let started = Local::now();
        Self {
            run_id: started.format("%Y%m%d-%H%M%S").to_string(),
            started,
        }
    }

    /// Begin a run under a caller-chosen id.
    pub fn with_run_id(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started: Local::now(),
        }
    }
}
