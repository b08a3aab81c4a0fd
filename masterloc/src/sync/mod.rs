//! Table synchronization and change diffing
//!
//! [`TableSynchronizer`] performs the resumable bulk translation of one
//! table; [`ChangeDiffEngine`] reconciles a watched table's new upstream
//! snapshot against the last synchronized one, re-translating only the
//! fields that actually changed; [`SyncRunner`] sequences both over a
//! synchronization root.

mod characters;
mod diff;
mod runner;
mod table;

pub use characters::CharacterIndex;
pub use diff::{ChangeDiffEngine, UpdateReport};
pub use runner::{find_updated, SyncRunner};
pub use table::{SyncReport, TableSynchronizer};
