//! Error types for `masterloc`

use std::path::PathBuf;

use thiserror::Error;

use crate::translate::ProviderError;

/// The error type for `masterloc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Texture decode/encode error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The backing file for a table is missing. Fatal for that one table
    /// operation only; sibling tables keep going.
    #[error("table '{name}' not found at {path:?}")]
    TableNotFound {
        /// The logical table name.
        name: String,
        /// The path that was probed.
        path: PathBuf,
    },

    /// No atlas container was found at the given location.
    #[error("atlas not found at {0:?}")]
    AtlasNotFound(PathBuf),

    /// The atlas metadata references a texture that is not present.
    #[error("atlas texture missing: {0}")]
    MissingTexture(String),

    /// The atlas container files disagree with each other.
    #[error("atlas format error: {0}")]
    AtlasFormat(String),

    /// A machine-translation provider failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Translation of one field failed terminally. Non-fatal for a table
    /// run: the field keeps its previous value and the failure is counted.
    #[error("translation failed for {table}.{field} (id {id}): {source}")]
    FieldTranslation {
        /// Table the record belongs to.
        table: String,
        /// Field that could not be translated.
        field: String,
        /// Record identity, for re-running just that unit.
        id: String,
        /// The underlying provider error.
        #[source]
        source: ProviderError,
    },
}

impl Error {
    /// Attach table/field/id context to a provider failure so the unit can
    /// be re-run in isolation.
    pub(crate) fn for_field(self, table: &str, field: &str, id: impl ToString) -> Self {
        match self {
            Error::Provider(source) => Error::FieldTranslation {
                table: table.to_string(),
                field: field.to_string(),
                id: id.to_string(),
                source,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
