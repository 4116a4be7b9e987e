//! # Metadata Error Types
//!
//! - `FrozenRecordError`: a record was mutated after `finalize()`. This is an
//!   internal-consistency fault, never a user-facing condition.
//! - `ModelLoadError`: a model description file could not be read or parsed.

use std::path::PathBuf;

use thiserror::Error;

use super::descriptor::PropertyIdentity;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Column metadata for `{identity}` is frozen and cannot be modified")]
pub struct FrozenRecordError {
    pub identity: PropertyIdentity,
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Failed to read model file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML model {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON model {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate entity `{0}` in model")]
    DuplicateEntity(String),

    #[error("Duplicate property `{property}` on entity `{entity}`")]
    DuplicateProperty { entity: String, property: String },
}
