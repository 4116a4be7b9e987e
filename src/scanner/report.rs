//! Serializable view of a model scan, consumed by the CLI and codegen.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{metadata::ColumnMetadataRecord, resolver::StageId};

use super::ModelScan;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub entities: usize,
    pub properties: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub navigation_properties: usize,
    pub deprecations: usize,
}

#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub summary: ScanSummary,
    pub entities: Vec<EntityReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EntityReport<'a> {
    pub entity: &'a str,
    pub columns: Vec<&'a ColumnMetadataRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<PropertyError<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PropertyError<'a> {
    pub property: &'a str,
    pub stage: StageId,
    pub message: String,
}

impl<'a> ScanReport<'a> {
    pub fn new(scan: &'a ModelScan) -> Self {
        let entities = scan
            .entities
            .iter()
            .map(|entity| EntityReport {
                entity: &entity.entity,
                columns: entity.records().collect(),
                errors: entity
                    .unresolved()
                    .map(|unresolved| PropertyError {
                        property: &unresolved.record.identity().property,
                        stage: unresolved.error.stage,
                        message: unresolved.error.to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            summary: scan.summary(),
            entities,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// SHA-256 of the compact JSON form. Identical inputs give identical
    /// fingerprints across runs.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let canonical = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }
}
