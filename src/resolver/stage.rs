use std::fmt::Display;

use serde::Serialize;

use crate::metadata::{
    AnnotationKind, ColumnMetadataRecord, EntityContext, PropertyDescriptor,
};

use super::{
    errors::{describe_payload, MalformedAnnotationError, ResolutionError},
    stages,
    transformed::Transformed,
};

pub type StageResult<T> = Result<T, ResolutionError>;

/// A stage rule: a pure function over one record and one property.
pub type StageFn =
    fn(&mut ColumnMetadataRecord, &PropertyDescriptor, &EntityContext) -> StageResult<Transformed>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    NavigationOverride,
    ColumnOverride,
    RequiredOverride,
    LegacyForeignKey,
    StructuralHeuristic,
    ForeignKeyConvention,
    Defaults,
}

impl StageId {
    pub fn tier(&self) -> u8 {
        match self {
            StageId::NavigationOverride | StageId::ColumnOverride | StageId::RequiredOverride => 0,
            StageId::LegacyForeignKey => 1,
            StageId::StructuralHeuristic | StageId::ForeignKeyConvention => 2,
            StageId::Defaults => 3,
        }
    }

    /// The annotation kind this stage owns, if it reads one.
    pub fn annotation(&self) -> Option<AnnotationKind> {
        match self {
            StageId::NavigationOverride => Some(AnnotationKind::Navigation),
            StageId::ColumnOverride => Some(AnnotationKind::Column),
            StageId::RequiredOverride => Some(AnnotationKind::Required),
            StageId::LegacyForeignKey => Some(AnnotationKind::ForeignKey),
            StageId::StructuralHeuristic | StageId::ForeignKeyConvention | StageId::Defaults => {
                None
            }
        }
    }

    pub(crate) fn malformed(
        &self,
        record: &ColumnMetadataRecord,
        index: usize,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> MalformedAnnotationError {
        MalformedAnnotationError {
            stage: *self,
            property: record.identity().clone(),
            annotation: self
                .annotation()
                .unwrap_or_else(|| AnnotationKind::Other(self.to_string())),
            index,
            expected,
            found: describe_payload(found),
        }
    }
}

impl Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageId::NavigationOverride => write!(f, "navigation_override"),
            StageId::ColumnOverride => write!(f, "column_override"),
            StageId::RequiredOverride => write!(f, "required_override"),
            StageId::LegacyForeignKey => write!(f, "legacy_foreign_key"),
            StageId::StructuralHeuristic => write!(f, "structural_heuristic"),
            StageId::ForeignKeyConvention => write!(f, "foreign_key_convention"),
            StageId::Defaults => write!(f, "defaults"),
        }
    }
}

/// One row of the stage table.
#[derive(Clone)]
pub struct StageDescriptor {
    pub id: StageId,
    pub tier: u8,
    pub name: &'static str,
    /// Kept for backward compatibility; still runs, but its contributions are
    /// reported as deprecated.
    pub deprecated: bool,
    pub superseded_by: Option<StageId>,
    pub apply: StageFn,
}

impl StageDescriptor {
    pub fn new(id: StageId, name: &'static str, apply: StageFn) -> Self {
        Self {
            id,
            tier: id.tier(),
            name,
            deprecated: false,
            superseded_by: None,
            apply,
        }
    }

    pub fn deprecated(mut self, superseded_by: StageId) -> Self {
        self.deprecated = true;
        self.superseded_by = Some(superseded_by);
        self
    }
}

impl std::fmt::Debug for StageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageDescriptor")
            .field("id", &self.id)
            .field("tier", &self.tier)
            .field("name", &self.name)
            .field("deprecated", &self.deprecated)
            .field("superseded_by", &self.superseded_by)
            .finish()
    }
}

/// The full stage table in declaration order.
pub fn standard_stages() -> Vec<StageDescriptor> {
    vec![
        StageDescriptor::new(
            StageId::NavigationOverride,
            "Explicit navigation override",
            stages::navigation_override::apply,
        ),
        StageDescriptor::new(
            StageId::ColumnOverride,
            "Explicit column mapping",
            stages::column_override::apply,
        ),
        StageDescriptor::new(
            StageId::RequiredOverride,
            "Explicit required marker",
            stages::required_override::apply,
        ),
        StageDescriptor::new(
            StageId::LegacyForeignKey,
            "Legacy foreign-key annotation",
            stages::legacy_foreign_key::apply,
        )
        .deprecated(StageId::NavigationOverride),
        StageDescriptor::new(
            StageId::StructuralHeuristic,
            "Structural type heuristic",
            stages::structural_heuristic::apply,
        ),
        StageDescriptor::new(
            StageId::ForeignKeyConvention,
            "Foreign-key naming convention",
            stages::foreign_key_convention::apply,
        ),
        StageDescriptor::new(StageId::Defaults, "Defaults", stages::defaults::apply),
    ]
}
