//! Tier 1: the legacy `foreign_key` annotation.
//!
//! Superseded by the `navigation` override. When `is_navigation_property` is
//! still unset the annotation marks the property as a navigation property;
//! whether that should hold unconditionally is an open policy question and
//! the permissive reading is kept. A string payload names the associated
//! property and fills `foreign_key_association`.
//!
//! The pipeline attaches the deprecation notice when this stage reports a
//! change. When an explicit override already locked the flag the annotation
//! is ignored with an info diagnostic.

use serde_json::Value;

use crate::{
    metadata::{
        AnnotationKind, ColumnMetadataRecord, Diagnostic, DiagnosticKind, EntityContext,
        PropertyDescriptor, Slot,
    },
    resolver::{
        stage::{StageId, StageResult},
        transformed::Transformed,
    },
};

pub fn apply(
    record: &mut ColumnMetadataRecord,
    property: &PropertyDescriptor,
    _ctx: &EntityContext,
) -> StageResult<Transformed> {
    let mut declared = false;
    let mut association: Option<String> = None;

    for (index, annotation) in property.annotations_of(&AnnotationKind::ForeignKey) {
        match &annotation.value {
            Value::Null => {}
            Value::String(name) if !name.trim().is_empty() => {
                association = Some(name.trim().to_string());
            }
            other => {
                return Err(StageId::LegacyForeignKey
                    .malformed(record, index, "null or a property name", other)
                    .into())
            }
        }
        declared = true;
    }

    if !declared {
        return Ok(Transformed::No);
    }

    let fields = record.fields_mut()?;
    if let Slot::Locked { value, .. } = fields.is_navigation_property {
        record.push_diagnostic(Diagnostic::info(
            StageId::LegacyForeignKey,
            DiagnosticKind::IgnoredLegacy,
            format!(
                "legacy `foreign_key` annotation ignored: explicit `navigation` override already set is_navigation_property = {}",
                value
            ),
        ))?;
        return Ok(Transformed::No);
    }

    let navigation = fields.is_navigation_property.fill(true);
    let associated = association
        .map(|name| fields.foreign_key_association.fill(name))
        .unwrap_or(false);

    Ok(Transformed::from(navigation || associated))
}
