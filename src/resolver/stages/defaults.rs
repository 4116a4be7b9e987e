//! Tier 3: conservative defaults for every field still unset.
//!
//! `is_navigation_property = false`, `is_required = !nullable`,
//! `column_name` = property name, and for scalar columns `column_type` =
//! declared type. Logs only when the navigation flag had to be defaulted for a
//! type the structural heuristic could not classify.

use crate::{
    metadata::{
        ColumnMetadataRecord, Diagnostic, DiagnosticKind, EntityContext, PropertyDescriptor,
        TypeShape,
    },
    resolver::{
        stage::{StageId, StageResult},
        transformed::Transformed,
    },
};

pub fn apply(
    record: &mut ColumnMetadataRecord,
    property: &PropertyDescriptor,
    ctx: &EntityContext,
) -> StageResult<Transformed> {
    let unclassified = ctx.shape_of(&property.declared_type) == TypeShape::Unknown;
    let fields = record.fields_mut()?;

    let defaulted_navigation = fields.is_navigation_property.fill(false);
    let navigation = fields.is_navigation_property.value() == Some(&true);

    let mut changed = Transformed::from(defaulted_navigation);
    changed = changed.or(fields.is_required.fill(!property.nullable).into());
    changed = changed.or(fields.column_name.fill(property.name.clone()).into());
    if !navigation {
        changed = changed.or(fields
            .column_type
            .fill(property.declared_type.to_string())
            .into());
    }

    if defaulted_navigation && unclassified {
        record.push_diagnostic(Diagnostic::info(
            StageId::Defaults,
            DiagnosticKind::DefaultApplied,
            format!(
                "no navigation signal for type `{}`; defaulting is_navigation_property to false",
                property.declared_type
            ),
        ))?;
    }

    Ok(changed)
}
