//! Tier 0: the explicit `navigation` annotation.
//!
//! Every `navigation` annotation is applied in declaration order and locks
//! `is_navigation_property`. Disagreeing annotations resolve to the last
//! declared one with an ambiguity warning.

use crate::{
    metadata::{AnnotationKind, ColumnMetadataRecord, EntityContext, PropertyDescriptor},
    resolver::{
        stage::{StageId, StageResult},
        transformed::Transformed,
    },
};

use super::report_lock;

pub fn apply(
    record: &mut ColumnMetadataRecord,
    property: &PropertyDescriptor,
    _ctx: &EntityContext,
) -> StageResult<Transformed> {
    let mut changed = Transformed::No;

    for (index, annotation) in property.annotations_of(&AnnotationKind::Navigation) {
        let value = annotation.value.as_bool().ok_or_else(|| {
            StageId::NavigationOverride.malformed(record, index, "a boolean", &annotation.value)
        })?;

        let outcome = record
            .fields_mut()?
            .is_navigation_property
            .lock(value, index);
        let step = report_lock(
            record,
            StageId::NavigationOverride,
            "is_navigation_property",
            outcome,
            &value,
            index,
        )?;
        changed = changed.or(step);
    }

    Ok(changed)
}
