//! Tier 0: the explicit `required` annotation. A bare marker means `true`.

use serde_json::Value;

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

    for (index, annotation) in property.annotations_of(&AnnotationKind::Required) {
        let required = match &annotation.value {
            Value::Null => true,
            Value::Bool(required) => *required,
            other => {
                return Err(StageId::RequiredOverride
                    .malformed(record, index, "null or a boolean", other)
                    .into())
            }
        };

        let outcome = record.fields_mut()?.is_required.lock(required, index);
        let step = report_lock(
            record,
            StageId::RequiredOverride,
            "is_required",
            outcome,
            &required,
            index,
        )?;
        changed = changed.or(step);
    }

    Ok(changed)
}
