//! Tier 0: the explicit `column` annotation.
//!
//! Payload is either a column name or an object with optional `name` and
//! `type` keys. Both fields are locked.

use serde_json::Value;

use crate::{
    metadata::{AnnotationKind, ColumnMetadataRecord, EntityContext, PropertyDescriptor},
    resolver::{
        stage::{StageId, StageResult},
        transformed::Transformed,
    },
};

use super::report_lock;

const EXPECTED: &str = "a column name or an object with `name` and/or `type`";

pub fn apply(
    record: &mut ColumnMetadataRecord,
    property: &PropertyDescriptor,
    _ctx: &EntityContext,
) -> StageResult<Transformed> {
    let mut changed = Transformed::No;

    for (index, annotation) in property.annotations_of(&AnnotationKind::Column) {
        let (name, column_type) = parse_payload(&annotation.value).ok_or_else(|| {
            StageId::ColumnOverride.malformed(record, index, EXPECTED, &annotation.value)
        })?;

        if let Some(name) = name {
            let outcome = record.fields_mut()?.column_name.lock(name.clone(), index);
            let step = report_lock(
                record,
                StageId::ColumnOverride,
                "column_name",
                outcome,
                &name,
                index,
            )?;
            changed = changed.or(step);
        }

        if let Some(column_type) = column_type {
            let outcome = record
                .fields_mut()?
                .column_type
                .lock(column_type.clone(), index);
            let step = report_lock(
                record,
                StageId::ColumnOverride,
                "column_type",
                outcome,
                &column_type,
                index,
            )?;
            changed = changed.or(step);
        }
    }

    Ok(changed)
}

fn parse_payload(value: &Value) -> Option<(Option<String>, Option<String>)> {
    match value {
        Value::String(name) => non_empty(name).map(|name| (Some(name), None)),
        Value::Object(map) => {
            let name = match map.get("name") {
                None | Some(Value::Null) => None,
                Some(Value::String(name)) => Some(non_empty(name)?),
                Some(_) => return None,
            };
            let column_type = match map.get("type") {
                None | Some(Value::Null) => None,
                Some(Value::String(ty)) => Some(non_empty(ty)?),
                Some(_) => return None,
            };
            if name.is_none() && column_type.is_none() {
                None
            } else {
                Some((name, column_type))
            }
        }
        _ => None,
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
