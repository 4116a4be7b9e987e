use thiserror::Error;

use crate::metadata::{AnnotationKind, FrozenRecordError, PropertyIdentity};

use super::stage::StageId;

/// An annotation payload the owning stage cannot interpret.
///
/// Scoped to one property and one stage; the property is reported as
/// unresolved and the scan continues.
#[derive(Debug, Clone, Error, PartialEq)]
#[error(
    "{stage}: malformed `{annotation}` annotation #{index} on `{property}`: expected {expected}, found {found}"
)]
pub struct MalformedAnnotationError {
    pub stage: StageId,
    pub property: PropertyIdentity,
    pub annotation: AnnotationKind,
    pub index: usize,
    pub expected: &'static str,
    pub found: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolutionError {
    #[error(transparent)]
    MalformedAnnotation(#[from] MalformedAnnotationError),

    #[error("Internal consistency fault: {0}")]
    FrozenRecord(#[from] FrozenRecordError),
}

/// Short description of a payload for error messages.
pub(crate) fn describe_payload(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => format!("boolean {}", b),
        serde_json::Value::Number(n) => format!("number {}", n),
        serde_json::Value::String(s) => format!("string {:?}", s),
        serde_json::Value::Array(items) => format!("array of {} items", items.len()),
        serde_json::Value::Object(_) => "object".to_string(),
    }
}
