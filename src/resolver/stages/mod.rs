//! Concrete resolver stages, one rule per module.

use std::fmt::Display;

use crate::metadata::{ColumnMetadataRecord, Diagnostic, DiagnosticKind, LockOutcome};

use super::{
    stage::{StageId, StageResult},
    transformed::Transformed,
};

pub mod column_override;
pub mod defaults;
pub mod foreign_key_convention;
pub mod legacy_foreign_key;
pub mod navigation_override;
pub mod required_override;
pub mod structural_heuristic;

/// Turns the outcome of an explicit override write into a change flag,
/// attaching an ambiguity warning when two overrides disagree.
pub(super) fn report_lock<T: Display>(
    record: &mut ColumnMetadataRecord,
    stage: StageId,
    field: &str,
    outcome: LockOutcome<T>,
    value: &T,
    index: usize,
) -> StageResult<Transformed> {
    match outcome {
        LockOutcome::Locked => Ok(Transformed::Yes),
        LockOutcome::Agreed => Ok(Transformed::No),
        LockOutcome::Overrode { previous } => {
            record.push_diagnostic(Diagnostic::warning(
                stage,
                DiagnosticKind::AmbiguousOverride,
                format!(
                    "conflicting explicit overrides for {}: `{}` replaced by `{}` from annotation #{} (last declared wins)",
                    field, previous, value, index
                ),
            ))?;
            Ok(Transformed::Yes)
        }
        LockOutcome::Rejected { kept } => {
            record.push_diagnostic(Diagnostic::warning(
                stage,
                DiagnosticKind::AmbiguousOverride,
                format!(
                    "conflicting explicit overrides for {}: `{}` from annotation #{} ignored, later declared `{}` wins",
                    field, value, index, kept
                ),
            ))?;
            Ok(Transformed::No)
        }
    }
}
