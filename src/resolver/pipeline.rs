//! Resolution pipeline
//!
//! Owns the ordered stage table and runs it over one property at a time.
//! The pipeline holds no per-property state; one instance serves a whole scan
//! session and may be shared across worker threads.

use log::debug;
use thiserror::Error;

use crate::{
    config::ResolverConfig,
    metadata::{
        ColumnMetadataRecord, Diagnostic, DiagnosticKind, EntityContext, FrozenRecordError,
        PropertyDescriptor,
    },
};

use super::{
    errors::{MalformedAnnotationError, ResolutionError},
    logger::ResolutionLogger,
    stage::{standard_stages, StageDescriptor, StageId},
};

/// Per-property outcome: a finalized record, or the unresolved record and the
/// annotation error that stopped it.
pub type PropertyResolution = Result<ColumnMetadataRecord, UnresolvedProperty>;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{error}")]
pub struct UnresolvedProperty {
    /// Finalized, flagged `unresolved`, holding whatever earlier stages decided.
    pub record: ColumnMetadataRecord,
    #[source]
    pub error: MalformedAnnotationError,
}

#[derive(Debug, Clone)]
pub struct ResolutionPipeline {
    stages: Vec<StageDescriptor>,
}

impl ResolutionPipeline {
    /// Orders `stages` by tier; stages sharing a tier keep their given order.
    pub fn new(mut stages: Vec<StageDescriptor>) -> Self {
        stages.sort_by_key(|stage| stage.tier);
        Self { stages }
    }

    pub fn standard() -> Self {
        Self::new(standard_stages())
    }

    /// The standard table minus the stages the configuration switches off.
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::standard().filtered(|stage| match stage.id {
            StageId::LegacyForeignKey => config.legacy_foreign_key,
            StageId::StructuralHeuristic => config.structural_heuristic,
            StageId::ForeignKeyConvention => config.foreign_key_convention,
            _ => true,
        })
    }

    pub fn filtered(mut self, keep: impl Fn(&StageDescriptor) -> bool) -> Self {
        self.stages.retain(|stage| keep(stage));
        self
    }

    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    /// Resolve one property.
    ///
    /// The outer error is reserved for contract violations (a stage writing a
    /// frozen record). Malformed annotations become an `Err` resolution for
    /// this property only.
    pub fn run(
        &self,
        property: &PropertyDescriptor,
        ctx: &EntityContext,
        logger: &dyn ResolutionLogger,
    ) -> Result<PropertyResolution, FrozenRecordError> {
        let mut record = ColumnMetadataRecord::new(ctx.identity_of(property));

        for stage in &self.stages {
            let logged = record.diagnostics().len();

            match (stage.apply)(&mut record, property, ctx) {
                Ok(transformed) => {
                    debug!(
                        "{}: stage {} (tier {}) changed record: {}",
                        record.identity(),
                        stage.id,
                        stage.tier,
                        transformed.is_yes()
                    );
                    if transformed.is_yes() && stage.deprecated {
                        record.push_diagnostic(deprecation_notice(stage))?;
                    }
                    forward(&record, logged, logger);
                }
                Err(ResolutionError::MalformedAnnotation(error)) => {
                    record.push_diagnostic(Diagnostic::warning(
                        stage.id,
                        DiagnosticKind::MalformedAnnotation,
                        error.to_string(),
                    ))?;
                    record.mark_unresolved()?;
                    forward(&record, logged, logger);
                    record.finalize();
                    return Ok(Err(UnresolvedProperty { record, error }));
                }
                Err(ResolutionError::FrozenRecord(error)) => return Err(error),
            }
        }

        record.finalize();
        Ok(Ok(record))
    }
}

impl Default for ResolutionPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

fn deprecation_notice(stage: &StageDescriptor) -> Diagnostic {
    let legacy = stage
        .id
        .annotation()
        .map(|kind| format!("`{}` annotation", kind))
        .unwrap_or_else(|| format!("rule `{}`", stage.name));

    let message = match stage.superseded_by {
        Some(replacement) => match replacement.annotation() {
            Some(kind) => format!(
                "{} is deprecated; use the `{}` annotation to set or unset the flag explicitly (superseded by {})",
                legacy, kind, replacement
            ),
            None => format!("{} is deprecated (superseded by {})", legacy, replacement),
        },
        None => format!("{} is deprecated", legacy),
    };

    Diagnostic::warning(stage.id, DiagnosticKind::Deprecation, message)
}

/// Sends the diagnostics appended since `from` to the sink.
fn forward(record: &ColumnMetadataRecord, from: usize, logger: &dyn ResolutionLogger) {
    for diagnostic in &record.diagnostics()[from..] {
        logger.log(diagnostic.level, record.identity(), &diagnostic.message);
    }
}
