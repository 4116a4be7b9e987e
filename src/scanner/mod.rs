//! Entity scanner
//!
//! Drives the resolution pipeline over a whole model: one pipeline run per
//! property, one [`EntityContext`] per entity. Malformed annotations are
//! collected per property and never stop the scan.

use std::thread;

use log::{debug, info};

use crate::{
    config::ResolverConfig,
    metadata::{
        ColumnMetadataRecord, DiagnosticKind, EntityContext, EntityDescriptor, FrozenRecordError,
        ModelDescriptor, ScalarVocabulary,
    },
    resolver::{PropertyResolution, ResolutionLogger, ResolutionPipeline, UnresolvedProperty},
};

pub mod report;

pub use report::{ScanReport, ScanSummary};

pub struct EntityScanner<'a> {
    pipeline: ResolutionPipeline,
    logger: &'a dyn ResolutionLogger,
    vocabulary: ScalarVocabulary,
    parallel: bool,
    max_workers: usize,
}

impl<'a> EntityScanner<'a> {
    pub fn new(pipeline: ResolutionPipeline, logger: &'a dyn ResolutionLogger) -> Self {
        Self {
            pipeline,
            logger,
            vocabulary: ScalarVocabulary::default(),
            parallel: false,
            max_workers: 1,
        }
    }

    pub fn from_config(config: &ResolverConfig, logger: &'a dyn ResolutionLogger) -> Self {
        Self {
            pipeline: ResolutionPipeline::from_config(config),
            logger,
            vocabulary: ScalarVocabulary::new(&config.extra_scalar_types),
            parallel: config.parallel,
            max_workers: config.max_workers.max(1),
        }
    }

    /// Resolve every property of `entity`, in declaration order.
    pub fn scan_entity(
        &self,
        entity: &EntityDescriptor,
        model: &ModelDescriptor,
    ) -> Result<EntityScan, FrozenRecordError> {
        let ctx = EntityContext::new(entity, model, self.vocabulary.clone());

        let properties = entity
            .properties
            .iter()
            .map(|property| self.pipeline.run(property, &ctx, self.logger))
            .collect::<Result<Vec<_>, _>>()?;

        let scan = EntityScan {
            entity: entity.name.clone(),
            properties,
        };
        debug!(
            "Scanned entity {}: {} properties, {} unresolved",
            scan.entity,
            scan.properties.len(),
            scan.unresolved().count()
        );
        Ok(scan)
    }

    /// Scan every entity. Results keep the model's entity order whether or not
    /// entities are scanned in parallel.
    pub fn scan_model(&self, model: &ModelDescriptor) -> Result<ModelScan, FrozenRecordError> {
        let entities = if self.parallel && model.entities.len() > 1 {
            self.scan_parallel(model)?
        } else {
            model
                .entities
                .iter()
                .map(|entity| self.scan_entity(entity, model))
                .collect::<Result<Vec<_>, _>>()?
        };

        let scan = ModelScan { entities };
        let summary = scan.summary();
        info!(
            "Resolved {} of {} properties across {} entities ({} unresolved)",
            summary.resolved, summary.properties, summary.entities, summary.unresolved
        );
        Ok(scan)
    }

    fn scan_parallel(&self, model: &ModelDescriptor) -> Result<Vec<EntityScan>, FrozenRecordError> {
        let mut scans = Vec::with_capacity(model.entities.len());

        for batch in model.entities.chunks(self.max_workers) {
            let results = thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|entity| scope.spawn(move || self.scan_entity(entity, model)))
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                    })
                    .collect::<Vec<_>>()
            });

            for result in results {
                scans.push(result?);
            }
        }

        Ok(scans)
    }
}

/// Outcomes for one entity, in property declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityScan {
    pub entity: String,
    pub properties: Vec<PropertyResolution>,
}

impl EntityScan {
    /// Every record, resolved or not.
    pub fn records(&self) -> impl Iterator<Item = &ColumnMetadataRecord> {
        self.properties.iter().map(|outcome| match outcome {
            Ok(record) => record,
            Err(unresolved) => &unresolved.record,
        })
    }

    pub fn resolved(&self) -> impl Iterator<Item = &ColumnMetadataRecord> {
        self.properties.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &UnresolvedProperty> {
        self.properties.iter().filter_map(|outcome| outcome.as_ref().err())
    }

    pub fn record(&self, property: &str) -> Option<&ColumnMetadataRecord> {
        self.records().find(|r| r.identity().property == property)
    }

    pub fn navigation_properties(&self) -> impl Iterator<Item = &ColumnMetadataRecord> {
        self.resolved()
            .filter(|record| record.is_navigation_property() == Some(true))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelScan {
    pub entities: Vec<EntityScan>,
}

impl ModelScan {
    pub fn entity(&self, name: &str) -> Option<&EntityScan> {
        self.entities.iter().find(|e| e.entity == name)
    }

    pub fn has_unresolved(&self) -> bool {
        self.entities.iter().any(|e| e.unresolved().next().is_some())
    }

    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary {
            entities: self.entities.len(),
            ..Default::default()
        };

        for entity in &self.entities {
            for record in entity.records() {
                summary.properties += 1;
                if record.is_unresolved() {
                    summary.unresolved += 1;
                } else {
                    summary.resolved += 1;
                    if record.is_navigation_property() == Some(true) {
                        summary.navigation_properties += 1;
                    }
                }
                summary.deprecations += record
                    .diagnostics()
                    .iter()
                    .filter(|d| d.kind == DiagnosticKind::Deprecation)
                    .count();
            }
        }
        summary
    }

    pub fn report(&self) -> ScanReport<'_> {
        ScanReport::new(self)
    }
}
