//! Case transformation pipeline
//!
//! Three named stages, each taking the previous stage's record type:
//!
//! - [`OutbreakAssigner`] - [`TrackedEntity`] to [`AssignedEntity`]
//! - [`EventEnricher`] - [`AssignedEntity`] to [`EnrichedEntity`]
//! - [`LabClassifier`] - [`EnrichedEntity`] to [`ClassifiedCase`]
//!
//! The stages are synchronous and hold only read-only lookup tables, so
//! entities can be processed in any order.
//!
//! [`AssignedEntity`]: crate::domain::AssignedEntity
//! [`EnrichedEntity`]: crate::domain::EnrichedEntity

pub mod classify;
pub mod enrich;
pub mod outbreak;

pub use classify::{add_case_classification, add_lab_result, LabClassifier};
pub use enrich::{EventEnricher, StageIds};
pub use outbreak::OutbreakAssigner;

use crate::domain::{ClassifiedCase, Result, TrackedEntity};

/// The three transformation stages, built once per run
#[derive(Debug, Clone)]
pub struct CasePipeline {
    assigner: OutbreakAssigner,
    enricher: EventEnricher,
    classifier: LabClassifier,
}

impl CasePipeline {
    pub fn new(
        assigner: OutbreakAssigner,
        enricher: EventEnricher,
        classifier: LabClassifier,
    ) -> Self {
        Self {
            assigner,
            enricher,
            classifier,
        }
    }

    /// Run one tracked entity through assign, enrich and classify
    ///
    /// # Errors
    ///
    /// Only outbreak assignment can fail; see [`OutbreakAssigner::resolve`].
    pub fn process(&self, entity: TrackedEntity) -> Result<ClassifiedCase> {
        let assigned = self.assigner.assign(entity)?;
        let enriched = self.enricher.enrich(assigned);
        Ok(self.classifier.classify(enriched))
    }

    /// Process every entity, stopping at the first failure
    pub fn process_all(&self, entities: Vec<TrackedEntity>) -> Result<Vec<ClassifiedCase>> {
        entities
            .into_iter()
            .map(|entity| self.process(entity))
            .collect()
    }
}
