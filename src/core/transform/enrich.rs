//! Event enrichment
//!
//! Pulls the data values of the four case stages out of a tracked entity's
//! events and labels each value with its data element's display name.

use crate::domain::ids::{DataElementId, ProgramStageId};
use crate::domain::{
    AssignedEntity, DataElement, EnrichedDataValue, EnrichedEntity, StageData, StageRole,
    TrackedEntity,
};
use std::collections::HashMap;

/// Program stage id for each stage role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageIds {
    pub clinical_examination: ProgramStageId,
    pub lab_request: ProgramStageId,
    pub lab_results: ProgramStageId,
    pub symptoms: ProgramStageId,
}

impl StageIds {
    pub fn get(&self, role: StageRole) -> &ProgramStageId {
        match role {
            StageRole::ClinicalExamination => &self.clinical_examination,
            StageRole::LabRequest => &self.lab_request,
            StageRole::LabResults => &self.lab_results,
            StageRole::Symptoms => &self.symptoms,
        }
    }
}

/// Attaches stage data to assigned entities
#[derive(Debug, Clone)]
pub struct EventEnricher {
    display_names: HashMap<DataElementId, String>,
    stages: StageIds,
}

impl EventEnricher {
    /// Build an enricher from the data element catalog
    ///
    /// If the catalog lists an element twice, the first display name is used.
    pub fn new(data_elements: &[DataElement], stages: StageIds) -> Self {
        let mut display_names = HashMap::with_capacity(data_elements.len());
        for element in data_elements {
            display_names
                .entry(element.id.clone())
                .or_insert_with(|| element.display_name.clone());
        }

        Self {
            display_names,
            stages,
        }
    }

    /// Data values for one stage role
    ///
    /// Only the first event of the stage is used. No event means no values.
    pub fn stage_values(&self, entity: &TrackedEntity, role: StageRole) -> Vec<EnrichedDataValue> {
        entity
            .first_event_for_stage(self.stages.get(role))
            .map(|event| {
                event
                    .data_values
                    .iter()
                    .map(|dv| EnrichedDataValue {
                        data_element: dv.data_element.clone(),
                        value: dv.value.clone(),
                        display_name: self.display_names.get(&dv.data_element).cloned(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn enrich(&self, assigned: AssignedEntity) -> EnrichedEntity {
        let mut stages = StageData::default();
        for role in StageRole::ALL {
            stages.set(role, self.stage_values(&assigned.entity, role));
        }

        tracing::trace!(
            entity = %assigned.entity.id,
            clinical_examination = stages.clinical_examination.len(),
            lab_request = stages.lab_request.len(),
            lab_results = stages.lab_results.len(),
            symptoms = stages.symptoms.len(),
            "Stage data attached"
        );

        EnrichedEntity {
            entity: assigned.entity,
            outbreak: assigned.outbreak,
            stages,
        }
    }
}
