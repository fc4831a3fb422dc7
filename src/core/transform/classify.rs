//! Lab result and case classification
//!
//! Both derivations only read stage data, so a case's classification depends
//! on nothing but its four stage lists and the confirmed-test conditions.
//!
//! Only two lab outcomes exist. A lab result that is neither positive by the
//! configured conditions nor absent is treated as negative, including values
//! a lab would report as inconclusive.

use crate::domain::ids::DataElementId;
use crate::domain::{
    CaseClassification, ClassifiedCase, EnrichedDataValue, EnrichedEntity, LabResult, StageData,
};

/// Lab result from the lab results stage
///
/// `None` when the stage is empty. `Positive` only when every condition finds
/// a value for its data element equal to the expected value.
pub fn add_lab_result(
    lab_results: &[EnrichedDataValue],
    conditions: &[(DataElementId, String)],
) -> Option<LabResult> {
    if lab_results.is_empty() {
        return None;
    }

    let confirmed = conditions.iter().all(|(element, expected)| {
        lab_results
            .iter()
            .any(|dv| &dv.data_element == element && &dv.value == expected)
    });

    Some(if confirmed {
        LabResult::Positive
    } else {
        LabResult::Negative
    })
}

/// Case classification, first matching rule wins
///
/// 1. positive lab result: confirmed
/// 2. negative lab result with lab data: discarded
/// 3. a lab request exists: probable
/// 4. otherwise: suspect
pub fn add_case_classification(
    lab_result: Option<LabResult>,
    stages: &StageData,
) -> CaseClassification {
    match lab_result {
        Some(LabResult::Positive) => CaseClassification::Confirmed,
        Some(LabResult::Negative) if !stages.lab_results.is_empty() => {
            CaseClassification::NotACaseDiscarded
        }
        _ if !stages.lab_request.is_empty() => CaseClassification::Probable,
        _ => CaseClassification::Suspect,
    }
}

/// Classifies enriched entities
#[derive(Debug, Clone)]
pub struct LabClassifier {
    conditions: Vec<(DataElementId, String)>,
}

impl LabClassifier {
    pub fn new(conditions: Vec<(DataElementId, String)>) -> Self {
        Self { conditions }
    }

    pub fn classify(&self, enriched: EnrichedEntity) -> ClassifiedCase {
        let lab_result = add_lab_result(&enriched.stages.lab_results, &self.conditions);
        let classification = add_case_classification(lab_result, &enriched.stages);

        tracing::trace!(
            entity = %enriched.entity.id,
            lab_result = ?lab_result,
            classification = %classification,
            "Case classified"
        );

        ClassifiedCase {
            entity: enriched.entity,
            outbreak: enriched.outbreak,
            stages: enriched.stages,
            lab_result,
            classification,
        }
    }
}
