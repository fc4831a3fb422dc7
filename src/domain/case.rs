//! Case records produced by the pipeline
//!
//! Each pipeline stage produces its own record type so that a later stage can
//! only run on the output of the stage before it:
//!
//! [`TrackedEntity`] → [`AssignedEntity`] → [`EnrichedEntity`] → [`ClassifiedCase`]
//!
//! [`CaseSubmission`] is the JSON body posted to Go.Data.

use super::ids::{AttributeId, DataElementId, OutbreakId};
use super::tracked_entity::TrackedEntity;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four program stages a case is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageRole {
    ClinicalExamination,
    LabRequest,
    LabResults,
    Symptoms,
}

impl StageRole {
    /// All roles, in the order they are enriched
    pub const ALL: [StageRole; 4] = [
        StageRole::ClinicalExamination,
        StageRole::LabRequest,
        StageRole::LabResults,
        StageRole::Symptoms,
    ];

    /// Field name used on the submitted case record
    pub fn field_name(&self) -> &'static str {
        match self {
            StageRole::ClinicalExamination => "clinicalExamination",
            StageRole::LabRequest => "labRequestStage",
            StageRole::LabResults => "labResultStage",
            StageRole::Symptoms => "symptoms",
        }
    }
}

impl fmt::Display for StageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A data value with the data element's display name attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDataValue {
    pub data_element: DataElementId,
    pub value: String,
    /// `None` when the data element is not in the catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Enriched data values for each stage role
///
/// A stage with no matching event holds an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageData {
    pub clinical_examination: Vec<EnrichedDataValue>,
    #[serde(rename = "labRequestStage")]
    pub lab_request: Vec<EnrichedDataValue>,
    #[serde(rename = "labResultStage")]
    pub lab_results: Vec<EnrichedDataValue>,
    pub symptoms: Vec<EnrichedDataValue>,
}

impl StageData {
    pub fn get(&self, role: StageRole) -> &[EnrichedDataValue] {
        match role {
            StageRole::ClinicalExamination => &self.clinical_examination,
            StageRole::LabRequest => &self.lab_request,
            StageRole::LabResults => &self.lab_results,
            StageRole::Symptoms => &self.symptoms,
        }
    }

    pub fn set(&mut self, role: StageRole, values: Vec<EnrichedDataValue>) {
        match role {
            StageRole::ClinicalExamination => self.clinical_examination = values,
            StageRole::LabRequest => self.lab_request = values,
            StageRole::LabResults => self.lab_results = values,
            StageRole::Symptoms => self.symptoms = values,
        }
    }

    /// True when no stage has any data
    pub fn is_empty(&self) -> bool {
        StageRole::ALL.iter().all(|role| self.get(*role).is_empty())
    }
}

/// Lab result derived from the lab results stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabResult {
    Positive,
    Negative,
}

impl LabResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabResult::Positive => "POSITIVE",
            LabResult::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for LabResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseClassification {
    Confirmed,
    NotACaseDiscarded,
    Probable,
    Suspect,
}

impl CaseClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseClassification::Confirmed => "CONFIRMED",
            CaseClassification::NotACaseDiscarded => "NOT_A_CASE_DISCARDED",
            CaseClassification::Probable => "PROBABLE",
            CaseClassification::Suspect => "SUSPECT",
        }
    }
}

impl fmt::Display for CaseClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked entity with its outbreak resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedEntity {
    pub entity: TrackedEntity,
    pub outbreak: OutbreakId,
}

/// An assigned entity with stage data attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedEntity {
    pub entity: TrackedEntity,
    pub outbreak: OutbreakId,
    pub stages: StageData,
}

/// A fully classified case, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCase {
    pub entity: TrackedEntity,
    pub outbreak: OutbreakId,
    pub stages: StageData,
    /// Unset when the lab results stage is empty
    pub lab_result: Option<LabResult>,
    pub classification: CaseClassification,
}

impl ClassifiedCase {
    /// Build the Go.Data body, dropping the outbreak bookkeeping field
    ///
    /// `person_fields` maps Go.Data case fields to the attributes they are
    /// read from. Attributes the entity doesn't have are left out.
    pub fn into_submission(self, person_fields: &[(String, AttributeId)]) -> CaseSubmission {
        let person = person_fields
            .iter()
            .filter_map(|(field, attribute)| {
                self.entity
                    .attribute_value(attribute)
                    .map(|value| (field.clone(), value.to_string()))
            })
            .collect();

        CaseSubmission {
            visual_id: self.entity.id.into_inner(),
            person,
            stages: self.stages,
            lab_result: self.lab_result,
            case_classification: self.classification,
        }
    }
}

impl CaseSubmission {
    /// Body keys written by the submission itself; person fields may not reuse them
    pub const RESERVED_FIELDS: [&'static str; 7] = [
        "visualId",
        "clinicalExamination",
        "labRequestStage",
        "labResultStage",
        "symptoms",
        "labResult",
        "caseClassification",
    ];
}

/// Case body posted to `POST /api/outbreaks/{id}/cases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSubmission {
    /// DHIS2 tracked entity id, kept for traceability
    pub visual_id: String,

    /// Person fields translated from tracked entity attributes
    #[serde(flatten)]
    pub person: IndexMap<String, String>,

    #[serde(flatten)]
    pub stages: StageData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_result: Option<LabResult>,

    pub case_classification: CaseClassification,
}
