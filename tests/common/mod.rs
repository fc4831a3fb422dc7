//! In-memory DHIS2 and Go.Data doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use casebridge::adapters::{DestinationSystem, SourceSystem, UserSession};
use casebridge::config::{ConfirmedTestCondition, MappingConfig, ProgramStagesConfig};
use casebridge::domain::{
    AttributeId, AttributeValue, BridgeError, CaseSubmission, DataElement, DataElementId,
    DataValue, Event, GoDataError, Named, OrgUnitId, OrganisationUnit, Outbreak, OutbreakId,
    Program, ProgramId, ProgramStage, ProgramStageId, Result, TrackedEntity,
    TrackedEntityAttribute, TrackedEntityId,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Mutex;

pub const CLINICAL: &str = "PS-clinical";
pub const LAB_REQUEST: &str = "PS-request";
pub const LAB_RESULTS: &str = "PS-results";
pub const SYMPTOMS: &str = "PS-symptoms";

pub fn ou(id: &str) -> OrgUnitId {
    OrgUnitId::new(id).unwrap()
}

pub fn outbreak(id: &str, locations: &[&str]) -> Outbreak {
    Outbreak {
        id: OutbreakId::new(id).unwrap(),
        name: format!("Outbreak {id}"),
        location_ids: locations.iter().map(|l| ou(l)).collect(),
    }
}

pub fn event(stage: &str, values: &[(&str, &str)]) -> Event {
    Event {
        program_stage: ProgramStageId::new(stage).unwrap(),
        data_values: values
            .iter()
            .map(|(element, value)| DataValue::new(DataElementId::new(*element).unwrap(), *value))
            .collect(),
    }
}

pub fn entity(id: &str, org_unit: &str, first_name: Option<&str>) -> TrackedEntity {
    let attributes = first_name
        .map(|name| {
            vec![AttributeValue {
                attribute: AttributeId::new("at-first").unwrap(),
                value: name.to_string(),
            }]
        })
        .unwrap_or_default();
    TrackedEntity::new(TrackedEntityId::new(id).unwrap(), ou(org_unit)).with_attributes(attributes)
}

/// U1 <- U2 <- U3, U1 <- U4
pub fn tree() -> Vec<OrganisationUnit> {
    vec![
        OrganisationUnit::root(ou("U1")),
        OrganisationUnit::child(ou("U2"), ou("U1")),
        OrganisationUnit::child(ou("U3"), ou("U2")),
        OrganisationUnit::child(ou("U4"), ou("U1")),
    ]
}

pub fn mapping() -> MappingConfig {
    let mut case_attributes = IndexMap::new();
    case_attributes.insert("firstName".to_string(), "First name".to_string());

    MappingConfig {
        cases_program: "Case Based Surveillance".to_string(),
        root_id: "U1".to_string(),
        max_concurrency: 4,
        program_stages: ProgramStagesConfig {
            clinical_examination: "Clinical examination".to_string(),
            lab_request: "Lab Request".to_string(),
            lab_results: "Lab Results".to_string(),
            symptoms: "Symptoms".to_string(),
        },
        confirmed_test: vec![ConfirmedTestCondition {
            element: "Lab Test Result".to_string(),
            value: "Positive".to_string(),
        }],
        case_attributes,
    }
}

/// DHIS2 double serving fixed metadata and a configurable tracker
pub struct InMemorySource {
    pub org_units: Vec<OrganisationUnit>,
    pub entities: Vec<TrackedEntity>,
    pub events: HashMap<String, Vec<Event>>,
}

impl InMemorySource {
    pub fn new(org_units: Vec<OrganisationUnit>) -> Self {
        Self {
            org_units,
            entities: Vec::new(),
            events: HashMap::new(),
        }
    }

    pub fn with_entity(mut self, entity: TrackedEntity, events: Vec<Event>) -> Self {
        self.events.insert(entity.id.to_string(), events);
        self.entities.push(entity);
        self
    }
}

#[async_trait]
impl SourceSystem for InMemorySource {
    async fn get_programs(&self) -> Result<Vec<Program>> {
        Ok(vec![Named::new(
            ProgramId::new("P-cbs").unwrap(),
            "Case Based Surveillance",
        )])
    }

    async fn get_program_stages(&self) -> Result<Vec<ProgramStage>> {
        Ok([
            (CLINICAL, "Clinical examination"),
            (LAB_REQUEST, "Lab Request"),
            (LAB_RESULTS, "Lab Results"),
            (SYMPTOMS, "Symptoms"),
        ]
        .iter()
        .map(|(id, name)| Named::new(ProgramStageId::new(*id).unwrap(), *name))
        .collect())
    }

    async fn get_data_elements(&self) -> Result<Vec<DataElement>> {
        Ok(vec![
            Named::new(DataElementId::new("de-test").unwrap(), "Lab Test Result"),
            Named::new(DataElementId::new("de-sample").unwrap(), "Sample Type"),
        ])
    }

    async fn get_tracked_entity_attributes(&self) -> Result<Vec<TrackedEntityAttribute>> {
        Ok(vec![Named::new(AttributeId::new("at-first").unwrap(), "First name")])
    }

    async fn get_organisation_units_from_parent(
        &self,
        _root: &OrgUnitId,
    ) -> Result<Vec<OrganisationUnit>> {
        Ok(self.org_units.clone())
    }

    async fn get_tracked_entity_instances(
        &self,
        org_unit: &OrgUnitId,
        _program: &ProgramId,
    ) -> Result<Vec<TrackedEntity>> {
        Ok(self
            .entities
            .iter()
            .filter(|e| &e.org_unit == org_unit)
            .cloned()
            .collect())
    }

    async fn get_tracked_entity_events(&self, entity: &TrackedEntityId) -> Result<Vec<Event>> {
        Ok(self.events.get(entity.as_str()).cloned().unwrap_or_default())
    }
}

/// A call made against the destination double
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login,
    Activate { user_id: String, outbreak: String },
    Create { outbreak: String, body: serde_json::Value },
}

/// Go.Data double that records every write
pub struct RecordingDestination {
    pub outbreaks: Vec<Outbreak>,
    pub calls: Mutex<Vec<Call>>,
    /// `visualId` whose creation fails with a server error
    pub fail_on: Option<String>,
}

impl RecordingDestination {
    pub fn new(outbreaks: Vec<Outbreak>) -> Self {
        Self {
            outbreaks,
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(String, serde_json::Value)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create { outbreak, body } => Some((outbreak, body)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl DestinationSystem for RecordingDestination {
    async fn get_outbreaks(&self) -> Result<Vec<Outbreak>> {
        Ok(self.outbreaks.clone())
    }

    async fn login(&self) -> Result<UserSession> {
        self.calls.lock().unwrap().push(Call::Login);
        Ok(UserSession {
            user_id: "user-1".to_string(),
        })
    }

    async fn activate_outbreak_for_user(&self, user_id: &str, outbreak: &OutbreakId) -> Result<()> {
        // yield so a sender that doesn't await activation would interleave
        tokio::task::yield_now().await;
        self.calls.lock().unwrap().push(Call::Activate {
            user_id: user_id.to_string(),
            outbreak: outbreak.to_string(),
        });
        Ok(())
    }

    async fn create_outbreak_case(
        &self,
        outbreak: &OutbreakId,
        case: &CaseSubmission,
    ) -> Result<()> {
        if self.fail_on.as_deref() == Some(case.visual_id.as_str()) {
            return Err(BridgeError::GoData(GoDataError::ServerError {
                status: 500,
                message: "case rejected".to_string(),
            }));
        }

        self.calls.lock().unwrap().push(Call::Create {
            outbreak: outbreak.to_string(),
            body: serde_json::to_value(case).map_err(BridgeError::from)?,
        });
        Ok(())
    }
}

/// Every create must follow an activation of its outbreak, with no other
/// activation in between, and login must come first and only once
pub fn assert_activation_order(calls: &[Call]) {
    assert_eq!(calls.first(), Some(&Call::Login), "login must come first");
    assert_eq!(
        calls.iter().filter(|c| **c == Call::Login).count(),
        1,
        "login must happen exactly once"
    );

    let mut active: Option<&str> = None;
    for call in calls {
        match call {
            Call::Login => {}
            Call::Activate { outbreak, .. } => active = Some(outbreak.as_str()),
            Call::Create { outbreak, .. } => {
                assert_eq!(active, Some(outbreak.as_str()), "case created before activation")
            }
        }
    }
}
