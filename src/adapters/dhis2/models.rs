//! DHIS2 Web API response models
//!
//! Metadata collections come back wrapped in an object keyed by the resource
//! name (`{"programs": [...]}`). Tracker payloads are read leniently and then
//! checked, so a record with a missing field surfaces as a
//! [`BridgeError::MalformedRecord`] naming that record.

use crate::domain::ids::{
    AttributeId, DataElementId, OrgUnitId, ProgramStageId, TrackedEntityId,
};
use crate::domain::{
    AttributeValue, BridgeError, DataElement, DataValue, Event, OrganisationUnit, Program,
    ProgramStage, Result, TrackedEntity, TrackedEntityAttribute,
};
use serde::Deserialize;

/// Response of `GET /api/programs`
#[derive(Debug, Deserialize)]
pub struct ProgramsResponse {
    #[serde(default)]
    pub programs: Vec<Program>,
}

/// Response of `GET /api/programStages`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStagesResponse {
    #[serde(default)]
    pub program_stages: Vec<ProgramStage>,
}

/// Response of `GET /api/dataElements`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElementsResponse {
    #[serde(default)]
    pub data_elements: Vec<DataElement>,
}

/// Response of `GET /api/trackedEntityAttributes`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityAttributesResponse {
    #[serde(default)]
    pub tracked_entity_attributes: Vec<TrackedEntityAttribute>,
}

/// Response of `GET /api/organisationUnits/{id}?includeDescendants=true`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationUnitsResponse {
    #[serde(default)]
    pub organisation_units: Vec<OrganisationUnitRecord>,
}

#[derive(Debug, Deserialize)]
pub struct OrganisationUnitRecord {
    pub id: OrgUnitId,
    #[serde(default)]
    pub parent: Option<IdRef>,
}

#[derive(Debug, Deserialize)]
pub struct IdRef {
    pub id: OrgUnitId,
}

impl From<OrganisationUnitRecord> for OrganisationUnit {
    fn from(record: OrganisationUnitRecord) -> Self {
        OrganisationUnit {
            id: record.id,
            parent_id: record.parent.map(|p| p.id),
        }
    }
}

/// Response of `GET /api/trackedEntityInstances`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityInstancesResponse {
    #[serde(default)]
    pub tracked_entity_instances: Vec<TrackedEntityInstanceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityInstanceRecord {
    pub tracked_entity_instance: Option<String>,
    pub org_unit: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AttributeRecord {
    pub attribute: Option<String>,
    pub value: Option<String>,
}

impl TrackedEntityInstanceRecord {
    /// Check required fields and convert to a [`TrackedEntity`]
    pub fn into_domain(self) -> Result<TrackedEntity> {
        let raw_id = self.tracked_entity_instance.unwrap_or_default();
        let id = TrackedEntityId::new(raw_id)
            .map_err(|e| BridgeError::malformed("trackedEntityInstance", e))?;

        let org_unit = self
            .org_unit
            .ok_or_else(|| BridgeError::malformed(id.as_str(), "missing orgUnit"))
            .and_then(|ou| {
                OrgUnitId::new(ou).map_err(|e| BridgeError::malformed(id.as_str(), e))
            })?;

        let attributes = self
            .attributes
            .into_iter()
            .map(|a| {
                let attribute = AttributeId::new(a.attribute.unwrap_or_default())
                    .map_err(|e| BridgeError::malformed(id.as_str(), e))?;
                Ok(AttributeValue {
                    attribute,
                    value: a.value.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TrackedEntity::new(id, org_unit).with_attributes(attributes))
    }
}

/// Response of `GET /api/events`
#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub event: Option<String>,
    pub program_stage: Option<String>,
    #[serde(default)]
    pub data_values: Vec<DataValueRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValueRecord {
    pub data_element: Option<String>,
    pub value: Option<String>,
}

impl EventRecord {
    /// Check required fields and convert to an [`Event`]
    ///
    /// `entity` is only used to name the record in errors.
    pub fn into_domain(self, entity: &TrackedEntityId) -> Result<Event> {
        let record = match &self.event {
            Some(event) => format!("{entity}/{event}"),
            None => entity.to_string(),
        };

        let program_stage = ProgramStageId::new(self.program_stage.unwrap_or_default())
            .map_err(|e| BridgeError::malformed(record.clone(), e))?;

        let data_values = self
            .data_values
            .into_iter()
            .map(|dv| {
                let element = DataElementId::new(dv.data_element.unwrap_or_default())
                    .map_err(|e| BridgeError::malformed(record.clone(), e))?;
                let value = dv.value.ok_or_else(|| {
                    BridgeError::malformed(
                        record.clone(),
                        format!("data value for {element} has no value"),
                    )
                })?;
                Ok(DataValue::new(element, value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Event {
            program_stage,
            data_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_units_with_parent_refs() {
        let json = r#"{"organisationUnits":[
            {"id":"U1","displayName":"Country"},
            {"id":"U2","displayName":"District","parent":{"id":"U1"}}
        ]}"#;
        let response: OrganisationUnitsResponse = serde_json::from_str(json).unwrap();
        let units: Vec<OrganisationUnit> = response
            .organisation_units
            .into_iter()
            .map(Into::into)
            .collect();

        assert_eq!(units[0].parent_id, None);
        assert_eq!(units[1].parent_id.as_ref().unwrap().as_str(), "U1");
    }

    #[test]
    fn test_org_unit_with_blank_parent_is_rejected() {
        let json = r#"{"organisationUnits":[{"id":"U2","parent":{"id":"  "}}]}"#;
        let err = serde_json::from_str::<OrganisationUnitsResponse>(json).unwrap_err();
        assert!(err.to_string().contains("Organisation unit ID cannot be empty"));
    }

    #[test]
    fn test_tei_record_into_domain() {
        let json = r#"{"trackedEntityInstance":"t1","orgUnit":"U3",
            "attributes":[{"attribute":"w75KJ2mc4zz","value":"Amina",
                "displayName":"First name"}]}"#;
        let record: TrackedEntityInstanceRecord = serde_json::from_str(json).unwrap();
        let entity = record.into_domain().unwrap();

        assert_eq!(entity.id.as_str(), "t1");
        assert_eq!(entity.org_unit.as_str(), "U3");
        assert_eq!(entity.attributes[0].value, "Amina");
        assert!(entity.events.is_empty());
    }

    #[test]
    fn test_tei_record_without_org_unit_is_malformed() {
        let record: TrackedEntityInstanceRecord =
            serde_json::from_str(r#"{"trackedEntityInstance":"t1"}"#).unwrap();
        let err = record.into_domain().unwrap_err();
        assert!(matches!(err, BridgeError::MalformedRecord { ref record, .. } if record == "t1"));
    }

    #[test]
    fn test_event_record_without_stage_is_malformed() {
        let record: EventRecord =
            serde_json::from_str(r#"{"event":"e1","dataValues":[]}"#).unwrap();
        let entity = TrackedEntityId::new("t1").unwrap();
        let err = record.into_domain(&entity).unwrap_err();
        assert!(err.to_string().contains("t1/e1"));
    }

    #[test]
    fn test_event_record_into_domain() {
        let json = r#"{"event":"e1","programStage":"lab","dataValues":[
            {"dataElement":"de1","value":"Positive"}]}"#;
        let record: EventRecord = serde_json::from_str(json).unwrap();
        let event = record
            .into_domain(&TrackedEntityId::new("t1").unwrap())
            .unwrap();

        assert_eq!(event.program_stage.as_str(), "lab");
        assert_eq!(event.data_values[0].value, "Positive");
    }
}
