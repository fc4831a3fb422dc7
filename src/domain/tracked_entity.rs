//! Tracked entity instances and their events

use super::ids::{AttributeId, DataElementId, OrgUnitId, ProgramStageId, TrackedEntityId};
use serde::{Deserialize, Serialize};

/// A single data value captured in an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValue {
    pub data_element: DataElementId,
    pub value: String,
}

impl DataValue {
    pub fn new(data_element: DataElementId, value: impl Into<String>) -> Self {
        Self {
            data_element,
            value: value.into(),
        }
    }
}

/// An event recorded against one program stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub program_stage: ProgramStageId,
    #[serde(default)]
    pub data_values: Vec<DataValue>,
}

/// A tracked entity attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub attribute: AttributeId,
    pub value: String,
}

/// A tracked entity instance as loaded from DHIS2
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntity {
    /// Tracked entity instance id
    pub id: TrackedEntityId,

    /// Organisation unit the entity is registered in
    pub org_unit: OrgUnitId,

    /// Attribute values (person details)
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,

    /// Event history, in the order DHIS2 returned it
    #[serde(default)]
    pub events: Vec<Event>,
}

impl TrackedEntity {
    /// Create a tracked entity with no attributes and no events
    pub fn new(id: TrackedEntityId, org_unit: OrgUnitId) -> Self {
        Self {
            id,
            org_unit,
            attributes: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Attach an event history
    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    /// Attach attribute values
    pub fn with_attributes(mut self, attributes: Vec<AttributeValue>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Value of the first attribute entry with this id
    pub fn attribute_value(&self, attribute: &AttributeId) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| &a.attribute == attribute)
            .map(|a| a.value.as_str())
    }

    /// First event recorded for the given program stage
    pub fn first_event_for_stage(&self, stage: &ProgramStageId) -> Option<&Event> {
        self.events.iter().find(|e| &e.program_stage == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(id: &str) -> ProgramStageId {
        ProgramStageId::new(id).unwrap()
    }

    #[test]
    fn test_first_event_for_stage_picks_first() {
        let de = DataElementId::new("de1").unwrap();
        let entity = TrackedEntity::new(
            TrackedEntityId::new("t1").unwrap(),
            OrgUnitId::new("U1").unwrap(),
        )
        .with_events(vec![
            Event {
                program_stage: stage("lab"),
                data_values: vec![DataValue::new(de.clone(), "first")],
            },
            Event {
                program_stage: stage("lab"),
                data_values: vec![DataValue::new(de, "second")],
            },
        ]);

        let event = entity.first_event_for_stage(&stage("lab")).unwrap();
        assert_eq!(event.data_values[0].value, "first");
        assert!(entity.first_event_for_stage(&stage("symptoms")).is_none());
    }

    #[test]
    fn test_attribute_value() {
        let first_name = AttributeId::new("w75KJ2mc4zz").unwrap();
        let entity = TrackedEntity::new(
            TrackedEntityId::new("t1").unwrap(),
            OrgUnitId::new("U1").unwrap(),
        )
        .with_attributes(vec![AttributeValue {
            attribute: first_name.clone(),
            value: "Amina".to_string(),
        }]);

        assert_eq!(entity.attribute_value(&first_name), Some("Amina"));
        assert_eq!(
            entity.attribute_value(&AttributeId::new("zDhUuAYrxNC").unwrap()),
            None
        );
    }
}
