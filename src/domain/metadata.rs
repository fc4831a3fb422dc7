//! Reference data models
//!
//! Programs, program stages, data elements, attributes, organisation units and
//! outbreaks are loaded once per run and then only read.

use super::ids::{AttributeId, DataElementId, OrgUnitId, OutbreakId, ProgramId, ProgramStageId};
use serde::{Deserialize, Serialize};

/// A DHIS2 metadata record that is looked up by its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Named<I> {
    /// Identifier of the record
    pub id: I,

    /// Human-readable name shown in the DHIS2 UI
    pub display_name: String,
}

impl<I> Named<I> {
    /// Create a new named record
    pub fn new(id: I, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Tracker program
pub type Program = Named<ProgramId>;

/// Program stage
pub type ProgramStage = Named<ProgramStageId>;

/// Data element collected within a program stage
pub type DataElement = Named<DataElementId>;

/// Tracked entity attribute
pub type TrackedEntityAttribute = Named<AttributeId>;

/// Returns the id of the first record whose display name equals `name`
pub fn find_id_by_name<'a, I>(records: &'a [Named<I>], name: &str) -> Option<&'a I> {
    records
        .iter()
        .find(|record| record.display_name == name)
        .map(|record| &record.id)
}

/// Node in the organisation unit tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationUnit {
    /// Organisation unit id
    pub id: OrgUnitId,

    /// Parent id, `None` at the root
    pub parent_id: Option<OrgUnitId>,
}

impl OrganisationUnit {
    /// Create a root organisation unit
    pub fn root(id: OrgUnitId) -> Self {
        Self {
            id,
            parent_id: None,
        }
    }

    /// Create an organisation unit with a parent
    pub fn child(id: OrgUnitId, parent_id: OrgUnitId) -> Self {
        Self {
            id,
            parent_id: Some(parent_id),
        }
    }
}

/// Go.Data outbreak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outbreak {
    /// Outbreak id
    pub id: OutbreakId,

    /// Outbreak name
    #[serde(default)]
    pub name: String,

    /// Locations covered by the outbreak; the first one is used for assignment
    #[serde(default)]
    pub location_ids: Vec<OrgUnitId>,
}

impl Outbreak {
    /// The location used to index this outbreak
    pub fn primary_location(&self) -> Option<&OrgUnitId> {
        self.location_ids.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stages() -> Vec<ProgramStage> {
        vec![
            Named::new(ProgramStageId::new("s1").unwrap(), "Lab Request"),
            Named::new(ProgramStageId::new("s2").unwrap(), "Lab Results"),
            Named::new(ProgramStageId::new("s3").unwrap(), "Lab Results"),
        ]
    }

    #[test]
    fn test_find_id_by_name_first_match_wins() {
        let stages = stages();
        let id = find_id_by_name(&stages, "Lab Results").unwrap();
        assert_eq!(id.as_str(), "s2");
        assert!(find_id_by_name(&stages, "Symptoms").is_none());
    }

    #[test]
    fn test_outbreak_deserializes_go_data_shape() {
        let json = r#"{"id":"o-1","name":"Cholera 2024","locationIds":["U1","U7"],"disease":"x"}"#;
        let outbreak: Outbreak = serde_json::from_str(json).unwrap();
        assert_eq!(outbreak.primary_location().unwrap().as_str(), "U1");
        assert_eq!(outbreak.location_ids.len(), 2);
    }

    #[test]
    fn test_outbreak_without_locations() {
        let outbreak: Outbreak = serde_json::from_str(r#"{"id":"o-2"}"#).unwrap();
        assert!(outbreak.primary_location().is_none());
    }

    #[test]
    fn test_outbreak_with_blank_ids_is_rejected() {
        assert!(serde_json::from_str::<Outbreak>(r#"{"id":""}"#).is_err());
        assert!(serde_json::from_str::<Outbreak>(r#"{"id":"o-1","locationIds":[""]}"#).is_err());
    }
}
