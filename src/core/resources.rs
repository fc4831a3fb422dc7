//! Reference data loading and name resolution
//!
//! The configuration refers to DHIS2 resources by display name. Before the
//! pipeline runs, [`ResourceLoader::load`] fetches the reference collections
//! and resolves every configured name to an identifier once, producing a
//! [`ResolvedConfig`] that is never changed afterwards.

use crate::adapters::traits::{DestinationSystem, SourceSystem};
use crate::config::MappingConfig;
use crate::core::transform::StageIds;
use crate::domain::ids::{AttributeId, DataElementId, OrgUnitId, ProgramId};
use crate::domain::metadata::find_id_by_name;
use crate::domain::{
    BridgeError, DataElement, Named, OrganisationUnit, Outbreak, Result, StageRole, TrackedEntity,
};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::sync::Arc;

/// Configuration with every display name resolved to an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Tracker program holding the cases
    pub program: ProgramId,

    /// Program stage id for each stage role
    pub stages: StageIds,

    /// Top of the organisation unit subtree
    pub root: OrgUnitId,

    /// `(data element, expected value)` pairs for a positive lab result
    pub confirmed_conditions: Vec<(DataElementId, String)>,

    /// `(Go.Data field, attribute)` pairs copied onto each case
    pub person_fields: Vec<(String, AttributeId)>,

    /// Upper bound on in-flight requests
    pub max_concurrency: usize,
}

/// Reference collections the pipeline stages are built from
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub data_elements: Vec<DataElement>,
    pub org_units: Vec<OrganisationUnit>,
    pub outbreaks: Vec<Outbreak>,
}

/// Id of the first record named `name`
fn resolve<I: Clone>(records: &[Named<I>], kind: &'static str, name: &str) -> Result<I> {
    find_id_by_name(records, name)
        .cloned()
        .ok_or_else(|| BridgeError::ConfigResolution {
            kind,
            name: name.to_string(),
        })
}

/// Loads reference data and tracked entities
pub struct ResourceLoader {
    source: Arc<dyn SourceSystem>,
    destination: Arc<dyn DestinationSystem>,
    mapping: MappingConfig,
}

impl ResourceLoader {
    pub fn new(
        source: Arc<dyn SourceSystem>,
        destination: Arc<dyn DestinationSystem>,
        mapping: MappingConfig,
    ) -> Self {
        Self {
            source,
            destination,
            mapping,
        }
    }

    /// Fetch reference data and resolve the mapping configuration
    ///
    /// # Errors
    ///
    /// - [`BridgeError::ConfigResolution`] if a configured name matches nothing
    /// - transport errors from either system
    pub async fn load(&self) -> Result<(ResolvedConfig, ReferenceData)> {
        let root = OrgUnitId::new(self.mapping.root_id.clone())
            .map_err(|e| BridgeError::Configuration(format!("mapping.root_id: {e}")))?;

        tracing::info!(root = %root, "Loading reference data");

        let (programs, program_stages, data_elements, attributes, org_units, outbreaks) =
            tokio::try_join!(
                self.source.get_programs(),
                self.source.get_program_stages(),
                self.source.get_data_elements(),
                self.source.get_tracked_entity_attributes(),
                self.source.get_organisation_units_from_parent(&root),
                self.destination.get_outbreaks(),
            )?;

        tracing::debug!(
            programs = programs.len(),
            program_stages = program_stages.len(),
            data_elements = data_elements.len(),
            attributes = attributes.len(),
            org_units = org_units.len(),
            outbreaks = outbreaks.len(),
            "Reference data fetched"
        );

        let program = resolve(&programs, "program", &self.mapping.cases_program)?;

        let stage_names = &self.mapping.program_stages;
        let stage_id =
            |role: StageRole| resolve(&program_stages, "program stage", stage_names.name_for(role));
        let stages = StageIds {
            clinical_examination: stage_id(StageRole::ClinicalExamination)?,
            lab_request: stage_id(StageRole::LabRequest)?,
            lab_results: stage_id(StageRole::LabResults)?,
            symptoms: stage_id(StageRole::Symptoms)?,
        };

        let confirmed_conditions = self
            .mapping
            .confirmed_test
            .iter()
            .map(|condition| {
                let element = resolve(&data_elements, "data element", &condition.element)?;
                Ok((element, condition.value.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let person_fields = self
            .mapping
            .case_attributes
            .iter()
            .map(|(field, attribute_name)| {
                let attribute = resolve(&attributes, "tracked entity attribute", attribute_name)?;
                Ok((field.clone(), attribute))
            })
            .collect::<Result<Vec<_>>>()?;

        let resolved = ResolvedConfig {
            program,
            stages,
            root,
            confirmed_conditions,
            person_fields,
            max_concurrency: self.mapping.max_concurrency.max(1),
        };

        tracing::info!(
            program = %resolved.program,
            org_units = org_units.len(),
            outbreaks = outbreaks.len(),
            "Configuration resolved"
        );

        Ok((
            resolved,
            ReferenceData {
                data_elements,
                org_units,
                outbreaks,
            },
        ))
    }

    /// Fetch every tracked entity in the subtree with its events
    ///
    /// Entities are requested per organisation unit, then events per entity,
    /// both with at most `max_concurrency` requests in flight. An entity
    /// returned for more than one unit is kept once, first occurrence wins.
    pub async fn load_tracked_entities(
        &self,
        resolved: &ResolvedConfig,
        org_units: &[OrganisationUnit],
    ) -> Result<Vec<TrackedEntity>> {
        let source = &self.source;
        let program = &resolved.program;

        let per_unit: Vec<Vec<TrackedEntity>> = stream::iter(org_units)
            .map(|unit| source.get_tracked_entity_instances(&unit.id, program))
            .buffered(resolved.max_concurrency)
            .try_collect()
            .await?;

        let mut seen = HashSet::new();
        let entities: Vec<TrackedEntity> = per_unit
            .into_iter()
            .flatten()
            .filter(|entity| seen.insert(entity.id.clone()))
            .collect();

        tracing::info!(
            org_units = org_units.len(),
            entities = entities.len(),
            "Tracked entities loaded, fetching events"
        );

        let entities: Vec<TrackedEntity> = stream::iter(entities)
            .map(|entity| async move {
                let events = source.get_tracked_entity_events(&entity.id).await?;
                Ok::<_, BridgeError>(entity.with_events(events))
            })
            .buffered(resolved.max_concurrency)
            .try_collect()
            .await?;

        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::traits::UserSession;
    use crate::config::{ConfirmedTestCondition, ProgramStagesConfig};
    use crate::domain::ids::{OutbreakId, ProgramStageId, TrackedEntityId};
    use crate::domain::{
        CaseSubmission, DataValue, Event, Program, ProgramStage, TrackedEntityAttribute,
    };
    use async_trait::async_trait;
    use indexmap::IndexMap;
    use std::collections::HashMap;

    struct FakeSource {
        entities: HashMap<String, Vec<&'static str>>,
    }

    #[async_trait]
    impl SourceSystem for FakeSource {
        async fn get_programs(&self) -> Result<Vec<Program>> {
            Ok(vec![
                Named::new(ProgramId::new("P-other").unwrap(), "Malaria"),
                Named::new(ProgramId::new("P-cases").unwrap(), "Cases"),
                Named::new(ProgramId::new("P-dup").unwrap(), "Cases"),
            ])
        }

        async fn get_program_stages(&self) -> Result<Vec<ProgramStage>> {
            Ok(["Clinical", "Lab Request", "Lab Results", "Symptoms"]
                .iter()
                .map(|name| {
                    let id = format!("PS-{}", name.replace(' ', "-"));
                    Named::new(ProgramStageId::new(id).unwrap(), *name)
                })
                .collect())
        }

        async fn get_data_elements(&self) -> Result<Vec<DataElement>> {
            Ok(vec![Named::new(
                DataElementId::new("de-test").unwrap(),
                "Lab Test Result",
            )])
        }

        async fn get_tracked_entity_attributes(&self) -> Result<Vec<TrackedEntityAttribute>> {
            Ok(vec![Named::new(AttributeId::new("at-first").unwrap(), "First name")])
        }

        async fn get_organisation_units_from_parent(
            &self,
            root: &OrgUnitId,
        ) -> Result<Vec<OrganisationUnit>> {
            Ok(vec![
                OrganisationUnit::root(root.clone()),
                OrganisationUnit::child(OrgUnitId::new("U2").unwrap(), root.clone()),
            ])
        }

        async fn get_tracked_entity_instances(
            &self,
            org_unit: &OrgUnitId,
            _program: &ProgramId,
        ) -> Result<Vec<TrackedEntity>> {
            Ok(self
                .entities
                .get(org_unit.as_str())
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|id| TrackedEntity::new(TrackedEntityId::new(id).unwrap(), org_unit.clone()))
                .collect())
        }

        async fn get_tracked_entity_events(&self, entity: &TrackedEntityId) -> Result<Vec<Event>> {
            Ok(vec![Event {
                program_stage: ProgramStageId::new("PS-Symptoms").unwrap(),
                data_values: vec![DataValue::new(
                    DataElementId::new("de-fever").unwrap(),
                    entity.as_str(),
                )],
            }])
        }
    }

    struct FakeDestination;

    #[async_trait]
    impl DestinationSystem for FakeDestination {
        async fn get_outbreaks(&self) -> Result<Vec<Outbreak>> {
            Ok(vec![Outbreak {
                id: OutbreakId::new("O1").unwrap(),
                name: "Cholera".to_string(),
                location_ids: vec![OrgUnitId::new("U1").unwrap()],
            }])
        }

        async fn login(&self) -> Result<UserSession> {
            unreachable!("not used while loading")
        }

        async fn activate_outbreak_for_user(&self, _: &str, _: &OutbreakId) -> Result<()> {
            unreachable!("not used while loading")
        }

        async fn create_outbreak_case(&self, _: &OutbreakId, _: &CaseSubmission) -> Result<()> {
            unreachable!("not used while loading")
        }
    }

    fn mapping() -> MappingConfig {
        let mut case_attributes = IndexMap::new();
        case_attributes.insert("firstName".to_string(), "First name".to_string());

        MappingConfig {
            cases_program: "Cases".to_string(),
            root_id: "U1".to_string(),
            max_concurrency: 2,
            program_stages: ProgramStagesConfig {
                clinical_examination: "Clinical".to_string(),
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

    fn loader(mapping: MappingConfig) -> ResourceLoader {
        let mut entities = HashMap::new();
        entities.insert("U1".to_string(), vec!["t1", "t2"]);
        entities.insert("U2".to_string(), vec!["t2", "t3"]);

        ResourceLoader::new(
            Arc::new(FakeSource { entities }),
            Arc::new(FakeDestination),
            mapping,
        )
    }

    #[tokio::test]
    async fn test_load_resolves_names_to_ids() {
        let (resolved, reference) = loader(mapping()).load().await.unwrap();

        // first "Cases" program wins
        assert_eq!(resolved.program.as_str(), "P-cases");
        assert_eq!(resolved.stages.lab_request.as_str(), "PS-Lab-Request");
        assert_eq!(resolved.stages.symptoms.as_str(), "PS-Symptoms");
        assert_eq!(resolved.root.as_str(), "U1");
        assert_eq!(
            resolved.confirmed_conditions,
            vec![(DataElementId::new("de-test").unwrap(), "Positive".to_string())]
        );
        assert_eq!(resolved.person_fields[0].0, "firstName");
        assert_eq!(resolved.person_fields[0].1.as_str(), "at-first");

        assert_eq!(reference.org_units.len(), 2);
        assert_eq!(reference.outbreaks.len(), 1);
        assert_eq!(reference.data_elements.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_stage_name_is_resolution_error() {
        let mut mapping = mapping();
        mapping.program_stages.lab_results = "Lab Outcome".to_string();

        let err = loader(mapping).load().await.unwrap_err();
        assert!(matches!(
            err,
            BridgeError::ConfigResolution { kind: "program stage", ref name }
                if name == "Lab Outcome"
        ));
    }

    #[tokio::test]
    async fn test_unknown_condition_element_is_resolution_error() {
        let mut mapping = mapping();
        mapping.confirmed_test[0].element = "Lab Test".to_string();

        let err = loader(mapping).load().await.unwrap_err();
        assert!(matches!(
            err,
            BridgeError::ConfigResolution { kind: "data element", .. }
        ));
    }

    #[tokio::test]
    async fn test_load_tracked_entities_dedupes_and_attaches_events() {
        let loader = loader(mapping());
        let (resolved, reference) = loader.load().await.unwrap();

        let entities = loader
            .load_tracked_entities(&resolved, &reference.org_units)
            .await
            .unwrap();

        let ids: Vec<_> = entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);

        // t2 is kept from U1, where it was seen first
        assert_eq!(entities[1].org_unit.as_str(), "U1");
        assert!(entities.iter().all(|e| e.events.len() == 1));
        assert_eq!(entities[2].events[0].data_values[0].value, "t3");
    }
}
