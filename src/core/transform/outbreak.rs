//! Outbreak assignment
//!
//! Resolves a tracked entity's organisation unit to a Go.Data outbreak by
//! walking up the organisation unit tree until an ancestor is the first
//! location of some outbreak.
//!
//! The walk is iterative and remembers every unit it visits, so a malformed
//! hierarchy with a parent cycle ends in [`LookupError::Cycle`] instead of
//! looping forever.

use crate::domain::ids::{OrgUnitId, OutbreakId};
use crate::domain::{
    AssignedEntity, LookupError, OrganisationUnit, Outbreak, Result, TrackedEntity,
};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Assigns outbreaks to tracked entities
///
/// Built once per run from the outbreak list and the organisation unit tree,
/// then only read.
///
/// # Example
///
/// ```
/// use casebridge::core::transform::OutbreakAssigner;
/// use casebridge::domain::{OrgUnitId, OrganisationUnit, Outbreak, OutbreakId};
///
/// let u1 = OrgUnitId::new("U1").unwrap();
/// let u2 = OrgUnitId::new("U2").unwrap();
/// let units = vec![
///     OrganisationUnit::root(u1.clone()),
///     OrganisationUnit::child(u2.clone(), u1.clone()),
/// ];
/// let outbreaks = vec![Outbreak {
///     id: OutbreakId::new("O1").unwrap(),
///     name: "Measles".to_string(),
///     location_ids: vec![u1],
/// }];
///
/// let assigner = OutbreakAssigner::new(&outbreaks, &units);
/// assert_eq!(assigner.resolve(&u2).unwrap().as_str(), "O1");
/// ```
#[derive(Debug, Clone)]
pub struct OutbreakAssigner {
    /// First location id -> outbreaks listing it first, in input order
    by_location: IndexMap<OrgUnitId, Vec<OutbreakId>>,

    /// Organisation unit id -> parent id
    parents: HashMap<OrgUnitId, Option<OrgUnitId>>,
}

impl OutbreakAssigner {
    /// Index outbreaks by their first location and units by id
    ///
    /// Outbreaks without any location can never be matched and are skipped.
    /// When an organisation unit appears more than once, the first entry wins.
    pub fn new(outbreaks: &[Outbreak], organisation_units: &[OrganisationUnit]) -> Self {
        let mut by_location: IndexMap<OrgUnitId, Vec<OutbreakId>> = IndexMap::new();
        for outbreak in outbreaks {
            match outbreak.primary_location() {
                Some(location) => by_location
                    .entry(location.clone())
                    .or_default()
                    .push(outbreak.id.clone()),
                None => tracing::debug!(
                    outbreak = %outbreak.id,
                    "Outbreak has no locations, it will never be assigned"
                ),
            }
        }

        let mut parents = HashMap::with_capacity(organisation_units.len());
        for unit in organisation_units {
            parents
                .entry(unit.id.clone())
                .or_insert_with(|| unit.parent_id.clone());
        }

        tracing::debug!(
            outbreak_locations = by_location.len(),
            organisation_units = parents.len(),
            "Outbreak index built"
        );

        Self {
            by_location,
            parents,
        }
    }

    /// Outbreak id for an organisation unit
    ///
    /// Returns the first outbreak indexed at the unit itself, otherwise at its
    /// closest ancestor that has one.
    ///
    /// # Errors
    ///
    /// - [`LookupError::UnknownOrganisationUnit`] if the walk reaches an id
    ///   that isn't in the loaded tree
    /// - [`LookupError::NoOutbreak`] if the walk reaches a root without a match
    /// - [`LookupError::Cycle`] if a unit is visited twice
    pub fn resolve(&self, org_unit: &OrgUnitId) -> std::result::Result<&OutbreakId, LookupError> {
        let mut current = org_unit;
        let mut visited: HashSet<&OrgUnitId> = HashSet::new();

        loop {
            if let Some(outbreak) = self.by_location.get(current).and_then(|b| b.first()) {
                return Ok(outbreak);
            }

            if !visited.insert(current) {
                return Err(LookupError::Cycle {
                    start: org_unit.to_string(),
                    org_unit: current.to_string(),
                });
            }

            let parent = self.parents.get(current).ok_or_else(|| {
                LookupError::UnknownOrganisationUnit {
                    start: org_unit.to_string(),
                    org_unit: current.to_string(),
                }
            })?;

            match parent {
                Some(parent) => current = parent,
                None => {
                    return Err(LookupError::NoOutbreak {
                        start: org_unit.to_string(),
                        root: current.to_string(),
                    })
                }
            }
        }
    }

    /// Attach the resolved outbreak to a tracked entity
    pub fn assign(&self, entity: TrackedEntity) -> Result<AssignedEntity> {
        let outbreak = self.resolve(&entity.org_unit)?.clone();

        tracing::trace!(
            entity = %entity.id,
            org_unit = %entity.org_unit,
            outbreak = %outbreak,
            "Outbreak assigned"
        );

        Ok(AssignedEntity { entity, outbreak })
    }
}
