//! Source and destination system traits
//!
//! The pipeline only talks to DHIS2 and Go.Data through these traits, which
//! keeps the HTTP clients swappable for in-memory doubles in tests.

use crate::domain::ids::{OrgUnitId, OutbreakId, ProgramId, TrackedEntityId};
use crate::domain::{
    CaseSubmission, DataElement, Event, OrganisationUnit, Outbreak, Program, ProgramStage, Result,
    TrackedEntity, TrackedEntityAttribute,
};
use async_trait::async_trait;

/// Read-only view of the DHIS2 tracker
#[async_trait]
pub trait SourceSystem: Send + Sync {
    /// All programs
    async fn get_programs(&self) -> Result<Vec<Program>>;

    /// All program stages
    async fn get_program_stages(&self) -> Result<Vec<ProgramStage>>;

    /// The data element catalog
    async fn get_data_elements(&self) -> Result<Vec<DataElement>>;

    /// All tracked entity attributes
    async fn get_tracked_entity_attributes(&self) -> Result<Vec<TrackedEntityAttribute>>;

    /// The organisation unit `root` and all of its descendants
    async fn get_organisation_units_from_parent(
        &self,
        root: &OrgUnitId,
    ) -> Result<Vec<OrganisationUnit>>;

    /// Tracked entities enrolled in `program` at `org_unit`
    ///
    /// The returned entities have no events attached.
    async fn get_tracked_entity_instances(
        &self,
        org_unit: &OrgUnitId,
        program: &ProgramId,
    ) -> Result<Vec<TrackedEntity>>;

    /// Event history of one tracked entity
    async fn get_tracked_entity_events(&self, entity: &TrackedEntityId) -> Result<Vec<Event>>;
}

/// Authenticated Go.Data user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    /// Go.Data user id
    pub user_id: String,
}

/// Write access to Go.Data
#[async_trait]
pub trait DestinationSystem: Send + Sync {
    /// All outbreaks visible to the configured user
    async fn get_outbreaks(&self) -> Result<Vec<Outbreak>>;

    /// Authenticate and return the user session
    async fn login(&self) -> Result<UserSession>;

    /// Make `outbreak` the active outbreak of `user_id`
    async fn activate_outbreak_for_user(&self, user_id: &str, outbreak: &OutbreakId)
        -> Result<()>;

    /// Create one case in `outbreak`
    async fn create_outbreak_case(
        &self,
        outbreak: &OutbreakId,
        case: &CaseSubmission,
    ) -> Result<()>;
}
