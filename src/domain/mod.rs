//! Domain models and types for Casebridge.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrgUnitId`], [`OutbreakId`], [`DataElementId`], ...)
//! - **Reference data** ([`OrganisationUnit`], [`Outbreak`], [`Named`] metadata records)
//! - **Tracked entities** ([`TrackedEntity`], [`Event`], [`DataValue`])
//! - **Pipeline records** ([`AssignedEntity`], [`EnrichedEntity`], [`ClassifiedCase`])
//! - **Error types** ([`BridgeError`], [`LookupError`], [`Dhis2Error`], [`GoDataError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes so a data element id can't be passed where a
//! program stage id is expected:
//!
//! ```rust
//! use casebridge::domain::{DataElementId, ProgramStageId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let element = DataElementId::new("f3Jjs7bSTeT")?;
//! let stage = ProgramStageId::new("ZzYYXq4fJie")?;
//!
//! // let wrong: ProgramStageId = element;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod case;
pub mod errors;
pub mod ids;
pub mod metadata;
pub mod result;
pub mod tracked_entity;

// Re-export commonly used types for convenience
pub use case::{
    AssignedEntity, CaseClassification, CaseSubmission, ClassifiedCase, EnrichedDataValue,
    EnrichedEntity, LabResult, StageData, StageRole,
};
pub use errors::{BridgeError, Dhis2Error, GoDataError, LookupError};
pub use ids::{
    AttributeId, DataElementId, OrgUnitId, OutbreakId, ProgramId, ProgramStageId,
    TrackedEntityId,
};
pub use metadata::{
    DataElement, Named, OrganisationUnit, Outbreak, Program, ProgramStage,
    TrackedEntityAttribute,
};
pub use result::Result;
pub use tracked_entity::{AttributeValue, DataValue, Event, TrackedEntity};
