//! Core business logic for Casebridge.
//!
//! # Modules
//!
//! - [`resources`] - Reference data loading and name resolution
//! - [`transform`] - Outbreak assignment, event enrichment and classification
//! - [`copy`] - Run coordination, case submission and reporting
//!
//! # Copy Workflow
//!
//! 1. **Resolve**: Fetch DHIS2 metadata and Go.Data outbreaks, resolve configured names to ids
//! 2. **Load**: Fetch tracked entities below the root organisation unit, then their events
//! 3. **Assign**: Map each entity's organisation unit to an outbreak
//! 4. **Enrich**: Attach the four stages' data values with display names
//! 5. **Classify**: Derive lab result and case classification
//! 6. **Send**: Activate each outbreak and create its cases in Go.Data
//! 7. **Report**: Log a copy summary
//!
//! # Example
//!
//! ```rust,no_run
//! use casebridge::config::load_config;
//! use casebridge::core::copy::CopyCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("casebridge.toml")?;
//!
//! let coordinator = CopyCoordinator::new(config, false)?;
//! let summary = coordinator.run().await?;
//!
//! println!("Entities: {}", summary.total_entities);
//! println!("Sent: {}", summary.cases_sent);
//! # Ok(())
//! # }
//! ```

pub mod copy;
pub mod resources;
pub mod transform;
