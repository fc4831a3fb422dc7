//! External system integrations for Casebridge.
//!
//! - [`dhis2`] - DHIS2 tracker (source of cases and reference metadata)
//! - [`godata`] - Go.Data (destination outbreaks and cases)
//!
//! # Design Pattern
//!
//! Adapters isolate HTTP and wire formats behind the [`SourceSystem`] and
//! [`DestinationSystem`] traits. The pipeline only sees domain types, and
//! tests substitute in-memory implementations.
//!
//! ```rust,no_run
//! use casebridge::adapters::{Dhis2Client, GoDataClient, SourceSystem};
//! use casebridge::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("casebridge.toml")?;
//! let source = Dhis2Client::new(config.dhis2)?;
//! let destination = GoDataClient::new(config.godata)?;
//!
//! let stages = source.get_program_stages().await?;
//! # Ok(())
//! # }
//! ```

pub mod dhis2;
pub mod godata;
pub mod retry;
pub mod traits;

pub use dhis2::Dhis2Client;
pub use godata::GoDataClient;
pub use traits::{DestinationSystem, SourceSystem, UserSession};
