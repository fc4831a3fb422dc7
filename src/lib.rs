// Casebridge - DHIS2 to Go.Data case copy
// Copyright (c) 2025 Casebridge Contributors
// Licensed under the MIT License

//! # Casebridge - DHIS2 to Go.Data case copy
//!
//! Casebridge copies case records tracked in a DHIS2 tracker program into
//! Go.Data as outbreak cases. It is a one-shot, one-directional batch copy.
//!
//! ## Overview
//!
//! For every tracked entity below a root organisation unit, Casebridge:
//! - **Assigns** an outbreak by walking up the organisation unit tree
//! - **Enriches** the entity with the data values of four program stages
//! - **Classifies** the case (lab result and case classification)
//! - **Sends** it to Go.Data, grouped by outbreak
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Resource loading, transformation pipeline and run coordination
//! - [`adapters`] - DHIS2 and Go.Data HTTP clients behind traits
//! - [`domain`] - Identifiers, records and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use casebridge::config::load_config;
//! use casebridge::core::copy::CopyCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("casebridge.toml")?;
//!
//!     let coordinator = CopyCoordinator::new(config, false)?;
//!     let summary = coordinator.run().await?;
//!
//!     println!("Sent {} cases", summary.cases_sent);
//!     Ok(())
//! }
//! ```
//!
//! ## Classification
//!
//! The first matching rule wins:
//!
//! | Condition | Classification |
//! |-----------|----------------|
//! | lab result POSITIVE | `CONFIRMED` |
//! | lab result NEGATIVE with lab result data | `NOT_A_CASE_DISCARDED` |
//! | lab request data present | `PROBABLE` |
//! | otherwise | `SUSPECT` |
//!
//! ```rust
//! use casebridge::core::transform::add_case_classification;
//! use casebridge::domain::{CaseClassification, StageData};
//!
//! let stages = StageData::default();
//! assert_eq!(add_case_classification(None, &stages), CaseClassification::Suspect);
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error is
//! [`domain::BridgeError`]. Any error aborts the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
