//! Copy coordinator - runs the whole DHIS2 to Go.Data copy
//!
//! load resources -> load entities -> assign -> enrich -> classify -> send
//!
//! Every step returns on its first error, so a failed run creates no further
//! cases after the failure.

use crate::adapters::traits::{DestinationSystem, SourceSystem};
use crate::adapters::{Dhis2Client, GoDataClient};
use crate::config::{BridgeConfig, MappingConfig};
use crate::core::copy::sender::CaseSender;
use crate::core::copy::summary::CopySummary;
use crate::core::resources::ResourceLoader;
use crate::core::transform::{CasePipeline, EventEnricher, LabClassifier, OutbreakAssigner};
use crate::domain::Result;
use std::sync::Arc;
use std::time::Instant;

/// Copy coordinator
pub struct CopyCoordinator {
    source: Arc<dyn SourceSystem>,
    destination: Arc<dyn DestinationSystem>,
    mapping: MappingConfig,
    dry_run: bool,
}

impl CopyCoordinator {
    /// Create a coordinator talking to the configured DHIS2 and Go.Data
    ///
    /// `dry_run` is combined with `application.dry_run`; either one skips
    /// sending.
    pub fn new(config: BridgeConfig, dry_run: bool) -> Result<Self> {
        let source = Arc::new(Dhis2Client::new(config.dhis2)?);
        let destination = Arc::new(GoDataClient::new(config.godata)?);

        Ok(Self::with_systems(
            source,
            destination,
            config.mapping,
            dry_run || config.application.dry_run,
        ))
    }

    /// Create a coordinator over arbitrary source and destination systems
    pub fn with_systems(
        source: Arc<dyn SourceSystem>,
        destination: Arc<dyn DestinationSystem>,
        mapping: MappingConfig,
        dry_run: bool,
    ) -> Self {
        Self {
            source,
            destination,
            mapping,
            dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute the copy
    pub async fn run(&self) -> Result<CopySummary> {
        let start_time = Instant::now();
        let mut summary = CopySummary::new(self.dry_run);

        let loader = ResourceLoader::new(
            self.source.clone(),
            self.destination.clone(),
            self.mapping.clone(),
        );
        let (resolved, reference) = loader.load().await?;

        crate::log_copy_start!(&resolved.root, self.dry_run);

        let entities = loader
            .load_tracked_entities(&resolved, &reference.org_units)
            .await?;
        summary.total_entities = entities.len();

        let pipeline = CasePipeline::new(
            OutbreakAssigner::new(&reference.outbreaks, &reference.org_units),
            EventEnricher::new(&reference.data_elements, resolved.stages.clone()),
            LabClassifier::new(resolved.confirmed_conditions.clone()),
        );

        let cases = pipeline.process_all(entities)?;
        for case in &cases {
            summary.record(case);
        }

        tracing::info!(
            cases = cases.len(),
            outbreaks = summary.by_outbreak.len(),
            "Cases classified"
        );

        if self.dry_run {
            tracing::info!("Dry run enabled, skipping Go.Data submission");
        } else {
            let sender = CaseSender::new(
                self.destination.clone(),
                resolved.person_fields.clone(),
                resolved.max_concurrency,
            );
            summary.cases_sent = sender.send(cases).await?;
        }

        let summary = summary.with_duration(start_time.elapsed());
        crate::log_copy_complete!(summary.cases_sent, summary.duration);

        Ok(summary)
    }
}
