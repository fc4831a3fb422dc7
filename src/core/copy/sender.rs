//! Case submission to Go.Data
//!
//! Go.Data files new cases under the user's active outbreak, so cases are
//! sent one outbreak at a time: the outbreak is activated first and only then
//! are its cases created. Groups go out in the order their outbreak first
//! appears in the case list.

use crate::adapters::traits::DestinationSystem;
use crate::domain::ids::{AttributeId, OutbreakId};
use crate::domain::{ClassifiedCase, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use indexmap::IndexMap;
use std::sync::Arc;

/// Group cases by outbreak, keeping first-seen order for groups and cases
pub fn group_by_outbreak(cases: Vec<ClassifiedCase>) -> IndexMap<OutbreakId, Vec<ClassifiedCase>> {
    let mut groups: IndexMap<OutbreakId, Vec<ClassifiedCase>> = IndexMap::new();
    for case in cases {
        groups.entry(case.outbreak.clone()).or_default().push(case);
    }
    groups
}

/// Sends classified cases to a destination system
pub struct CaseSender {
    destination: Arc<dyn DestinationSystem>,
    person_fields: Vec<(String, AttributeId)>,
    max_concurrency: usize,
}

impl CaseSender {
    pub fn new(
        destination: Arc<dyn DestinationSystem>,
        person_fields: Vec<(String, AttributeId)>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            destination,
            person_fields,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Send every case, returning how many were created
    ///
    /// Logs in once. Within a group, case creation runs concurrently and
    /// starts only after the outbreak activation has completed. The first
    /// failure stops the run.
    pub async fn send(&self, cases: Vec<ClassifiedCase>) -> Result<usize> {
        if cases.is_empty() {
            tracing::info!("No cases to send");
            return Ok(0);
        }

        let groups = group_by_outbreak(cases);
        let session = self.destination.login().await?;
        let total_groups = groups.len();
        let mut sent = 0;

        for (index, (outbreak, cases)) in groups.into_iter().enumerate() {
            crate::log_group_progress!(&outbreak, index + 1, total_groups, cases.len());

            self.destination
                .activate_outbreak_for_user(&session.user_id, &outbreak)
                .await?;

            let count = cases.len();
            let destination = &self.destination;
            let outbreak = &outbreak;

            stream::iter(cases)
                .map(|case| {
                    let submission = case.into_submission(&self.person_fields);
                    async move { destination.create_outbreak_case(outbreak, &submission).await }
                })
                .buffer_unordered(self.max_concurrency)
                .try_collect::<Vec<()>>()
                .await?;

            tracing::debug!(outbreak = %outbreak, cases = count, "Outbreak group sent");
            sent += count;
        }

        Ok(sent)
    }
}
