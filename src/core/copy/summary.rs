//! Copy run summary and reporting

use crate::domain::ids::OutbreakId;
use crate::domain::{CaseClassification, ClassifiedCase};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary of a copy run
#[derive(Debug, Clone, Default)]
pub struct CopySummary {
    /// Tracked entities loaded from DHIS2
    pub total_entities: usize,

    /// Cases per classification
    pub by_classification: BTreeMap<CaseClassification, usize>,

    /// Cases per outbreak, in first-seen order
    pub by_outbreak: IndexMap<OutbreakId, usize>,

    /// Cases created in Go.Data
    pub cases_sent: usize,

    /// Whether sending was skipped
    pub dry_run: bool,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Duration of the run
    pub duration: Duration,
}

impl CopySummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            started_at: Utc::now(),
            ..Default::default()
        }
    }

    /// Count a classified case
    pub fn record(&mut self, case: &ClassifiedCase) {
        *self.by_classification.entry(case.classification).or_default() += 1;
        *self.by_outbreak.entry(case.outbreak.clone()).or_default() += 1;
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of cases with the given classification
    pub fn count(&self, classification: CaseClassification) -> usize {
        self.by_classification
            .get(&classification)
            .copied()
            .unwrap_or(0)
    }

    /// Cases classified in this run
    pub fn total_cases(&self) -> usize {
        self.by_classification.values().sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_entities = self.total_entities,
            confirmed = self.count(CaseClassification::Confirmed),
            probable = self.count(CaseClassification::Probable),
            suspect = self.count(CaseClassification::Suspect),
            discarded = self.count(CaseClassification::NotACaseDiscarded),
            outbreaks = self.by_outbreak.len(),
            cases_sent = self.cases_sent,
            dry_run = self.dry_run,
            started_at = %self.started_at.to_rfc3339(),
            duration_secs = self.duration.as_secs(),
            "Copy completed"
        );

        for (outbreak, count) in &self.by_outbreak {
            tracing::debug!(outbreak = %outbreak, cases = count, "Outbreak total");
        }

        if self.dry_run {
            tracing::warn!(
                would_send = self.total_cases(),
                "Dry run, no cases were sent to Go.Data"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{OrgUnitId, TrackedEntityId};
    use crate::domain::{StageData, TrackedEntity};

    fn case(outbreak: &str, classification: CaseClassification) -> ClassifiedCase {
        ClassifiedCase {
            entity: TrackedEntity::new(
                TrackedEntityId::new("t1").unwrap(),
                OrgUnitId::new("U1").unwrap(),
            ),
            outbreak: OutbreakId::new(outbreak).unwrap(),
            stages: StageData::default(),
            lab_result: None,
            classification,
        }
    }

    #[test]
    fn test_new_summary_is_empty() {
        let before = Utc::now();
        let summary = CopySummary::new(true);
        assert!(summary.dry_run);
        assert!(summary.started_at >= before);
        assert_eq!(summary.total_cases(), 0);
        assert_eq!(summary.count(CaseClassification::Confirmed), 0);
    }

    #[test]
    fn test_record_counts() {
        let mut summary = CopySummary::new(false);
        summary.record(&case("O2", CaseClassification::Confirmed));
        summary.record(&case("O1", CaseClassification::Suspect));
        summary.record(&case("O2", CaseClassification::Confirmed));

        assert_eq!(summary.total_cases(), 3);
        assert_eq!(summary.count(CaseClassification::Confirmed), 2);
        assert_eq!(summary.count(CaseClassification::Probable), 0);

        let outbreaks: Vec<_> = summary
            .by_outbreak
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(outbreaks, vec![("O2", 2), ("O1", 1)]);
    }

    #[test]
    fn test_with_duration() {
        let summary = CopySummary::new(false).with_duration(Duration::from_secs(3));
        assert_eq!(summary.duration, Duration::from_secs(3));
    }
}
