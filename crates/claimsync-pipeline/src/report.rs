//! End-of-run report generation.
//!
//! Renders the populated [`EventCollector`] into a serializable summary for
//! operators: counts by category, affected users, and the full event list.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{Event, EventCollector};

/// Complete report for one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Total events collected, successes included.
    pub total_events: usize,
    /// Number of error events.
    pub error_count: usize,
    /// Event counts per category name.
    pub counts_by_category: HashMap<String, usize>,
    /// De-duplicated, ordered emails of affected users.
    pub affected_users: Vec<String>,
    /// Every collected event, in collection order.
    pub events: Vec<Event>,
}

impl ReconcileReport {
    /// Builds a report from a run's collector.
    #[must_use]
    pub fn from_collector(collector: &EventCollector) -> Self {
        let counts_by_category = collector
            .count_by_category()
            .into_iter()
            .map(|(category, count)| (category.to_string(), count))
            .collect();

        Self {
            generated_at: Utc::now(),
            total_events: collector.len(),
            error_count: collector.error_count(),
            counts_by_category,
            affected_users: collector.get_affected_users(),
            events: collector.snapshot(),
        }
    }

    /// Whether the run surfaced any anomalies.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the report cannot be encoded.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain text summary, one category per line.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "reconciliation report: {} events, {} errors, {} users affected",
            self.total_events,
            self.error_count,
            self.affected_users.len()
        )];

        let mut categories: Vec<(&String, &usize)> = self.counts_by_category.iter().collect();
        categories.sort();
        for (category, count) in categories {
            lines.push(format!("  {category}: {count}"));
        }
        lines.join("\n")
    }
}
