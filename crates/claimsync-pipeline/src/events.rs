//! Run events and the process-scoped collector backing end-of-run reporting.
//!
//! Every stage appends [`Event`] records to one [`EventCollector`] for the
//! duration of a run. The collector never fails and never drops events
//! except through [`EventCollector::clear`].

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use claimsync_core::{ActiveUserEntry, EventId, RegisteredUserEntry, RegistryId, UserEntry};

/// Category of a collected event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    /// Directory record lacks data the pipeline needs (no auth email).
    MissingDirectoryData,
    /// A registry claim exists under a mismatched identity.
    BadOrcidClaims,
    /// A claimed-user lookup found nothing in the registry.
    MissingRegistryData,
    /// Account creation collided with an existing platform account.
    DuplicateUserRecords,
    /// Authorization failure while creating the platform account.
    InsufficientPermissions,
    /// Generic platform failure after the creation retry budget ran out.
    PlatformError,
    /// Person has registered but not completed their claim.
    UnclaimedRecords,
    /// Platform account was created for a claimed person.
    AccountCreated,
}

impl EventCategory {
    /// Whether events of this category count as errors in the report.
    ///
    /// `AccountCreated` is the informational success category; everything
    /// else is an anomaly an operator may act on.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, EventCategory::AccountCreated)
    }

    /// Recommended operator action for this category, if one exists.
    #[must_use]
    pub fn default_action(&self) -> Option<&'static str> {
        match self {
            EventCategory::MissingDirectoryData => Some("fix directory record"),
            EventCategory::BadOrcidClaims => Some("resolve claim identity mismatch"),
            EventCategory::MissingRegistryData => Some("verify registry record"),
            EventCategory::DuplicateUserRecords => Some("merge duplicate accounts"),
            EventCategory::InsufficientPermissions => Some("check service account permissions"),
            EventCategory::PlatformError => Some("contact platform support"),
            EventCategory::UnclaimedRecords => Some("prompt user to complete claim"),
            EventCategory::AccountCreated => None,
        }
    }
}

impl Display for EventCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventCategory::MissingDirectoryData => "MISSING_DIRECTORY_DATA",
            EventCategory::BadOrcidClaims => "BAD_ORCID_CLAIMS",
            EventCategory::MissingRegistryData => "MISSING_REGISTRY_DATA",
            EventCategory::DuplicateUserRecords => "DUPLICATE_USER_RECORDS",
            EventCategory::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            EventCategory::PlatformError => "PLATFORM_ERROR",
            EventCategory::UnclaimedRecords => "UNCLAIMED_RECORDS",
            EventCategory::AccountCreated => "ACCOUNT_CREATED",
        };
        write!(f, "{name}")
    }
}

/// Snapshot of the user context an event was raised for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUser {
    /// Primary email from the directory.
    pub email: String,
    /// Display name, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// Site identifier, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub adcid: Option<i32>,
    /// Registry identifier, once matched.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub registry_id: Option<RegistryId>,
    /// Authentication email, when the directory supplied one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auth_email: Option<String>,
}

impl From<&UserEntry> for EventUser {
    fn from(entry: &UserEntry) -> Self {
        Self {
            email: entry.email.clone(),
            name: Some(entry.full_name()),
            adcid: Some(entry.adcid.value()),
            registry_id: None,
            auth_email: None,
        }
    }
}

impl From<&ActiveUserEntry> for EventUser {
    fn from(active: &ActiveUserEntry) -> Self {
        let mut user = EventUser::from(&active.entry);
        user.auth_email = active.auth_email().map(str::to_string);
        user
    }
}

impl From<&RegisteredUserEntry> for EventUser {
    fn from(registered: &RegisteredUserEntry) -> Self {
        let mut user = EventUser::from(&registered.active);
        user.registry_id = Some(registered.registry_id.clone());
        user
    }
}

/// One success or failure recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub event_id: EventId,
    /// When the event was raised.
    pub timestamp: DateTime<Utc>,
    /// Taxonomy category.
    pub category: EventCategory,
    /// User context the event applies to.
    pub user: EventUser,
    /// Human-readable description.
    pub message: String,
    /// Recommended operator action, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub action_needed: Option<String>,
}

impl Event {
    /// Creates an event with the category's default recommended action.
    pub fn new(category: EventCategory, user: EventUser, message: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            timestamp: Utc::now(),
            category,
            user,
            message: message.into(),
            action_needed: category.default_action().map(str::to_string),
        }
    }

    /// Overrides the recommended action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action_needed = Some(action.into());
        self
    }

    /// Whether this event counts as an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category.is_error()
    }
}

/// Process-scoped accumulator of run events.
///
/// Interior mutability lets every stage append through a shared reference;
/// execution is single-threaded per run, the lock only satisfies `Sync`.
/// Collection never fails; a poisoned lock degrades to dropping the write.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: RwLock<Vec<Event>>,
}

impl EventCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn collect(&self, event: Event) {
        if let Ok(mut events) = self.events.write() {
            events.push(event);
        }
    }

    /// Total number of collected events, successes included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of error events.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.events
            .read()
            .map(|e| e.iter().filter(|ev| ev.is_error()).count())
            .unwrap_or(0)
    }

    /// Whether any error event was collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Defensive copy of all error events, in collection order.
    #[must_use]
    pub fn get_errors(&self) -> Vec<Event> {
        self.events
            .read()
            .map(|e| e.iter().filter(|ev| ev.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    /// Error events grouped by category.
    #[must_use]
    pub fn get_errors_by_category(&self) -> HashMap<EventCategory, Vec<Event>> {
        let mut grouped: HashMap<EventCategory, Vec<Event>> = HashMap::new();
        for event in self.get_errors() {
            grouped.entry(event.category).or_default().push(event);
        }
        grouped
    }

    /// Events of one category, in collection order.
    #[must_use]
    pub fn get_events_for_category(&self, category: EventCategory) -> Vec<Event> {
        self.events
            .read()
            .map(|e| {
                e.iter()
                    .filter(|ev| ev.category == category)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Event counts per category, successes included.
    #[must_use]
    pub fn count_by_category(&self) -> HashMap<EventCategory, usize> {
        let mut counts: HashMap<EventCategory, usize> = HashMap::new();
        if let Ok(events) = self.events.read() {
            for event in events.iter() {
                *counts.entry(event.category).or_insert(0) += 1;
            }
        }
        counts
    }

    /// De-duplicated, ordered set of user emails across all events.
    #[must_use]
    pub fn get_affected_users(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .events
            .read()
            .map(|e| e.iter().map(|ev| ev.user.email.clone()).collect())
            .unwrap_or_default();
        set.into_iter().collect()
    }

    /// Defensive copy of every collected event, in collection order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }

    /// Resets the collector to empty.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> EventUser {
        EventUser {
            email: email.to_string(),
            name: None,
            adcid: None,
            registry_id: None,
            auth_email: None,
        }
    }

    #[test]
    fn test_category_error_classification() {
        assert!(EventCategory::PlatformError.is_error());
        assert!(EventCategory::UnclaimedRecords.is_error());
        assert!(!EventCategory::AccountCreated.is_error());
    }

    #[test]
    fn test_category_display_names() {
        assert_eq!(
            EventCategory::BadOrcidClaims.to_string(),
            "BAD_ORCID_CLAIMS"
        );
        assert_eq!(
            EventCategory::MissingDirectoryData.to_string(),
            "MISSING_DIRECTORY_DATA"
        );
    }

    #[test]
    fn test_category_serde_matches_display() {
        let json = serde_json::to_string(&EventCategory::InsufficientPermissions).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_PERMISSIONS\"");
    }

    #[test]
    fn test_event_gets_default_action() {
        let event = Event::new(
            EventCategory::UnclaimedRecords,
            user("a@x.com"),
            "registered 12 days ago",
        );
        assert_eq!(
            event.action_needed.as_deref(),
            Some("prompt user to complete claim")
        );

        let event = Event::new(EventCategory::AccountCreated, user("a@x.com"), "created");
        assert!(event.action_needed.is_none());
    }

    #[test]
    fn test_collector_error_count_excludes_successes() {
        let collector = EventCollector::new();
        collector.collect(Event::new(
            EventCategory::AccountCreated,
            user("a@x.com"),
            "created",
        ));
        collector.collect(Event::new(
            EventCategory::PlatformError,
            user("b@x.com"),
            "failed",
        ));

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.error_count(), 1);
        assert!(collector.has_errors());
        assert_eq!(collector.get_errors().len(), 1);
        assert_eq!(collector.get_errors()[0].user.email, "b@x.com");
    }

    #[test]
    fn test_collector_grouping_and_counts() {
        let collector = EventCollector::new();
        collector.collect(Event::new(
            EventCategory::UnclaimedRecords,
            user("a@x.com"),
            "m1",
        ));
        collector.collect(Event::new(
            EventCategory::UnclaimedRecords,
            user("b@x.com"),
            "m2",
        ));
        collector.collect(Event::new(
            EventCategory::PlatformError,
            user("c@x.com"),
            "m3",
        ));

        let counts = collector.count_by_category();
        assert_eq!(counts.get(&EventCategory::UnclaimedRecords), Some(&2));
        assert_eq!(counts.get(&EventCategory::PlatformError), Some(&1));

        let grouped = collector.get_errors_by_category();
        assert_eq!(grouped[&EventCategory::UnclaimedRecords].len(), 2);

        let unclaimed = collector.get_events_for_category(EventCategory::UnclaimedRecords);
        assert_eq!(unclaimed[0].message, "m1");
        assert_eq!(unclaimed[1].message, "m2");
    }

    #[test]
    fn test_affected_users_deduplicated_and_ordered() {
        let collector = EventCollector::new();
        collector.collect(Event::new(
            EventCategory::PlatformError,
            user("b@x.com"),
            "m",
        ));
        collector.collect(Event::new(
            EventCategory::UnclaimedRecords,
            user("a@x.com"),
            "m",
        ));
        collector.collect(Event::new(
            EventCategory::PlatformError,
            user("b@x.com"),
            "m",
        ));

        assert_eq!(collector.get_affected_users(), vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_clear_resets() {
        let collector = EventCollector::new();
        collector.collect(Event::new(
            EventCategory::PlatformError,
            user("a@x.com"),
            "m",
        ));
        collector.clear();
        assert!(collector.is_empty());
        assert!(!collector.has_errors());
    }
}
