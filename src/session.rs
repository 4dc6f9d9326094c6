//! Session state as immutable revisions.
//!
//! A session owns two pieces of state: the current record set and the
//! category filter for the chronological list. Neither is mutated in place.
//! Every external event (fetch completion, fetch failure, filter change)
//! produces a new [`SessionState`] value with a bumped revision number.
//!
//! ```text
//! Loading ──loaded──▶ Ready(rev 1) ──with_filter──▶ Ready(rev 2) ──▶ …
//!    └─────failed──▶ Failed(message)
//! ```

use crate::classify::{Category, UnknownCategory};
use crate::keywords::MatchMode;
use crate::models::{AnnotatedRecord, RawRecord, annotate_all};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Which records the chronological list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn admits(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    /// `"all"` (any case) or anything [`Category::from_str`] accepts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(category) => category.name().to_string(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All Categories"),
            CategoryFilter::Only(category) => f.write_str(category.label()),
        }
    }
}

/// One revision of a loaded session.
#[derive(Debug, Clone)]
pub struct Snapshot {
    revision: u64,
    records: Arc<[AnnotatedRecord]>,
    filter: CategoryFilter,
    mode: MatchMode,
}

impl Snapshot {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn records(&self) -> &[AnnotatedRecord] {
        &self.records
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// Matching mode the records were annotated with.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

/// The session's top-level state.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Feed not yet retrieved.
    #[default]
    Loading,
    /// Retrieval failed; holds the error message verbatim.
    Failed(String),
    /// Records are available.
    Ready(Snapshot),
}

impl SessionState {
    pub fn revision(&self) -> u64 {
        match self {
            SessionState::Ready(snapshot) => snapshot.revision,
            _ => 0,
        }
    }

    /// Transition after a successful fetch and parse.
    ///
    /// Replaces the record set wholesale. An existing filter is carried over.
    pub fn loaded(&self, records: Vec<RawRecord>, mode: MatchMode) -> SessionState {
        let filter = match self {
            SessionState::Ready(snapshot) => snapshot.filter,
            _ => CategoryFilter::All,
        };
        let records: Arc<[AnnotatedRecord]> = annotate_all(records, mode).into();
        let revision = self.revision() + 1;
        info!(revision, records = records.len(), %mode, "Session loaded");
        SessionState::Ready(Snapshot { revision, records, filter, mode })
    }

    /// Transition after a failed fetch. No partial data survives.
    pub fn failed(&self, error: &dyn std::error::Error) -> SessionState {
        let message = error.to_string();
        warn!(error = %message, "Session failed");
        SessionState::Failed(message)
    }

    /// Transition on a filter change. Only a ready session changes.
    pub fn with_filter(&self, filter: CategoryFilter) -> SessionState {
        match self {
            SessionState::Ready(snapshot) => SessionState::Ready(Snapshot {
                revision: snapshot.revision + 1,
                records: Arc::clone(&snapshot.records),
                filter,
                mode: snapshot.mode,
            }),
            other => other.clone(),
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            SessionState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FetchError;
    use crate::models::Published;

    fn raw(id: &str, title: &str) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            title: title.to_string(),
            published: Published::parse("2025-01-10"),
            url: "http://a".to_string(),
        }
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!("ALL".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Chemicals".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Chemicals))
        );
        assert!("nope".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_filter_serde_round_trip_as_string() {
        let json = serde_json::to_string(&CategoryFilter::Only(Category::EnergyGas)).unwrap();
        assert_eq!(json, "\"EnergyGas\"");
        let back: CategoryFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CategoryFilter::Only(Category::EnergyGas));
    }

    #[test]
    fn test_loaded_annotates_and_bumps_revision() {
        let state = SessionState::default();
        assert_eq!(state.revision(), 0);

        let ready = state.loaded(vec![raw("1", "Gas deal"), raw("2", "Solar farm")], MatchMode::Substring);
        let snapshot = ready.snapshot().unwrap();
        assert_eq!(snapshot.revision(), 1);
        assert_eq!(snapshot.records().len(), 2);
        assert_eq!(snapshot.records()[0].category, Category::EnergyGas);
        assert_eq!(snapshot.filter(), CategoryFilter::All);
    }

    #[test]
    fn test_with_filter_leaves_previous_revision_untouched() {
        let ready = SessionState::Loading.loaded(vec![raw("1", "Gas deal")], MatchMode::Substring);
        let filtered = ready.with_filter(CategoryFilter::Only(Category::Financial));

        assert_eq!(ready.snapshot().unwrap().filter(), CategoryFilter::All);
        assert_eq!(ready.revision(), 1);
        assert_eq!(
            filtered.snapshot().unwrap().filter(),
            CategoryFilter::Only(Category::Financial)
        );
        assert_eq!(filtered.revision(), 2);
        assert_eq!(filtered.snapshot().unwrap().records(), ready.snapshot().unwrap().records());
    }

    #[test]
    fn test_failed_keeps_message_verbatim_and_drops_data() {
        let err = FetchError::Status { url: "http://feed".to_string(), status: 503 };
        let state = SessionState::Loading.failed(&err);
        match &state {
            SessionState::Failed(message) => assert_eq!(message, "failed to fetch http://feed: HTTP 503"),
            other => panic!("unexpected state {other:?}"),
        }
        assert!(state.snapshot().is_none());
        assert!(matches!(state.with_filter(CategoryFilter::All), SessionState::Failed(_)));
    }

    #[test]
    fn test_reload_keeps_filter() {
        let ready = SessionState::Loading
            .loaded(vec![raw("1", "Gas deal")], MatchMode::Substring)
            .with_filter(CategoryFilter::Only(Category::EnergyGas));
        let reloaded = ready.loaded(vec![raw("2", "Polymer")], MatchMode::Substring);
        let snapshot = reloaded.snapshot().unwrap();
        assert_eq!(snapshot.revision(), 3);
        assert_eq!(snapshot.filter(), CategoryFilter::Only(Category::EnergyGas));
        assert_eq!(snapshot.records()[0].record.id, "2");
    }
}
