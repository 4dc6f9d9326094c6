//! The full set of views handed to output consumers.

use crate::aggregate::{
    CategoryHistogram, CooccurrencePair, DailyHistogram, KeyMetrics, TopicMention, category_histogram,
    cooccurrence, daily_histogram, key_metrics, timeline, topic_mentions,
};
use crate::keywords::MatchMode;
use crate::models::AnnotatedRecord;
use crate::session::{CategoryFilter, Snapshot};
use crate::topics::Topic;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A timeline row: the annotated record plus its derived topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    #[serde(flatten)]
    pub record: AnnotatedRecord,
    pub topics: Vec<Topic>,
}

/// Every aggregate view of one session revision.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub revision: u64,
    pub match_mode: MatchMode,
    pub filter: CategoryFilter,
    pub metrics: KeyMetrics,
    pub categories: CategoryHistogram,
    pub daily: DailyHistogram,
    pub topic_mentions: Vec<TopicMention>,
    pub cooccurrence: Vec<CooccurrencePair>,
    pub timeline: Vec<TimelineEntry>,
}

impl Dashboard {
    /// Recompute every view from the snapshot. Nothing is cached between revisions.
    #[instrument(level = "info", skip_all, fields(revision = snapshot.revision()))]
    pub fn build(snapshot: &Snapshot) -> Dashboard {
        let records = snapshot.records();
        let mode = snapshot.mode();

        let categories = category_histogram(records);
        let metrics = key_metrics(records, &categories);
        let daily = daily_histogram(records);
        let topic_pairs = cooccurrence(records, mode);
        if topic_pairs.is_empty() {
            debug!("No titles mention more than one topic");
        }
        let topic_mentions = topic_mentions(records, mode);
        let timeline: Vec<TimelineEntry> = timeline(records, &snapshot.filter())
            .into_iter()
            .map(|r| TimelineEntry {
                record: r.clone(),
                topics: r.topics(mode).into_iter().collect(),
            })
            .collect();

        info!(
            records = records.len(),
            categories = categories.len(),
            days = daily.len(),
            undated = daily.undated(),
            pairs = topic_pairs.len(),
            timeline = timeline.len(),
            "Dashboard built"
        );

        Dashboard {
            generated_at: Utc::now(),
            revision: snapshot.revision(),
            match_mode: mode,
            filter: snapshot.filter(),
            metrics,
            categories,
            daily,
            topic_mentions,
            cooccurrence: topic_pairs.pairs(),
            timeline,
        }
    }
}
