//! Reducers over the annotated record set.
//!
//! Every view is recomputed from scratch from an immutable slice of
//! [`AnnotatedRecord`]s. The reducers are independent of one another:
//!
//! | View | Function | Order |
//! |------|----------|-------|
//! | Category distribution | [`category_histogram`] | first occurrence |
//! | Daily activity | [`daily_histogram`] | ascending date |
//! | Topic co-occurrence | [`cooccurrence`] | first occurrence of the pair |
//! | Topic mentions | [`topic_mentions`] | vocabulary order |
//! | Headline numbers | [`key_metrics`] | n/a |
//! | Chronological list | [`timeline`] | newest first |

use crate::classify::Category;
use crate::keywords::MatchMode;
use crate::models::AnnotatedRecord;
use crate::session::CategoryFilter;
use crate::topics::Topic;
use chrono::NaiveDate;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Scale factor from a pair count to its bubble size.
pub const BUBBLE_SCALE: usize = 100;

/* -------------------------------------------------------------------------- */
/* Category histogram                                                         */
/* -------------------------------------------------------------------------- */

/// Count of records per category, keyed in first-occurrence order.
///
/// Only categories that occur at least once are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryHistogram(IndexMap<Category, usize>);

impl CategoryHistogram {
    pub fn get(&self, category: Category) -> usize {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.0.iter().map(|(c, n)| (*c, *n))
    }

    /// Number of distinct categories present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all buckets; equals the number of records reduced.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn category_histogram(records: &[AnnotatedRecord]) -> CategoryHistogram {
    let mut counts: IndexMap<Category, usize> = IndexMap::new();
    for record in records {
        *counts.entry(record.category).or_insert(0) += 1;
    }
    debug!(categories = counts.len(), "Built category histogram");
    CategoryHistogram(counts)
}

/* -------------------------------------------------------------------------- */
/* Daily histogram                                                            */
/* -------------------------------------------------------------------------- */

/// One bar of the daily activity chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Records per UTC calendar day.
///
/// Records whose timestamp could not be parsed are not assigned to any day;
/// they are counted in `undated` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyHistogram {
    days: BTreeMap<NaiveDate, usize>,
    undated: usize,
}

impl DailyHistogram {
    /// Buckets sorted ascending by date.
    pub fn ascending(&self) -> Vec<DayCount> {
        self.days
            .iter()
            .map(|(date, count)| DayCount { date: *date, count: *count })
            .collect()
    }

    pub fn undated(&self) -> usize {
        self.undated
    }

    /// Number of distinct dated buckets.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Serialize for DailyHistogram {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("DailyHistogram", 2)?;
        s.serialize_field("days", &self.ascending())?;
        s.serialize_field("undated", &self.undated)?;
        s.end()
    }
}

#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn daily_histogram(records: &[AnnotatedRecord]) -> DailyHistogram {
    let mut hist = DailyHistogram::default();
    for record in records {
        match record.record.published.day() {
            Some(day) => *hist.days.entry(day).or_insert(0) += 1,
            None => hist.undated += 1,
        }
    }
    debug!(days = hist.days.len(), undated = hist.undated, "Built daily histogram");
    hist
}

/* -------------------------------------------------------------------------- */
/* Topic co-occurrence                                                        */
/* -------------------------------------------------------------------------- */

/// One unordered topic pair with its count and chart placement.
///
/// `a` always precedes `b` in vocabulary order. `x`/`y` are the topics'
/// vocabulary indices and `size` is `count * BUBBLE_SCALE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CooccurrencePair {
    pub a: Topic,
    pub b: Topic,
    pub count: usize,
    pub x: usize,
    pub y: usize,
    pub size: usize,
}

/// Co-occurrence counters keyed by canonical (vocabulary-ordered) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cooccurrence {
    counts: IndexMap<(Topic, Topic), usize>,
}

/// Orient an unordered pair into its single canonical key.
pub fn pair_key(a: Topic, b: Topic) -> (Topic, Topic) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Cooccurrence {
    /// Pairs in first-occurrence order, with chart coordinates.
    pub fn pairs(&self) -> Vec<CooccurrencePair> {
        self.counts
            .iter()
            .map(|(&(a, b), &count)| CooccurrencePair {
                a,
                b,
                count,
                x: a.index(),
                y: b.index(),
                size: count * BUBBLE_SCALE,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[instrument(level = "debug", skip_all, fields(records = records.len(), %mode))]
pub fn cooccurrence(records: &[AnnotatedRecord], mode: MatchMode) -> Cooccurrence {
    let mut result = Cooccurrence::default();
    for record in records {
        // BTreeSet iterates in vocabulary order, so every (a, b) has a < b
        let topics = record.topics(mode);
        for (a, b) in topics.iter().copied().tuple_combinations() {
            *result.counts.entry(pair_key(a, b)).or_insert(0) += 1;
        }
    }
    debug!(pairs = result.counts.len(), "Built topic co-occurrence");
    result
}

/* -------------------------------------------------------------------------- */
/* Topic mentions, key metrics, timeline                                      */
/* -------------------------------------------------------------------------- */

/// How many records mention a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicMention {
    pub topic: Topic,
    pub count: usize,
}

/// Mentions for every topic in vocabulary order, zero counts included.
pub fn topic_mentions(records: &[AnnotatedRecord], mode: MatchMode) -> Vec<TopicMention> {
    let mut counts = [0usize; Topic::ALL.len()];
    for record in records {
        for topic in record.topics(mode) {
            counts[topic.index()] += 1;
        }
    }
    Topic::ALL
        .into_iter()
        .map(|topic| TopicMention { topic, count: counts[topic.index()] })
        .collect()
}

/// Headline numbers for the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyMetrics {
    pub total_records: usize,
    pub categories: usize,
    pub renewables: usize,
    pub energy_gas: usize,
}

pub fn key_metrics(records: &[AnnotatedRecord], categories: &CategoryHistogram) -> KeyMetrics {
    KeyMetrics {
        total_records: records.len(),
        categories: categories.len(),
        renewables: categories.get(Category::Renewables),
        energy_gas: categories.get(Category::EnergyGas),
    }
}

/// Records passing `filter`, newest first.
///
/// Records with an invalid timestamp sort after all dated ones; ties keep
/// their input order.
pub fn timeline<'a>(records: &'a [AnnotatedRecord], filter: &CategoryFilter) -> Vec<&'a AnnotatedRecord> {
    records
        .iter()
        .filter(|r| filter.admits(r.category))
        .sorted_by(|x, y| y.record.published.timestamp().cmp(&x.record.published.timestamp()))
        .collect()
}

#[cfg(test)]
impl Cooccurrence {
    /// Count for the unordered pair `{a, b}`; orientation does not matter.
    pub fn count(&self, a: Topic, b: Topic) -> usize {
        self.counts.get(&pair_key(a, b)).copied().unwrap_or(0)
    }
}
