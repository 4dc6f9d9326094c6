//! Data models for ingested and annotated alert records.
//!
//! This module defines the record types that flow through the pipeline:
//! - [`RawRecord`]: One CSV row as ingested from the feed
//! - [`Published`]: The publication timestamp, or the raw text when it cannot be parsed
//! - [`AnnotatedRecord`]: A raw record with its assigned [`Category`]
//!
//! Records are created once per ingestion pass and never mutated afterwards.

use crate::classify::{Category, classify};
use crate::keywords::MatchMode;
use crate::topics::{Topic, topics_of};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Naive date-time layouts accepted in addition to RFC 3339 and RFC 2822.
/// Values without an offset are read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Publication timestamp of a record.
///
/// An unparseable date does not reject the row. The record keeps the raw
/// text in [`Published::Invalid`] and travels downstream with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Published {
    /// A successfully parsed instant, normalized to UTC.
    Valid(DateTime<Utc>),
    /// The raw field text that could not be parsed.
    Invalid(String),
}

impl Published {
    /// Parse a feed date string.
    ///
    /// Accepts RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM[:SS]`,
    /// `YYYY-MM-DDTHH:MM:SS` and a bare `YYYY-MM-DD` (midnight UTC).
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Published::Valid(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Published::Valid(dt.with_timezone(&Utc));
        }
        for fmt in NAIVE_DATETIME_FORMATS {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Published::Valid(ndt.and_utc());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Published::Valid(date.and_time(NaiveTime::MIN).and_utc());
        }

        Published::Invalid(raw.to_string())
    }

    /// The parsed instant, if any.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Published::Valid(dt) => Some(*dt),
            Published::Invalid(_) => None,
        }
    }

    /// Calendar day in UTC, used as the daily histogram key.
    pub fn day(&self) -> Option<NaiveDate> {
        self.timestamp().map(|dt| dt.date_naive())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Published::Valid(_))
    }
}

impl fmt::Display for Published {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Published::Valid(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Published::Invalid(raw) => write!(f, "invalid date ({raw})"),
        }
    }
}

/// One data row of the feed, fields taken positionally: id, title, published, url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Opaque identifier from the feed.
    pub id: String,
    /// Alert headline.
    pub title: String,
    /// Publication timestamp.
    pub published: Published,
    /// Link to the article.
    pub url: String,
}

impl RawRecord {
    /// Attach a category using the given keyword matching mode.
    pub fn annotate(self, mode: MatchMode) -> AnnotatedRecord {
        let category = classify(&self.title, mode);
        AnnotatedRecord { record: self, category }
    }

    /// Host part of the article URL, e.g. `"www.thestar.com.my"`.
    pub fn source_host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(|h| h.to_string()))
    }
}

/// A [`RawRecord`] with exactly one assigned [`Category`].
///
/// Topics are not stored; they are derived from the title on demand via
/// [`AnnotatedRecord::topics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: RawRecord,
    pub category: Category,
}

impl AnnotatedRecord {
    /// Topic set for this record's title.
    pub fn topics(&self, mode: MatchMode) -> BTreeSet<Topic> {
        topics_of(&self.record.title, mode)
    }
}

/// Annotate a whole ingestion pass.
pub fn annotate_all(records: Vec<RawRecord>, mode: MatchMode) -> Vec<AnnotatedRecord> {
    records.into_iter().map(|r| r.annotate(mode)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(title: &str, published: &str) -> RawRecord {
        RawRecord {
            id: "1".to_string(),
            title: title.to_string(),
            published: Published::parse(published),
            url: "https://www.thestar.com.my/business/2025/01/10/story".to_string(),
        }
    }

    #[test]
    fn test_parse_rfc3339() {
        let p = Published::parse("2025-01-10T08:30:00Z");
        assert_eq!(
            p,
            Published::Valid(Utc.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_offset_normalizes_to_utc_day() {
        // 01:00 at +08:00 is still the previous day in UTC
        let p = Published::parse("2025-01-10T01:00:00+08:00");
        assert_eq!(p.day(), NaiveDate::from_ymd_opt(2025, 1, 9));
    }

    #[test]
    fn test_parse_rfc2822() {
        let p = Published::parse("Fri, 10 Jan 2025 08:30:00 +0000");
        assert_eq!(p.day(), NaiveDate::from_ymd_opt(2025, 1, 10));
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            Published::parse("2025-03-02 14:00:00").timestamp(),
            Some(Utc.with_ymd_and_hms(2025, 3, 2, 14, 0, 0).unwrap())
        );
        assert_eq!(
            Published::parse(" 2025-03-02 ").timestamp(),
            Some(Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_invalid_keeps_raw_text() {
        let p = Published::parse("next tuesday");
        assert_eq!(p, Published::Invalid("next tuesday".to_string()));
        assert!(!p.is_valid());
        assert_eq!(p.day(), None);
        assert_eq!(p.to_string(), "invalid date (next tuesday)");
    }

    #[test]
    fn test_annotate_assigns_category() {
        let annotated = record("PETRONAS signs gas pipeline deal", "2025-01-10").annotate(MatchMode::Substring);
        assert_eq!(annotated.category, Category::EnergyGas);
        assert_eq!(annotated.topics(MatchMode::Substring), BTreeSet::from([Topic::Gas]));
    }

    #[test]
    fn test_source_host() {
        let r = record("x", "2025-01-10");
        assert_eq!(r.source_host(), Some("www.thestar.com.my".to_string()));

        let bad = RawRecord { url: "not a url".to_string(), ..r };
        assert_eq!(bad.source_host(), None);
    }

    #[test]
    fn test_annotated_record_serialization_is_flat() {
        let annotated = record("Solar farm opens", "2025-01-10T00:00:00Z").annotate(MatchMode::Substring);
        let json = serde_json::to_value(&annotated).unwrap();
        assert_eq!(json["title"], "Solar farm opens");
        assert_eq!(json["category"], "Renewables");
        assert_eq!(json["published"]["valid"], "2025-01-10T00:00:00Z");
    }
}
