//! Line-oriented, quote-aware CSV parsing of the alert feed.
//!
//! The feed's first line is a header. Columns are positional:
//!
//! ```text
//! id,title,published,url
//! 1,"PETRONAS signs gas pipeline deal, Sabah",2025-01-10T00:00:00Z,https://…
//! ```
//!
//! Parsing is lenient. Blank lines are skipped, and a line yielding fewer
//! than four fields is dropped and reported through [`ParsedFeed::dropped`]
//! instead of failing the pass. A quote opens a span only at the start of a
//! field, and a span may contain commas. A quote anywhere else is literal.
//! Every `"` left in a field is removed.

use crate::models::{Published, RawRecord};
use crate::utils::truncate_for_log;
use ::csv::ReaderBuilder;
use tracing::{debug, instrument, warn};

/// Minimum number of fields a data row must yield.
pub const MIN_FIELDS: usize = 4;

/// Result of one parsing pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Well-formed rows, in file order.
    pub records: Vec<RawRecord>,
    /// 1-based line numbers of dropped malformed rows.
    pub dropped: Vec<usize>,
}

/// Parse the full feed text.
///
/// Pure: the output depends only on `text`.
#[instrument(level = "info", skip_all, fields(bytes = text.len()))]
pub fn parse_feed(text: &str) -> ParsedFeed {
    let mut parsed = ParsedFeed::default();

    for (idx, line) in text.split('\n').enumerate().skip(1) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(record) => parsed.records.push(record),
            None => {
                debug!(line_no = idx + 1, line = %truncate_for_log(line, 120), "Dropping malformed row");
                parsed.dropped.push(idx + 1);
            }
        }
    }

    if !parsed.dropped.is_empty() {
        warn!(
            dropped = parsed.dropped.len(),
            lines = ?parsed.dropped,
            "Skipped malformed feed rows"
        );
    }

    let undated = parsed.records.iter().filter(|r| !r.published.is_valid()).count();
    if undated > 0 {
        debug!(undated, "Kept rows with unparseable dates");
    }
    parsed
}

/// Parse a single data line, or `None` if it yields fewer than [`MIN_FIELDS`] fields.
pub fn parse_row(line: &str) -> Option<RawRecord> {
    let mut fields = split_fields(line).into_iter();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let id = fields.next()?;
    let title = fields.next()?;
    let published = fields.next()?;
    let url = fields.next()?;

    Some(RawRecord {
        id: id.trim().to_string(),
        title: title.trim().to_string(),
        published: Published::parse(&published),
        url: url.trim().to_string(),
    })
}

/// Split a line on commas outside double-quoted spans, dropping the quote characters.
///
/// Empty fields keep their position, so `a,,c` yields three fields. An empty
/// line yields no fields.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(|field| field.replace('"', "")).collect(),
        Some(Err(e)) => {
            debug!(error = %e, line = %truncate_for_log(line, 120), "Unreadable CSV line");
            Vec::new()
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const HEADER: &str = "id,title,published,url";

    #[test]
    fn test_split_plain_and_quoted() {
        assert_eq!(split_fields("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(
            split_fields(r#"1,"Deal signed, Sabah",2025-01-10,http://a"#),
            vec!["1", "Deal signed, Sabah", "2025-01-10", "http://a"]
        );
    }

    #[test]
    fn test_split_keeps_empty_fields() {
        assert_eq!(split_fields("a,,c"), vec!["a", "", "c"]);
        assert_eq!(split_fields("a,b,,"), vec!["a", "b", "", ""]);
        assert!(split_fields("").is_empty());
    }

    #[test]
    fn test_quotes_are_stripped_everywhere() {
        assert_eq!(split_fields(r#""1","t","d","u""#), vec!["1", "t", "d", "u"]);
    }

    #[test]
    fn test_mid_field_quote_is_literal() {
        assert_eq!(
            split_fields(r#"9,Petronas orders 36" pipeline,2025-01-10T00:00:00Z,http://a"#),
            vec!["9", "Petronas orders 36 pipeline", "2025-01-10T00:00:00Z", "http://a"]
        );
    }

    #[test]
    fn test_row_with_inch_mark_is_kept() {
        let text = format!("{HEADER}\n9,Petronas orders 36\" pipeline,2025-01-10T00:00:00Z,http://a\n");
        let parsed = parse_feed(&text);
        assert!(parsed.dropped.is_empty());
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].title, "Petronas orders 36 pipeline");
        assert_eq!(parsed.records[0].url, "http://a");
    }

    #[test]
    fn test_doubled_quotes_inside_span() {
        assert_eq!(
            split_fields(r#"1,"The ""big"" deal, Sabah",2025-01-10,http://a"#),
            vec!["1", "The big deal, Sabah", "2025-01-10", "http://a"]
        );
    }

    #[test]
    fn test_k_rows_in_file_order() {
        let text = format!(
            "{HEADER}\n1,First,2025-01-01,http://a\n2,Second,2025-01-02,http://b\n3,Third,2025-01-03,http://c\n"
        );
        let parsed = parse_feed(&text);
        let ids: Vec<&str> = parsed.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(parsed.dropped.is_empty());
    }

    #[test]
    fn test_header_only_and_empty_input() {
        assert!(parse_feed(HEADER).records.is_empty());
        assert!(parse_feed("").records.is_empty());
    }

    #[test]
    fn test_blank_lines_skipped_without_being_dropped() {
        let text = format!("{HEADER}\n\n   \n1,T,2025-01-01,http://a\n\n");
        let parsed = parse_feed(&text);
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.dropped.is_empty());
    }

    #[test]
    fn test_malformed_row_is_dropped() {
        let parsed = parse_feed(&format!("{HEADER}\n1,\"Title Only\"\n"));
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.dropped, vec![2]);
    }

    #[test]
    fn test_malformed_rows_do_not_affect_neighbours() {
        let text = format!("{HEADER}\n1,T1,2025-01-01,http://a\nbroken\n3,T3,2025-01-03,http://c\n");
        let parsed = parse_feed(&text);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].id, "3");
        assert_eq!(parsed.dropped, vec![3]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = format!("{HEADER}\r\n1,T,2025-01-10T00:00:00Z,http://a\r\n");
        let parsed = parse_feed(&text);
        assert_eq!(parsed.records[0].url, "http://a");
        assert!(parsed.records[0].published.is_valid());
    }

    #[test]
    fn test_end_to_end_row() {
        let text = format!("{HEADER}\n1,\"PETRONAS signs gas pipeline deal\",2025-01-10T00:00:00Z,http://a");
        let parsed = parse_feed(&text);
        assert_eq!(
            parsed.records,
            vec![RawRecord {
                id: "1".to_string(),
                title: "PETRONAS signs gas pipeline deal".to_string(),
                published: Published::Valid(Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()),
                url: "http://a".to_string(),
            }]
        );
    }

    #[test]
    fn test_unparseable_date_propagates_as_sentinel() {
        let parsed = parse_feed(&format!("{HEADER}\n7,T,\"sometime soon\",http://a\n"));
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(
            parsed.records[0].published,
            Published::Invalid("sometime soon".to_string())
        );
    }

    #[test]
    fn test_extra_fields_ignored() {
        let record = parse_row("1,T,2025-01-01,http://a,extra,more").unwrap();
        assert_eq!(record.url, "http://a");
    }
}
