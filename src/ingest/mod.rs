//! Feed ingestion: retrieval and parsing.
//!
//! Ingestion runs in two phases, mirroring how the other pipeline stages are
//! split:
//!
//! 1. **Fetching** ([`fetch`]): one GET of the feed URL, no retries
//! 2. **Parsing** ([`csv`]): a pure function from feed text to [`RawRecord`](crate::models::RawRecord)s
//!
//! A failed fetch ends the session. A malformed row only drops that row.

pub mod csv;
pub mod fetch;

use crate::keywords::MatchMode;
use crate::session::SessionState;
use self::csv::parse_feed;
use std::future::Future;
use std::time::Duration;
use tracing::{info, instrument};

/// Fetch and parse the feed, moving `state` to its next revision.
///
/// Every retrieval failure, building the HTTP client included, ends in
/// [`SessionState::Failed`].
#[instrument(level = "info", skip(state, cancel))]
pub async fn load_session<F>(
    state: &SessionState,
    url: &str,
    timeout: Duration,
    mode: MatchMode,
    cancel: F,
) -> SessionState
where
    F: Future<Output = ()>,
{
    let fetched = match fetch::build_client(timeout) {
        Ok(client) => fetch::fetch_feed_until(&client, url, cancel).await,
        Err(e) => Err(e),
    };

    match fetched {
        Ok(text) => {
            let parsed = parse_feed(&text);
            info!(
                records = parsed.records.len(),
                dropped = parsed.dropped.len(),
                "Parsed feed"
            );
            state.loaded(parsed.records, mode)
        }
        Err(e) => state.failed(&e),
    }
}
