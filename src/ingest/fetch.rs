//! Feed retrieval over HTTP(S).
//!
//! The feed is fetched exactly once per session. There are no retries and no
//! backoff. A non-success status, a transport failure, a timeout or a
//! cancellation all end the session with a [`FetchError`].

use crate::errors::FetchError;
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Build the HTTP client used for the feed request.
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(FetchError::Client)
}

/// Fetch the raw feed text with a single GET.
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] if `url` does not parse
/// - [`FetchError::Status`] on any non-2xx response
/// - [`FetchError::Timeout`] if the client timeout elapses
/// - [`FetchError::Transport`] for any other network failure
#[instrument(level = "info", skip(client))]
pub async fn fetch_feed(client: &Client, url: &str) -> Result<String, FetchError> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let t0 = Instant::now();
    let resp = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| transport_error(url, e))?;

    let status = resp.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "Feed request returned non-success status");
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp.text().await.map_err(|e| transport_error(url, e))?;
    info!(
        bytes = body.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched feed"
    );
    Ok(body)
}

/// Fetch the feed, giving up with [`FetchError::Cancelled`] as soon as `cancel` resolves.
pub async fn fetch_feed_until<F>(client: &Client, url: &str, cancel: F) -> Result<String, FetchError>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel => {
            debug!(%url, "Feed fetch cancelled");
            Err(FetchError::Cancelled { url: url.to_string() })
        }
        res = fetch_feed(client, url) => res,
    }
}

/// Resolve once `signal` fires.
///
/// If the signal cannot be listened for, cancellation is disabled and the
/// returned future never resolves.
pub async fn cancel_on<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Cancellation signal unavailable; the fetch cannot be interrupted");
        std::future::pending::<()>().await;
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout { url: url.to_string() }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: e,
        }
    }
}
