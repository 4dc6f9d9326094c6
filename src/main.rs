//! # Alert Pulse
//!
//! Fetches a CSV feed of news alerts, classifies every alert into a fixed
//! set of categories by keyword, and derives the views behind an alerts
//! dashboard: category distribution, daily activity, topic co-occurrence
//! and a chronological list.
//!
//! ## Usage
//!
//! ```sh
//! alert_pulse -j ./json -m ./markdown
//! ```
//!
//! ## Architecture
//!
//! Data flows strictly one way:
//! 1. **Fetching**: One GET of the feed URL (no retries; Ctrl-C cancels)
//! 2. **Parsing**: Quote-aware CSV split into raw records, malformed rows dropped
//! 3. **Annotation**: Each record gets exactly one category; topics derive on demand
//! 4. **Aggregation**: Histograms, co-occurrence counts, timeline
//! 5. **Output**: JSON for chart front-ends and a Markdown report

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod classify;
mod cli;
mod config;
mod dashboard;
mod errors;
mod ingest;
mod keywords;
mod models;
mod outputs;
mod session;
mod topics;
mod utils;

use cli::Cli;
use config::Settings;
use dashboard::Dashboard;
use ingest::{fetch, load_session};
use outputs::{json, markdown};
use session::SessionState;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("alert_pulse starting up");

    // Parse CLI and settings
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let settings = Settings::resolve(&args)?;
    info!(
        feed_url = %settings.feed_url,
        timeout_secs = settings.timeout_secs,
        match_mode = %settings.match_mode,
        category = %settings.category,
        "Settings resolved"
    );

    // Early check: output dirs must be writable before we spend a fetch
    for dir in [&settings.json_output_dir, &settings.markdown_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Fetch and parse ----
    let cancel = fetch::cancel_on(tokio::signal::ctrl_c());
    let state = load_session(
        &SessionState::default(),
        &settings.feed_url,
        settings.timeout(),
        settings.match_mode,
        cancel,
    )
    .await;

    // ---- Apply the view filter and build views ----
    let state = state.with_filter(settings.category);
    let Some(snapshot) = state.snapshot() else {
        let message = match &state {
            SessionState::Failed(message) => message.clone(),
            _ => "feed was never loaded".to_string(),
        };
        error!(error = %message, "Feed retrieval failed; no data to show");
        return Err(message.into());
    };
    let dashboard = Dashboard::build(snapshot);

    // ---- Outputs ----
    if let Some(dir) = &settings.json_output_dir {
        if let Err(e) = json::write_dashboard(&dashboard, dir).await {
            error!(error = %e, "Failed to write dashboard JSON");
        }
    }

    let md = markdown::dashboard_to_markdown(&dashboard);
    match &settings.markdown_output_dir {
        Some(dir) => {
            let path = std::path::Path::new(dir).join(markdown::report_filename(&dashboard));
            info!(path = %path.display(), "Writing Markdown");
            if let Err(e) = tokio::fs::write(&path, md).await {
                error!(path = %path.display(), error = %e, "Failed writing Markdown");
            } else {
                info!(path = %path.display(), "Wrote Markdown report");
            }
        }
        None if settings.json_output_dir.is_none() => println!("{md}"),
        None => {}
    }

    if dashboard.metrics.total_records == 0 {
        warn!("Feed contained no usable records");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        records = dashboard.metrics.total_records,
        "Execution complete"
    );

    Ok(())
}
