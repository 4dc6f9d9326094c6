//! Command-line interface definitions for Alert Pulse.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option is optional: anything not given falls back to the config
//! file, then to the built-in defaults (see [`crate::config::Settings`]).

use crate::keywords::MatchMode;
use crate::session::CategoryFilter;
use clap::Parser;

/// Command-line arguments for the Alert Pulse application.
///
/// # Examples
///
/// ```sh
/// # Print a Markdown report for the default feed
/// alert_pulse
///
/// # Write JSON and Markdown, showing only renewables in the timeline
/// alert_pulse -j ./json -m ./markdown --category Renewables
///
/// # Use word-boundary keyword matching against a custom feed
/// alert_pulse --feed-url https://example.com/alerts.csv --match-mode word
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL of the CSV alert feed
    #[arg(long, env = "ALERT_FEED_URL")]
    pub feed_url: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "ALERT_PULSE_CONFIG")]
    pub config: Option<String>,

    /// Output directory for the dashboard JSON file
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Output directory for the Markdown report
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Category shown in the timeline ("all" or a category name)
    #[arg(long)]
    pub category: Option<CategoryFilter>,

    /// Keyword matching mode
    #[arg(long, value_enum)]
    pub match_mode: Option<MatchMode>,

    /// Fetch timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}
