//! Runtime settings loaded from an optional YAML file.
//!
//! Precedence is: command-line flag > config file > built-in default.
//!
//! ```yaml
//! feed_url: https://example.com/alerts.csv
//! timeout_secs: 20
//! match_mode: word
//! category: Renewables
//! json_output_dir: ./json
//! markdown_output_dir: ./markdown
//! ```

use crate::cli::Cli;
use crate::errors::ConfigError;
use crate::keywords::MatchMode;
use crate::session::CategoryFilter;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Feed fetched when no URL is configured.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/booluckgmie/sharecode/refs/heads/master/marketIntel/petronasGAlerts2025.csv";

/// Default fetch timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub feed_url: String,
    pub timeout_secs: u64,
    pub match_mode: MatchMode,
    pub category: CategoryFilter,
    pub json_output_dir: Option<String>,
    pub markdown_output_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            match_mode: MatchMode::default(),
            category: CategoryFilter::default(),
            json_output_dir: None,
            markdown_output_dir: None,
        }
    }
}

impl Settings {
    pub fn from_yaml(path: &str, text: &str) -> Result<Settings, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Read settings from `path`.
    #[instrument(level = "info")]
    pub fn from_file(path: &str) -> Result<Settings, ConfigError> {
        let text = std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let settings = Settings::from_yaml(path, &text)?;
        info!(path, "Loaded configuration");
        Ok(settings)
    }

    /// Load the config file named on the command line (if any) and apply flag overrides.
    pub fn resolve(cli: &Cli) -> Result<Settings, ConfigError> {
        let base = match cli.config.as_deref() {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        let settings = base.with_overrides(cli);
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    /// Apply every flag that was given on the command line.
    pub fn with_overrides(mut self, cli: &Cli) -> Settings {
        if let Some(url) = &cli.feed_url {
            self.feed_url = url.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(mode) = cli.match_mode {
            self.match_mode = mode;
        }
        if let Some(filter) = cli.category {
            self.category = filter;
        }
        if let Some(dir) = &cli.json_output_dir {
            self.json_output_dir = Some(dir.clone());
        }
        if let Some(dir) = &cli.markdown_output_dir {
            self.markdown_output_dir = Some(dir.clone());
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
