//! JSON output of the dashboard views.
//!
//! Files are organized by the UTC date of the run:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── dashboard.json
//! ```
//! A later run on the same day replaces the file.

use crate::dashboard::Dashboard;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Dashboard`] to `{json_output_dir}/{date}/dashboard.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation, serialization or
/// the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_dashboard(dashboard: &Dashboard, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(dashboard)?;

    let date = dashboard.generated_at.date_naive().to_string();
    let full_json_dir = PathBuf::from(json_output_dir).join(&date);

    info!(dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = full_json_dir.join("dashboard.json");
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename.display(), "Wrote dashboard JSON");

    Ok(output_json_filename)
}
