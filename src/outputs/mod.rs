//! Output generation for the dashboard views.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`Dashboard`](crate::dashboard::Dashboard) to a JSON file for chart front-ends
//! - [`markdown`]: Renders the dashboard as a Markdown report
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── dashboard.json
//!
//! markdown_output_dir/
//! └── 2025-05-06_alerts.md
//! ```

pub mod json;
pub mod markdown;
