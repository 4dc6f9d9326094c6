//! Keyword classifier assigning each alert exactly one [`Category`].
//!
//! The lower-cased title is tested against an ordered rule table and the
//! first matching rule wins. A title mentioning both "gas" and "market" is
//! therefore [`Category::EnergyGas`], because the energy rule comes first.
//! Titles that match no rule fall through to [`Category::Other`], so
//! classification is total.

use crate::keywords::{MatchMode, contains_any, word_pattern};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{error, trace};

/// Closed set of alert categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    EnergyGas,
    Chemicals,
    Renewables,
    Sponsorship,
    Financial,
    International,
    Other,
}

impl Category {
    /// All categories in rule order, catch-all last.
    pub const ALL: [Category; 7] = [
        Category::EnergyGas,
        Category::Chemicals,
        Category::Renewables,
        Category::Sponsorship,
        Category::Financial,
        Category::International,
        Category::Other,
    ];

    /// Human-facing label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Category::EnergyGas => "Energy & Gas",
            Category::Chemicals => "Chemicals",
            Category::Renewables => "Renewables",
            Category::Sponsorship => "Sponsorship",
            Category::Financial => "Financial",
            Category::International => "International",
            Category::Other => "Other",
        }
    }

    /// Variant name as serialized, e.g. `"EnergyGas"`.
    pub fn name(self) -> &'static str {
        match self {
            Category::EnergyGas => "EnergyGas",
            Category::Chemicals => "Chemicals",
            Category::Renewables => "Renewables",
            Category::Sponsorship => "Sponsorship",
            Category::Financial => "Financial",
            Category::International => "International",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a category name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the variant name or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Ordered classification rules. Order is significant: first match wins.
pub const RULES: &[(Category, &[&str])] = &[
    (Category::EnergyGas, &["gas", "oil", "upstream", "pipeline"]),
    (Category::Chemicals, &["chemical", "butac", "polymer"]),
    (Category::Renewables, &["renewable", "solar", "hydrogen", "green", "ev"]),
    (Category::Sponsorship, &["f1", "formula", "motorsport"]),
    (Category::Financial, &["market", "stock", "epf", "investment"]),
    (Category::International, &["brazil", "international", "australia", "georgia"]),
];

static WORD_RULES: Lazy<Vec<(Category, Regex)>> = Lazy::new(|| {
    RULES
        .iter()
        .filter_map(|(category, keywords)| match word_pattern(keywords) {
            Ok(re) => Some((*category, re)),
            Err(e) => {
                error!(%category, error = %e, "Skipping word rule that failed to compile");
                None
            }
        })
        .collect()
});

/// Assign a category to a title.
///
/// Pure and total: every title maps to exactly one category, and the same
/// title always maps to the same category.
pub fn classify(title: &str, mode: MatchMode) -> Category {
    let lower = title.to_lowercase();
    let category = match mode {
        MatchMode::Substring => RULES
            .iter()
            .find(|(_, keywords)| contains_any(&lower, keywords))
            .map(|(category, _)| *category),
        MatchMode::Word => WORD_RULES
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(category, _)| *category),
    }
    .unwrap_or(Category::Other);

    trace!(%title, ?category, %mode, "Classified title");
    category
}
