//! Topic extraction from alert titles.
//!
//! Unlike classification, topics are not exclusive: a title yields every
//! topic whose keyword list it matches, possibly none. The vocabulary order
//! below is fixed and doubles as the canonical ordering for co-occurrence
//! keys and chart coordinates.

use crate::keywords::{MatchMode, contains_any, word_pattern};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::error;

/// Closed topic vocabulary. Declaration order is the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Topic {
    Gas,
    Renewable,
    Chemical,
    Electric,
    Malaysia,
    International,
}

impl Topic {
    /// All topics in vocabulary order.
    pub const ALL: [Topic; 6] = [
        Topic::Gas,
        Topic::Renewable,
        Topic::Chemical,
        Topic::Electric,
        Topic::Malaysia,
        Topic::International,
    ];

    /// Position in the vocabulary, used as a chart axis coordinate.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Topic::Gas => "Gas",
            Topic::Renewable => "Renewable",
            Topic::Chemical => "Chemical",
            Topic::Electric => "Electric",
            Topic::Malaysia => "Malaysia",
            Topic::International => "International",
        }
    }

    /// Keywords that signal this topic.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::Gas => &["gas", "lng", "pipeline", "upstream"],
            Topic::Renewable => &["solar", "hydrogen", "green", "renewable"],
            Topic::Chemical => &["chemical", "polymer", "butac"],
            Topic::Electric => &["ev", "electric", "e-bike"],
            Topic::Malaysia => &["malaysia", "malaysian"],
            Topic::International => &["brazil", "australia", "georgia"],
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static WORD_TOPICS: Lazy<Vec<(Topic, Regex)>> = Lazy::new(|| {
    Topic::ALL
        .into_iter()
        .filter_map(|topic| match word_pattern(topic.keywords()) {
            Ok(re) => Some((topic, re)),
            Err(e) => {
                error!(%topic, error = %e, "Skipping topic pattern that failed to compile");
                None
            }
        })
        .collect()
});

/// Topics mentioned by a title. The returned set iterates in vocabulary order.
pub fn topics_of(title: &str, mode: MatchMode) -> BTreeSet<Topic> {
    let lower = title.to_lowercase();
    match mode {
        MatchMode::Substring => Topic::ALL
            .into_iter()
            .filter(|topic| contains_any(&lower, topic.keywords()))
            .collect(),
        MatchMode::Word => WORD_TOPICS
            .iter()
            .filter(|(_, re)| re.is_match(&lower))
            .map(|(topic, _)| *topic)
            .collect(),
    }
}
