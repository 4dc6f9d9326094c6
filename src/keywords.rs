//! Keyword matching shared by the classifier and the topic extractor.
//!
//! Both rule tables test a lower-cased title against keyword lists. Two modes
//! are available:
//!
//! | Mode | Behavior |
//! |------|----------|
//! | [`MatchMode::Substring`] | Plain substring test. `"ev"` matches inside `"every"`. This is the default and reproduces the feed's historical categorization exactly. |
//! | [`MatchMode::Word`] | Keyword must sit on word boundaries, so `"ev"` only matches the standalone word. |

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How keywords are matched against a title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive substring containment.
    #[default]
    Substring,
    /// Case-insensitive match on word boundaries.
    Word,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Substring => f.write_str("substring"),
            MatchMode::Word => f.write_str("word"),
        }
    }
}

/// Build a word-boundary alternation for a static keyword list,
/// e.g. `\b(?:gas|oil)\b`. Keywords are escaped before joining.
pub fn word_pattern(keywords: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = keywords
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b"))
}

/// True when `lower_title` contains any of `keywords` as a substring.
pub fn contains_any(lower_title: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower_title.contains(kw))
}
