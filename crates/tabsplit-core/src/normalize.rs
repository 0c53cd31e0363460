//! Column header normalization.
//!
//! Extracted headers carry formatting artifacts from the source layout:
//! multi-line headers arrive with embedded carriage returns, footnoted
//! headers with emphasis markers. Segments must agree on header spelling
//! before their columns can be unioned, so normalization runs once per
//! column name during the merge.
//!
//! The rule set is a policy, not a hardcoded transform: different report
//! layouts need different rules.

use serde::{Deserialize, Serialize};

/// A single header rewrite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderRule {
    /// Replace every occurrence of `from` with `to`.
    Replace { from: char, to: char },
    /// Remove every occurrence of the character.
    Strip(char),
}

impl HeaderRule {
    fn apply(&self, name: &str) -> String {
        match *self {
            HeaderRule::Replace { from, to } => name.replace(from, &to.to_string()),
            HeaderRule::Strip(c) => name.chars().filter(|&ch| ch != c).collect(),
        }
    }
}

/// An ordered list of [`HeaderRule`]s applied to each column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderNormalizer {
    rules: Vec<HeaderRule>,
}

impl HeaderNormalizer {
    /// A normalizer with a caller-supplied rule list.
    pub fn new(rules: Vec<HeaderRule>) -> Self {
        Self { rules }
    }

    /// The no-op policy. Used when concatenating tables inside one segment,
    /// where headers come from a single extraction pass and already agree.
    pub fn identity() -> Self {
        Self { rules: Vec::new() }
    }

    /// Apply every rule in order.
    pub fn normalize(&self, name: &str) -> String {
        let mut out = name.to_string();
        for rule in &self.rules {
            out = rule.apply(&out);
        }
        out
    }
}

impl Default for HeaderNormalizer {
    /// The observed report formatting: carriage returns inside wrapped
    /// headers become spaces, `*` footnote markers are dropped.
    fn default() -> Self {
        Self {
            rules: vec![
                HeaderRule::Replace {
                    from: '\r',
                    to: ' ',
                },
                HeaderRule::Strip('*'),
            ],
        }
    }
}
