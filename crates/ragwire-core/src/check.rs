//! Consumer-side contract checks.
//!
//! Decoding a contract only guarantees its shape. The rules here encode
//! assumptions the consuming system relies on (finite scores, RFC 3339
//! timestamps, a sync `error` only alongside an error status, unique ids in
//! bundles) and are run explicitly through [`Contract::check`](crate::Contract::check).
//! A violation is reported, never fixed up.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tunables for [`Contract::check`](crate::Contract::check).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckPolicy {
    /// Lowest acceptable search score, inclusive.
    #[serde(default)]
    pub score_min: Option<f64>,
    /// Highest acceptable search score, inclusive.
    #[serde(default)]
    pub score_max: Option<f64>,
    /// Require nullable timestamp strings to be RFC 3339 when present.
    #[serde(default = "default_require_rfc3339")]
    pub require_rfc3339: bool,
}

fn default_require_rfc3339() -> bool {
    true
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            score_min: None,
            score_max: None,
            require_rfc3339: true,
        }
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Wire path of the offending field, e.g. `citations[2].citation`.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub(crate) fn score(out: &mut Vec<Violation>, field: &str, value: f64, policy: &CheckPolicy) {
    if !value.is_finite() {
        out.push(Violation::new(field, format!("score must be finite, got {}", value)));
        return;
    }
    if let Some(min) = policy.score_min {
        if value < min {
            out.push(Violation::new(
                field,
                format!("score {} is below the minimum {}", value, min),
            ));
        }
    }
    if let Some(max) = policy.score_max {
        if value > max {
            out.push(Violation::new(
                field,
                format!("score {} is above the maximum {}", value, max),
            ));
        }
    }
}

pub(crate) fn timestamp(
    out: &mut Vec<Violation>,
    field: &str,
    value: Option<&str>,
    policy: &CheckPolicy,
) {
    let Some(ts) = value else { return };
    if !policy.require_rfc3339 {
        return;
    }
    if let Err(e) = chrono::DateTime::parse_from_rfc3339(ts) {
        out.push(Violation::new(
            field,
            format!("'{}' is not an RFC 3339 timestamp ({})", ts, e),
        ));
    }
}

pub(crate) fn non_empty(out: &mut Vec<Violation>, field: &str, value: &str) {
    if value.trim().is_empty() {
        out.push(Violation::new(field, "must not be empty"));
    }
}

pub(crate) fn unique<'a, I>(out: &mut Vec<Violation>, field: &str, values: I)
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    for (i, v) in values.into_iter().enumerate() {
        if !seen.insert(v.as_str()) {
            out.push(Violation::new(
                format!("{}[{}]", field, i),
                format!("duplicate entry '{}'", v),
            ));
        }
    }
}
