//! Generic search, bundle, RAG-answer, and user contracts.
//!
//! Field names are snake_case on the wire (`doc_id`), unlike the
//! camelCase [`drive`](crate::drive) and [`siftops`](crate::siftops) families.

use serde::{Deserialize, Serialize};

use crate::check::{self, CheckPolicy, Violation};
use crate::codec::Contract;

/// A ranked search hit addressed by location rather than URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: String,
    pub title: String,
    pub location: String,
    pub snippet: String,
    pub score: f64,
}

impl Contract for SearchResult {
    const NAME: &'static str = "rag.search_result";

    fn check(&self, policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "doc_id", &self.doc_id);
        check::score(&mut out, "score", self.score, policy);
        out
    }
}

/// A named, ordered collection of document ids.
///
/// Once `locked` is true the bundle must not change; use
/// [`BundleOps`](crate::bundle::BundleOps) to mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    pub docs: Vec<String>,
    pub locked: bool,
}

impl Contract for Bundle {
    const NAME: &'static str = "rag.bundle";

    fn check(&self, _policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "id", &self.id);
        check::unique(&mut out, "docs", &self.docs);
        out
    }
}

/// Pointer from part of an answer back to a source excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Label used inside the answer text, e.g. `[1]`.
    pub citation: String,
    pub location: String,
    pub excerpt: String,
}

impl Contract for Citation {
    const NAME: &'static str = "rag.citation";

    fn check(&self, _policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "citation", &self.citation);
        out
    }
}

/// A generated answer with its citations, in answer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
}

impl Contract for RagResponse {
    const NAME: &'static str = "rag.response";

    fn check(&self, policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        for (i, c) in self.citations.iter().enumerate() {
            for v in c.check(policy) {
                out.push(Violation::new(
                    format!("citations[{}].{}", i, v.field),
                    v.message,
                ));
            }
        }
        out
    }
}

/// A caller identity with the groups used for access filtering upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub groups: Vec<String>,
}

impl User {
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

impl Contract for User {
    const NAME: &'static str = "rag.user";

    fn check(&self, _policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "id", &self.id);
        check::unique(&mut out, "groups", &self.groups);
        out
    }
}
