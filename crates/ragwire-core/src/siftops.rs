//! siftops search, bundle, sync-status, and RAG-answer contracts.
//!
//! These cover the same concepts as [`rag`](crate::rag) but with their own
//! camelCase field names and enum sets. The two families are deliberately
//! not converted into one another.

use serde::{Deserialize, Serialize};

use crate::check::{self, CheckPolicy, Violation};
use crate::codec::Contract;

/// Kind of page behind a siftops search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Post,
    Page,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub doc_id: String,
    #[serde(rename = "type")]
    pub kind: PageKind,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub score: f64,
}

impl Contract for SearchResult {
    const NAME: &'static str = "siftops.search_result";

    fn check(&self, policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "docId", &self.doc_id);
        check::score(&mut out, "score", self.score, policy);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub bundle_id: String,
    pub doc_ids: Vec<String>,
    pub locked: bool,
}

impl Contract for Bundle {
    const NAME: &'static str = "siftops.bundle";

    fn check(&self, _policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "bundleId", &self.bundle_id);
        check::unique(&mut out, "docIds", &self.doc_ids);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Idle,
    Syncing,
    Complete,
    Error,
}

/// Point-in-time progress of a siftops sync. Carries no error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub docs: u64,
    pub chunks: u64,
    #[serde(default)]
    pub synced_at: Option<String>,
    pub status: SyncState,
}

impl Contract for SyncStatus {
    const NAME: &'static str = "siftops.sync_status";

    fn check(&self, policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::timestamp(&mut out, "syncedAt", self.synced_at.as_deref(), policy);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub citation: String,
    pub url: String,
    pub title: String,
    pub excerpt: String,
}

impl Contract for Citation {
    const NAME: &'static str = "siftops.citation";

    fn check(&self, _policy: &CheckPolicy) -> Vec<Violation> {
        let mut out = Vec::new();
        check::non_empty(&mut out, "citation", &self.citation);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
}

impl Contract for RagResponse {
    const NAME: &'static str = "siftops.response";

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
