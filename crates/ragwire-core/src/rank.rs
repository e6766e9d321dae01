//! Ordering of search hits.
//!
//! All three search-hit contracts carry an `f64` score where higher means
//! more relevant. [`rank`] sorts by score descending and breaks ties by
//! document id ascending so the same input always yields the same order.
//! [`normalize_scores`] rescales scores to `[0, 1]` with min-max
//! normalization.

use std::cmp::Ordering;

use crate::{drive, rag, siftops};

/// A contract with a relevance score.
pub trait Ranked {
    fn doc_id(&self) -> &str;
    fn score(&self) -> f64;
    fn set_score(&mut self, score: f64);
}

impl Ranked for drive::GDriveSearchResult {
    fn doc_id(&self) -> &str {
        &self.doc_id
    }
    fn score(&self) -> f64 {
        self.score
    }
    fn set_score(&mut self, score: f64) {
        self.score = score;
    }
}

impl Ranked for rag::SearchResult {
    fn doc_id(&self) -> &str {
        &self.doc_id
    }
    fn score(&self) -> f64 {
        self.score
    }
    fn set_score(&mut self, score: f64) {
        self.score = score;
    }
}

impl Ranked for siftops::SearchResult {
    fn doc_id(&self) -> &str {
        &self.doc_id
    }
    fn score(&self) -> f64 {
        self.score
    }
    fn set_score(&mut self, score: f64) {
        self.score = score;
    }
}

fn compare<T: Ranked>(a: &T, b: &T) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.doc_id().cmp(b.doc_id()))
}

/// Sort hits by score (desc), then doc id (asc).
///
/// Uses `f64::total_cmp`, so NaN scores are ordered rather than rejected;
/// run [`check`](crate::check) first if the input is untrusted.
pub fn rank<T: Ranked>(hits: &mut [T]) {
    hits.sort_by(compare);
}

/// Rank and keep the best `k` hits.
pub fn top_k<T: Ranked>(mut hits: Vec<T>, k: usize) -> Vec<T> {
    rank(&mut hits);
    hits.truncate(k);
    hits
}

/// Min-max normalize scores to `[0, 1]` in place.
///
/// When every finite score is equal they all become `1.0`. Non-finite
/// scores are ignored when computing the range and left unchanged.
pub fn normalize_scores<T: Ranked>(hits: &mut [T]) {
    let finite = hits.iter().map(|h| h.score()).filter(|s| s.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s), hi.max(s))
    });
    if min > max {
        return;
    }

    // Halve before subtracting when the span overflows f64.
    let range = max - min;
    let scale = if range.is_finite() { 1.0 } else { 0.5 };
    let span = max * scale - min * scale;
    for hit in hits.iter_mut().filter(|h| h.score().is_finite()) {
        let normalized = if span == 0.0 {
            1.0
        } else {
            ((hit.score() * scale - min * scale) / span).clamp(0.0, 1.0)
        };
        hit.set_score(normalized);
    }
}
