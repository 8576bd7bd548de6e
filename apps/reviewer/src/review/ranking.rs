//! Ranking and aggregate statistics over a batch of review results.

use serde::Serialize;
use thiserror::Error;

use crate::models::review::ReviewResult;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot rank an empty result list")]
pub struct EmptyResults;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingSummary {
    pub count: usize,
    pub top_score: f64,
    /// Mean score rounded half away from zero (`70.5` → `71`, `-0.5` → `-1`).
    pub average_score: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Results by descending score; ties keep their input order.
    pub sorted: Vec<ReviewResult>,
    pub summary: RankingSummary,
}

impl Ranking {
    /// Ranks `results`. Callers branch to their "no results" path on an
    /// empty list instead of asking for a ranking; an empty list is rejected.
    pub fn compute(results: &[ReviewResult]) -> Result<Self, EmptyResults> {
        if results.is_empty() {
            return Err(EmptyResults);
        }

        let mut sorted = results.to_vec();
        // `sort_by` is stable, which keeps tied results in arrival order.
        sorted.sort_by(|a, b| b.fit_score.total_cmp(&a.fit_score));

        let top_score = results
            .iter()
            .map(|r| r.fit_score)
            .fold(f64::NEG_INFINITY, f64::max);
        let total: f64 = results.iter().map(|r| r.fit_score).sum();
        let average_score = (total / results.len() as f64).round() as i64;

        Ok(Self {
            sorted,
            summary: RankingSummary {
                count: results.len(),
                top_score,
                average_score,
            },
        })
    }
}
