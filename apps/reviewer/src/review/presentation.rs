//! Presentation rows for the ranked results table.
//!
//! Output is structured data, not markup. The review body stays raw Markdown;
//! turning it into HTML belongs to the UI.

use serde::Serialize;

use crate::catalog::correlation::{resolve, MatchRule};
use crate::catalog::naming::display_name;
use crate::models::cv::CvDescriptor;
use crate::models::review::ReviewResult;
use crate::review::ranking::{Ranking, RankingSummary};

pub const NO_RESULTS_NOTICE: &str = "No reviews found.";

/// Podium placement by rank. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    First,
    Second,
    Third,
    Other,
}

impl Placement {
    pub fn for_position(position: usize) -> Self {
        match position {
            1 => Placement::First,
            2 => Placement::Second,
            3 => Placement::Third,
            _ => Placement::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreTier::Excellent
        } else if score >= 65.0 {
            ScoreTier::Good
        } else if score >= 50.0 {
            ScoreTier::Fair
        } else {
            ScoreTier::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRow {
    pub position: usize,
    pub placement: Placement,
    pub cv_name: String,
    pub display_name: String,
    pub fit_score: f64,
    /// Score as shown in the badge: `80`, `72.5`.
    pub score_label: String,
    pub score_tier: ScoreTier,
    /// Catalog entry the result was matched to, used for previews.
    pub cv: CvDescriptor,
    /// Rule that found `cv` in the catalog; absent when it was synthesised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<MatchRule>,
    pub review: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultsView {
    Empty { notice: String },
    Ranked {
        summary: RankingSummary,
        rows: Vec<ReviewRow>,
    },
}

impl ResultsView {
    pub fn empty() -> Self {
        ResultsView::Empty {
            notice: NO_RESULTS_NOTICE.to_string(),
        }
    }
}

/// Builds one row per result, in the order given. `entries` are the
/// correlation targets of `source`.
pub fn build_rows(sorted: &[ReviewResult], entries: &[CvDescriptor], source: &str) -> Vec<ReviewRow> {
    sorted
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let position = i + 1;
            let correlation = resolve(&result.cv_name, &result.cv_path, entries, source);
            ReviewRow {
                position,
                placement: Placement::for_position(position),
                cv_name: result.cv_name.clone(),
                display_name: display_name(&result.cv_name, &result.cv_path),
                fit_score: result.fit_score,
                score_label: result.fit_score.to_string(),
                score_tier: ScoreTier::for_score(result.fit_score),
                cv: correlation.descriptor,
                matched_by: correlation.rule,
                review: result.review.clone(),
            }
        })
        .collect()
}

/// A batch response turned into something displayable.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResults {
    pub view: ResultsView,
    /// `None` for the empty view; ranking is never attempted on no results.
    pub ranking: Option<Ranking>,
}

pub fn render_results(
    results: &[ReviewResult],
    entries: &[CvDescriptor],
    source: &str,
) -> RenderedResults {
    if results.is_empty() {
        return RenderedResults {
            view: ResultsView::empty(),
            ranking: None,
        };
    }

    match Ranking::compute(results) {
        Ok(ranking) => {
            let rows = build_rows(&ranking.sorted, entries, source);
            RenderedResults {
                view: ResultsView::Ranked {
                    summary: ranking.summary.clone(),
                    rows,
                },
                ranking: Some(ranking),
            }
        }
        Err(_) => RenderedResults {
            view: ResultsView::empty(),
            ranking: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, score: f64) -> ReviewResult {
        ReviewResult {
            cv_name: name.to_string(),
            cv_path: String::new(),
            fit_score: score,
            review: "**Strong** Rust background".to_string(),
        }
    }

    fn catalog() -> Vec<CvDescriptor> {
        vec![CvDescriptor {
            name: "john_doe_cv.pdf".to_string(),
            path: "cvs/john_doe_cv.pdf".to_string(),
            source: "github".to_string(),
        }]
    }

    #[test]
    fn test_score_tiers() {
        assert_eq!(ScoreTier::for_score(80.0), ScoreTier::Excellent);
        assert_eq!(ScoreTier::for_score(79.9), ScoreTier::Good);
        assert_eq!(ScoreTier::for_score(65.0), ScoreTier::Good);
        assert_eq!(ScoreTier::for_score(50.0), ScoreTier::Fair);
        assert_eq!(ScoreTier::for_score(49.0), ScoreTier::Poor);
        assert_eq!(ScoreTier::for_score(-3.0), ScoreTier::Poor);
    }

    #[test]
    fn test_placements() {
        let placements: Vec<_> = (1..=5).map(Placement::for_position).collect();
        assert_eq!(
            placements,
            vec![
                Placement::First,
                Placement::Second,
                Placement::Third,
                Placement::Other,
                Placement::Other
            ]
        );
    }

    #[test]
    fn test_rows_follow_given_order() {
        let sorted = vec![result("john_doe_cv.pdf", 91.0), result("resume-bob.txt", 40.0)];
        let rows = build_rows(&sorted, &catalog(), "github");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].display_name, "John Doe");
        assert_eq!(rows[0].cv.path, "cvs/john_doe_cv.pdf");
        assert_eq!(rows[0].score_label, "91");
        assert_eq!(rows[0].review, "**Strong** Rust background");

        assert_eq!(rows[1].position, 2);
        assert_eq!(rows[1].placement, Placement::Second);
        assert_eq!(rows[1].score_tier, ScoreTier::Poor);
        assert_eq!(rows[1].display_name, "Bob");
        // No catalog entry: synthesised against the requested source.
        assert_eq!(rows[1].cv.name, "resume-bob.txt");
        assert_eq!(rows[1].cv.source, "github");
    }

    #[test]
    fn test_rows_report_match_rule() {
        let sorted = vec![result("john_doe_cv.pdf", 91.0), result("resume-bob.txt", 40.0)];
        let rows = build_rows(&sorted, &catalog(), "github");

        assert_eq!(rows[0].matched_by, Some(MatchRule::ExactName));
        assert_eq!(rows[1].matched_by, None);

        let matched = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(matched["matched_by"], "exact_name");
        let synthesised = serde_json::to_value(&rows[1]).unwrap();
        assert!(synthesised.get("matched_by").is_none());
    }

    #[test]
    fn test_rows_deterministic() {
        let sorted = vec![result("a.pdf", 70.0), result("b.pdf", 70.0)];
        assert_eq!(
            build_rows(&sorted, &catalog(), "github"),
            build_rows(&sorted, &catalog(), "github")
        );
    }

    #[test]
    fn test_render_empty_skips_ranking() {
        let rendered = render_results(&[], &catalog(), "github");
        assert_eq!(rendered.view, ResultsView::empty());
        assert!(rendered.ranking.is_none());
    }

    #[test]
    fn test_render_ranked() {
        let results = vec![result("low.pdf", 55.0), result("john_doe_cv.pdf", 85.5)];
        let rendered = render_results(&results, &catalog(), "github");

        let ranking = rendered.ranking.expect("ranking");
        assert_eq!(ranking.sorted[0].cv_name, "john_doe_cv.pdf");

        match rendered.view {
            ResultsView::Ranked { summary, rows } => {
                assert_eq!(summary.count, 2);
                assert_eq!(summary.top_score, 85.5);
                assert_eq!(rows[0].score_label, "85.5");
                assert_eq!(rows[0].placement, Placement::First);
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_view_serialization_tags_state() {
        let json = serde_json::to_value(ResultsView::empty()).unwrap();
        assert_eq!(json["state"], "empty");
        assert_eq!(json["notice"], NO_RESULTS_NOTICE);
    }
}
