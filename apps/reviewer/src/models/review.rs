use serde::{Deserialize, Serialize};

/// A scored review produced by the batch endpoint of the review service.
///
/// `cv_name` / `cv_path` are echoed back by the service and may not match the
/// catalog byte for byte (path encoding, renamed files).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub cv_name: String,
    #[serde(default)]
    pub cv_path: String,
    pub fit_score: f64,
    pub review: String,
}

/// Review of a single CV. The single-review path does not guarantee a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleReview {
    pub cv_name: String,
    pub review: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_score: Option<f64>,
}
