//! Downloadable forms of the ranked results.

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::naming::display_name;
use crate::models::review::ReviewResult;

const SUMMARY_CHARS: usize = 200;
const ELLIPSIS: &str = "...";
const CSV_HEADERS: [&str; 5] = ["Rank", "CV Name", "Owner", "Fit Score", "Review Summary"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output was not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for ExportError {
    fn from(err: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        ExportError::Csv(csv::Error::from(err.into_error()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => "cv_rankings.json",
            ExportFormat::Csv => "cv_rankings.csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

pub fn export(results: &[ReviewResult], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => to_json(results),
        ExportFormat::Csv => to_csv(results),
    }
}

/// Pretty-printed JSON; keys follow the `ReviewResult` field order.
pub fn to_json(results: &[ReviewResult]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// One row per result in the order given, which must be the ranked order.
/// Fields are quoted only when they need to be; embedded quotes are doubled.
pub fn to_csv(results: &[ReviewResult]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for (i, result) in results.iter().enumerate() {
        writer.write_record([
            (i + 1).to_string(),
            result.cv_name.clone(),
            display_name(&result.cv_name, &result.cv_path),
            result.fit_score.to_string(),
            summarize(&result.review),
        ])?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// First 200 characters of the review, with `...` when anything was cut.
fn summarize(review: &str) -> String {
    match review.char_indices().nth(SUMMARY_CHARS) {
        Some((cut, _)) => format!("{}{}", &review[..cut], ELLIPSIS),
        None => review.to_string(),
    }
}
