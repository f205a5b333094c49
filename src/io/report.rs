//! Prediction report output.

use crate::core::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Predicted class for one test record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub id: i64,
    pub label: String,
}

/// Render predictions as `<id>\t<label>` lines in the given order.
pub fn format_predictions(predictions: &[Prediction]) -> String {
    let mut out = String::new();
    for prediction in predictions {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}\t{}", prediction.id, prediction.label);
    }
    out
}

/// Write the full report in one go so a failed run never leaves a partial file.
pub fn write_predictions(path: &Path, predictions: &[Prediction]) -> Result<()> {
    tracing::info!(
        path = %path.display(),
        predictions = predictions.len(),
        "writing prediction report"
    );
    super::write_file(path, &format_predictions(predictions))
}
