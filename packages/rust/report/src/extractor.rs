//! Normalizes a heterogeneous engine result into one reportable text body.

use tracing::{debug, error};

use landeval_shared::{AnalysisResult, StepStatus};

/// Delimiter separating an engine step's reasoning preamble from its
/// final answer.
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Fixed diagnostic body used when no text can be recovered at all.
/// A degraded report is always preferable to no report.
pub const EXTRACTION_FAILED_NOTICE: &str =
    "Report extraction failed. Check the run logs for more information.";

/// Extract the report body from a classified engine result.
///
/// Resolution order, first match wins:
/// 1. Plain text is returned unchanged.
/// 2. Structured outcomes are scanned in reverse for the first completed
///    step with non-empty output; a `Final Answer:` delimiter keeps only
///    the substring after its first occurrence, trimmed.
/// 3. Otherwise the raw value's textual representation.
///
/// This function never fails — the worst case is the fixed diagnostic
/// notice, so a report is always attempted downstream.
pub fn extract_report_text(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::PlainText(text) => text.clone(),
        AnalysisResult::Structured { steps, raw } => {
            for step in steps.iter().rev() {
                if step.status == StepStatus::Completed && !step.output.is_empty() {
                    return split_final_answer(&step.output);
                }
            }
            debug!("no completed step with output, falling back to raw value");
            value_text(raw)
        }
        AnalysisResult::Unknown(value) => value_text(value),
    }
}

/// Keep only the text after the first `Final Answer:` marker, trimmed.
/// Output without the marker is returned verbatim.
fn split_final_answer(output: &str) -> String {
    match output.split_once(FINAL_ANSWER_MARKER) {
        Some((_, answer)) => answer.trim().to_string(),
        None => output.to_string(),
    }
}

/// Textual representation of an arbitrary JSON value.
fn value_text(value: &serde_json::Value) -> String {
    if let serde_json::Value::String(s) = value {
        return s.clone();
    }
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        error!(error = %e, "could not serialize raw engine result");
        EXTRACTION_FAILED_NOTICE.to_string()
    })
}
