//! Core domain types for land-listing evaluation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier column the master dataset must expose.
pub const DEFAULT_IDENTIFIER_FIELD: &str = "StockNumber";

// ---------------------------------------------------------------------------
// MasterRecord
// ---------------------------------------------------------------------------

/// One row of the master dataset, keyed by its unique identifier.
///
/// Fields preserve the dataset's column order; values are kept as raw
/// strings (the CSV cell content) — downstream analysis interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterRecord {
    identifier: String,
    fields: Vec<(String, String)>,
}

impl MasterRecord {
    /// Build a record from its identifier and ordered column/value pairs.
    pub fn new(identifier: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            identifier: identifier.into(),
            fields,
        }
    }

    /// The unique identifier value (e.g., the stock number).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Look up a column value by exact, case-sensitive name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the record's schema contains the given column.
    pub fn has_column(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    /// Column value, or `"Unknown"` when the column is absent.
    pub fn get_or_unknown(&self, column: &str) -> String {
        self.get(column).unwrap_or("Unknown").to_string()
    }
}

// ---------------------------------------------------------------------------
// SegmentSpec / Extract
// ---------------------------------------------------------------------------

/// A named group of expected columns feeding one downstream analysis concern.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    /// Segment name (also the key in the segmentation result).
    pub name: &'static str,
    /// File name of the materialized extract within the staging area.
    pub file_name: &'static str,
    /// Expected columns, in the order they should appear in the extract.
    pub columns: Vec<&'static str>,
}

impl SegmentSpec {
    /// The fixed segment registry for land-listing evaluation.
    ///
    /// Column names match the master dataset exactly (case-sensitive).
    pub fn registry() -> Vec<SegmentSpec> {
        vec![
            SegmentSpec {
                name: "property",
                file_name: "property.csv",
                columns: vec!["Property Address", "City", "State", "Zip"],
            },
            SegmentSpec {
                name: "environmental",
                file_name: "environmental.csv",
                columns: vec![
                    "In SFHA",
                    "Fema Flood Zone",
                    "FEMA Map Date",
                    "Floodplain Area",
                ],
            },
            SegmentSpec {
                name: "growthTrends",
                file_name: "growthTrends.csv",
                columns: vec![
                    "% Pop Grwth 2020-2024(5m)",
                    "% Pop Grwth 2024-2029(5m)",
                    "% Pop Grwth 2020-2024(10m)",
                    "% Pop Grwth 2024-2029(10m)",
                    "% HU Grwth 2020-2024(5m)",
                    "% HU Grwth 2020-2024(10m)",
                ],
            },
            SegmentSpec {
                name: "housingUnitsAndOccupancy",
                file_name: "housingUnitsAndOccupancy.csv",
                columns: vec![
                    "TotHUs_5",
                    "OccHUs_5",
                    "OwnerOcc_5",
                    "RenterOcc_5",
                    "AvgOwnerHHSize_5",
                    "AvgRenterHHSize_5",
                    "VacHUs_5",
                    "VacantForSale_5",
                    "VacantForRent_5",
                    "VacantSeasonal_5",
                    "MobileHomes_5",
                    "MobileHomesPerK_5",
                    "TotHUs_10",
                    "OccHUs_10",
                    "OwnerOcc_10",
                    "RenterOcc_10",
                    "AvgOwnerHHSize_10",
                    "AvgRenterHHSize_10",
                    "VacHUs_10",
                    "VacantForSale_10",
                    "VacantForRent_10",
                    "VacantSeasonal_10",
                    "MobileHomes_10",
                    "MobileHomesPerK_10",
                ],
            },
            SegmentSpec {
                // Demographics plus affordability data points.
                name: "demographics",
                file_name: "demographics.csv",
                columns: vec![
                    "TotPop_5",
                    "Age0_4_5",
                    "Age5_9_5",
                    "Age10_14_5",
                    "Age15_19_5",
                    "Age20_24_5",
                    "Age25_34_5",
                    "Age35_44_5",
                    "Age45_54_5",
                    "Age55_59_5",
                    "Age60_64_5",
                    "Age65_74_5",
                    "Age75_84_5",
                    "Over85_5",
                    "TotHHs_5",
                    "MedianHHInc_5",
                    "AvgHHInc_5",
                    "InKindergarten_5",
                    "InElementary_5",
                    "InHighSchool_5",
                    "InCollege_5",
                    "Disabled_5",
                    "DisabledUnder18_5",
                    "NonInst18_64_5",
                    "Disabled18_64_5",
                    "NonInstOver65_5",
                    "DisabledElder_5",
                    "TotPop_10",
                    "Age0_4_10",
                    "Age5_9_10",
                    "Age10_14_10",
                    "Age15_19_10",
                    "Age20_24_10",
                    "Age25_34_10",
                    "Age35_44_10",
                    "Age45_54_10",
                    "Age55_59_10",
                    "Age60_64_10",
                    "Age65_74_10",
                    "Age75_84_10",
                    "Over85_10",
                    "TotHHs_10",
                    "MedianHHInc_10",
                    "AvgHHInc_10",
                    "InKindergarten_10",
                    "InElementary_10",
                    "InHighSchool_10",
                    "InCollege_10",
                    "Disabled_10",
                    "DisabledUnder18_10",
                    "NonInst18_64_10",
                    "Disabled18_64_10",
                    "NonInstOver65_10",
                    "DisabledElder_10",
                    "HvalUnder50_5",
                    "Hval50_5",
                    "Hval100_5",
                    "Hval150_5",
                    "Hval200_5",
                    "Hval300_5",
                    "Hval500_5",
                    "HvalOverMillion_5",
                    "HvalOver2Million_5",
                    "MedianHValue_5",
                    "MedianGrossRent_5",
                    "AvgGrossRent_5",
                    "HvalUnder50_10",
                    "Hval50_10",
                    "Hval100_10",
                    "Hval150_10",
                    "Hval200_10",
                    "Hval300_10",
                    "Hval500_10",
                    "HvalOverMillion_10",
                    "HvalOver2Million_10",
                    "MedianHValue_10",
                    "MedianGrossRent_10",
                    "AvgGrossRent_10",
                ],
            },
        ]
    }
}

/// A materialized projection of one record onto one segment's columns.
#[derive(Debug, Clone)]
pub struct Extract {
    /// Segment name this extract was produced for.
    pub segment: String,
    /// Path of the written CSV file in the staging area.
    pub path: PathBuf,
    /// Columns actually emitted (spec order, present-only).
    pub columns: Vec<String>,
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// Status of a single engine step. Closed set; anything else maps to
/// [`StepStatus::Unknown`] during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Failed,
    Running,
    Pending,
    #[serde(other)]
    Unknown,
}

/// Outcome of one step in a structured engine result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Step status.
    pub status: StepStatus,
    /// Step output text. May contain a `Final Answer:` delimiter that
    /// separates reasoning preamble from the final answer.
    #[serde(default)]
    pub output: String,
}

/// The engine's result, classified once at the boundary so downstream
/// logic matches on a known tag instead of probing value shapes.
#[derive(Debug, Clone)]
pub enum AnalysisResult {
    /// The engine returned the report body directly.
    PlainText(String),
    /// The engine returned per-step outcomes alongside the raw value.
    Structured {
        steps: Vec<StepOutcome>,
        raw: serde_json::Value,
    },
    /// Anything else; kept verbatim for textual fallback.
    Unknown(serde_json::Value),
}

impl AnalysisResult {
    /// Classify a raw engine value into the tagged union.
    ///
    /// Strings are plain text. Objects exposing a `task_results` array
    /// are structured; entries that fail to parse as [`StepOutcome`] are
    /// dropped (the raw value is retained for fallback). Everything else
    /// is [`AnalysisResult::Unknown`].
    pub fn classify(value: serde_json::Value) -> Self {
        if let serde_json::Value::String(s) = value {
            return Self::PlainText(s);
        }

        if let Some(task_results) = value.get("task_results").and_then(|v| v.as_array()) {
            let steps: Vec<StepOutcome> = task_results
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect();
            return Self::Structured { steps, raw: value };
        }

        Self::Unknown(value)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Styled HTML document (preferred).
    RichDocument,
    /// Verbatim text file (degraded fallback).
    PlainText,
}

impl ReportFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::RichDocument => "html",
            Self::PlainText => "md",
        }
    }
}

/// The rendered artifact for one run. Never mutated after write.
#[derive(Debug, Clone)]
pub struct Report {
    /// Which renderer produced the artifact.
    pub format: ReportFormat,
    /// Path of the written file.
    pub path: PathBuf,
    /// Listing identifier embedded in the filename.
    pub listing_id: String,
    /// When the report was written.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Engine boundary types
// ---------------------------------------------------------------------------

/// Execution verb crossing the engine boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
pub enum EngineCommand {
    /// Single evaluation run.
    Run,
    /// Training run: n iterations, results saved to the given file.
    Train {
        iterations: u32,
        save_path: PathBuf,
    },
    /// Replay from a previously executed task.
    Replay { task_id: String },
}

/// Named inputs handed to the engine: identifying metadata for the
/// selected listing plus the staged extract paths, keyed by segment.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInputs {
    pub listing_id: String,
    pub city: String,
    pub state: String,
    pub property_address: String,
    pub extract_paths: BTreeMap<String, PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_lookup_is_case_sensitive() {
        let record = MasterRecord::new(
            "A1",
            vec![
                ("City".into(), "Springfield".into()),
                ("Zip".into(), "12345".into()),
            ],
        );
        assert_eq!(record.get("City"), Some("Springfield"));
        assert_eq!(record.get("city"), None);
        assert_eq!(record.get_or_unknown("State"), "Unknown");
    }

    #[test]
    fn registry_declares_five_segments() {
        let specs = SegmentSpec::registry();
        let names: Vec<&str> = specs.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "property",
                "environmental",
                "growthTrends",
                "housingUnitsAndOccupancy",
                "demographics"
            ]
        );
        assert_eq!(specs[0].columns, vec!["Property Address", "City", "State", "Zip"]);
    }

    #[test]
    fn classify_string_is_plain_text() {
        let result = AnalysisResult::classify(json!("report body"));
        assert!(matches!(result, AnalysisResult::PlainText(s) if s == "report body"));
    }

    #[test]
    fn classify_task_results_is_structured() {
        let value = json!({
            "task_results": [
                { "status": "completed", "output": "done" },
                { "status": "somethingelse", "output": "x" },
            ]
        });
        match AnalysisResult::classify(value) {
            AnalysisResult::Structured { steps, .. } => {
                assert_eq!(steps.len(), 2);
                assert_eq!(steps[0].status, StepStatus::Completed);
                assert_eq!(steps[1].status, StepStatus::Unknown);
            }
            other => panic!("expected Structured, got {other:?}"),
        }
    }

    #[test]
    fn classify_everything_else_is_unknown() {
        let result = AnalysisResult::classify(json!({ "unexpected": true }));
        assert!(matches!(result, AnalysisResult::Unknown(_)));

        let result = AnalysisResult::classify(json!(42));
        assert!(matches!(result, AnalysisResult::Unknown(_)));
    }

    #[test]
    fn report_format_extensions() {
        assert_eq!(ReportFormat::RichDocument.extension(), "html");
        assert_eq!(ReportFormat::PlainText.extension(), "md");
    }

    #[test]
    fn engine_command_serializes_with_verb_tag() {
        let cmd = EngineCommand::Replay {
            task_id: "t-42".into(),
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["verb"], "replay");
        assert_eq!(value["task_id"], "t-42");
    }
}
