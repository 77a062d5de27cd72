//! Projects one master record into per-segment extracts.

use std::collections::BTreeMap;

use tracing::{info, instrument, warn};

use landeval_shared::{Extract, LandEvalError, MasterRecord, Result, SegmentSpec};

use crate::staging::StagingArea;

/// Non-fatal coverage warning recorded during segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentWarning {
    /// Segment the warning applies to.
    pub segment: String,
    /// Declared columns absent from the record's schema.
    pub missing: Vec<String>,
}

/// Result of segmenting one record: the written extracts keyed by
/// segment name, plus recorded diagnostics. Segments with zero matching
/// columns are absent from `extracts` and listed in `skipped`.
#[derive(Debug, Default)]
pub struct Segmentation {
    pub extracts: BTreeMap<String, Extract>,
    pub warnings: Vec<SegmentWarning>,
    pub skipped: Vec<String>,
}

/// Check column coverage for one segment.
///
/// Returns true iff at least one declared column is present — partial
/// coverage is allowed (and warned about), only an empty intersection
/// blocks materialization.
pub fn validate_coverage(segment: &str, present: &[&str], required: &[&str]) -> bool {
    if present.len() < required.len() {
        let missing: Vec<&&str> = required.iter().filter(|c| !present.contains(c)).collect();
        warn!(segment, ?missing, "segment has partial column coverage");
    }
    !present.is_empty()
}

/// Project `record` onto each spec's available columns and write one CSV
/// extract per materialized segment into the staging area.
///
/// Extract columns are exactly `spec.columns ∩ record.columns`, in the
/// spec-declared order. Writing is deterministic: re-running the same
/// listing overwrites the same paths.
#[instrument(skip_all, fields(listing_id = record.identifier(), specs = specs.len()))]
pub fn segment(
    record: &MasterRecord,
    specs: &[SegmentSpec],
    staging: &StagingArea,
) -> Result<Segmentation> {
    let mut result = Segmentation::default();

    for spec in specs {
        let present: Vec<&str> = spec
            .columns
            .iter()
            .copied()
            .filter(|c| record.has_column(c))
            .collect();

        if !validate_coverage(spec.name, &present, &spec.columns) {
            warn!(segment = spec.name, "no declared columns present, skipping segment");
            result.skipped.push(spec.name.to_string());
            continue;
        }

        if present.len() < spec.columns.len() {
            let missing: Vec<String> = spec
                .columns
                .iter()
                .filter(|c| !present.contains(c))
                .map(|c| c.to_string())
                .collect();
            result.warnings.push(SegmentWarning {
                segment: spec.name.to_string(),
                missing,
            });
        }

        let path = staging.path_for(spec.file_name);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&present)?;
        writer.write_record(present.iter().map(|c| record.get(c).unwrap_or_default()))?;
        writer.flush().map_err(|e| LandEvalError::io(&path, e))?;

        info!(
            segment = spec.name,
            columns = present.len(),
            path = %path.display(),
            "extract written"
        );

        result.extracts.insert(
            spec.name.to_string(),
            Extract {
                segment: spec.name.to_string(),
                path,
                columns: present.iter().map(|c| c.to_string()).collect(),
            },
        );
    }

    Ok(result)
}
