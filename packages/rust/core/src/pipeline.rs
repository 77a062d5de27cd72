//! End-to-end evaluation pipeline:
//! dataset → selection → segmentation → engine → extraction → report → cleanup.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};

use landeval_dataset::{RecordStore, SelectionStrategy, StagingArea, segmenter};
use landeval_report::{ReportRenderer, extract_report_text};
use landeval_shared::{
    AnalysisResult, EngineCommand, EngineInputs, LandEvalError, Report, Result, SegmentSpec,
};

use crate::engine::AnalysisEngine;

/// Configuration for one evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Path to the master dataset CSV.
    pub master_path: PathBuf,
    /// Staging directory for per-run extracts.
    pub staging_dir: PathBuf,
    /// Output directory for rendered reports.
    pub reports_dir: PathBuf,
    /// Identifier column name (normally `StockNumber`).
    pub identifier_field: String,
    /// Execution verb handed to the engine.
    pub command: EngineCommand,
}

/// Result of a completed evaluation run.
#[derive(Debug)]
pub struct EvaluationResult {
    /// The rendered report artifact.
    pub report: Report,
    /// The selected listing identifier.
    pub listing_id: String,
    /// Number of extracts materialized for the engine.
    pub extract_count: usize,
    /// Number of partial-coverage warnings recorded during segmentation.
    pub warning_count: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &EvaluationResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &EvaluationResult) {}
}

/// Run the full evaluation pipeline.
///
/// 1. Load the master dataset (fatal on missing file or identifier column)
/// 2. Select a record via the injected strategy
/// 3. Segment the record into staged extracts
/// 4. Invoke the opaque analysis engine
/// 5. Extract the report text and render the artifact
/// 6. Clear staged extracts — on success only; failures keep them for diagnosis
#[instrument(skip_all, fields(master = %config.master_path.display()))]
pub fn evaluate(
    config: &EvaluationConfig,
    engine: &dyn AnalysisEngine,
    selector: &dyn SelectionStrategy,
    progress: &dyn ProgressReporter,
) -> Result<EvaluationResult> {
    let start = Instant::now();

    // --- Phase 1: Dataset ---
    progress.phase("Loading master dataset");
    let store = RecordStore::load(&config.master_path, &config.identifier_field)?;

    let ids = store.list_identifiers();
    if ids.is_empty() {
        return Err(LandEvalError::validation(format!(
            "no records found in {}",
            config.master_path.display()
        )));
    }

    // --- Phase 2: Selection ---
    let listing_id = selector.select(&ids)?;
    let record = store
        .find_by_identifier(&listing_id)
        .ok_or_else(|| LandEvalError::NoMatchingRecord {
            id: listing_id.clone(),
        })?;

    info!(
        listing_id = %listing_id,
        city = %record.get_or_unknown("City"),
        state = %record.get_or_unknown("State"),
        "starting evaluation"
    );

    // --- Phase 3: Segmentation ---
    progress.phase("Segmenting record");
    let staging = StagingArea::new(&config.staging_dir)?;
    let segmentation = segmenter::segment(record, &SegmentSpec::registry(), &staging)?;

    if segmentation.extracts.is_empty() {
        return Err(LandEvalError::validation(
            "no segment produced an extract; nothing to analyze",
        ));
    }

    let inputs = EngineInputs {
        listing_id: listing_id.clone(),
        city: record.get_or_unknown("City"),
        state: record.get_or_unknown("State"),
        property_address: record.get_or_unknown("Property Address"),
        extract_paths: segmentation
            .extracts
            .iter()
            .map(|(name, extract)| (name.clone(), extract.path.clone()))
            .collect(),
    };

    // --- Phase 4: Engine ---
    progress.phase("Running analysis engine");
    let raw = engine.execute(&config.command, Some(&inputs))?;

    // --- Phase 5: Extraction & rendering ---
    progress.phase("Rendering report");
    let classified = AnalysisResult::classify(raw);
    let text = extract_report_text(&classified);

    let report_listing_id = match &config.command {
        EngineCommand::Train { .. } => format!("{listing_id}_training"),
        _ => listing_id.clone(),
    };

    let renderer = ReportRenderer::new(&config.reports_dir);
    let report = renderer.render(&text, &report_listing_id)?;

    // --- Phase 6: Cleanup (success path only) ---
    progress.phase("Cleaning up extracts");
    staging.clear();

    let result = EvaluationResult {
        report,
        listing_id,
        extract_count: segmentation.extracts.len(),
        warning_count: segmentation.warnings.len(),
        elapsed: start.elapsed(),
    };

    info!(
        listing_id = %result.listing_id,
        report = %result.report.path.display(),
        extracts = result.extract_count,
        elapsed_ms = result.elapsed.as_millis(),
        "evaluation complete"
    );

    progress.done(&result);
    Ok(result)
}

/// Replay a previous engine execution and render its report.
///
/// No dataset access, no staging, no cleanup — the engine re-executes
/// from its own checkpoint. The artifact is named `replay_{task_id}`.
#[instrument(skip_all, fields(task_id = task_id))]
pub fn replay(
    reports_dir: &std::path::Path,
    engine: &dyn AnalysisEngine,
    task_id: &str,
) -> Result<Report> {
    let command = EngineCommand::Replay {
        task_id: task_id.to_string(),
    };

    let raw = engine.execute(&command, None)?;
    let classified = AnalysisResult::classify(raw);
    let text = extract_report_text(&classified);

    ReportRenderer::new(reports_dir).render(&text, &format!("replay_{task_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use landeval_dataset::FixedSelection;
    use serde_json::json;
    use std::cell::RefCell;
    use std::path::Path;

    /// Scripted engine for pipeline tests; records the inputs it saw.
    struct StubEngine {
        response: serde_json::Value,
        seen_inputs: RefCell<Option<EngineInputs>>,
    }

    impl StubEngine {
        fn completed(body: &str) -> Self {
            Self {
                response: json!({
                    "task_results": [
                        { "status": "completed", "output": format!("Final Answer: {body}") }
                    ]
                }),
                seen_inputs: RefCell::new(None),
            }
        }
    }

    impl AnalysisEngine for StubEngine {
        fn execute(
            &self,
            _command: &EngineCommand,
            inputs: Option<&EngineInputs>,
        ) -> Result<serde_json::Value> {
            *self.seen_inputs.borrow_mut() = inputs.cloned();
            Ok(self.response.clone())
        }
    }

    /// Engine that always fails, for extract-retention tests.
    struct FailingEngine;

    impl AnalysisEngine for FailingEngine {
        fn execute(
            &self,
            _command: &EngineCommand,
            _inputs: Option<&EngineInputs>,
        ) -> Result<serde_json::Value> {
            Err(LandEvalError::Engine("model unavailable".into()))
        }
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("le-pipe-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_master(dir: &Path) -> PathBuf {
        let path = dir.join("master.csv");
        std::fs::write(
            &path,
            "StockNumber,Property Address,City,State,Zip,In SFHA,TotHUs_5,TotPop_5\n\
             A1,123 Main St,Springfield,IL,62701,No,1000,5000\n",
        )
        .unwrap();
        path
    }

    fn config(dir: &Path, command: EngineCommand) -> EvaluationConfig {
        EvaluationConfig {
            master_path: dir.join("master.csv"),
            staging_dir: dir.join("cork"),
            reports_dir: dir.join("reports"),
            identifier_field: "StockNumber".into(),
            command,
        }
    }

    #[test]
    fn end_to_end_run_produces_report_and_cleans_up() {
        let tmp = temp_dir();
        write_master(&tmp);

        let engine = StubEngine::completed("Report body");
        let selector = FixedSelection("A1".into());
        let config = config(&tmp, EngineCommand::Run);

        let result = evaluate(&config, &engine, &selector, &SilentProgress).unwrap();

        assert_eq!(result.listing_id, "A1");
        // property, environmental, housingUnitsAndOccupancy, demographics
        // all have at least one present column; growthTrends has none.
        assert_eq!(result.extract_count, 4);

        let content = std::fs::read_to_string(&result.report.path).unwrap();
        assert!(content.contains("Report body"));
        assert!(!content.contains("Final Answer"));

        // Extracts cleared on success; staging dir survives.
        assert!(config.staging_dir.exists());
        assert!(!config.staging_dir.join("property.csv").exists());

        // The engine saw the staged extract paths and listing metadata.
        let inputs = engine.seen_inputs.borrow();
        let inputs = inputs.as_ref().unwrap();
        assert_eq!(inputs.city, "Springfield");
        assert!(inputs.extract_paths.contains_key("property"));
        assert!(!inputs.extract_paths.contains_key("growthTrends"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn extract_columns_are_spec_intersection() {
        let tmp = temp_dir();
        write_master(&tmp);

        let selector = FixedSelection("A1".into());
        let config = config(&tmp, EngineCommand::Run);

        // A failing engine keeps the extracts around for inspection.
        let _ = evaluate(&config, &FailingEngine, &selector, &SilentProgress);

        let property = std::fs::read_to_string(config.staging_dir.join("property.csv")).unwrap();
        assert_eq!(
            property,
            "Property Address,City,State,Zip\n123 Main St,Springfield,IL,62701\n"
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_identifier_column_fails_before_any_staging_io() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("master.csv"), "City,State\nSpringfield,IL\n").unwrap();

        let config = config(&tmp, EngineCommand::Run);
        let err = evaluate(
            &config,
            &StubEngine::completed("x"),
            &FixedSelection("A1".into()),
            &SilentProgress,
        )
        .unwrap_err();

        assert!(matches!(err, LandEvalError::Schema { .. }));
        assert!(!config.staging_dir.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unknown_identifier_writes_nothing() {
        let tmp = temp_dir();
        write_master(&tmp);

        let config = config(&tmp, EngineCommand::Run);
        let err = evaluate(
            &config,
            &StubEngine::completed("x"),
            &FixedSelection("ZZ".into()),
            &SilentProgress,
        )
        .unwrap_err();

        assert!(matches!(err, LandEvalError::NoMatchingRecord { .. }));
        assert!(!config.staging_dir.exists());
        assert!(!config.reports_dir.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn engine_failure_retains_extracts_for_diagnosis() {
        let tmp = temp_dir();
        write_master(&tmp);

        let config = config(&tmp, EngineCommand::Run);
        let err = evaluate(
            &config,
            &FailingEngine,
            &FixedSelection("A1".into()),
            &SilentProgress,
        )
        .unwrap_err();

        assert!(matches!(err, LandEvalError::Engine(_)));
        assert!(config.staging_dir.join("property.csv").exists());
        assert!(config.staging_dir.join("demographics.csv").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn train_run_suffixes_report_listing_id() {
        let tmp = temp_dir();
        write_master(&tmp);

        let config = config(
            &tmp,
            EngineCommand::Train {
                iterations: 3,
                save_path: tmp.join("trained.json"),
            },
        );

        let result = evaluate(
            &config,
            &StubEngine::completed("trained"),
            &FixedSelection("A1".into()),
            &SilentProgress,
        )
        .unwrap();

        let name = result.report.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.contains("A1_training"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn replay_renders_with_task_id_and_touches_no_staging() {
        let tmp = temp_dir();

        let engine = StubEngine::completed("replayed body");
        let report = replay(&tmp.join("reports"), &engine, "task-7").unwrap();

        let name = report.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.contains("replay_task-7"));
        assert!(engine.seen_inputs.borrow().is_none());
        assert!(!tmp.join("cork").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
