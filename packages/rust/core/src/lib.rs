//! Pipeline orchestration and the analysis engine boundary for landeval.

pub mod engine;
pub mod pipeline;

pub use engine::{AnalysisEngine, BridgeEngine};
pub use pipeline::{
    EvaluationConfig, EvaluationResult, ProgressReporter, SilentProgress, evaluate, replay,
};
