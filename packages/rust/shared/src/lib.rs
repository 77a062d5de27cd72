//! Shared types, error model, and configuration for landeval.
//!
//! This crate is the foundation depended on by all other landeval crates.
//! It provides:
//! - [`LandEvalError`] — the unified error type
//! - Domain types ([`MasterRecord`], [`SegmentSpec`], [`AnalysisResult`], [`Report`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DataConfig, EngineConfig, ReportsConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{LandEvalError, Result};
pub use types::{
    AnalysisResult, DEFAULT_IDENTIFIER_FIELD, EngineCommand, EngineInputs, Extract,
    MasterRecord, Report, ReportFormat, SegmentSpec, StepOutcome, StepStatus,
};
