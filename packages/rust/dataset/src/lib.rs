//! Master dataset access, segmentation, and staging for landeval.
//!
//! This crate owns the data side of the pipeline:
//! - [`RecordStore`] — dataset loading and identifier lookup
//! - [`segmenter`] — projecting a record into per-segment extracts
//! - [`StagingArea`] — the scoped working directory for extracts
//! - [`selection`] — injected record-selection strategies

pub mod segmenter;
pub mod selection;
pub mod staging;
pub mod store;

pub use segmenter::{Segmentation, SegmentWarning, segment, validate_coverage};
pub use selection::{FixedSelection, PromptSelection, SelectionStrategy};
pub use staging::StagingArea;
pub use store::RecordStore;
