//! Result extraction and report rendering for landeval.
//!
//! Takes the engine's heterogeneous result, normalizes it into a text
//! body, and turns that into a durable artifact — a styled HTML document
//! when the `rich-reports` feature is available, a verbatim Markdown
//! file otherwise.

pub mod extractor;
pub mod renderer;
pub mod rich;

pub use extractor::{EXTRACTION_FAILED_NOTICE, FINAL_ANSWER_MARKER, extract_report_text};
pub use renderer::ReportRenderer;
