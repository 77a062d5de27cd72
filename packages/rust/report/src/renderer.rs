//! Report rendering with graceful degradation.
//!
//! Each render call probes the rich capability first and falls back to a
//! verbatim plain-text artifact when the rich path is unavailable or
//! fails mid-flight. Exactly one artifact is produced per call.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use landeval_shared::{LandEvalError, Report, ReportFormat, Result};

use crate::rich;

/// Filename stamp format; collisions within one second for the same
/// listing are an accepted limitation.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Renders report text into a durable artifact in the output directory.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    output_dir: PathBuf,
}

impl ReportRenderer {
    /// Create a renderer writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Output directory for rendered artifacts.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `text` for `listing_id`, preferring the rich document.
    ///
    /// The rich capability is probed per call — a previous failure does
    /// not permanently disable it. Any rich-path failure degrades to the
    /// plain-text fallback for this call only, so a report is always
    /// produced when the filesystem cooperates at all.
    #[instrument(skip(self, text), fields(listing_id = listing_id, chars = text.len()))]
    pub fn render(&self, text: &str, listing_id: &str) -> Result<Report> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| LandEvalError::io(&self.output_dir, e))?;

        let now = Utc::now();

        match rich::probe() {
            Ok(()) => match self.render_rich(text, listing_id, now) {
                Ok(report) => return Ok(report),
                Err(e) => {
                    warn!(error = %e, "rich rendering failed, falling back to plain text");
                }
            },
            Err(e) => {
                debug!(error = %e, "rich renderer unavailable");
            }
        }

        self.render_fallback(text, listing_id, now)
    }

    /// Artifact path: `Land_Evaluation_{listingId}_{timestamp}.{ext}`.
    fn artifact_path(
        &self,
        listing_id: &str,
        format: ReportFormat,
        now: DateTime<Utc>,
    ) -> PathBuf {
        let stamp = now.format(TIMESTAMP_FORMAT);
        self.output_dir.join(format!(
            "Land_Evaluation_{listing_id}_{stamp}.{}",
            format.extension()
        ))
    }

    #[cfg(feature = "rich-reports")]
    fn render_rich(&self, text: &str, listing_id: &str, now: DateTime<Utc>) -> Result<Report> {
        let generated_on = now.format("%B %d, %Y").to_string();
        let document = rich::to_document(text, listing_id, &generated_on)?;

        let path = self.artifact_path(listing_id, ReportFormat::RichDocument, now);
        std::fs::write(&path, document).map_err(|e| LandEvalError::io(&path, e))?;

        info!(path = %path.display(), "rich report written");
        Ok(Report {
            format: ReportFormat::RichDocument,
            path,
            listing_id: listing_id.to_string(),
            created_at: now,
        })
    }

    #[cfg(not(feature = "rich-reports"))]
    fn render_rich(&self, _text: &str, _listing_id: &str, _now: DateTime<Utc>) -> Result<Report> {
        Err(LandEvalError::Render("rich renderer not compiled in".into()))
    }

    /// Write the unmodified text verbatim as the fallback artifact.
    fn render_fallback(&self, text: &str, listing_id: &str, now: DateTime<Utc>) -> Result<Report> {
        let path = self.artifact_path(listing_id, ReportFormat::PlainText, now);
        std::fs::write(&path, text).map_err(|e| LandEvalError::io(&path, e))?;

        info!(path = %path.display(), "plain-text report written");
        Ok(Report {
            format: ReportFormat::PlainText,
            path,
            listing_id: listing_id.to_string(),
            created_at: now,
        })
    }
}
