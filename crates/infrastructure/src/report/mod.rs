//! Run report rendering.

mod text;

pub use text::render_text;

use eavesdrop_domain::{ReportFormat, RunReport};

use crate::serialization::{SerializationError, to_json_stable};

/// Renders a report in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(report: &RunReport, format: ReportFormat) -> Result<String, SerializationError> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => to_json_stable(report),
    }
}
