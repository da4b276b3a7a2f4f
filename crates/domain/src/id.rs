//! ID generation utilities.

use uuid::Uuid;

/// Generates a new run identifier.
///
/// UUID v7 includes timestamp information, so run ids sort by start time.
#[must_use]
pub fn generate_run_id() -> String {
    Uuid::now_v7().to_string()
}
