//! JSON output formatter.
//!
//! Serializes a [`ScanReport`] directly — every field already carries its
//! own `serde` derive, so this is a thin wrapper that exists for symmetry
//! with [`super::pretty`].

use crate::finding::ScanReport;

/// Formats a [`ScanReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid
/// data — every field type implements `Serialize`).
pub fn format(report: &ScanReport) -> String {
    serde_json::to_string_pretty(report).expect("JSON serialization failed")
}
