//! Output formatting for scan reports.
//!
//! Two formats are supported:
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//!
//! Use [`format_report`] to render a [`ScanReport`] in either of the above
//! formats.

pub mod json;
pub mod pretty;

use crate::finding::ScanReport;

/// Supported output formats for scan reports.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text with per-analyzer status and a verdict line.
    Pretty,
    /// Machine-readable JSON, a direct serialization of [`ScanReport`].
    Json,
}

/// Formats a [`ScanReport`] in the requested [`OutputFormat`].
///
/// # Examples
///
/// ```rust,no_run
/// use clawscan::output::{format_report, OutputFormat};
/// # use clawscan::finding::ScanReport;
/// # fn example(report: &ScanReport) {
/// let json = format_report(report, &OutputFormat::Json);
/// println!("{json}");
/// # }
/// ```
pub fn format_report(report: &ScanReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(report),
        OutputFormat::Json => json::format(report),
    }
}
