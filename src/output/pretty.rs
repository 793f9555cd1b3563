//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly report: a header, per-analyzer timing/status
//! line, the finding list with source locations and snippets, and a one-line
//! verdict summary.

use crate::finding::{AnalyzerStatus, ScanReport, Severity};
use colored::Colorize;

/// Formats a [`ScanReport`] as human-readable, ANSI-colored text.
///
/// Sections rendered (in order):
/// 1. **Header** — resolved path and timestamp.
/// 2. **Analyzers** — per-analyzer finding count / timing / error status.
/// 3. **Findings** — every finding with severity, rule, location, snippet.
/// 4. **Verdict** — risk label, emoji, score, and severity counts.
pub fn format(report: &ScanReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}\n",
        format!("  ClawScan: {}  ", report.path.display())
            .bold()
            .on_blue()
            .white()
    ));
    out.push_str(&format!("  Timestamp: {}\n\n", report.timestamp));

    out.push_str(&format!("{}\n", "Analyzers".bold().underline()));
    for result in &report.analyzers {
        let icon = match result.status {
            AnalyzerStatus::Error => "ERR ".red().bold().to_string(),
            AnalyzerStatus::Ok if result.findings > 0 => "FOUND".yellow().bold().to_string(),
            AnalyzerStatus::Ok => "OK  ".green().bold().to_string(),
        };
        let detail = match &result.error {
            Some(e) => e.dimmed().to_string(),
            None => format!("{} findings, {} ms", result.findings, result.elapsed_ms),
        };
        out.push_str(&format!(
            "  [{icon}] {name:<20} {detail}\n",
            name = result.name,
        ));
    }
    out.push('\n');

    if !report.findings.is_empty() {
        out.push_str(&format!("{}\n", "Findings".bold().underline()));
        for finding in &report.findings {
            let severity_str = match finding.severity {
                Severity::Critical => "CRIT".red().bold().to_string(),
                Severity::Warning => "WARN".yellow().bold().to_string(),
                Severity::Info => "INFO".blue().to_string(),
            };

            let location = match finding.line {
                Some(l) => format!("{}:{}", finding.file.display(), l),
                None => format!("{}", finding.file.display()),
            };

            out.push_str(&format!(
                "  [{severity_str}] {rule_id:<30} {message}\n",
                rule_id = finding.rule_id.dimmed(),
                message = finding.message,
            ));
            out.push_str(&format!("         {}\n", location.dimmed()));
            if let Some(ref m) = finding.matched {
                out.push_str(&format!("         > {}\n", m.dimmed()));
            }
        }
        out.push('\n');
    }

    let label_str = match report.risk.level {
        crate::finding::RiskLevel::Safe => report.risk.label.green().bold().to_string(),
        crate::finding::RiskLevel::Warning => report.risk.label.yellow().bold().to_string(),
        crate::finding::RiskLevel::Dangerous => report.risk.label.red().bold().to_string(),
    };

    out.push_str(&format!(
        "Verdict: {} {label_str}  (score {}/100)  |  {} critical, {} warning, {} info\n",
        report.risk.emoji,
        report.risk.score,
        report.summary.critical,
        report.summary.warning,
        report.summary.info,
    ));

    out
}
