//! Core data types for scan findings and reports.
//!
//! This module contains the primary output types of the scan pipeline:
//!
//! - [`Finding`] — a single security observation produced by an analyzer.
//! - [`AnalyzerResult`] — aggregated metadata from one analyzer run.
//! - [`ScanReport`] — the final report combining every analyzer plus the
//!   computed risk verdict.
//! - [`Severity`], [`AnalyzerStatus`], [`RiskLevel`] — classification enums.

use std::fmt;
use std::path::PathBuf;

/// Severity level for a single finding.
///
/// Variants are ordered from most to least critical and implement [`Ord`],
/// so collections of findings can be sorted by severity.
///
/// Serializes to lowercase strings (`"critical"`, `"warning"`, `"info"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Finding that on its own, or in combination, indicates likely malicious intent.
    Critical,
    /// Finding that should be reviewed but may be acceptable in context.
    Warning,
    /// Informational observation that does not move the verdict on its own.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A single finding produced by an analyzer.
///
/// Every finding is tied to a rule, a relative file path, and — where
/// applicable — a 1-based line number in the *original* source file, even
/// when the finding was actually produced against an extracted code block
/// (see [`analyzers::codeblock`](crate::analyzers::codeblock)).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    /// Name of the analyzer that produced this finding (e.g. `"network"`).
    pub analyzer: String,
    /// Severity level.
    pub severity: Severity,
    /// Path to the source file, relative to the skill root. Never absolute.
    pub file: PathBuf,
    /// 1-based line number inside the source file, when known.
    pub line: Option<usize>,
    /// Human-readable description of the issue.
    pub message: String,
    /// Rule identifier that fired (e.g. `"network/blocklistedDomain"`, `"prompt/roleHijack"`).
    pub rule_id: String,
    /// Trimmed snippet of the offending text, capped at 120 chars (40 for
    /// the Credentials Analyzer's secret heuristics).
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
}

impl Finding {
    /// Truncates `text` to at most `max_chars`, appending `...` when cut.
    /// Cuts at a char boundary so multi-byte UTF-8 is never split mid-codepoint.
    pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
        let trimmed = text.trim();
        if trimmed.chars().count() <= max_chars {
            return trimmed.to_string();
        }
        let cut = trimmed
            .char_indices()
            .nth(max_chars.saturating_sub(3))
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        format!("{}...", &trimmed[..cut])
    }
}

/// Outcome status of a single analyzer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerStatus {
    /// The analyzer ran to completion (it may still have produced findings).
    Ok,
    /// The analyzer hit an unrecoverable condition and contributed zero findings.
    Error,
}

/// Metadata describing a single analyzer's run.
///
/// An analyzer that errors still produces an `AnalyzerResult` — with
/// `status: Error`, zero findings, and an `error` message — so the scan
/// always completes (§7 propagation policy).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalyzerResult {
    /// Analyzer identifier (matches [`Analyzer::name`](crate::analyzers::Analyzer::name)).
    pub name: String,
    /// Number of findings this analyzer contributed to the final report.
    pub findings: usize,
    /// Wall-clock time for this analyzer, in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the analyzer completed normally or errored.
    pub status: AnalyzerStatus,
    /// Error message, present only when `status == Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzerResult {
    /// Builds a successful result record.
    pub fn ok(name: &str, findings: usize, elapsed_ms: u64) -> Self {
        AnalyzerResult {
            name: name.to_string(),
            findings,
            elapsed_ms,
            status: AnalyzerStatus::Ok,
            error: None,
        }
    }

    /// Builds an error result record. Always reports zero findings — an
    /// analyzer that errors never contributes partial results (§7).
    pub fn error(name: &str, elapsed_ms: u64, message: impl Into<String>) -> Self {
        AnalyzerResult {
            name: name.to_string(),
            findings: 0,
            elapsed_ms,
            status: AnalyzerStatus::Error,
            error: Some(message.into()),
        }
    }
}

/// Per-severity finding counts.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl Summary {
    /// Builds a summary from a finding slice in a single pass.
    pub fn from_findings(findings: &[Finding]) -> Self {
        findings.iter().fold(Summary::default(), |mut acc, f| {
            acc.total += 1;
            match f.severity {
                Severity::Critical => acc.critical += 1,
                Severity::Warning => acc.warning += 1,
                Severity::Info => acc.info += 1,
            }
            acc
        })
    }
}

/// Overall risk verdict, a pure function of [`RiskAssessment::score`] (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Warning,
    Dangerous,
}

impl RiskLevel {
    /// Derives the verdict from a score per the thresholds:
    /// `score >= 50 -> dangerous`, `score >= 20 -> warning`, else `safe`.
    pub fn from_score(score: u32) -> Self {
        if score >= 50 {
            RiskLevel::Dangerous
        } else if score >= 20 {
            RiskLevel::Warning
        } else {
            RiskLevel::Safe
        }
    }

    /// Upper-case display label (`"SAFE"`, `"WARNING"`, `"DANGEROUS"`).
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Warning => "WARNING",
            RiskLevel::Dangerous => "DANGEROUS",
        }
    }

    /// Single-glyph emoji associated with the level.
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "🟢",
            RiskLevel::Warning => "🟡",
            RiskLevel::Dangerous => "🔴",
        }
    }
}

/// Final risk verdict for a scan.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RiskAssessment {
    /// Final score in `[0, 100]`.
    pub score: u32,
    /// Verdict level, a pure function of `score`.
    pub level: RiskLevel,
    /// Upper-case display label matching `level`.
    pub label: &'static str,
    /// Emoji matching `level`.
    pub emoji: &'static str,
}

impl RiskAssessment {
    pub fn from_score(score: u32) -> Self {
        let score = score.min(100);
        let level = RiskLevel::from_score(score);
        RiskAssessment {
            score,
            level,
            label: level.label(),
            emoji: level.emoji(),
        }
    }
}

/// Complete scan report for a single skill.
///
/// Created by [`orchestrator::run_scan`](crate::orchestrator::run_scan).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScanReport {
    /// The original input path as supplied by the caller.
    pub target: String,
    /// The resolved, canonicalized skill root.
    pub path: PathBuf,
    /// RFC 3339 timestamp of when the scan ran.
    pub timestamp: String,
    /// Every finding across all analyzers, sorted by `(file, line, ruleId)`.
    pub findings: Vec<Finding>,
    /// Per-analyzer metadata (including errored/disabled analyzers).
    pub analyzers: Vec<AnalyzerResult>,
    /// Per-severity counts over `findings`.
    pub summary: Summary,
    /// Computed risk verdict.
    pub risk: RiskAssessment,
}

impl ScanReport {
    /// Sorts findings by `(file, line, ruleId)` for deterministic output.
    /// A scan run twice on an unchanged tree yields byte-identical findings
    /// once sorted this way (§8 invariant 5).
    pub fn sort_findings(findings: &mut [Finding]) {
        findings.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line.cmp(&b.line))
                .then(a.rule_id.cmp(&b.rule_id))
        });
    }
}
