//! Scan Orchestrator.
//!
//! Resolves the scan target, runs every analyzer with error isolation,
//! records per-analyzer timings, computes the risk verdict, and assembles
//! the final [`ScanReport`] (§4.10).

use std::path::Path;
use std::time::Instant;

use colored::Colorize;
use rayon::prelude::*;

use crate::aggregator;
use crate::analyzers::{self, AnalyzeContext};
use crate::catalog::{Blocklist, Catalog};
use crate::config::Config;
use crate::finding::{AnalyzerResult, Finding, ScanReport, Summary};

/// Runs a complete scan against `path` using the already-loaded catalog,
/// blocklist and config.
///
/// Each analyzer is wrapped in [`std::panic::catch_unwind`] so a bug in one
/// analyzer can never abort the scan (§2.1, §7); a panicking analyzer is
/// recorded as an errored [`AnalyzerResult`] contributing zero findings.
///
/// # Errors
///
/// Returns `Err` only when `path` does not resolve to a directory — the one
/// error class that propagates to the caller instead of being absorbed into
/// the report (§7).
pub fn run_scan(target: &str, path: &Path, config: &Config) -> Result<ScanReport, String> {
    let resolved = path
        .canonicalize()
        .map_err(|e| format!("failed to resolve '{}': {e}", path.display()))?;
    if !resolved.is_dir() {
        return Err(format!("'{}' is not a directory", resolved.display()));
    }

    let catalog = Catalog::load(config.catalog.patterns_path.as_deref())
        .map_err(|e| format!("failed to load rule catalog: {e}"))?;
    let blocklist = Blocklist::load(config.catalog.blocklist_path.as_deref())
        .map_err(|e| format!("failed to load blocklist: {e}"))?;

    let ctx = AnalyzeContext {
        root: &resolved,
        catalog: &catalog,
        blocklist: &blocklist,
        config,
    };

    let all = analyzers::all_analyzers();
    let n_active = all
        .iter()
        .filter(|a| config.is_analyzer_enabled(a.name()))
        .count();
    eprintln!(
        "{}",
        format!(
            "Running {} analyzer{}…",
            n_active,
            if n_active == 1 { "" } else { "s" }
        )
        .dimmed()
    );

    // Analyzers share no mutable state and each reads its own files, so they
    // run concurrently (§5, §9); the required SKILL.md-before-code-block
    // ordering is internal to the SKILL.md Analyzer itself and needs no
    // cross-analyzer synchronization here.
    let runs: Vec<(AnalyzerResult, Vec<Finding>)> = all
        .par_iter()
        .map(|analyzer| run_one(analyzer.as_ref(), &ctx, config))
        .collect();

    let mut analyzer_results = Vec::with_capacity(runs.len());
    let mut findings = Vec::new();
    for (result, mut analyzer_findings) in runs {
        analyzer_results.push(result);
        findings.append(&mut analyzer_findings);
    }

    ScanReport::sort_findings(&mut findings);

    let skill_md_text = std::fs::read_to_string(resolved.join("SKILL.md")).unwrap_or_default();
    let is_cli_wrapper = aggregator::is_cli_wrapper(&skill_md_text);
    let risk = aggregator::assess(&findings, is_cli_wrapper);
    let summary = Summary::from_findings(&findings);

    Ok(ScanReport {
        target: target.to_string(),
        path: resolved,
        timestamp: chrono::Utc::now().to_rfc3339(),
        findings,
        analyzers: analyzer_results,
        summary,
        risk,
    })
}

fn run_one(
    analyzer: &dyn analyzers::Analyzer,
    ctx: &AnalyzeContext,
    config: &Config,
) -> (AnalyzerResult, Vec<Finding>) {
    let name = analyzer.name();
    let started = Instant::now();

    if !config.is_analyzer_enabled(name) {
        return (
            AnalyzerResult::ok(name, 0, started.elapsed().as_millis() as u64),
            Vec::new(),
        );
    }

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| analyzer.analyze(ctx)));
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(outcome) => match outcome.status {
            crate::finding::AnalyzerStatus::Ok => (
                AnalyzerResult::ok(name, outcome.findings.len(), elapsed_ms),
                outcome.findings,
            ),
            crate::finding::AnalyzerStatus::Error => (
                AnalyzerResult::error(
                    name,
                    elapsed_ms,
                    outcome.error.unwrap_or_else(|| "analyzer error".to_string()),
                ),
                Vec::new(),
            ),
        },
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "analyzer panicked".to_string());
            (AnalyzerResult::error(name, elapsed_ms, message), Vec::new())
        }
    }
}
