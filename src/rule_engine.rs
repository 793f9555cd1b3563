//! Regex Rule Engine.
//!
//! Given a rule table and a file's text, produces per-line findings. This
//! generalizes the line-scanning loop duplicated across the script/network/
//! credentials/obfuscation analyzers into one reusable function driven by
//! catalog data rather than Rust `static` arrays.

use std::path::Path;

use crate::catalog::Rule;
use crate::finding::Finding;

/// Match snippets are capped at 120 chars by default (§4.2, §5); the
/// Credentials Analyzer's secret heuristics use a tighter 40-char cap.
pub const DEFAULT_SNIPPET_CAP: usize = 120;

/// Applies every rule in `rules` to every line of `text`, in order, emitting
/// one Finding per (rule, line) match. Multiple rules may fire on the same
/// line; each produces a separate Finding. Line splitting is LF-based — a
/// trailing CR (CRLF line endings) is left attached to the line and simply
/// becomes part of the matched text/snippet, same as splitting on `\n` alone
/// would leave it.
pub fn apply_rules(
    rules: &[Rule],
    text: &str,
    file: &Path,
    analyzer: &str,
    snippet_cap: usize,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (idx, line) in text.split('\n').enumerate() {
        let line_num = idx + 1;
        for rule in rules {
            if let Some(m) = rule.regex.find(line) {
                findings.push(Finding {
                    analyzer: analyzer.to_string(),
                    severity: rule.severity,
                    file: file.to_path_buf(),
                    line: Some(line_num),
                    message: rule.description.clone(),
                    rule_id: rule.id.clone(),
                    matched: Some(Finding::truncate_snippet(m.as_str(), snippet_cap)),
                });
            }
        }
    }
    findings
}
