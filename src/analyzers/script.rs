//! Script Analyzer.
//!
//! Walks the script extension set, applies the `execution` rule group via
//! the Regex Rule Engine, and adds the oversize-file, unusual-interpreter,
//! and no-extension-shebang heuristics (§4.5).

use std::sync::LazyLock;

use super::{AnalyzeContext, Analyzer, AnalyzerOutcome};
use crate::finding::{Finding, Severity};
use crate::rule_engine::{apply_rules, DEFAULT_SNIPPET_CAP};
use crate::walker::{self, SCRIPT_EXTENSIONS};

static RE_SHEBANG: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"^#!").unwrap());

static RE_UNUSUAL_INTERPRETER: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^#!.*\b(perl|ruby|php|lua|tclsh)\b").unwrap());

pub struct ScriptAnalyzer;

impl Analyzer for ScriptAnalyzer {
    fn name(&self) -> &'static str {
        "script"
    }

    fn analyze(&self, ctx: &AnalyzeContext) -> AnalyzerOutcome {
        if let Some(err) = ctx.catalog.error_for("execution") {
            return AnalyzerOutcome::error(err.to_string());
        }

        let (files, oversized) = walker::collect_files_with_oversized(ctx.root, SCRIPT_EXTENSIONS);
        let mut findings = Vec::new();

        for file in &oversized {
            let rel = walker::relative_to(file, ctx.root);
            findings.push(Finding {
                analyzer: self.name().to_string(),
                severity: Severity::Warning,
                file: rel,
                line: None,
                message: "File exceeds the 1 MiB scan cap and was not fully read".to_string(),
                rule_id: "script/largeFile".to_string(),
                matched: None,
            });
        }

        for file in &files {
            let Some(text) = walker::read_to_string_lossy_checked(file) else {
                continue;
            };
            let rel = walker::relative_to(file, ctx.root);

            findings.extend(apply_rules(
                &ctx.catalog.execution,
                &text,
                &rel,
                self.name(),
                DEFAULT_SNIPPET_CAP,
            ));
        }

        // Shebang heuristics run over every file, not just the script
        // extension set, since an extension-less shebanged script would
        // never appear in `files` above (§4.5 `noExtension`).
        for file in walker::collect_all_files(ctx.root) {
            let rel = walker::relative_to(&file, ctx.root);
            let Some(text) = walker::read_to_string_lossy_checked(&file) else {
                continue;
            };
            let Some(first_line) = text.lines().next() else {
                continue;
            };
            if !RE_SHEBANG.is_match(first_line) {
                continue;
            }

            if let Some(m) = RE_UNUSUAL_INTERPRETER.find(first_line) {
                findings.push(Finding {
                    analyzer: self.name().to_string(),
                    severity: Severity::Info,
                    file: rel.clone(),
                    line: Some(1),
                    message: "Script shebang names an unusual interpreter".to_string(),
                    rule_id: "script/unusualInterpreter".to_string(),
                    matched: Some(Finding::truncate_snippet(m.as_str(), DEFAULT_SNIPPET_CAP)),
                });
            }

            if rel.extension().is_none() {
                findings.push(Finding {
                    analyzer: self.name().to_string(),
                    severity: Severity::Info,
                    file: rel,
                    line: Some(1),
                    message: "Shebanged script has no file extension".to_string(),
                    rule_id: "script/noExtension".to_string(),
                    matched: None,
                });
            }
        }

        AnalyzerOutcome::ok(findings)
    }
}
