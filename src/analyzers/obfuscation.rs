//! Obfuscation Analyzer.
//!
//! Applies the `obfuscation` rule group, then flags minified lines,
//! obfuscator signature strings (via the catalog), and `_0x`-style
//! variable-name floods (§4.5).

use std::sync::LazyLock;

use super::{AnalyzeContext, Analyzer, AnalyzerOutcome};
use crate::finding::{Finding, Severity};
use crate::rule_engine::{apply_rules, DEFAULT_SNIPPET_CAP};
use crate::walker::{self, BROAD_EXTENSIONS};

const LONG_LINE_THRESHOLD: usize = 500;
/// `_0x`-style identifiers: more than this many occurrences in one file
/// triggers `jsObfuscator` (§8 boundary case: 3 -> no finding, 4 -> finding).
const HEX_IDENTIFIER_THRESHOLD: usize = 3;

static RE_HEX_IDENTIFIER: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"_0x[0-9a-fA-F]+").unwrap());

pub struct ObfuscationAnalyzer;

impl Analyzer for ObfuscationAnalyzer {
    fn name(&self) -> &'static str {
        "obfuscation"
    }

    fn analyze(&self, ctx: &AnalyzeContext) -> AnalyzerOutcome {
        if let Some(err) = ctx.catalog.error_for("obfuscation") {
            return AnalyzerOutcome::error(err.to_string());
        }

        let files = walker::collect_files(ctx.root, BROAD_EXTENSIONS);
        let mut findings = Vec::new();

        for file in &files {
            let Some(text) = walker::read_to_string_lossy_checked(file) else {
                continue;
            };
            let rel = walker::relative_to(file, ctx.root);
            let is_json = rel
                .extension()
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false);

            findings.extend(apply_rules(
                &ctx.catalog.obfuscation,
                &text,
                &rel,
                self.name(),
                DEFAULT_SNIPPET_CAP,
            ));

            if !is_json {
                if let Some((line_num, line)) = text
                    .split('\n')
                    .enumerate()
                    .find(|(_, line)| line.chars().count() > LONG_LINE_THRESHOLD)
                {
                    findings.push(Finding {
                        analyzer: self.name().to_string(),
                        severity: Severity::Warning,
                        file: rel.clone(),
                        line: Some(line_num + 1),
                        message: format!(
                            "Line exceeds {} characters — possible minified/obfuscated code",
                            LONG_LINE_THRESHOLD
                        ),
                        rule_id: "obfuscation/longLine".to_string(),
                        matched: Some(Finding::truncate_snippet(line, DEFAULT_SNIPPET_CAP)),
                    });
                }
            }

            let hex_count = RE_HEX_IDENTIFIER.find_iter(&text).count();
            if hex_count > HEX_IDENTIFIER_THRESHOLD {
                let first_line = text
                    .split('\n')
                    .enumerate()
                    .find(|(_, line)| RE_HEX_IDENTIFIER.is_match(line))
                    .map(|(idx, _)| idx + 1);
                findings.push(Finding {
                    analyzer: self.name().to_string(),
                    severity: Severity::Critical,
                    file: rel,
                    line: first_line,
                    message: format!(
                        "{} `_0x`-style identifiers found — consistent with JS obfuscator output",
                        hex_count
                    ),
                    rule_id: "obfuscation/jsObfuscator".to_string(),
                    matched: None,
                });
            }
        }

        AnalyzerOutcome::ok(findings)
    }
}
