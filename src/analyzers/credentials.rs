//! Credentials Analyzer.
//!
//! Applies the `credentials` rule group (standard 120-char snippet cap),
//! then three high-entropy/secret heuristics with a tighter 40-char cap:
//! quoted base64 ≥40 chars, quoted hex ≥32 chars, and `password = "…"`-style
//! assignments with value length ≥8, excluding CLI-flag mentions like
//! `--password` (§4.2, §4.5).

use std::sync::LazyLock;

use super::{AnalyzeContext, Analyzer, AnalyzerOutcome};
use crate::finding::{Finding, Severity};
use crate::rule_engine::{apply_rules, DEFAULT_SNIPPET_CAP};
use crate::walker::{self, BROAD_EXTENSIONS};

/// Secret-heuristic snippets are capped tighter than the default 120 chars
/// (§4.5, §5).
const SECRET_SNIPPET_CAP: usize = 40;

static RE_BASE64: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r#"['"][A-Za-z0-9+/]{40,}={0,2}['"]"#).unwrap());

static RE_HEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r#"['"][0-9a-fA-F]{32,}['"]"#).unwrap());

// Negative lookahead isn't available in the `regex` crate's default engine,
// so the CLI-flag exclusion (`--password foo`) is applied after the match
// by checking the two characters preceding it rather than in the pattern.
static RE_PASSWORD_ASSIGN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r#"(?i)\bpassword\s*[:=]\s*['"]([^'"]{8,})['"]"#).unwrap());

pub struct CredentialsAnalyzer;

impl Analyzer for CredentialsAnalyzer {
    fn name(&self) -> &'static str {
        "credentials"
    }

    fn analyze(&self, ctx: &AnalyzeContext) -> AnalyzerOutcome {
        if let Some(err) = ctx.catalog.error_for("credentials") {
            return AnalyzerOutcome::error(err.to_string());
        }

        let files = walker::collect_files(ctx.root, BROAD_EXTENSIONS);
        let mut findings = Vec::new();

        for file in &files {
            let Some(text) = walker::read_to_string_lossy_checked(file) else {
                continue;
            };
            let rel = walker::relative_to(file, ctx.root);

            findings.extend(apply_rules(
                &ctx.catalog.credentials,
                &text,
                &rel,
                self.name(),
                DEFAULT_SNIPPET_CAP,
            ));

            for (idx, line) in text.split('\n').enumerate() {
                let line_num = idx + 1;

                if let Some(m) = RE_BASE64.find(line) {
                    findings.push(secret_finding(
                        self,
                        &rel,
                        line_num,
                        "Quoted string looks like a base64-encoded secret",
                        "credentials/base64Secret",
                        m.as_str(),
                    ));
                }

                if let Some(m) = RE_HEX.find(line) {
                    findings.push(secret_finding(
                        self,
                        &rel,
                        line_num,
                        "Quoted string looks like a hex-encoded secret",
                        "credentials/hexSecret",
                        m.as_str(),
                    ));
                }

                if let Some(caps) = RE_PASSWORD_ASSIGN.captures(line) {
                    let m = caps.get(0).unwrap();
                    let prefix = &line[..m.start()];
                    if !prefix.trim_end().ends_with("--") {
                        findings.push(Finding {
                            analyzer: self.name().to_string(),
                            severity: Severity::Warning,
                            file: rel.clone(),
                            line: Some(line_num),
                            message: "Hardcoded password assignment".to_string(),
                            rule_id: "credentials/passwordAssignment".to_string(),
                            matched: Some(Finding::truncate_snippet(
                                m.as_str(),
                                SECRET_SNIPPET_CAP,
                            )),
                        });
                    }
                }
            }
        }

        AnalyzerOutcome::ok(findings)
    }
}

fn secret_finding(
    analyzer: &CredentialsAnalyzer,
    file: &std::path::Path,
    line: usize,
    message: &str,
    rule_id: &str,
    matched: &str,
) -> Finding {
    Finding {
        analyzer: analyzer.name().to_string(),
        severity: Severity::Critical,
        file: file.to_path_buf(),
        line: Some(line),
        message: message.to_string(),
        rule_id: rule_id.to_string(),
        matched: Some(Finding::truncate_snippet(matched, SECRET_SNIPPET_CAP)),
    }
}
