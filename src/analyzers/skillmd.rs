//! SKILL.md Analyzer.
//!
//! Reads the manifest, applies the `skillMd` rule group, invokes the
//! Code-Block Sub-pipeline, and flags short or URL-heavy manifests (§4.4).

use std::sync::LazyLock;

use regex::Regex;

use super::{codeblock, AnalyzeContext, Analyzer, AnalyzerOutcome};
use crate::finding::{Finding, Severity};
use crate::rule_engine::{apply_rules, DEFAULT_SNIPPET_CAP};

/// Manifests shorter than this (trimmed) are flagged as incomplete (§4.4).
const SHORT_CONTENT_THRESHOLD: usize = 50;
/// More than this many external URLs triggers `manyUrls` (§4.4).
const MANY_URLS_THRESHOLD: usize = 5;

static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)https?://[^\s)\]>'\"]+").unwrap());

pub struct SkillMdAnalyzer;

impl Analyzer for SkillMdAnalyzer {
    fn name(&self) -> &'static str {
        "skillMd"
    }

    fn analyze(&self, ctx: &AnalyzeContext) -> AnalyzerOutcome {
        if let Some(err) = ctx.catalog.error_for("skillMd") {
            return AnalyzerOutcome::error(err.to_string());
        }

        let manifest = ctx.root.join("SKILL.md");
        let text = match std::fs::read_to_string(&manifest) {
            Ok(t) => t,
            Err(_) => {
                return AnalyzerOutcome::ok(vec![Finding {
                    analyzer: self.name().to_string(),
                    severity: Severity::Info,
                    file: std::path::PathBuf::from("SKILL.md"),
                    line: None,
                    message: "No SKILL.md found — skill may be incomplete".to_string(),
                    rule_id: "skillMd/missing".to_string(),
                    matched: None,
                }]);
            }
        };

        let rel = std::path::PathBuf::from("SKILL.md");
        let mut findings = apply_rules(
            &ctx.catalog.skill_md,
            &text,
            &rel,
            self.name(),
            DEFAULT_SNIPPET_CAP,
        );

        findings.extend(codeblock::run(&text, ctx));

        let trimmed_len = text.trim().chars().count();
        if trimmed_len < SHORT_CONTENT_THRESHOLD {
            findings.push(Finding {
                analyzer: self.name().to_string(),
                severity: Severity::Warning,
                file: rel.clone(),
                line: None,
                message: format!(
                    "Manifest content is only {trimmed_len} characters — likely incomplete"
                ),
                rule_id: "skillMd/shortContent".to_string(),
                matched: None,
            });
        }

        let external_urls = count_external_urls(&text, &ctx.config.allowlist.platform_domains);
        if !external_urls.is_empty() {
            findings.push(Finding {
                analyzer: self.name().to_string(),
                severity: Severity::Info,
                file: rel.clone(),
                line: None,
                message: format!("Manifest references {} external URL(s)", external_urls.len()),
                rule_id: "skillMd/externalUrls".to_string(),
                matched: None,
            });
        }
        if external_urls.len() > MANY_URLS_THRESHOLD {
            findings.push(Finding {
                analyzer: self.name().to_string(),
                severity: Severity::Warning,
                file: rel,
                line: None,
                message: format!(
                    "Manifest references {} external URLs, more than the {} threshold",
                    external_urls.len(),
                    MANY_URLS_THRESHOLD
                ),
                rule_id: "skillMd/manyUrls".to_string(),
                matched: None,
            });
        }

        AnalyzerOutcome::ok(findings)
    }
}

/// Returns every URL in `text` whose host is not one of `allowed_domains`
/// (exact-or-subdomain match, same discipline as the blocklist matcher).
fn count_external_urls(text: &str, allowed_domains: &[String]) -> Vec<String> {
    RE_URL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|url| {
            let host = url
                .trim_start_matches("http://")
                .trim_start_matches("https://")
                .split(['/', '?', '#'])
                .next()
                .unwrap_or("")
                .to_lowercase();
            !allowed_domains
                .iter()
                .any(|d| host == *d || host.ends_with(&format!(".{d}")))
        })
        .collect()
}
