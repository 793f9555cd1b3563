//! Network Analyzer.
//!
//! Applies the `network` rule group, then scans each line for blocklisted
//! domains/IPs, Discord/Telegram/Slack webhooks, and suspicious-TLD URLs
//! (§4.5).

use std::sync::LazyLock;

use super::{AnalyzeContext, Analyzer, AnalyzerOutcome};
use crate::finding::{Finding, Severity};
use crate::netmatch;
use crate::rule_engine::{apply_rules, DEFAULT_SNIPPET_CAP};
use crate::walker::{self, BROAD_EXTENSIONS};

// Captures the hostname from an HTTP/HTTPS URL, stripping optional userinfo
// and stopping at path/query/fragment/port/whitespace — mirrors the
// teacher's RE_URL_HOST so a spoofed fragment like `evil.com#.good.com`
// can't be mistaken for the allowlisted host.
static RE_URL_HOST: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)https?://(?:[^@/?#\s]+@)?([^/?#:\s]+)").unwrap());

pub struct NetworkAnalyzer;

impl Analyzer for NetworkAnalyzer {
    fn name(&self) -> &'static str {
        "network"
    }

    fn analyze(&self, ctx: &AnalyzeContext) -> AnalyzerOutcome {
        if let Some(err) = ctx.catalog.error_for("network") {
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
                &ctx.catalog.network,
                &text,
                &rel,
                self.name(),
                DEFAULT_SNIPPET_CAP,
            ));

            for (idx, line) in text.split('\n').enumerate() {
                let line_num = idx + 1;
                scan_line(self, ctx, &rel, line_num, line, &mut findings);
            }
        }

        AnalyzerOutcome::ok(findings)
    }
}

fn scan_line(
    analyzer: &NetworkAnalyzer,
    ctx: &AnalyzeContext,
    file: &std::path::Path,
    line_num: usize,
    line: &str,
    findings: &mut Vec<Finding>,
) {
    // Blocklisted domains are matched by case-insensitive substring on the
    // whole line (§4.5) — unlike IP matching, this is deliberately looser
    // than the extract-then-compare discipline of §4.3, so a bare mention
    // like `nc webhook.site 443` is caught even without a URL scheme.
    let lower_line = line.to_lowercase();
    if ctx
        .blocklist
        .domains
        .iter()
        .any(|d| lower_line.contains(d.as_str()))
    {
        findings.push(finding(
            analyzer,
            Severity::Critical,
            file,
            line_num,
            "Line references a known blocklisted domain",
            "network/blocklistedDomain",
            line,
        ));
    }

    for host in RE_URL_HOST.captures_iter(line).filter_map(|c| c.get(1)) {
        let host = host.as_str().to_lowercase();
        if host.is_empty() {
            continue;
        }

        if let Some(tld) = host.rsplit('.').next() {
            if ctx.blocklist.suspicious_tlds.contains(&tld.to_lowercase()) {
                findings.push(finding(
                    analyzer,
                    Severity::Warning,
                    file,
                    line_num,
                    "URL host uses a TLD commonly abused for disposable domains",
                    "network/suspiciousTld",
                    line,
                ));
            }
        }
    }

    for ip in netmatch::extract_ipv4_literals(line) {
        if ctx
            .blocklist
            .ips
            .iter()
            .any(|entry| netmatch::matches_blocklist_entry(&ip, entry))
        {
            findings.push(finding(
                analyzer,
                Severity::Critical,
                file,
                line_num,
                "IPv4 literal matches a blocklisted address or range",
                "network/blocklistedIP",
                line,
            ));
        }
    }

    if ctx.blocklist.discord_webhook.is_match(line) {
        findings.push(finding(
            analyzer,
            Severity::Critical,
            file,
            line_num,
            "Discord webhook URL — a common data-exfiltration channel",
            "network/discordWebhook",
            line,
        ));
    }
    if ctx.blocklist.telegram_bot.is_match(line) {
        findings.push(finding(
            analyzer,
            Severity::Critical,
            file,
            line_num,
            "Telegram bot API URL — a common data-exfiltration channel",
            "network/telegramBot",
            line,
        ));
    }
    if ctx.blocklist.slack_webhook.is_match(line) {
        findings.push(finding(
            analyzer,
            Severity::Warning,
            file,
            line_num,
            "Slack webhook URL",
            "network/slackWebhook",
            line,
        ));
    }
}

fn finding(
    analyzer: &NetworkAnalyzer,
    severity: Severity,
    file: &std::path::Path,
    line: usize,
    message: &str,
    rule_id: &str,
    raw_line: &str,
) -> Finding {
    Finding {
        analyzer: analyzer.name().to_string(),
        severity,
        file: file.to_path_buf(),
        line: Some(line),
        message: message.to_string(),
        rule_id: rule_id.to_string(),
        matched: Some(Finding::truncate_snippet(raw_line, DEFAULT_SNIPPET_CAP)),
    }
}
