//! Risk Aggregator.
//!
//! Turns a flat finding set into a single 0-100 score via a two-stage model:
//! Stage A sums per-severity weights (halved for a detected CLI-wrapper
//! skill); Stage B adds bonuses for specific rule-id combinations (§4.9).

use std::collections::HashSet;

use crate::finding::{Finding, RiskAssessment, Severity};

const WEIGHT_CRITICAL: u32 = 10;
const WEIGHT_WARNING: u32 = 2;
const WEIGHT_INFO: u32 = 0;

/// Phrases whose presence (lowercased, ≥2 distinct) in SKILL.md classifies
/// the skill as a legitimate CLI-wrapper context (§4.9).
const CLI_WRAPPER_INDICATORS: &[&str] = &[
    "cli",
    "command-line",
    "command line",
    "wrapper",
    "terminal",
    "shell command",
    "executes",
    "runs command",
    "run command",
    "spawns",
    "child_process",
    "subprocess",
    "exec(",
    "execsync",
    "spawn(",
    "tool that",
    "tool for",
    "curl",
    "calls the",
];

/// Returns `true` when `skill_md_text` contains at least two distinct
/// CLI-wrapper indicator phrases (§4.9).
pub fn is_cli_wrapper(skill_md_text: &str) -> bool {
    let lower = skill_md_text.to_lowercase();
    CLI_WRAPPER_INDICATORS
        .iter()
        .filter(|indicator| lower.contains(*indicator))
        .count()
        >= 2
}

/// Computes the final risk assessment for a finding set.
pub fn assess(findings: &[Finding], is_cli_wrapper: bool) -> RiskAssessment {
    let mut stage_a: u32 = findings
        .iter()
        .map(|f| match f.severity {
            Severity::Critical => WEIGHT_CRITICAL,
            Severity::Warning => WEIGHT_WARNING,
            Severity::Info => WEIGHT_INFO,
        })
        .sum();
    if is_cli_wrapper {
        stage_a /= 2;
    }

    let stage_b = stage_b_bonus(&rule_suffixes(findings));

    RiskAssessment::from_score(stage_a + stage_b)
}

/// The set of rule-id suffixes (the text after the last `/`) present in
/// `findings`. Stage B conditions are checked by suffix rather than full
/// rule id, since several conditions (e.g. `privEscalation`) are legitimately
/// producible by more than one analyzer/category.
fn rule_suffixes(findings: &[Finding]) -> HashSet<&str> {
    findings
        .iter()
        .map(|f| f.rule_id.rsplit('/').next().unwrap_or(f.rule_id.as_str()))
        .collect()
}

fn stage_b_bonus(rules: &HashSet<&str>) -> u32 {
    let has = |name: &str| rules.contains(name);

    let exec = has("evalExec") || has("shellExecution");
    let prompt_injection = has("promptInjection")
        || has("roleHijack")
        || has("instructionOverride")
        || has("authoritySpoofing")
        || has("steganoInstructions")
        || has("conversationManip");
    let cred_access = has("sshKeyAccess") || has("browserData") || has("apiKeyPatterns");
    let env_access = has("envFileAccess") || has("clawbotPaths");
    let webhook = has("discordWebhook") || has("telegramBot") || has("slackWebhook");
    let network = has("httpRequests") || has("rawSockets");
    let obfuscation = has("jsObfuscator") || has("obfuscationTool") || has("longLine");
    let blocklisted_domain = has("blocklistedDomain");
    let blocklisted_ip = has("blocklistedIP");
    let data_exfil_prompt = has("dataExfilPrompt");
    let fake_prerequisites = has("fakePrerequisites");
    let external_urls = has("externalUrls");

    let mut bonus: u32 = 0;

    if cred_access && (webhook || blocklisted_domain || blocklisted_ip) {
        bonus += 60;
    }
    if has("reverseShell") {
        bonus += 60;
    }
    if has("downloadExecute") {
        bonus += 50;
    }
    if prompt_injection {
        bonus += 50;
    }
    if data_exfil_prompt {
        bonus += 50;
    }
    if has("hiddenCommands") {
        bonus += 50;
    }
    if has("invisibleChars") {
        bonus += 40;
    }
    if has("privEscalation") {
        bonus += 40;
    }
    if fake_prerequisites && external_urls {
        bonus += 40;
    } else if fake_prerequisites {
        bonus += 25;
    }
    if has("hiddenComment") {
        bonus += 35;
    }
    if obfuscation && exec {
        bonus += 35;
    }
    if webhook && env_access {
        bonus += 35;
    }
    if blocklisted_domain {
        bonus += 30;
    }
    if blocklisted_ip {
        bonus += 30;
    }
    if has("cronPersistence") {
        bonus += 30;
    }
    if prompt_injection && data_exfil_prompt {
        bonus += 20;
    }
    if cred_access && network && !webhook && !blocklisted_domain {
        bonus += 15;
    }
    if has("base64Exec") && exec {
        bonus += 15;
    }
    if obfuscation && !exec {
        bonus += 10;
    }
    if webhook && !cred_access && !env_access {
        bonus += 10;
    }

    bonus
}
