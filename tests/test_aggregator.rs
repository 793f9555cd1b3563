use clawscan::aggregator::{assess, is_cli_wrapper};
use clawscan::finding::{Finding, RiskLevel, Severity};
use std::path::PathBuf;

fn finding(rule_id: &str, severity: Severity) -> Finding {
    Finding {
        analyzer: "test".to_string(),
        severity,
        file: PathBuf::from("f"),
        line: None,
        message: "m".to_string(),
        rule_id: rule_id.to_string(),
        matched: None,
    }
}

#[test]
fn empty_findings_score_zero_and_safe() {
    let risk = assess(&[], false);
    assert_eq!(risk.score, 0);
    assert_eq!(risk.level, RiskLevel::Safe);
}

#[test]
fn reverse_shell_alone_crosses_dangerous_threshold() {
    let findings = vec![finding("execution/reverseShell", Severity::Critical)];
    let risk = assess(&findings, false);
    // Stage A: 10 (critical) + Stage B: 60 (reverseShell) = 70
    assert_eq!(risk.score, 70);
    assert_eq!(risk.level, RiskLevel::Dangerous);
}

#[test]
fn cred_access_plus_blocklisted_domain_triggers_combination_bonus() {
    let findings = vec![
        finding("credentials/sshKeyAccess", Severity::Critical),
        finding("network/blocklistedDomain", Severity::Critical),
    ];
    let risk = assess(&findings, false);
    // Stage A: 20, Stage B: credAccess+blocklistedDomain 60 + blocklistedDomain alone 30 = 90 -> 110 capped to 100
    assert_eq!(risk.score, 100);
    assert_eq!(risk.level, RiskLevel::Dangerous);
}

#[test]
fn cli_wrapper_halves_stage_a_but_not_stage_b() {
    let findings = vec![
        finding("network/rawSockets", Severity::Warning),
        finding("network/rawSockets", Severity::Warning),
    ];
    let risk_plain = assess(&findings, false);
    let risk_wrapper = assess(&findings, true);
    assert_eq!(risk_plain.score, 4);
    assert_eq!(risk_wrapper.score, 2);
}

#[test]
fn warning_threshold_boundary() {
    let findings = vec![finding("credentials/apiKeyPatterns", Severity::Warning); 10];
    let risk = assess(&findings, false);
    assert_eq!(risk.score, 20);
    assert_eq!(risk.level, RiskLevel::Warning);
}

#[test]
fn score_is_capped_at_one_hundred() {
    let findings: Vec<Finding> = (0..20)
        .map(|_| finding("execution/evalExec", Severity::Critical))
        .collect();
    let risk = assess(&findings, false);
    assert_eq!(risk.score, 100);
}

#[test]
fn cli_wrapper_requires_two_distinct_indicators() {
    assert!(!is_cli_wrapper("this skill does nothing special"));
    assert!(!is_cli_wrapper("a cli tool"));
    assert!(is_cli_wrapper(
        "A command-line wrapper that spawns a subprocess to run git commands."
    ));
}

#[test]
fn fake_prerequisites_alone_scores_lower_than_combined_with_external_urls() {
    let alone = assess(&[finding("skillMd/fakePrerequisites", Severity::Warning)], false);
    let combined = assess(
        &[
            finding("skillMd/fakePrerequisites", Severity::Warning),
            finding("skillMd/externalUrls", Severity::Info),
        ],
        false,
    );
    assert_eq!(alone.score, 2 + 25);
    assert_eq!(combined.score, 2 + 40);
}
