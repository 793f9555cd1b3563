//! Typosquat Analyzer.
//!
//! Compares the skill's declared name against a small table of popular
//! integration names using edit distance and substitution/separator/affix
//! heuristics (§4.6).

use super::{AnalyzeContext, Analyzer, AnalyzerOutcome};
use crate::finding::{Finding, Severity};

/// Popular names a malicious skill might impersonate. Deliberately small —
/// this is a heuristic deterrent, not an exhaustive trademark database.
const POPULAR_NAMES: &[&str] = &[
    "github", "gitlab", "slack", "discord", "docker", "kubernetes", "npm", "pip", "google-drive",
    "notion", "jira", "stripe", "openai", "anthropic", "zoom", "dropbox", "salesforce", "aws",
];

/// Names that legitimately resemble a popular name and must never be
/// flagged (official platform-maintained skills, common compound names).
const WHITELIST: &[&str] = &["github-actions", "docker-compose", "aws-cli", "npm-scripts"];

pub struct TyposquatAnalyzer;

impl Analyzer for TyposquatAnalyzer {
    fn name(&self) -> &'static str {
        "typosquat"
    }

    fn analyze(&self, ctx: &AnalyzeContext) -> AnalyzerOutcome {
        let declared = declared_name(ctx.root);
        let basename = ctx
            .root
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if WHITELIST.contains(&declared.as_str()) || WHITELIST.contains(&basename.as_str()) {
            return AnalyzerOutcome::ok(Vec::new());
        }

        let mut findings = Vec::new();
        for popular in POPULAR_NAMES {
            if let Some(f) = check_name(self, &declared, popular) {
                findings.push(f);
            }
        }
        AnalyzerOutcome::ok(findings)
    }
}

/// Reads the skill's declared name: the first `# Heading` of `SKILL.md`,
/// lowercased with spaces turned into `-`, falling back to the directory
/// basename when no `SKILL.md` or no heading is present (§4.6, §9 — an
/// attacker can evade this by omitting the heading and naming the directory
/// benignly; noted, not mitigated).
fn declared_name(root: &std::path::Path) -> String {
    let skill_md = root.join("SKILL.md");
    if let Ok(text) = std::fs::read_to_string(&skill_md) {
        for line in text.lines() {
            let trimmed = line.trim_start();
            if let Some(heading) = trimmed.strip_prefix("# ") {
                return heading.trim().to_lowercase().replace(' ', "-");
            }
        }
    }
    root.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn check_name(analyzer: &TyposquatAnalyzer, name: &str, popular: &str) -> Option<Finding> {
    if name == popular {
        return None;
    }

    // Substitution tricks are checked before edit-distance: a name that
    // matches via a known look-alike substitution is a stronger signal
    // than generic edit distance, and should be the only finding surfaced
    // for this popular-name pair rather than double-reporting both.
    // The look-alike cluster {1, l, i} covers both the digit/letter swap
    // ("g1thub") and the visually similar l/i swap ("gltHub" -> "github").
    const SUBSTITUTIONS: &[(&str, &str)] = &[
        ("1", "l"),
        ("l", "1"),
        ("l", "i"),
        ("i", "l"),
        ("0", "o"),
        ("o", "0"),
        ("rn", "m"),
        ("vv", "w"),
    ];
    for (from, to) in SUBSTITUTIONS {
        if name.replace(from, to) == *popular {
            return Some(finding(
                analyzer,
                Severity::Critical,
                format!("Skill name '{name}' matches '{popular}' under character substitution"),
                "typosquat/typosquatPattern",
            ));
        }
    }

    // A second substitution pass catches names needing two look-alike swaps
    // to reach the popular name, e.g. "g1thub" -> "glthub" -> "github".
    for (from1, to1) in SUBSTITUTIONS {
        let once = name.replace(from1, to1);
        if once == name {
            continue;
        }
        for (from2, to2) in SUBSTITUTIONS {
            if once.replace(from2, to2) == *popular {
                return Some(finding(
                    analyzer,
                    Severity::Critical,
                    format!("Skill name '{name}' matches '{popular}' under character substitution"),
                    "typosquat/typosquatPattern",
                ));
            }
        }
    }

    let distance = levenshtein(name, popular);
    let max_len = name.chars().count().max(popular.chars().count());
    if (distance == 1 || distance == 2) && max_len >= 4 {
        return Some(finding(
            analyzer,
            Severity::Warning,
            format!(
                "Skill name '{name}' is only {distance} edit(s) away from the popular name '{popular}'"
            ),
            "typosquat/levenshteinClose",
        ));
    }

    let name_stripped = name.replace(['-', '_'], "");
    let popular_stripped = popular.replace(['-', '_'], "");
    if name_stripped == popular_stripped && name != popular {
        return Some(finding(
            analyzer,
            Severity::Critical,
            format!("Skill name '{name}' matches '{popular}' after separator stripping"),
            "typosquat/typosquatPattern",
        ));
    }

    if name != popular && name.contains(popular) && name.chars().count() <= popular.chars().count() + 5 {
        return Some(finding(
            analyzer,
            Severity::Critical,
            format!("Skill name '{name}' is '{popular}' with a short affix added"),
            "typosquat/typosquatPattern",
        ));
    }

    None
}

fn finding(analyzer: &TyposquatAnalyzer, severity: Severity, message: String, rule_id: &str) -> Finding {
    Finding {
        analyzer: analyzer.name().to_string(),
        severity,
        file: std::path::PathBuf::from("SKILL.md"),
        line: None,
        message,
        rule_id: rule_id.to_string(),
        matched: None,
    }
}

/// Full Levenshtein edit distance between two strings, operating on chars
/// so multi-byte UTF-8 names are handled correctly.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0usize; m + 1];

    for i in 1..=n {
        curr[0] = i;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}
