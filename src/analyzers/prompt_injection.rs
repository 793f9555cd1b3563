//! Prompt-Injection Analyzer.
//!
//! Scans `**/*.md` and `**/*.txt`, `SKILL.md` first, applying a fixed table
//! of regex rules (role-hijack/override/exfil/etc.) plus structural checks
//! that a regex table alone cannot express: invisible characters, hidden
//! HTML comments, markdown image/link abuse, and emphatic ALL-CAPS (§4.7).

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{AnalyzeContext, Analyzer, AnalyzerOutcome};
use crate::finding::{Finding, Severity};
use crate::walker;

static RE_ROLE_HIJACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)you\s+are\s+(now\s+)?(a|an|the)\s+(root|admin|system|super)\s*(user|administrator)?|pretend\s+(to\s+be|you('re| are))\s+(a\s+)?(different|another|new)\s+(ai|assistant|system)").unwrap()
});

static RE_INSTRUCTION_OVERRIDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ignore\s+(all\s+)?(previous|prior|above)\s+(instructions?|prompts?|rules?)|disregard\s+(all\s+)?(previous|prior|above|your)\s+(instructions?|prompts?|rules?|guidelines?)|forget\s+(everything|all|what)\s+(you|i)\s+(told|said|know)").unwrap()
});

static RE_AUTHORITY_SPOOFING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(as\s+your\s+(developer|creator|administrator)|this\s+is\s+(an?\s+)?(official|authorized)\s+(override|update|instruction))").unwrap()
});

static RE_DATA_EXFIL_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(send|post|transmit|exfiltrate|upload)\s+.{0,40}(to|via)\s+(http|https|webhook|url|endpoint)|(read|access|get|extract)\s+.{0,20}(password|secret|key|token|credential|~/\.ssh)s?").unwrap()
});

static RE_PRIV_ESCALATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\brun\s+as\s+root\b|\bwith\s+(elevated|admin)\s+priv|\bsudo\s+(bash|sh)\b|\bdisable\s+(all\s+)?(safety|security)\s+check").unwrap()
});

static RE_STEGANO_INSTRUCTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(hidden|secret|covert)\s+instructions?\s+(below|follow|encoded)|decode\s+(this|the\s+following)\s+(and\s+)?(execute|run|follow)").unwrap()
});

static RE_CONVERSATION_MANIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(start|begin)\s+(a\s+)?new\s+conversation|treat\s+this\s+as\s+(a\s+)?(new|fresh)\s+session|reset\s+(your\s+)?context").unwrap()
});

static RE_ENCODING_EVASION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(base64|rot13|hex)[- ]decode\s+(this|the\s+following)|decode\s+.{0,20}before\s+(running|following)").unwrap()
});

static RE_OUTPUT_MANIPULATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(repeat|print|show|reveal|output|display)\s+(your\s+)?(system\s+prompt|initial\s+instructions?|prompt\s+template|base\s+instructions?)").unwrap()
});

static RE_TOOL_ABUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(always|automatically)\s+(approve|grant|allow)\s+(every|all)\s+(tool|permission)\s+request").unwrap()
});

static RE_FAKE_PREREQUISITES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)before\s+(using|running)\s+this\s+skill.{0,40}(must|required|need\s+to)|prerequisite:\s*(install|run|download|curl|wget)").unwrap()
});

/// Invisible/zero-width characters worth flagging, each paired with the
/// human-readable name used in the finding message (§4.7).
const INVISIBLE_CHARS: &[(char, &str)] = &[
    ('\u{200B}', "Zero Width Space"),
    ('\u{200C}', "Zero Width Non-Joiner"),
    ('\u{200D}', "Zero Width Joiner"),
    ('\u{2060}', "Word Joiner"),
    ('\u{FEFF}', "Zero Width No-Break Space (BOM)"),
    ('\u{2063}', "Invisible Separator"),
    ('\u{2062}', "Invisible Times"),
    ('\u{2064}', "Invisible Plus"),
    ('\u{200E}', "Left-to-Right Mark"),
    ('\u{200F}', "Right-to-Left Mark"),
    ('\u{202D}', "Left-to-Right Override"),
    ('\u{202E}', "Right-to-Left Override"),
];

const TAG_CHAR_START: u32 = 0xE0001;
const TAG_CHAR_END: u32 = 0xE007F;

static RE_IMG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)[^)]*\)").unwrap());
static RE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\]\(([^)\s]+)").unwrap());
static RE_HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").unwrap());

static RE_HIDDEN_COMMENT_SUSPICION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(execute|run|send|delete|upload|download|install)|(ignore|override|bypass)|(hidden|real|actual|true)\s+(instructions?|purpose|task)|do\s+not\s+(tell|show|reveal)|(password|secret|token|api\s*key|credential)").unwrap()
});

static RE_ALLCAPS_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z]{3,}\b").unwrap());
static RE_INSTRUCTIONAL_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(IGNORE|OVERRIDE|MUST|ALWAYS|NEVER|IMPORTANT|CRITICAL|EXECUTE|SEND|FOLLOW|OBEY|COMPLY|DO|NOT|FORGET|DISREGARD)\b").unwrap()
});

/// File names (case-insensitive, extension stripped) that are never skill
/// instructions — legal boilerplate cannot actually instruct the assistant
/// at runtime, so scanning it only produces false positives.
const BENIGN_FILENAMES: &[&str] = &[
    "license",
    "licence",
    "changelog",
    "notice",
    "authors",
    "contributors",
    "copying",
    "patents",
    "version",
    "history",
];

fn is_benign_file(path: &Path) -> bool {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    BENIGN_FILENAMES.contains(&stem.as_str())
}

pub struct PromptInjectionAnalyzer;

impl Analyzer for PromptInjectionAnalyzer {
    fn name(&self) -> &'static str {
        "prompt_injection"
    }

    fn analyze(&self, ctx: &AnalyzeContext) -> AnalyzerOutcome {
        let mut files = walker::collect_files(ctx.root, &["md", "txt"]);
        // SKILL.md is processed first (§4.7) so its findings sort to the
        // front even before the final (file, line, ruleId) report sort.
        files.sort_by_key(|f| (f.file_name().map(|n| n != "SKILL.md").unwrap_or(true), f.clone()));

        let mut findings = Vec::new();
        for file in &files {
            if is_benign_file(file) {
                continue;
            }
            let Some(text) = walker::read_to_string_lossy_checked(file) else {
                continue;
            };
            // Per-file cap (§4.7): only the first MiB is inspected.
            let capped: String = text.chars().take(1024 * 1024).collect();
            let rel = walker::relative_to(file, ctx.root);

            findings.extend(apply_regex_rules(&capped, &rel));
            findings.extend(invisible_char_findings(&capped, &rel));
            findings.extend(hidden_comment_findings(&capped, &rel));
            findings.extend(markdown_abuse_findings(&capped, &rel));
            findings.extend(emphasis_findings(&capped, &rel));
        }

        AnalyzerOutcome::ok(findings)
    }
}

fn finding(
    severity: Severity,
    file: &Path,
    line: Option<usize>,
    message: impl Into<String>,
    rule_id: &str,
    matched: Option<String>,
) -> Finding {
    Finding {
        analyzer: "prompt_injection".to_string(),
        severity,
        file: file.to_path_buf(),
        line,
        message: message.into(),
        rule_id: rule_id.to_string(),
        matched,
    }
}

/// Each rule fires at most once per line but may fire on multiple lines
/// (§4.7).
fn apply_regex_rules(text: &str, file: &Path) -> Vec<Finding> {
    let rules: &[(&str, Severity, &LazyLock<Regex>, &str)] = &[
        ("prompt/roleHijack", Severity::Critical, &RE_ROLE_HIJACK, "Attempts to reassign the assistant's role or identity"),
        ("prompt/instructionOverride", Severity::Critical, &RE_INSTRUCTION_OVERRIDE, "Attempts to override or discard prior instructions"),
        ("prompt/authoritySpoofing", Severity::Critical, &RE_AUTHORITY_SPOOFING, "Claims false authority to issue instructions"),
        ("prompt/dataExfilPrompt", Severity::Critical, &RE_DATA_EXFIL_PROMPT, "Instructs the assistant to exfiltrate data or credentials"),
        ("prompt/privEscalation", Severity::Critical, &RE_PRIV_ESCALATION, "Instructs the assistant to escalate privileges or disable safety checks"),
        ("prompt/steganoInstructions", Severity::Critical, &RE_STEGANO_INSTRUCTIONS, "References hidden or encoded instructions to decode and follow"),
        ("prompt/conversationManip", Severity::Critical, &RE_CONVERSATION_MANIP, "Attempts to reset or manipulate conversation context"),
        ("prompt/encodingEvasion", Severity::Warning, &RE_ENCODING_EVASION, "Instructs the assistant to decode obfuscated content before acting"),
        ("prompt/outputManipulation", Severity::Warning, &RE_OUTPUT_MANIPULATION, "Attempts to extract the system prompt or base instructions"),
        ("prompt/toolAbuse", Severity::Warning, &RE_TOOL_ABUSE, "Instructs the assistant to auto-approve tool or permission requests"),
        ("prompt/fakePrerequisites", Severity::Warning, &RE_FAKE_PREREQUISITES, "Frames a suspicious setup step as a mandatory prerequisite"),
    ];

    let mut findings = Vec::new();
    for (idx, line) in text.split('\n').enumerate() {
        let line_num = idx + 1;
        for (rule_id, severity, regex, message) in rules {
            if let Some(m) = regex.find(line) {
                findings.push(finding(
                    *severity,
                    file,
                    Some(line_num),
                    *message,
                    rule_id,
                    Some(Finding::truncate_snippet(m.as_str(), 120)),
                ));
            }
        }
    }
    findings
}

/// Emits at most one finding per invisible-character type per file, at the
/// first offending line (§4.7).
fn invisible_char_findings(text: &str, file: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (ch, name) in INVISIBLE_CHARS {
        if let Some(line_num) = first_line_containing_char(text, *ch) {
            findings.push(finding(
                Severity::Critical,
                file,
                Some(line_num),
                format!("Invisible character detected: {name}"),
                "prompt/invisibleChars",
                None,
            ));
        }
    }
    if let Some(line_num) = first_line_with_tag_char(text) {
        findings.push(finding(
            Severity::Critical,
            file,
            Some(line_num),
            "Invisible character detected: Unicode Tag character",
            "prompt/invisibleChars",
            None,
        ));
    }
    findings
}

fn first_line_containing_char(text: &str, ch: char) -> Option<usize> {
    text.split('\n')
        .enumerate()
        .find(|(_, line)| line.contains(ch))
        .map(|(idx, _)| idx + 1)
}

fn first_line_with_tag_char(text: &str) -> Option<usize> {
    text.split('\n')
        .enumerate()
        .find(|(_, line)| {
            line.chars()
                .any(|c| (TAG_CHAR_START..=TAG_CHAR_END).contains(&(c as u32)))
        })
        .map(|(idx, _)| idx + 1)
}

/// `<!-- … -->` comments whose body (≥15 chars) trips a suspicion predicate
/// (§4.7).
fn hidden_comment_findings(text: &str, file: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();
    for m in RE_HTML_COMMENT.captures_iter(text) {
        let whole = m.get(0).unwrap();
        let body = m.get(1).map(|g| g.as_str()).unwrap_or("");
        if body.trim().len() < 15 || !RE_HIDDEN_COMMENT_SUSPICION.is_match(body) {
            continue;
        }
        let line_num = text[..whole.start()].matches('\n').count() + 1;
        findings.push(finding(
            Severity::Critical,
            file,
            Some(line_num),
            "Hidden HTML comment contains suspicious instructional language",
            "prompt/hiddenComment",
            Some(Finding::truncate_snippet(body, 120)),
        ));
    }
    findings
}

/// Per-line markdown image/link abuse checks (§4.7).
fn markdown_abuse_findings(text: &str, file: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (idx, line) in text.split('\n').enumerate() {
        let line_num = idx + 1;

        for cap in RE_IMG.captures_iter(line) {
            let alt = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let url = cap.get(2).map(|m| m.as_str()).unwrap_or("");
            if url.starts_with("data:") {
                findings.push(finding(
                    Severity::Warning,
                    file,
                    Some(line_num),
                    "Markdown image uses a data: URI instead of a normal link",
                    "prompt/dataUriMarkdown",
                    Some(Finding::truncate_snippet(url, 120)),
                ));
            }
            if alt.chars().count() > 200 {
                findings.push(finding(
                    Severity::Warning,
                    file,
                    Some(line_num),
                    "Markdown image alt-text is unusually long — possible hidden instructions",
                    "prompt/longAltText",
                    Some(Finding::truncate_snippet(alt, 120)),
                ));
            }
        }

        for cap in RE_LINK.captures_iter(line) {
            if let Some(target) = cap.get(1) {
                if target.as_str().starts_with("javascript:") {
                    findings.push(finding(
                        Severity::Critical,
                        file,
                        Some(line_num),
                        "Markdown link uses a javascript: URI",
                        "prompt/jsProtocolLink",
                        Some(Finding::truncate_snippet(target.as_str(), 120)),
                    ));
                }
            }
        }
    }
    findings
}

/// A run of ≥4 all-caps tokens (≥3 letters each) on one line that also
/// contains an instructional word (§4.7).
fn emphasis_findings(text: &str, file: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (idx, line) in text.split('\n').enumerate() {
        let caps_count = RE_ALLCAPS_TOKEN.find_iter(line).count();
        if caps_count >= 4 && RE_INSTRUCTIONAL_WORD.is_match(line) {
            findings.push(finding(
                Severity::Warning,
                file,
                Some(idx + 1),
                "Emphatic ALL-CAPS run combined with instructional language",
                "prompt/emphasisInjection",
                Some(Finding::truncate_snippet(line, 120)),
            ));
        }
    }
    findings
}
