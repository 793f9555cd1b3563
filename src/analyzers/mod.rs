//! Pluggable security analyzers.
//!
//! Every analyzer implements the [`Analyzer`] trait and is run by the
//! [`orchestrator`](crate::orchestrator) against a skill root. Four of them
//! — [`script`], [`network`], [`credentials`], [`obfuscation`] — are also
//! invoked a second time by the [`codeblock`] sub-pipeline against fenced
//! code extracted from SKILL.md; [`typosquat`] and [`prompt_injection`] are
//! never re-run on code blocks (§9: a code block is not a markdown
//! document).
//!
//! Use [`all_analyzers`] to obtain the seven top-level analyzers in the
//! Scan Orchestrator's fixed dispatch order, and [`code_analyzers`] for the
//! four re-run by the Code-Block Sub-pipeline.

pub mod codeblock;
pub mod credentials;
pub mod network;
pub mod obfuscation;
pub mod prompt_injection;
pub mod script;
pub mod skillmd;
pub mod typosquat;

use std::path::Path;

use crate::catalog::{Blocklist, Catalog};
use crate::config::Config;
use crate::finding::{AnalyzerStatus, Finding};

/// Inputs shared by every analyzer invocation: the root to scan and the
/// process-lifetime immutables (rule catalog, blocklist, config).
pub struct AnalyzeContext<'a> {
    pub root: &'a Path,
    pub catalog: &'a Catalog,
    pub blocklist: &'a Blocklist,
    pub config: &'a Config,
}

/// Result of a single analyzer invocation, before the orchestrator wraps it
/// into a timed [`AnalyzerResult`](crate::finding::AnalyzerResult).
///
/// An analyzer never propagates a `Result` — internal failures (unreadable
/// catalog dependency, a regex group that failed to compile) are reported
/// via [`AnalyzerOutcome::error`] instead of a panic, so a single analyzer's
/// trouble can never abort the scan (§2.1, §7).
pub struct AnalyzerOutcome {
    pub findings: Vec<Finding>,
    pub status: AnalyzerStatus,
    pub error: Option<String>,
}

impl AnalyzerOutcome {
    pub fn ok(findings: Vec<Finding>) -> Self {
        AnalyzerOutcome {
            findings,
            status: AnalyzerStatus::Ok,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        AnalyzerOutcome {
            findings: Vec::new(),
            status: AnalyzerStatus::Error,
            error: Some(message.into()),
        }
    }
}

/// A pluggable security analyzer.
///
/// Implementers **must** be [`Send`] + [`Sync`] because the orchestrator
/// runs analyzers in parallel via [rayon].
pub trait Analyzer: Send + Sync {
    /// Returns the analyzer's unique identifier (e.g. `"network"`).
    fn name(&self) -> &'static str;

    /// Runs the analyzer against `ctx.root` and returns its findings.
    fn analyze(&self, ctx: &AnalyzeContext) -> AnalyzerOutcome;
}

/// Returns the seven top-level analyzers, in the Scan Orchestrator's fixed
/// dispatch order (§4.10): SKILL.md, Scripts, Network, Credentials,
/// Obfuscation, Typosquat, Prompt-Injection.
pub fn all_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(skillmd::SkillMdAnalyzer),
        Box::new(script::ScriptAnalyzer),
        Box::new(network::NetworkAnalyzer),
        Box::new(credentials::CredentialsAnalyzer),
        Box::new(obfuscation::ObfuscationAnalyzer),
        Box::new(typosquat::TyposquatAnalyzer),
        Box::new(prompt_injection::PromptInjectionAnalyzer),
    ]
}

/// Returns the four "code analyzers" capability injected into the SKILL.md
/// Analyzer's Code-Block Sub-pipeline. Kept separate from
/// [`all_analyzers`] so the SKILL.md Analyzer can never recursively invoke
/// itself, and so Typosquat/Prompt-Injection are structurally excluded from
/// code-block re-analysis (§9).
pub fn code_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(script::ScriptAnalyzer),
        Box::new(network::NetworkAnalyzer),
        Box::new(credentials::CredentialsAnalyzer),
        Box::new(obfuscation::ObfuscationAnalyzer),
    ]
}
