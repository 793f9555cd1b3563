//! Rule Catalog Loader.
//!
//! Loads the two external rule catalogs — `patterns.json` (regex rules
//! grouped by category) and `blocklist.json` (domains/IPs/webhook shapes) —
//! and exposes them as read-only, process-lifetime structures. Both files
//! are opaque data as far as the rest of the crate is concerned: the loader
//! only validates shape and compiles every regex once at load time.
//!
//! Default copies are embedded into the binary via `include_str!` so the
//! crate works standalone; [`Config`](crate::config::Config) may point at
//! custom files instead.

use regex::Regex;
use std::path::Path;

use crate::finding::Severity;

const DEFAULT_PATTERNS: &str = include_str!("../data/patterns.json");
const DEFAULT_BLOCKLIST: &str = include_str!("../data/blocklist.json");

/// A single rule as stored in `patterns.json`, before its pattern is compiled.
#[derive(Debug, Clone, serde::Deserialize)]
struct RawRule {
    id: String,
    pattern: String,
    severity: Severity,
    description: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct RawCatalog {
    #[serde(default)]
    #[serde(rename = "skillMd")]
    skill_md: Vec<RawRule>,
    #[serde(default)]
    execution: Vec<RawRule>,
    #[serde(default)]
    network: Vec<RawRule>,
    #[serde(default)]
    credentials: Vec<RawRule>,
    #[serde(default)]
    obfuscation: Vec<RawRule>,
}

/// A compiled rule: id, pre-built case-insensitive [`Regex`], severity, and
/// the human-readable description reported on every Finding it produces.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub regex: Regex,
    pub severity: Severity,
    pub description: String,
}

/// The five rule categories named in the data model (§3). Immutable after
/// load. A category whose regex failed to compile is left empty here and
/// its error message recorded in `errors`, so one bad rule in `network`
/// never prevents `execution`/`credentials`/etc. from loading (§2.4): only
/// the one analyzer that depends on the broken category reports an
/// analyzer-level error (§7), via [`Catalog::error_for`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub skill_md: Vec<Rule>,
    pub execution: Vec<Rule>,
    pub network: Vec<Rule>,
    pub credentials: Vec<Rule>,
    pub obfuscation: Vec<Rule>,
    errors: Vec<(&'static str, String)>,
}

impl Catalog {
    /// Compiles a [`RawCatalog`] into a [`Catalog`], one category at a time.
    /// A category whose rules fail to compile contributes no rules and an
    /// entry in `errors`; every other category still compiles normally.
    fn compile(raw: RawCatalog) -> Catalog {
        let mut catalog = Catalog::default();
        compile_into("skillMd", raw.skill_md, &mut catalog.skill_md, &mut catalog.errors);
        compile_into("execution", raw.execution, &mut catalog.execution, &mut catalog.errors);
        compile_into("network", raw.network, &mut catalog.network, &mut catalog.errors);
        compile_into("credentials", raw.credentials, &mut catalog.credentials, &mut catalog.errors);
        compile_into("obfuscation", raw.obfuscation, &mut catalog.obfuscation, &mut catalog.errors);
        catalog
    }

    /// Loads the pattern catalog. `custom_path`, when given, overrides the
    /// embedded default (§2.3 resolution order: explicit path else default).
    ///
    /// Only fails for a fundamentally unreadable/unparseable file — a
    /// per-category regex failure is non-fatal (see [`Catalog::error_for`]).
    pub fn load(custom_path: Option<&Path>) -> Result<Catalog, String> {
        let text = match custom_path {
            Some(p) => std::fs::read_to_string(p)
                .map_err(|e| format!("failed to read pattern catalog {}: {e}", p.display()))?,
            None => DEFAULT_PATTERNS.to_string(),
        };
        let raw: RawCatalog = serde_json::from_str(&text)
            .map_err(|e| format!("failed to parse pattern catalog: {e}"))?;
        Ok(Catalog::compile(raw))
    }

    /// Returns the load error recorded for `category`, if its rules failed
    /// to compile. An analyzer checks this for the one category it owns
    /// before running, so the failure surfaces as its own analyzer error
    /// rather than silently scanning with zero rules.
    pub fn error_for(&self, category: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, msg)| msg.as_str())
    }

    /// Returns every rule across all five categories, tagged with its
    /// category name, for `list-rules`/`explain` style introspection.
    pub fn all_rules(&self) -> Vec<(&'static str, &Rule)> {
        let mut out = Vec::new();
        for r in &self.skill_md {
            out.push(("skillMd", r));
        }
        for r in &self.execution {
            out.push(("execution", r));
        }
        for r in &self.network {
            out.push(("network", r));
        }
        for r in &self.credentials {
            out.push(("credentials", r));
        }
        for r in &self.obfuscation {
            out.push(("obfuscation", r));
        }
        out
    }
}

fn compile_into(
    category: &'static str,
    raw: Vec<RawRule>,
    out: &mut Vec<Rule>,
    errors: &mut Vec<(&'static str, String)>,
) {
    for r in raw {
        match Regex::new(&format!("(?i){}", r.pattern)) {
            Ok(regex) => out.push(Rule {
                id: r.id,
                regex,
                severity: r.severity,
                description: r.description,
            }),
            Err(e) => {
                errors.push((
                    category,
                    format!("catalog category '{category}' rule '{}': invalid regex: {e}", r.id),
                ));
                out.clear();
                return;
            }
        }
    }
}

/// Known domains/IPs/webhook shapes, loaded once from `blocklist.json`.
#[derive(Debug, Clone, serde::Deserialize)]
struct RawBlocklist {
    #[serde(default)]
    domains: Vec<String>,
    #[serde(default)]
    ips: Vec<String>,
    #[serde(rename = "suspiciousTlds", default)]
    suspicious_tlds: Vec<String>,
    #[serde(rename = "discordWebhookPattern")]
    discord_webhook_pattern: String,
    #[serde(rename = "telegramBotPattern")]
    telegram_bot_pattern: String,
    #[serde(rename = "slackWebhookPattern")]
    slack_webhook_pattern: String,
}

/// Curated set of domains, IPs/CIDRs, and webhook URL shapes known to be
/// malicious or high-risk exfiltration channels. Immutable after load.
#[derive(Debug, Clone)]
pub struct Blocklist {
    pub domains: Vec<String>,
    pub ips: Vec<String>,
    pub suspicious_tlds: Vec<String>,
    pub discord_webhook: Regex,
    pub telegram_bot: Regex,
    pub slack_webhook: Regex,
}

impl Blocklist {
    /// Loads the blocklist. `custom_path`, when given, overrides the
    /// embedded default.
    pub fn load(custom_path: Option<&Path>) -> Result<Blocklist, String> {
        let text = match custom_path {
            Some(p) => std::fs::read_to_string(p)
                .map_err(|e| format!("failed to read blocklist {}: {e}", p.display()))?,
            None => DEFAULT_BLOCKLIST.to_string(),
        };
        let raw: RawBlocklist = serde_json::from_str(&text)
            .map_err(|e| format!("failed to parse blocklist: {e}"))?;

        let discord_webhook = Regex::new(&format!("(?i){}", raw.discord_webhook_pattern))
            .map_err(|e| format!("blocklist discordWebhookPattern: invalid regex: {e}"))?;
        let telegram_bot = Regex::new(&format!("(?i){}", raw.telegram_bot_pattern))
            .map_err(|e| format!("blocklist telegramBotPattern: invalid regex: {e}"))?;
        let slack_webhook = Regex::new(&format!("(?i){}", raw.slack_webhook_pattern))
            .map_err(|e| format!("blocklist slackWebhookPattern: invalid regex: {e}"))?;

        Ok(Blocklist {
            domains: raw.domains.into_iter().map(|d| d.to_lowercase()).collect(),
            ips: raw.ips,
            suspicious_tlds: raw
                .suspicious_tlds
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect(),
            discord_webhook,
            telegram_bot,
            slack_webhook,
        })
    }

    /// Returns `true` when `host` (lowercased) is, or is a subdomain of, a
    /// blocklisted domain. Exact-or-subdomain match, never naive substring
    /// (mirrors the allowlist matching discipline used elsewhere in the
    /// network code — a substring match on `evil.com` would also flag
    /// `notevil.com`).
    pub fn is_blocklisted_domain(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    }
}
