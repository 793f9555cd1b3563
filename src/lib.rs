//! # clawscan
//!
//! Pre-install security scanner for agent-runtime skills.
//!
//! A "skill" is a directory-packaged plug-in for an agent runtime, declared
//! by a top-level `SKILL.md` manifest plus arbitrary scripts and config.
//! `clawscan` inspects a skill tree statically — no execution, no network,
//! no LLM calls — and produces a [`finding::ScanReport`] carrying a risk
//! verdict (safe / warning / dangerous), a numeric score, and a list of
//! findings tied to a file, line, rule, and severity.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use clawscan::{config::Config, orchestrator};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let report = orchestrator::run_scan("./my-skill", Path::new("./my-skill"), &config)
//!     .expect("scan failed");
//!
//! println!("{} ({})", report.risk.label, report.risk.score);
//! ```
//!
//! ## Architecture
//!
//! 1. **[`catalog`]** — loads the external rule/blocklist data files once at
//!    process start and compiles every regex.
//! 2. **[`walker`]** — enumerates files under a skill root by extension,
//!    respecting ignore rules and a per-file size cap.
//! 3. **[`netmatch`]** — pure IPv4/CIDR matching used by the network
//!    analyzer.
//! 4. **[`rule_engine`]** — applies a compiled rule table to a file's lines.
//! 5. **[`analyzers`]** — the seven pluggable [`analyzers::Analyzer`]
//!    implementations, plus the [`analyzers::codeblock`] sub-pipeline.
//! 6. **[`aggregator`]** — turns the raw finding set into a score and
//!    verdict.
//! 7. **[`orchestrator`]** — runs every analyzer with error isolation and
//!    assembles the final [`finding::ScanReport`].
//! 8. **[`finding`]** — core data types.
//! 9. **[`output`]** — renders a report as pretty text or JSON.
//! 10. **[`config`]** — TOML configuration loading.

pub mod aggregator;
pub mod analyzers;
pub mod catalog;
pub mod config;
pub mod finding;
pub mod netmatch;
pub mod orchestrator;
pub mod output;
pub mod rule_engine;
pub mod walker;
