//! Command-line interface definition.
//!
//! Uses [clap] derive macros to parse arguments. This module is only used by
//! the binary crate (`src/main.rs`). Argument parsing, exit codes, and
//! pretty-printing are ambient CLI concerns outside the core analysis
//! pipeline (spec §1); this module is the thin wrapper the core is driven
//! through.

use clap::{Parser, Subcommand};
use clawscan::output::OutputFormat;
use std::path::PathBuf;

/// Pre-install security scanner for agent-runtime skills.
#[derive(Parser)]
#[command(name = "clawscan", version, about = "Pre-install security scanner for agent skills")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a skill directory and produce a risk verdict.
    Scan {
        /// Path to the skill directory (typically contains a SKILL.md).
        path: PathBuf,

        /// Output format (pretty or json).
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to a file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Path to a custom configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List every rule in the loaded pattern catalog with its severity.
    #[command(name = "list-rules")]
    ListRules {
        /// Path to a custom configuration file (for catalog overrides).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the category, severity, and description for a specific rule.
    Explain {
        /// Rule ID to look up (e.g. `"network/blocklistedDomain"`).
        rule_id: String,

        /// Path to a custom configuration file (for catalog overrides).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the seven analyzers and whether each is enabled.
    #[command(name = "list-analyzers")]
    ListAnalyzers {
        /// Path to a custom configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
