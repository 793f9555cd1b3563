mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use clawscan::finding::RiskLevel;
use clawscan::{catalog::Catalog, config, orchestrator, output};
use colored::Colorize;

/// Exit codes follow the conventional mapping the shipped CLI uses (spec
/// §6): this is a property of the CLI wrapper, not the core library.
const EXIT_SAFE: i32 = 0;
const EXIT_WARNING: i32 = 1;
const EXIT_DANGEROUS: i32 = 2;
const EXIT_SCAN_ERROR: i32 = 3;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            format,
            output: output_path,
            config: config_path,
        } => {
            if !path.exists() {
                eprintln!("Error: path does not exist: {}", path.display());
                std::process::exit(EXIT_SCAN_ERROR);
            }

            let config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(EXIT_SCAN_ERROR);
            });

            let target = path.to_string_lossy().to_string();
            let report = orchestrator::run_scan(&target, &path, &config).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(EXIT_SCAN_ERROR);
            });

            let formatted = output::format_report(&report, &format);
            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &formatted).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {e}");
                    std::process::exit(EXIT_SCAN_ERROR);
                });
                eprintln!("Output written to {}", out_path.display());
            } else {
                print!("{formatted}");
            }

            std::process::exit(match report.risk.level {
                RiskLevel::Safe => EXIT_SAFE,
                RiskLevel::Warning => EXIT_WARNING,
                RiskLevel::Dangerous => EXIT_DANGEROUS,
            });
        }

        Commands::ListRules { config: config_path } => {
            let config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(EXIT_SCAN_ERROR);
            });
            let catalog = Catalog::load(config.catalog.patterns_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(EXIT_SCAN_ERROR);
            });

            println!("{}", "Rule Catalog".bold().underline());
            println!();

            let mut current_category = "";
            for (category, rule) in catalog.all_rules() {
                if category != current_category {
                    if !current_category.is_empty() {
                        println!();
                    }
                    println!("  {}", category.bold());
                    current_category = category;
                }

                let severity = severity_label(rule.severity);
                println!("    [{severity}] {id:<35} {desc}", id = rule.id, desc = rule.description);
            }

            println!();
            println!("  Total: {} rules", catalog.all_rules().len());
        }

        Commands::Explain { rule_id, config: config_path } => {
            let config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(EXIT_SCAN_ERROR);
            });
            let catalog = Catalog::load(config.catalog.patterns_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(EXIT_SCAN_ERROR);
            });

            match catalog.all_rules().into_iter().find(|(_, r)| r.id == rule_id) {
                Some((category, rule)) => {
                    println!("{}", rule.id.bold());
                    println!();
                    println!("  Category:     {category}");
                    println!("  Severity:     {}", rule.severity);
                    println!("  Description:  {}", rule.description);
                    println!("  Pattern:      {}", rule.regex.as_str());
                }
                None => {
                    eprintln!("Unknown rule: {rule_id}");
                    eprintln!("Use 'clawscan list-rules' to see every rule from the loaded catalog.");
                    std::process::exit(EXIT_SCAN_ERROR);
                }
            }
        }

        Commands::ListAnalyzers { config: config_path } => {
            let config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(EXIT_SCAN_ERROR);
            });

            println!("{}", "Analyzers".bold().underline());
            println!();

            for analyzer in clawscan::analyzers::all_analyzers() {
                let enabled = config.is_analyzer_enabled(analyzer.name());
                let status = if enabled {
                    "ENABLED ".green().bold().to_string()
                } else {
                    "DISABLED".dimmed().to_string()
                };
                println!("  [{status}] {}", analyzer.name());
            }
        }
    }
}

fn severity_label(severity: clawscan::finding::Severity) -> String {
    use clawscan::finding::Severity;
    match severity {
        Severity::Critical => "CRIT".red().bold().to_string(),
        Severity::Warning => "WARN".yellow().bold().to_string(),
        Severity::Info => "INFO".blue().to_string(),
    }
}
