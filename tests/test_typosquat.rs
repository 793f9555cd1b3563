use clawscan::analyzers::typosquat::{levenshtein, TyposquatAnalyzer};
use clawscan::analyzers::{AnalyzeContext, Analyzer};
use clawscan::catalog::{Blocklist, Catalog};
use clawscan::config::Config;
use tempfile::TempDir;

fn ctx<'a>(root: &'a std::path::Path, catalog: &'a Catalog, blocklist: &'a Blocklist, config: &'a Config) -> AnalyzeContext<'a> {
    AnalyzeContext { root, catalog, blocklist, config }
}

fn analyze_named(dir_name: &str, heading: Option<&str>) -> Vec<clawscan::finding::Finding> {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join(dir_name);
    std::fs::create_dir(&root).unwrap();
    if let Some(h) = heading {
        std::fs::write(root.join("SKILL.md"), format!("# {h}\n\nsome body text\n")).unwrap();
    }
    let catalog = Catalog::load(None).unwrap();
    let blocklist = Blocklist::load(None).unwrap();
    let config = Config::default();
    TyposquatAnalyzer
        .analyze(&ctx(&root, &catalog, &blocklist, &config))
        .findings
}

#[test]
fn exact_match_to_a_popular_name_is_not_flagged() {
    let findings = analyze_named("github", Some("github"));
    assert!(findings.is_empty());
}

#[test]
fn whitelisted_compound_name_is_never_flagged() {
    let findings = analyze_named("github-actions", Some("github-actions"));
    assert!(findings.is_empty());
}

#[test]
fn look_alike_substitution_is_flagged_as_critical() {
    let findings = analyze_named("gltHub", Some("gltHub"));
    assert!(findings
        .iter()
        .any(|f| f.rule_id == "typosquat/typosquatPattern" && f.severity == clawscan::finding::Severity::Critical));
}

#[test]
fn two_hop_look_alike_substitution_is_flagged_as_critical() {
    let findings = analyze_named("g1thub", Some("g1thub"));
    assert!(findings
        .iter()
        .any(|f| f.rule_id == "typosquat/typosquatPattern" && f.severity == clawscan::finding::Severity::Critical));
}

#[test]
fn one_edit_away_is_flagged_as_a_warning() {
    let findings = analyze_named("githob", Some("githob"));
    assert!(findings
        .iter()
        .any(|f| f.rule_id == "typosquat/levenshteinClose" && f.severity == clawscan::finding::Severity::Warning));
}

#[test]
fn short_affix_around_a_popular_name_is_flagged() {
    let findings = analyze_named("my-github-tool", Some("my-github-tool"));
    assert!(findings.iter().any(|f| f.rule_id == "typosquat/typosquatPattern"));
}

#[test]
fn falls_back_to_directory_basename_without_skill_md() {
    let findings = analyze_named("gltHub", None);
    assert!(findings.iter().any(|f| f.rule_id == "typosquat/typosquatPattern"));
}

#[test]
fn levenshtein_distance_is_computed_on_chars() {
    assert_eq!(levenshtein("github", "github"), 0);
    assert_eq!(levenshtein("github", "githob"), 1);
    assert_eq!(levenshtein("", "abc"), 3);
}
