//! Code-Block Sub-pipeline.
//!
//! Extracts fenced code blocks from a markdown manifest, writes each to a
//! scoped temp directory, re-runs the code analyzers on that directory, and
//! rewrites the resulting findings back onto SKILL.md's own line numbers
//! (§4.8).

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tempfile::TempDir;

use super::{code_analyzers, AnalyzeContext};
use crate::finding::Finding;

static RE_FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```").unwrap());

struct Block {
    code: String,
    /// 1-based line number of the block's first code line inside SKILL.md.
    start_line: usize,
}

/// Parses every fenced block out of `text`, runs the code analyzers against
/// them in a scoped temp directory, and returns findings remapped onto
/// SKILL.md. Any failure (temp dir creation, write, sub-analyzer panic) is
/// swallowed and yields no findings rather than aborting the SKILL.md scan
/// (§4.8).
pub fn run(text: &str, ctx: &AnalyzeContext) -> Vec<Finding> {
    let blocks = parse_fenced_blocks(text);
    if blocks.is_empty() {
        return Vec::new();
    }

    let Ok(tmp) = TempDir::new() else {
        return Vec::new();
    };

    for (i, block) in blocks.iter().enumerate() {
        let path = tmp.path().join(format!("block_{i}.sh"));
        if std::fs::write(&path, &block.code).is_err() {
            continue;
        }
    }

    let sub_ctx = AnalyzeContext {
        root: tmp.path(),
        catalog: ctx.catalog,
        blocklist: ctx.blocklist,
        config: ctx.config,
    };

    let mut findings = Vec::new();
    for analyzer in code_analyzers() {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            analyzer.analyze(&sub_ctx)
        }));
        let Ok(outcome) = outcome else { continue };
        for mut finding in outcome.findings {
            remap_finding(&mut finding, &blocks);
            findings.push(finding);
        }
    }

    // tmp is dropped here regardless of success/failure above, deleting the
    // temp directory on every exit path.
    findings
}

/// Rewrites a sub-analyzer's finding onto SKILL.md's coordinate space
/// (§4.8): `file` always becomes `SKILL.md`; `line` is remapped through the
/// originating block's `start_line` when the file name parses as
/// `block_<i>.sh`, otherwise cleared to `None`.
fn remap_finding(finding: &mut Finding, blocks: &[Block]) {
    let block_index = finding
        .file
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.strip_prefix("block_"))
        .and_then(|s| s.parse::<usize>().ok());

    finding.line = match (block_index.and_then(|i| blocks.get(i)), finding.line) {
        (Some(block), Some(l)) => Some(block.start_line + l - 1),
        _ => None,
    };
    finding.file = PathBuf::from("SKILL.md");
    finding.message = format!("[In code block] {}", finding.message);
}

/// Parses every ```` ``` ```` …```` ``` ```` fenced block, recording the
/// code body and the 1-based line number of its first code line (the line
/// after the opening fence).
fn parse_fenced_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current: Vec<&str> = Vec::new();
    let mut start_line = 0;

    for (idx, line) in text.split('\n').enumerate() {
        let line_num = idx + 1;
        if RE_FENCE_OPEN.is_match(line) {
            if in_block {
                blocks.push(Block {
                    code: current.join("\n"),
                    start_line,
                });
                current = Vec::new();
                in_block = false;
            } else {
                in_block = true;
                start_line = line_num + 1;
            }
            continue;
        }
        if in_block {
            current.push(line);
        }
    }
    // An unterminated fence at EOF is dropped: there is no valid closing
    // fence, so the block can't be attributed a reliable end.

    blocks
}
