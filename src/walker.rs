//! File Walker.
//!
//! Enumerates files under a skill root, filtered by extension and ignore
//! rules, enforcing a per-file size cap. Directories are never returned.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Per-file size cap (§4.1, §5): content above this is not read. Files this
/// size or smaller are read in full; files one byte larger are skipped.
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Extension set shared by the Script Analyzer.
pub const SCRIPT_EXTENSIONS: &[&str] = &[
    "js", "mjs", "cjs", "py", "sh", "bash", "rb", "pl", "ps1", "bat", "cmd",
];

/// Extension set shared by the Network, Credentials, Obfuscation analyzers
/// and the SKILL.md Analyzer's auxiliary scan: the script set plus
/// markdown/config formats.
pub const BROAD_EXTENSIONS: &[&str] = &[
    "js", "mjs", "cjs", "py", "sh", "bash", "rb", "pl", "ps1", "bat", "cmd", "md", "json", "yaml",
    "yml", "toml", "cfg", "ini", "env",
];

/// Directory components that are never descended into.
const IGNORED_COMPONENTS: &[&str] = &["node_modules", ".git"];

/// Returns `true` when `path` has any path component equal to one of
/// [`IGNORED_COMPONENTS`].
fn has_ignored_component(path: &Path) -> bool {
    path.components().any(|c| {
        IGNORED_COMPONENTS
            .iter()
            .any(|ignored| c.as_os_str() == *ignored)
    })
}

/// Returns `true` when `path`'s extension (case-insensitive) is one of
/// `extensions`, or, for the `.env*` family, the file name starts with
/// `.env` (`.env`, `.env.local`, `.env.production`, …).
fn matches_extension(path: &Path, extensions: &[&str]) -> bool {
    if extensions.contains(&"env") {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.to_lowercase().starts_with(".env") {
                return true;
            }
        }
    }
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Recursively collects files under `root` whose extension is in
/// `extensions`, skipping `node_modules/`/`.git/` subtrees and any file
/// larger than [`MAX_FILE_BYTES`]. Deduplicated by construction (each path
/// is visited once by the underlying walk).
pub fn collect_files(root: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_type().is_file() || !has_ignored_component(e.path()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if has_ignored_component(path) {
            continue;
        }
        if !matches_extension(path, extensions) {
            continue;
        }
        let size_ok = entry
            .metadata()
            .map(|m| m.len() <= MAX_FILE_BYTES)
            .unwrap_or(false);
        if !size_ok {
            continue;
        }
        files.push(path.to_path_buf());
    }
    files
}

/// Like [`collect_files`], but also returns the paths of files that matched
/// `extensions` and were skipped solely for exceeding [`MAX_FILE_BYTES`].
/// The Script Analyzer uses the second list to emit a `largeFile` finding
/// for files the walker would otherwise skip in silence (§4.1).
pub fn collect_files_with_oversized(
    root: &Path,
    extensions: &[&str],
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut files = Vec::new();
    let mut oversized = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_type().is_file() || !has_ignored_component(e.path()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if has_ignored_component(path) || !matches_extension(path, extensions) {
            continue;
        }
        match entry.metadata().map(|m| m.len()) {
            Ok(len) if len <= MAX_FILE_BYTES => files.push(path.to_path_buf()),
            Ok(_) => oversized.push(path.to_path_buf()),
            Err(_) => {}
        }
    }
    (files, oversized)
}

/// Collects every regular file under `root`, regardless of extension,
/// respecting the same ignore rules and size cap as [`collect_files`].
/// Used by the Script Analyzer's shebang detection, which must consider
/// extension-less files (§4.5 `noExtension`) that no extension-filtered
/// walk would ever surface.
pub fn collect_all_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_type().is_file() || !has_ignored_component(e.path()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if has_ignored_component(path) {
            continue;
        }
        let size_ok = entry
            .metadata()
            .map(|m| m.len() <= MAX_FILE_BYTES)
            .unwrap_or(false);
        if size_ok {
            files.push(path.to_path_buf());
        }
    }
    files
}

/// Reads `path` as UTF-8 text, returning `None` on any I/O or encoding
/// error (skip-silently per §4.1/§7) rather than failing the whole analyzer.
pub fn read_to_string_lossy_checked(path: &Path) -> Option<String> {
    std::fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

/// Converts an absolute (or walk-relative) path into a path relative to
/// `root`, falling back to the original path if it is not a prefix of
/// `root` (should not happen for paths produced by [`collect_files`]).
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
