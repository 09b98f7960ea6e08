//! Architecture enforcement tests.
//!
//! Layering rules that the compiler cannot check:
//!
//! 1. **git2 confinement** - only `src/git/` talks to libgit2
//! 2. **Single error sink** - only `src/cli/mod.rs` logs at error level;
//!    everything below it returns errors instead
//! 3. **No process exits** - only `main.rs` ends the process, through the
//!    exit code returned by `cli::run`

use std::fs;
use std::path::{Path, PathBuf};

fn source_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).expect("read src dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            files.extend(source_files(&path));
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    files
}

fn src_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Non-comment lines of a file.
fn code_lines(path: &Path) -> Vec<(usize, String)> {
    fs::read_to_string(path)
        .expect("read source file")
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(n, line)| (n + 1, line.to_string()))
        .collect()
}

fn violations(needle: &str, allowed: impl Fn(&Path) -> bool) -> Vec<String> {
    let root = src_root();
    let mut found = Vec::new();
    for file in source_files(&root) {
        let relative = file.strip_prefix(&root).unwrap_or(&file).to_path_buf();
        if allowed(&relative) {
            continue;
        }
        for (n, line) in code_lines(&file) {
            if line.contains(needle) {
                found.push(format!("{}:{}: {}", relative.display(), n, line.trim()));
            }
        }
    }
    found
}

#[test]
fn git2_is_confined_to_git_module() {
    let found = violations("git2::", |p| p.starts_with("git"));
    assert!(
        found.is_empty(),
        "git2 used outside src/git:\n{}",
        found.join("\n")
    );
}

#[test]
fn only_dispatcher_logs_errors() {
    let found = violations("tracing::error!", |p| p == Path::new("cli/mod.rs"));
    assert!(
        found.is_empty(),
        "error-level logging below the dispatcher:\n{}",
        found.join("\n")
    );
}

#[test]
fn no_process_exit() {
    let found = violations("process::exit", |_| false);
    assert!(
        found.is_empty(),
        "process::exit bypasses the exit code policy:\n{}",
        found.join("\n")
    );
}
