//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - `ticker-core` stays headless (no terminal or runtime crates)
//! - No `.unwrap()` / `.expect(` in production code
//! - No blocking `std::thread::sleep` in the cooperative loop
//!
//! The helpers below walk a crate's `src/` and yield production lines only:
//! comment lines are dropped and each file is cut at its first
//! `#[cfg(test)]`.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One line of production source
#[derive(Clone, Debug)]
pub struct SourceLine {
    pub path: PathBuf,
    pub number: usize,
    /// Code with any trailing `//` comment removed
    pub code: String,
}

impl std::fmt::Display for SourceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.number, self.code.trim())
    }
}

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// All `.rs` files under `dir`, relative to the workspace root
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    assert!(root.exists(), "missing source directory {}", root.display());

    let mut files: Vec<PathBuf> = WalkDir::new(&root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Production lines of a single file's contents
pub fn production_lines_of(path: &Path, content: &str) -> Vec<SourceLine> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(idx, line)| SourceLine {
            path: path.to_path_buf(),
            number: idx + 1,
            code: line.split("//").next().unwrap_or(line).to_string(),
        })
        .collect()
}

/// Production lines of every `.rs` file under `dir`
pub fn production_lines(dir: &str) -> Vec<SourceLine> {
    rust_files(dir)
        .iter()
        .flat_map(|path| {
            let content = fs::read_to_string(path).unwrap_or_default();
            production_lines_of(path, &content)
        })
        .collect()
}

/// Production lines under `dir` whose code contains any of `needles`
pub fn find_violations(dir: &str, needles: &[&str]) -> Vec<SourceLine> {
    production_lines(dir)
        .into_iter()
        .filter(|line| needles.iter().any(|n| line.code.contains(n)))
        .collect()
}

/// Panic with a readable list when `violations` is not empty
pub fn assert_no_violations(what: &str, violations: &[SourceLine]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {what} found in production code:\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }

    panic!(
        "\nFound {} violation(s): {what}.\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let src = "fn a() {}\n// note .unwrap()\nlet x = y; // z.unwrap()\n#[cfg(test)]\nmod tests { x.unwrap() }\n";
        let lines = production_lines_of(Path::new("x.rs"), src);
        let code: Vec<&str> = lines.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(code, vec!["fn a() {}", "let x = y; "]);
        assert_eq!(lines[1].number, 3);
    }

    #[test]
    fn test_workspace_root_contains_crates() {
        let root = workspace_root();
        assert!(root.join("ticker").join("core").join("Cargo.toml").exists());
        assert!(root.join("tui").join("Cargo.toml").exists());
    }
}
