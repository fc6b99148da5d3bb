//! Integration Test: Headless Core
//!
//! **Policy**: `ticker-core` holds the time arithmetic, the birth record and
//! configuration. It MUST NOT depend on terminal or async runtime crates; those
//! belong to `ageticker-tui`.

use std::fs;

use architectural_enforcement::{assert_no_violations, find_violations, workspace_root};

const TERMINAL_CRATES: &[&str] = &["ratatui", "crossterm", "tokio", "ageticker_tui"];

#[test]
fn test_core_sources_do_not_use_terminal_crates() {
    let needles: Vec<String> = TERMINAL_CRATES.iter().map(|c| format!("{c}::")).collect();
    let needles: Vec<&str> = needles.iter().map(String::as_str).collect();

    let violations = find_violations("ticker/core/src", &needles);
    assert_no_violations("terminal crate usage in ticker-core", &violations);
}

#[test]
fn test_core_manifest_has_no_terminal_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("ticker/core/Cargo.toml"))
        .expect("ticker-core manifest readable");

    for line in manifest.lines() {
        let key = line.split('=').next().unwrap_or("").trim();
        for forbidden in ["ratatui", "crossterm", "tokio", "ageticker-tui"] {
            assert_ne!(
                key, forbidden,
                "ticker-core must not depend on {forbidden}"
            );
        }
    }
}
