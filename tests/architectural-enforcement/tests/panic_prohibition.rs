//! Integration Test: Panic Prohibition
//!
//! **Policy**: Production code propagates errors; it MUST NOT call `.unwrap()`
//! or `.expect(`. A panic in the ticker would leave the terminal in raw mode
//! until the panic hook runs.
//!
//! **Exceptions**: test modules (`#[cfg(test)]`) and integration tests.

use architectural_enforcement::{assert_no_violations, find_violations};

const PANICKING_CALLS: &[&str] = &[".unwrap()", ".expect("];

#[test]
fn test_no_unwrap_in_ticker_core() {
    let violations = find_violations("ticker/core/src", PANICKING_CALLS);
    assert_no_violations("unwrap/expect", &violations);
}

#[test]
fn test_no_unwrap_in_tui() {
    let violations = find_violations("tui/src", PANICKING_CALLS);
    assert_no_violations("unwrap/expect", &violations);
}

#[test]
fn test_no_blocking_sleep_in_tui() {
    // The loop waits on input with a timeout; a thread sleep would freeze it
    let violations = find_violations("tui/src", &["std::thread::sleep", "thread::sleep("]);
    assert_no_violations("blocking sleep", &violations);
}
