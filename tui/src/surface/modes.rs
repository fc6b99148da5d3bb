//! Terminal Modes
//!
//! The individual pieces of terminal state a session changes. [`CrosstermModes`]
//! talks to the real stdout; [`RecordingModes`] keeps the state in memory and
//! can be told to fail a step, so acquisition and restore can be checked
//! without a terminal.

use std::io;
use std::sync::Arc;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use parking_lot::Mutex;

/// Switches for raw mode, the alternate screen and the cursor
pub trait TerminalModes {
    fn enable_raw_mode(&mut self) -> io::Result<()>;
    fn disable_raw_mode(&mut self) -> io::Result<()>;
    fn enter_alternate_screen(&mut self) -> io::Result<()>;
    fn leave_alternate_screen(&mut self) -> io::Result<()>;
    fn hide_cursor(&mut self) -> io::Result<()>;
    fn show_cursor(&mut self) -> io::Result<()>;
}

/// The process terminal via crossterm
#[derive(Clone, Copy, Debug, Default)]
pub struct CrosstermModes;

impl TerminalModes for CrosstermModes {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    fn enter_alternate_screen(&mut self) -> io::Result<()> {
        execute!(io::stdout(), EnterAlternateScreen)
    }

    fn leave_alternate_screen(&mut self) -> io::Result<()> {
        execute!(io::stdout(), LeaveAlternateScreen)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(io::stdout(), Hide)
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        execute!(io::stdout(), Show)
    }
}

/// One successful mode switch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeChange {
    EnableRawMode,
    DisableRawMode,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    HideCursor,
    ShowCursor,
}

#[derive(Debug, Default)]
struct Recorded {
    changes: Vec<ModeChange>,
    failing: Vec<ModeChange>,
    raw_mode: bool,
    alternate_screen: bool,
    cursor_hidden: bool,
}

/// In-memory terminal state; clones share it
#[derive(Clone, Debug, Default)]
pub struct RecordingModes {
    state: Arc<Mutex<Recorded>>,
}

impl RecordingModes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `change` fail with an I/O error
    pub fn fail_on(self, change: ModeChange) -> Self {
        self.state.lock().failing.push(change);
        self
    }

    /// Successful switches, in order
    pub fn changes(&self) -> Vec<ModeChange> {
        self.state.lock().changes.clone()
    }

    pub fn is_raw(&self) -> bool {
        self.state.lock().raw_mode
    }

    pub fn in_alternate_screen(&self) -> bool {
        self.state.lock().alternate_screen
    }

    pub fn is_cursor_hidden(&self) -> bool {
        self.state.lock().cursor_hidden
    }

    /// Nothing is left switched on
    pub fn is_restored(&self) -> bool {
        let state = self.state.lock();
        !state.raw_mode && !state.alternate_screen && !state.cursor_hidden
    }

    fn apply(&self, change: ModeChange) -> io::Result<()> {
        let mut state = self.state.lock();
        if state.failing.contains(&change) {
            return Err(io::Error::other(format!("{change:?} refused")));
        }

        match change {
            ModeChange::EnableRawMode => state.raw_mode = true,
            ModeChange::DisableRawMode => state.raw_mode = false,
            ModeChange::EnterAlternateScreen => state.alternate_screen = true,
            ModeChange::LeaveAlternateScreen => state.alternate_screen = false,
            ModeChange::HideCursor => state.cursor_hidden = true,
            ModeChange::ShowCursor => state.cursor_hidden = false,
        }
        state.changes.push(change);
        Ok(())
    }
}

impl TerminalModes for RecordingModes {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        self.apply(ModeChange::EnableRawMode)
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        self.apply(ModeChange::DisableRawMode)
    }

    fn enter_alternate_screen(&mut self) -> io::Result<()> {
        self.apply(ModeChange::EnterAlternateScreen)
    }

    fn leave_alternate_screen(&mut self) -> io::Result<()> {
        self.apply(ModeChange::LeaveAlternateScreen)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.apply(ModeChange::HideCursor)
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.apply(ModeChange::ShowCursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let modes = RecordingModes::new();
        let mut handle = modes.clone();

        handle.enable_raw_mode().unwrap();
        handle.hide_cursor().unwrap();

        assert!(modes.is_raw());
        assert!(modes.is_cursor_hidden());
        assert!(!modes.is_restored());
        assert_eq!(
            modes.changes(),
            vec![ModeChange::EnableRawMode, ModeChange::HideCursor]
        );
    }

    #[test]
    fn test_refused_change_is_not_applied() {
        let mut modes = RecordingModes::new().fail_on(ModeChange::EnterAlternateScreen);

        assert!(modes.enter_alternate_screen().is_err());
        assert!(!modes.in_alternate_screen());
        assert!(modes.changes().is_empty());
    }
}
