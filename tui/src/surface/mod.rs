//! Display Surface
//!
//! The seam between the ticker and the terminal. The loop only ever talks to
//! a [`Surface`]: query the viewport, present a frame, wait for a key.
//!
//! - [`CrosstermSurface`]: the real terminal (raw mode, alternate screen)
//! - [`ScriptedSurface`]: headless, driven by a key script, records frames
//!
//! Terminal modes sit behind [`TerminalModes`] so a [`TerminalGuard`] can run
//! against [`RecordingModes`] in tests.

mod modes;
mod scripted;
mod terminal;

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::render::{Frame, Viewport};

pub use modes::{CrosstermModes, ModeChange, RecordingModes, TerminalModes};
pub use scripted::ScriptedSurface;
pub use terminal::{
    install_panic_hook, restore_terminal, CrosstermSurface, TerminalGuard, TerminalInitError,
};

/// Keys the ticker and the prompt react to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Escape,
    /// Ctrl-C, which raw mode delivers as a key instead of a signal
    Interrupt,
}

impl Key {
    /// Map a crossterm key event, dropping releases and keys we ignore
    pub fn from_event(event: KeyEvent) -> Option<Key> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let key = match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Key::Interrupt
            }
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            _ => return None,
        };
        Some(key)
    }

    /// Whether this key ends the ticker
    pub fn is_exit(&self) -> bool {
        matches!(self, Key::Escape | Key::Interrupt)
    }
}

/// Where frames go and keys come from
#[async_trait(?Send)]
pub trait Surface {
    /// Current viewport; queried every tick so resizes are picked up
    fn size(&mut self) -> io::Result<Viewport>;

    /// Replace what is on screen with `frame`
    fn present(&mut self, frame: &Frame) -> io::Result<()>;

    /// Wait up to `timeout` for a key press
    ///
    /// Returns `Ok(None)` once the timeout elapses without a key.
    async fn next_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}
