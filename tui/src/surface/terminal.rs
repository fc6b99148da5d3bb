//! Crossterm Terminal Surface
//!
//! Owns the terminal for the whole session. [`TerminalGuard`] tracks each
//! piece of terminal state it changed and undoes exactly those on drop, so a
//! failure halfway through acquisition leaves the terminal as it was.

use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::modes::{CrosstermModes, TerminalModes};
use super::{Key, Surface};
use crate::render::{Frame, Viewport};

/// Fatal failures while taking over the terminal
#[derive(Debug, Error)]
pub enum TerminalInitError {
    #[error("stdin/stdout is not an interactive terminal")]
    NotATty,

    #[error("Failed to enable raw mode: {0}")]
    RawMode(#[source] io::Error),

    #[error("Failed to enter the alternate screen: {0}")]
    AlternateScreen(#[source] io::Error),

    #[error("Failed to initialize terminal backend: {0}")]
    Backend(#[source] io::Error),
}

/// Scoped ownership of raw mode, the alternate screen and the hidden cursor
#[derive(Debug)]
pub struct TerminalGuard<M: TerminalModes = CrosstermModes> {
    modes: M,
    raw_mode: bool,
    alternate_screen: bool,
    cursor_hidden: bool,
}

impl TerminalGuard {
    /// Take over the process terminal
    pub fn acquire() -> Result<Self, TerminalInitError> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            return Err(TerminalInitError::NotATty);
        }
        Self::acquire_with(CrosstermModes)
    }
}

impl<M: TerminalModes> TerminalGuard<M> {
    /// Switch `modes` on in order; an early return rolls back what succeeded
    pub fn acquire_with(modes: M) -> Result<Self, TerminalInitError> {
        let mut guard = Self {
            modes,
            raw_mode: false,
            alternate_screen: false,
            cursor_hidden: false,
        };

        guard
            .modes
            .enable_raw_mode()
            .map_err(TerminalInitError::RawMode)?;
        guard.raw_mode = true;

        guard
            .modes
            .enter_alternate_screen()
            .map_err(TerminalInitError::AlternateScreen)?;
        guard.alternate_screen = true;

        // A visible cursor is cosmetic; keep going if hiding it fails
        match guard.modes.hide_cursor() {
            Ok(()) => guard.cursor_hidden = true,
            Err(e) => warn!(error = %e, "Failed to hide cursor"),
        }

        debug!("Terminal acquired");
        Ok(guard)
    }

    pub fn modes(&self) -> &M {
        &self.modes
    }
}

impl<M: TerminalModes> Drop for TerminalGuard<M> {
    fn drop(&mut self) {
        if self.cursor_hidden {
            let _ = self.modes.show_cursor();
        }
        if self.alternate_screen {
            let _ = self.modes.leave_alternate_screen();
        }
        if self.raw_mode {
            let _ = self.modes.disable_raw_mode();
        }
        debug!("Terminal restored");
    }
}

/// Best-effort restore used where no guard is reachable (panics)
pub fn restore_terminal() {
    let mut modes = CrosstermModes;
    let _ = modes.show_cursor();
    let _ = modes.leave_alternate_screen();
    let _ = modes.disable_raw_mode();
}

/// Restore the terminal before the default panic message is printed
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));
}

/// The interactive terminal
pub struct CrosstermSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: EventStream,
    events_closed: bool,
    // Dropped last so the terminal is restored after the backend is gone
    _guard: TerminalGuard,
}

impl CrosstermSurface {
    pub fn new() -> Result<Self, TerminalInitError> {
        let guard = TerminalGuard::acquire()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .map_err(TerminalInitError::Backend)?;
        terminal.clear().map_err(TerminalInitError::Backend)?;

        Ok(Self {
            terminal,
            events: EventStream::new(),
            events_closed: false,
            _guard: guard,
        })
    }
}

#[async_trait(?Send)]
impl Surface for CrosstermSurface {
    fn size(&mut self) -> io::Result<Viewport> {
        self.terminal.size().map(Viewport::from)
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let source = frame.buffer();
        self.terminal.draw(|f| {
            let area = f.area();
            let buf = f.buffer_mut();

            for y in 0..area.height.min(source.area.height) {
                for x in 0..area.width.min(source.area.width) {
                    buf[(x, y)] = source[(x, y)].clone();
                }
            }

            if let Some(position) = frame.cursor() {
                f.set_cursor_position(position);
            }
        })?;
        Ok(())
    }

    async fn next_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.events_closed {
                tokio::time::sleep_until(deadline).await;
                return Ok(None);
            }

            match tokio::time::timeout_at(deadline, self.events.next()).await {
                Err(_) => return Ok(None),
                Ok(None) => {
                    warn!("Terminal event stream ended");
                    self.events_closed = true;
                }
                Ok(Some(Err(e))) => return Err(e),
                Ok(Some(Ok(Event::Key(event)))) => {
                    if let Some(key) = Key::from_event(event) {
                        return Ok(Some(key));
                    }
                }
                Ok(Some(Ok(Event::Resize(width, height)))) => {
                    debug!(width, height, "Terminal resized");
                }
                Ok(Some(Ok(_))) => {}
            }
        }
    }
}
