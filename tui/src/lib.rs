//! AgeTicker TUI - Live age display for the terminal
//!
//! Shows the time elapsed since a birth instant as big block digits,
//! refreshed several times a second until ESC is pressed.
//!
//! # Architecture
//!
//! - **Input**: masked date/time prompt with saved defaults
//! - **Render**: pure layout of labeled digit groups into a [`Frame`]
//! - **Ticker**: cooperative refresh loop over a [`Surface`]
//! - **Surface**: crossterm/ratatui terminal, or a scripted fake for tests
//!
//! Time decomposition, the birth record and configuration live in
//! `ticker-core`, which has no terminal dependency.

pub mod glyphs;
pub mod input;
pub mod render;
pub mod surface;
pub mod theme;
pub mod ticker;

pub use glyphs::GlyphTable;
pub use input::{InputCollector, InputError};
pub use render::{Frame, GlyphRenderer, Viewport};
pub use surface::{CrosstermSurface, Key, ScriptedSurface, Surface, TerminalInitError};
pub use ticker::{RenderSkip, TickerError, TickerExit, TickerLoop, TickerReport};

/// Crate version, shown in the prompt title and by `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `AgeTicker v<version>`
pub fn version_banner() -> String {
    format!("AgeTicker v{VERSION}")
}
