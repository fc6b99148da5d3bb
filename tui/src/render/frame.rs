//! Frame
//!
//! One fully rendered screen: a character grid plus cursor and clipping
//! metadata. Frames are rebuilt from scratch every tick.

use ratatui::buffer::Buffer;
use ratatui::layout::{Rect, Size};
use ratatui::style::Style;

/// Terminal dimensions in cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

impl From<(u16, u16)> for Viewport {
    fn from((width, height): (u16, u16)) -> Self {
        Self { width, height }
    }
}

impl From<Size> for Viewport {
    fn from(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

/// A rendered screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    buffer: Buffer,
    cursor: Option<(u16, u16)>,
    clipped: bool,
}

impl Frame {
    /// Blank frame covering the viewport
    pub fn new(viewport: Viewport) -> Self {
        Self {
            buffer: Buffer::empty(viewport.area()),
            cursor: None,
            clipped: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.buffer.area.width, self.buffer.area.height)
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Where the terminal cursor should be shown; `None` hides it
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Some((x, y));
    }

    /// Whether anything drawn into this frame fell outside the viewport
    pub fn is_clipped(&self) -> bool {
        self.clipped
    }

    /// Draw `text` at (`x`, `y`), cutting it at the right edge
    ///
    /// Returns `false` and marks the frame clipped if any of the text did not
    /// fit. Never panics for out-of-range coordinates.
    pub fn put(&mut self, x: u16, y: u16, text: &str, style: Style) -> bool {
        let area = self.buffer.area;
        if text.is_empty() {
            return true;
        }
        if x >= area.width || y >= area.height {
            self.clipped = true;
            return false;
        }

        let room = usize::from(area.width - x);
        self.buffer.set_stringn(x, y, text, room, style);

        let fits = text.chars().count() <= room;
        if !fits {
            self.clipped = true;
        }
        fits
    }

    /// Rows as plain text with trailing blanks trimmed
    pub fn to_lines(&self) -> Vec<String> {
        let area = self.buffer.area;
        (0..area.height)
            .map(|y| {
                let mut line = String::with_capacity(usize::from(area.width));
                for x in 0..area.width {
                    line.push_str(self.buffer[(x, y)].symbol());
                }
                line.trim_end().to_string()
            })
            .collect()
    }
}
