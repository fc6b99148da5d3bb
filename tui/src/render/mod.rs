//! Glyph Renderer
//!
//! Turns an [`ElapsedDuration`] into a [`Frame`] of big block digits.
//!
//! Each unit is a labeled group: a centered label row over five glyph rows.
//! Groups are packed left to right; a group that would cross the right
//! margin starts a new band below. Bands that do not fit the viewport
//! height are cut off and the frame is marked clipped.
//!
//! ```text
//!   Age ticker (ESC to quit)
//!
//!         YEARS             MONTHS          DAYS     ...
//!    ███  ████   ███     ███   ███      ███   ███
//!   █   █     █ █   █   █   █ █   █    █   █ █   █
//!   ...
//! ```

mod frame;

use ticker_core::{ElapsedDuration, Precision, Unit};

use crate::glyphs::{GlyphTable, GLYPH_HEIGHT};
use crate::theme;

pub use frame::{Frame, Viewport};

/// Header drawn while the ticker runs
pub const HEADER: &str = "Age ticker (ESC to quit)";

/// Header of the plain-text snapshot printed on exit
pub const SNAPSHOT_HEADER: &str = "Age ticker (final snapshot)";

/// Left and right margin in cells
const MARGIN: u16 = 2;

/// Blank columns between groups on a band
const GROUP_GAP: u16 = 4;

/// Row of the first band's labels
const FIRST_BAND_ROW: u16 = 2;

/// Label row plus glyph rows
const BAND_HEIGHT: u16 = 1 + GLYPH_HEIGHT as u16;

/// Blank rows between bands
const BAND_SPACING: u16 = 1;

/// Where one unit's group lands
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPlacement {
    pub unit: Unit,
    /// Zero-padded value text
    pub text: String,
    /// Left column of the group
    pub x: u16,
    /// Label row of the group's band
    pub y: u16,
    /// Group width (max of glyph block and label)
    pub width: u16,
    /// Width of the glyph block alone
    pub block_width: u16,
    /// Zero-based band index
    pub band: usize,
}

impl GroupPlacement {
    /// One past the last column
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// One past the last glyph row
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(BAND_HEIGHT)
    }
}

/// Stateless renderer over an owned glyph table
#[derive(Clone, Debug)]
pub struct GlyphRenderer {
    glyphs: GlyphTable,
    units: &'static [Unit],
}

impl GlyphRenderer {
    pub fn new(glyphs: GlyphTable, precision: Precision) -> Self {
        Self {
            glyphs,
            units: Unit::for_precision(precision),
        }
    }

    /// Units drawn, in order
    pub fn units(&self) -> &'static [Unit] {
        self.units
    }

    /// Compute group positions for a viewport `width`
    ///
    /// The first group of a band is always placed even if it is wider than
    /// the viewport; it is then cut at the right edge when drawn.
    pub fn layout(&self, elapsed: &ElapsedDuration, width: u16) -> Vec<GroupPlacement> {
        let right_edge = width.saturating_sub(MARGIN);
        let mut placements = Vec::with_capacity(self.units.len());
        let mut x = MARGIN;
        let mut y = FIRST_BAND_ROW;
        let mut band = 0;
        let mut band_empty = true;

        for &unit in self.units {
            let text = elapsed.unit_text(unit);
            let block_width = to_cells(GlyphTable::text_width(&text));
            let group_width = block_width.max(to_cells(unit.label().len()));

            if !band_empty && x.saturating_add(group_width) > right_edge {
                band += 1;
                y = y.saturating_add(BAND_HEIGHT + BAND_SPACING);
                x = MARGIN;
            }

            placements.push(GroupPlacement {
                unit,
                text,
                x,
                y,
                width: group_width,
                block_width,
                band,
            });

            x = x.saturating_add(group_width).saturating_add(GROUP_GAP);
            band_empty = false;
        }

        placements
    }

    /// Rows needed to show every band at `width` without clipping
    pub fn required_height(&self, elapsed: &ElapsedDuration, width: u16) -> u16 {
        self.layout(elapsed, width)
            .last()
            .map(GroupPlacement::bottom)
            .unwrap_or(FIRST_BAND_ROW)
    }

    /// Render the live ticker screen
    pub fn render(&self, elapsed: &ElapsedDuration, viewport: Viewport) -> Frame {
        self.render_with_header(HEADER, elapsed, viewport)
    }

    /// Render every band as plain text for printing after the display closes
    pub fn snapshot(&self, elapsed: &ElapsedDuration, width: u16) -> Vec<String> {
        let height = self.required_height(elapsed, width);
        self.render_with_header(SNAPSHOT_HEADER, elapsed, Viewport::new(width, height))
            .to_lines()
    }

    fn render_with_header(
        &self,
        header: &str,
        elapsed: &ElapsedDuration,
        viewport: Viewport,
    ) -> Frame {
        let mut frame = Frame::new(viewport);
        frame.put(MARGIN, 0, header, theme::header());

        for group in self.layout(elapsed, viewport.width) {
            let label = group.unit.label();
            let label_x = group
                .x
                .saturating_add((group.width - to_cells(label.len())) / 2);
            frame.put(label_x, group.y, label, theme::label());

            let block_x = group
                .x
                .saturating_add((group.width - group.block_width) / 2);
            for (i, row) in self.glyphs.render_text(&group.text).iter().enumerate() {
                let row_y = group.y.saturating_add(1 + i as u16);
                frame.put(block_x, row_y, row, theme::digits());
            }
        }

        frame
    }
}

fn to_cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
