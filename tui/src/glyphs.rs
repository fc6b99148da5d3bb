//! Glyph Definitions
//!
//! Big block digits, five rows tall and five columns wide, drawn with the
//! full-block element. The table is built once at startup and handed to the
//! renderer.

use std::collections::HashMap;

/// Rows in every glyph
pub const GLYPH_HEIGHT: usize = 5;

/// Columns in every glyph
pub const GLYPH_WIDTH: usize = 5;

/// Blank columns between adjacent glyphs
pub const GLYPH_SPACING: usize = 1;

/// A single big character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// Rows top to bottom, each exactly [`GLYPH_WIDTH`] cells
    pub rows: [&'static str; GLYPH_HEIGHT],
}

impl Glyph {
    /// Glyph drawn for characters the table does not know
    pub const BLANK: Glyph = Glyph {
        rows: ["     "; GLYPH_HEIGHT],
    };
}

/// Font source: character and its five rows
const BIG_FONT: &[(char, [&str; GLYPH_HEIGHT])] = &[
    ('0', [" ███ ", "█   █", "█   █", "█   █", " ███ "]),
    ('1', ["  █  ", " ██  ", "  █  ", "  █  ", " ███ "]),
    ('2', [" ███ ", "█   █", "   █ ", "  █  ", "█████"]),
    ('3', ["████ ", "    █", " ███ ", "    █", "████ "]),
    ('4', ["█  █ ", "█  █ ", "█████", "   █ ", "   █ "]),
    ('5', ["█████", "█    ", "████ ", "    █", "████ "]),
    ('6', [" ███ ", "█    ", "████ ", "█   █", " ███ "]),
    ('7', ["█████", "   █ ", "  █  ", " █   ", " █   "]),
    ('8', [" ███ ", "█   █", " ███ ", "█   █", " ███ "]),
    ('9', [" ███ ", "█   █", " ████", "    █", " ███ "]),
    (':', ["     ", "  █  ", "     ", "  █  ", "     "]),
    ('.', ["     ", "     ", "     ", "  █  ", "     "]),
];

/// Immutable lookup from character to big glyph
#[derive(Clone, Debug)]
pub struct GlyphTable {
    glyphs: HashMap<char, Glyph>,
}

impl GlyphTable {
    /// The built-in block-digit font (digits, `:` and `.`)
    pub fn standard() -> Self {
        let glyphs = BIG_FONT
            .iter()
            .map(|&(ch, rows)| (ch, Glyph { rows }))
            .collect();
        Self { glyphs }
    }

    /// Glyph for `ch`, or [`Glyph::BLANK`] when unknown
    pub fn get(&self, ch: char) -> &Glyph {
        self.glyphs.get(&ch).unwrap_or(&Glyph::BLANK)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Cell width of `text` once rendered big
    pub fn text_width(text: &str) -> usize {
        let n = text.chars().count();
        if n == 0 {
            0
        } else {
            n * GLYPH_WIDTH + (n - 1) * GLYPH_SPACING
        }
    }

    /// Render `text` into five rows, glyphs separated by one blank column
    pub fn render_text(&self, text: &str) -> [String; GLYPH_HEIGHT] {
        let spacer = " ".repeat(GLYPH_SPACING);
        let mut rows: [String; GLYPH_HEIGHT] = Default::default();

        for (idx, ch) in text.chars().enumerate() {
            let glyph = self.get(ch);
            for (row, line) in rows.iter_mut().zip(glyph.rows.iter()) {
                if idx > 0 {
                    row.push_str(&spacer);
                }
                row.push_str(line);
            }
        }

        rows
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::standard()
    }
}
