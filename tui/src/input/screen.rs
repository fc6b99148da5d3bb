//! Prompt Screen
//!
//! Draws the birth date/time prompt into a [`Frame`]:
//!
//! ```text
//! row 0   AgeTicker v0.1.2
//! row 2   Enter details. Press Enter to accept. ESC to abort.
//! row 3   <date validation message>
//! row 4   Date of birth (dd/mm/yyyy): [07/09/1985] __/__/____
//! row 7   Time of birth (hh:mm:ss): 14:__:__
//! row 8   <time validation message>
//! ```

use crate::render::{Frame, Viewport};
use crate::theme;

use super::field::MaskedField;

pub const INSTRUCTIONS: &str = "Enter details. Press Enter to accept. ESC to abort.";

const MARGIN: u16 = 2;
const TITLE_ROW: u16 = 0;
const INSTRUCTIONS_ROW: u16 = 2;
const DATE_ERROR_ROW: u16 = 3;
const DATE_ROW: u16 = 4;
const TIME_ROW: u16 = 7;
const TIME_ERROR_ROW: u16 = 8;

/// Which field has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Date,
    Time,
}

/// Everything the prompt shows
#[derive(Clone, Debug)]
pub struct PromptState {
    pub stage: Stage,
    pub date: MaskedField,
    pub time: MaskedField,
    /// Date accepted so far, shown in place of the date field on the time stage
    pub accepted_date: Option<String>,
    pub date_error: Option<String>,
    pub time_error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PromptScreen {
    title: String,
}

impl PromptScreen {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn render(&self, state: &PromptState, viewport: Viewport) -> Frame {
        let mut frame = Frame::new(viewport);
        frame.put(MARGIN, TITLE_ROW, &self.title, theme::header());
        frame.put(MARGIN, INSTRUCTIONS_ROW, INSTRUCTIONS, theme::hint());

        if let Some(message) = &state.date_error {
            frame.put(MARGIN, DATE_ERROR_ROW, message, theme::error());
        }

        match state.stage {
            Stage::Date => {
                let cursor = draw_field(&mut frame, &state.date, DATE_ROW);
                place_cursor(&mut frame, cursor, DATE_ROW);
            }
            Stage::Time => {
                let accepted = state.accepted_date.as_deref().unwrap_or_default();
                let label_end = draw_label(&mut frame, &state.date, DATE_ROW);
                frame.put(label_end, DATE_ROW, accepted, theme::input());

                let cursor = draw_field(&mut frame, &state.time, TIME_ROW);
                place_cursor(&mut frame, cursor, TIME_ROW);
            }
        }

        if let Some(message) = &state.time_error {
            frame.put(MARGIN, TIME_ERROR_ROW, message, theme::error());
        }

        frame
    }
}

/// Draw the field prompt; returns the column after it
fn draw_label(frame: &mut Frame, field: &MaskedField, row: u16) -> u16 {
    let prompt = field.prompt();
    frame.put(MARGIN, row, &prompt, theme::hint());
    MARGIN.saturating_add(cells(prompt.chars().count()))
}

/// Draw prompt and contents; returns the cursor column
fn draw_field(frame: &mut Frame, field: &MaskedField, row: u16) -> u16 {
    let text_x = draw_label(frame, field, row);
    frame.put(text_x, row, &field.text(), theme::input());
    text_x.saturating_add(cells(field.cursor_offset()))
}

fn place_cursor(frame: &mut Frame, x: u16, y: u16) {
    let viewport = frame.viewport();
    if x < viewport.width && y < viewport.height {
        frame.set_cursor(x, y);
    }
}

fn cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
