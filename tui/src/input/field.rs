//! Masked Field
//!
//! A fixed-shape text field such as `__/__/____`. Separators never move;
//! digits fill the underscores left to right.

use crate::surface::Key;

pub const DATE_MASK: &str = "dd/mm/yyyy";
pub const TIME_MASK: &str = "hh:mm:ss";
pub const TIME_MASK_MILLIS: &str = "hh:mm:ss.mmm";

/// Empty digit slot
const PLACEHOLDER: char = '_';

const SEPARATORS: [char; 4] = ['/', ':', '.', ' '];

/// Result of feeding one key to a field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Still editing
    Editing,
    /// Enter on a complete field, Enter on an untouched default, or ESC
    /// with a default
    Submitted(String),
    /// ESC with no default to fall back on
    Cancelled,
    /// Ctrl-C
    Aborted,
}

#[derive(Clone, Debug)]
pub struct MaskedField {
    label: String,
    buffer: Vec<char>,
    /// Buffer indices that hold digits
    slots: Vec<usize>,
    /// Index into `slots`; may sit one past the last slot
    cursor: usize,
    edited: bool,
    default: Option<String>,
}

impl MaskedField {
    pub fn new(label: impl Into<String>, mask: &str, default: Option<String>) -> Self {
        let buffer: Vec<char> = mask
            .chars()
            .map(|ch| if SEPARATORS.contains(&ch) { ch } else { PLACEHOLDER })
            .collect();
        let slots = buffer
            .iter()
            .enumerate()
            .filter(|(_, ch)| **ch == PLACEHOLDER)
            .map(|(i, _)| i)
            .collect();

        Self {
            label: label.into(),
            buffer,
            slots,
            cursor: 0,
            edited: false,
            default,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn default_text(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Current contents, placeholders included
    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.buffer.contains(&PLACEHOLDER)
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// `Label: [default] `, drawn before the field contents
    pub fn prompt(&self) -> String {
        match &self.default {
            Some(default) => format!("{}: [{default}] ", self.label),
            None => format!("{}: ", self.label),
        }
    }

    /// Column of the cursor within [`MaskedField::text`]
    pub fn cursor_offset(&self) -> usize {
        match self.slots.len() {
            0 => 0,
            n => self.slots[self.cursor.min(n - 1)],
        }
    }

    /// Clear all digits, keeping the default
    pub fn reset(&mut self) {
        for &slot in &self.slots {
            self.buffer[slot] = PLACEHOLDER;
        }
        self.cursor = 0;
        self.edited = false;
    }

    pub fn handle_key(&mut self, key: Key) -> FieldOutcome {
        match key {
            Key::Enter => {
                if self.is_complete() {
                    return FieldOutcome::Submitted(self.text());
                }
                if !self.edited {
                    if let Some(default) = &self.default {
                        return FieldOutcome::Submitted(default.clone());
                    }
                }
            }
            Key::Escape => {
                return match &self.default {
                    Some(default) => FieldOutcome::Submitted(default.clone()),
                    None => FieldOutcome::Cancelled,
                };
            }
            Key::Interrupt => return FieldOutcome::Aborted,
            Key::Char(ch) if ch.is_ascii_digit() => {
                if let Some(&slot) = self.slots.get(self.cursor) {
                    self.buffer[slot] = ch;
                    self.cursor += 1;
                    self.edited = true;
                }
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer[self.slots[self.cursor]] = PLACEHOLDER;
                    self.edited = true;
                }
            }
            Key::Delete => {
                if let Some(&slot) = self.slots.get(self.cursor) {
                    self.buffer[slot] = PLACEHOLDER;
                    self.edited = true;
                }
            }
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.slots.len()),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.slots.len(),
            Key::Char(_) => {}
        }
        FieldOutcome::Editing
    }
}
