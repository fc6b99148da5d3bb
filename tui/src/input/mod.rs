//! Input Collector
//!
//! Prompts for the birth date, then the birth time, on the same surface the
//! ticker later uses. The last saved record supplies the defaults: Enter on an
//! untouched field or ESC accepts them.
//!
//! Validation failures are shown inline and the field is asked again. A birth
//! instant in the future sends the prompt back to the date. On success the
//! record is saved for next time.

mod field;
mod screen;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use ticker_core::{BirthRecord, Clock, PersistenceStore, Precision};
use tracing::{debug, info, warn};

use crate::surface::Surface;

pub use field::{FieldOutcome, MaskedField, DATE_MASK, TIME_MASK, TIME_MASK_MILLIS};
pub use screen::{PromptScreen, PromptState, Stage, INSTRUCTIONS};

/// Shown when the entered instant is later than now
pub const FUTURE_BIRTH_MESSAGE: &str = "Birth date is in the future.";

/// How often the prompt repaints while waiting for keys
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum InputError {
    /// ESC with nothing to fall back on, Ctrl-C, or an exit signal
    #[error("input cancelled")]
    Cancelled,

    #[error("terminal I/O failed during input: {0}")]
    Terminal(#[from] io::Error),
}

/// Runs the prompt and persists the result
pub struct InputCollector<P: PersistenceStore> {
    store: P,
    precision: Precision,
    screen: PromptScreen,
}

impl<P: PersistenceStore> InputCollector<P> {
    pub fn new(store: P, precision: Precision) -> Self {
        Self {
            store,
            precision,
            screen: PromptScreen::new(crate::version_banner()),
        }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Initial prompt state, with defaults from the saved record
    pub fn initial_state(&self) -> PromptState {
        let saved = self.store.load();
        let (time_mask, time_label) = if self.precision.includes_millis() {
            (TIME_MASK_MILLIS, "Time of birth (hh:mm:ss.mmm)")
        } else {
            (TIME_MASK, "Time of birth (hh:mm:ss)")
        };

        PromptState {
            stage: Stage::Date,
            date: MaskedField::new(
                "Date of birth (dd/mm/yyyy)",
                DATE_MASK,
                saved.map(|r| r.date_string()),
            ),
            time: MaskedField::new(
                time_label,
                time_mask,
                saved.map(|r| r.time_string(self.precision)),
            ),
            accepted_date: None,
            date_error: None,
            time_error: None,
        }
    }

    /// Prompt until a valid, non-future birth record is entered
    pub async fn collect<S, C>(
        &self,
        surface: &mut S,
        clock: &C,
        exit: &AtomicBool,
    ) -> Result<BirthRecord, InputError>
    where
        S: Surface + ?Sized,
        C: Clock,
    {
        let mut state = self.initial_state();
        let mut date = None;

        loop {
            if exit.load(Ordering::Acquire) {
                return Err(InputError::Cancelled);
            }

            let viewport = surface.size()?;
            surface.present(&self.screen.render(&state, viewport))?;

            let Some(key) = surface.next_key(REDRAW_INTERVAL).await? else {
                continue;
            };

            match state.stage {
                Stage::Date => match state.date.handle_key(key) {
                    FieldOutcome::Editing => state.date_error = None,
                    FieldOutcome::Submitted(text) => match BirthRecord::parse_date(&text) {
                        Ok(parsed) => {
                            debug!(date = %text, "Date accepted");
                            date = Some(parsed);
                            state.accepted_date = Some(text);
                            state.date_error = None;
                            state.stage = Stage::Time;
                        }
                        Err(e) => {
                            state.date_error = Some(e.to_string());
                            state.date.reset();
                        }
                    },
                    FieldOutcome::Cancelled | FieldOutcome::Aborted => {
                        return Err(InputError::Cancelled)
                    }
                },
                Stage::Time => {
                    let time = match state.time.handle_key(key) {
                        FieldOutcome::Editing => {
                            state.time_error = None;
                            continue;
                        }
                        FieldOutcome::Submitted(text) => match BirthRecord::parse_time(&text) {
                            Ok(time) => time,
                            Err(e) => {
                                state.time_error = Some(e.to_string());
                                state.time.reset();
                                continue;
                            }
                        },
                        FieldOutcome::Cancelled => {
                            debug!("Time skipped, using noon");
                            BirthRecord::default_time()
                        }
                        FieldOutcome::Aborted => return Err(InputError::Cancelled),
                    };

                    let Some(date) = date else {
                        state.stage = Stage::Date;
                        continue;
                    };

                    let record = BirthRecord::from_parts(date, time);
                    if record.instant() > clock.now() {
                        state.stage = Stage::Date;
                        state.date.reset();
                        state.time.reset();
                        state.accepted_date = None;
                        state.time_error = None;
                        state.date_error = Some(FUTURE_BIRTH_MESSAGE.to_string());
                        continue;
                    }

                    self.persist(&record);
                    return Ok(record);
                }
            }
        }
    }

    fn persist(&self, record: &BirthRecord) {
        match self.store.save(record) {
            Ok(()) => info!(date = %record.date_string(), "Birth record saved"),
            Err(e) => warn!(error = %e, "Failed to save birth record"),
        }
    }
}
