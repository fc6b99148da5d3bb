//! Ticker Loop
//!
//! The live display: every tick samples the clock, decomposes the elapsed
//! time, renders a fresh frame and presents it in one draw. The wait for an
//! exit key runs until the tick deadline, so it doubles as the tick sleep.
//!
//! ```text
//! loop {
//!     exit flag set? ──► return
//!     clock.now() ─► decompose ─► render ─► present
//!     next_key(deadline - now, at least one poll) ─► ESC / Ctrl-C sets exit flag
//! }
//! ```
//!
//! A failed size query, present or key wait skips that frame. Too many
//! skips in a row and the loop gives up with [`TickerError::TerminalFailed`].

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use ticker_core::{decompose, BirthRecord, Clock, ElapsedDuration, TickerConfig};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::render::GlyphRenderer;
use crate::surface::Surface;

/// Default time between repaints
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Default skipped frames in a row before giving up
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Why a single frame was skipped
#[derive(Debug, Error)]
pub enum RenderSkip {
    #[error("viewport size query failed: {0}")]
    Size(#[source] io::Error),

    #[error("presenting frame failed: {0}")]
    Present(#[source] io::Error),

    #[error("reading input failed: {0}")]
    Input(#[source] io::Error),
}

/// Fatal ticker failures
#[derive(Debug, Error)]
pub enum TickerError {
    #[error("terminal failed {consecutive} ticks in a row: {last}")]
    TerminalFailed {
        consecutive: u32,
        #[source]
        last: RenderSkip,
    },
}

/// How the loop ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickerExit {
    /// ESC or Ctrl-C
    ExitKey,
    /// Exit flag set from outside (SIGINT/SIGTERM)
    Signal,
}

/// Summary of a finished run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickerReport {
    pub exit: TickerExit,
    pub ticks: u64,
    pub frames_presented: u64,
    pub frames_skipped: u64,
    /// Last value shown
    pub last_elapsed: ElapsedDuration,
}

/// Cooperative refresh loop over a [`Clock`] and a [`Surface`]
pub struct TickerLoop<C: Clock> {
    clock: C,
    renderer: GlyphRenderer,
    tick_interval: Duration,
    max_consecutive_failures: u32,
    skew_warned: bool,
}

impl<C: Clock> TickerLoop<C> {
    pub fn new(clock: C, renderer: GlyphRenderer) -> Self {
        Self {
            clock,
            renderer,
            tick_interval: DEFAULT_TICK_INTERVAL,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            skew_warned: false,
        }
    }

    /// Loop using the tick interval and failure limit from `config`
    pub fn from_config(clock: C, renderer: GlyphRenderer, config: &TickerConfig) -> Self {
        Self::new(clock, renderer)
            .with_tick_interval(config.tick_interval)
            .with_max_consecutive_failures(config.max_consecutive_failures)
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max.max(1);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn renderer(&self) -> &GlyphRenderer {
        &self.renderer
    }

    /// Elapsed time since `birth` at the clock's current instant
    ///
    /// A clock behind the birth instant shows zero; the first occurrence is
    /// logged.
    pub fn sample(&mut self, birth: &BirthRecord) -> ElapsedDuration {
        match decompose(birth.instant(), self.clock.now()) {
            Ok(elapsed) => elapsed,
            Err(e) => {
                if !self.skew_warned {
                    warn!(error = %e, "Clock is behind the birth instant, showing zero");
                    self.skew_warned = true;
                }
                ElapsedDuration::ZERO
            }
        }
    }

    /// Run until an exit key is pressed or `exit` is set
    pub async fn run<S: Surface + ?Sized>(
        &mut self,
        birth: &BirthRecord,
        surface: &mut S,
        exit: &AtomicBool,
    ) -> Result<TickerReport, TickerError> {
        info!(
            birth = %birth.instant(),
            tick_ms = self.tick_interval.as_millis() as u64,
            "Ticker started"
        );

        let mut report = TickerReport {
            exit: TickerExit::Signal,
            ticks: 0,
            frames_presented: 0,
            frames_skipped: 0,
            last_elapsed: ElapsedDuration::ZERO,
        };
        let mut exit_key_pressed = false;
        let mut consecutive_failures = 0u32;

        loop {
            if exit.load(Ordering::Acquire) {
                report.exit = if exit_key_pressed {
                    TickerExit::ExitKey
                } else {
                    TickerExit::Signal
                };
                break;
            }

            let deadline = Instant::now() + self.tick_interval;
            report.ticks += 1;

            let elapsed = self.sample(birth);
            report.last_elapsed = elapsed;

            let mut skip = match self.paint(&elapsed, surface) {
                Ok(()) => {
                    report.frames_presented += 1;
                    None
                }
                Err(skip) => {
                    report.frames_skipped += 1;
                    Some(skip)
                }
            };

            match wait_for_exit_key(surface, deadline).await {
                Ok(true) => {
                    debug!("Exit key pressed");
                    exit_key_pressed = true;
                    exit.store(true, Ordering::Release);
                }
                Ok(false) => {}
                Err(e) => {
                    // Sit out the rest of the tick instead of spinning on a dead input
                    tokio::time::sleep_until(deadline).await;
                    skip = Some(RenderSkip::Input(e));
                }
            }

            match skip {
                None => consecutive_failures = 0,
                Some(last) => {
                    consecutive_failures += 1;
                    warn!(
                        error = %last,
                        consecutive = consecutive_failures,
                        "Skipped frame"
                    );
                    if consecutive_failures >= self.max_consecutive_failures {
                        return Err(TickerError::TerminalFailed {
                            consecutive: consecutive_failures,
                            last,
                        });
                    }
                }
            }
        }

        info!(
            exit = ?report.exit,
            ticks = report.ticks,
            skipped = report.frames_skipped,
            "Ticker stopped"
        );
        Ok(report)
    }

    fn paint<S: Surface + ?Sized>(
        &self,
        elapsed: &ElapsedDuration,
        surface: &mut S,
    ) -> Result<(), RenderSkip> {
        let viewport = surface.size().map_err(RenderSkip::Size)?;
        let frame = self.renderer.render(elapsed, viewport);
        if frame.is_clipped() {
            debug!(
                width = viewport.width,
                height = viewport.height,
                "Viewport too small, frame clipped"
            );
        }
        surface.present(&frame).map_err(RenderSkip::Present)
    }
}

/// Wait for keys until `deadline`; `true` if an exit key arrived
///
/// Input is polled at least once per tick. When painting overran the tick
/// the poll uses a zero timeout after yielding, so the signal listener still
/// gets to run on a current-thread runtime.
async fn wait_for_exit_key<S: Surface + ?Sized>(
    surface: &mut S,
    deadline: Instant,
) -> io::Result<bool> {
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let overrun = remaining.is_zero();
        if overrun {
            tokio::task::yield_now().await;
        }

        match surface.next_key(remaining).await? {
            Some(key) if key.is_exit() => return Ok(true),
            Some(key) => debug!(?key, "Ignoring key"),
            None => return Ok(false),
        }

        if overrun {
            return Ok(false);
        }
    }
}
