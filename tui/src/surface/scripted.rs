//! Scripted Surface
//!
//! A headless surface for driving the ticker and the prompt without a
//! terminal. Each `next_key` call consumes one script step; an idle step (or
//! an exhausted script) sleeps for the whole timeout. Every presented frame
//! is recorded. A [`TerminalGuard`] over [`RecordingModes`] can be attached
//! so the surface owns terminal state the way the real one does.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use async_trait::async_trait;

use super::modes::RecordingModes;
use super::terminal::TerminalGuard;
use super::{Key, Surface};
use crate::render::{Frame, Viewport};

#[derive(Clone, Copy, Debug)]
enum Step {
    Key(Key),
    Idle,
    Fail,
}

/// In-memory surface with a key script and failure injection
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    viewport: Viewport,
    pending_viewports: VecDeque<Viewport>,
    steps: VecDeque<Step>,
    frames: Vec<Frame>,
    failing_presents: usize,
    failing_sizes: usize,
    key_waits: usize,
    _guard: Option<TerminalGuard<RecordingModes>>,
}

impl ScriptedSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Hold `guard` until the surface is dropped
    pub fn with_guard(mut self, guard: TerminalGuard<RecordingModes>) -> Self {
        self._guard = Some(guard);
        self
    }

    /// Deliver `key` on the next wait
    pub fn push_key(&mut self, key: Key) -> &mut Self {
        self.steps.push_back(Step::Key(key));
        self
    }

    /// Deliver each character of `text` as a key
    pub fn push_text(&mut self, text: &str) -> &mut Self {
        for ch in text.chars() {
            self.push_key(Key::Char(ch));
        }
        self
    }

    /// Let one wait run to its timeout
    pub fn push_idle(&mut self) -> &mut Self {
        self.steps.push_back(Step::Idle);
        self
    }

    /// Make the next wait fail with an I/O error
    pub fn push_input_error(&mut self) -> &mut Self {
        self.steps.push_back(Step::Fail);
        self
    }

    /// Switch to `viewport` on a later size query, one per call, in order
    pub fn queue_viewport(&mut self, viewport: Viewport) -> &mut Self {
        self.pending_viewports.push_back(viewport);
        self
    }

    /// Fail the next `count` presents
    pub fn fail_presents(&mut self, count: usize) -> &mut Self {
        self.failing_presents = count;
        self
    }

    /// Fail the next `count` size queries
    pub fn fail_sizes(&mut self, count: usize) -> &mut Self {
        self.failing_sizes = count;
        self
    }

    /// Every frame presented so far
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Number of `next_key` calls made
    pub fn key_waits(&self) -> usize {
        self.key_waits
    }

    /// Script steps not yet consumed
    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }
}

#[async_trait(?Send)]
impl Surface for ScriptedSurface {
    fn size(&mut self) -> io::Result<Viewport> {
        if self.failing_sizes > 0 {
            self.failing_sizes -= 1;
            return Err(io::Error::other("scripted size failure"));
        }
        if let Some(next) = self.pending_viewports.pop_front() {
            self.viewport = next;
        }
        Ok(self.viewport)
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        if self.failing_presents > 0 {
            self.failing_presents -= 1;
            return Err(io::Error::other("scripted present failure"));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    async fn next_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        self.key_waits += 1;
        match self.steps.pop_front() {
            Some(Step::Key(key)) => Ok(Some(key)),
            Some(Step::Fail) => Err(io::Error::other("scripted input failure")),
            Some(Step::Idle) | None => {
                tokio::time::sleep(timeout).await;
                Ok(None)
            }
        }
    }
}
