//! Typewriter Renderer
//!
//! Reveals a string one character at a time on a fixed interval.
//!
//! A [`Typewriter`] is a single reveal job. It owns no timer of its own: the
//! surface's event loop advances it with the elapsed frame time, and each tick
//! reveals exactly one character before the next one is considered. Ticks are
//! therefore serialized on the loop that owns the job and never overlap.
//!
//! ```text
//! advance(dt) ──► elapsed += dt
//!                  while elapsed >= speed:
//!                      tick()  ──► reveal next char
//!                                  └─► last char? fire on_complete (once per reveal)
//! ```
//!
//! A [`restart`](Typewriter::restart) begins a new reveal, which fires the
//! callback again when it completes. Dropping or
//! [`cancel`](Typewriter::cancel)ling a job releases its completion
//! callback, so nothing fires after the consumer discards it.

use std::fmt;
use std::time::Duration;

/// Default reveal speed for terminal text (milliseconds per character)
pub const DEFAULT_SPEED_MS: u64 = 20;

/// Reveal speed for the "generating" indicator (milliseconds per character)
pub const GENERATING_SPEED_MS: u64 = 100;

/// Callback invoked each time a reveal completes
pub type CompletionCallback = Box<dyn FnMut() + Send>;

/// What happened during a call to [`Typewriter::tick`] or [`Typewriter::advance`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Characters revealed during this call
    pub revealed: usize,
    /// Whether the reveal completed during this call
    pub completed: bool,
}

impl Progress {
    /// Whether anything visible changed
    #[must_use]
    pub fn changed(&self) -> bool {
        self.revealed > 0 || self.completed
    }
}

/// A cancelable, time-paced reveal of a string
pub struct Typewriter {
    /// Full text being revealed
    text: String,
    /// Time per revealed character
    speed: Duration,
    /// Byte offset of the revealed prefix
    revealed: usize,
    /// Ticks that revealed a character
    ticks: usize,
    /// Time carried over between ticks
    elapsed: Duration,
    /// Completion has fired
    done: bool,
    /// Job was cancelled by its owner
    cancelled: bool,
    /// Completion hook, guarded by `done`
    on_complete: Option<CompletionCallback>,
}

impl Typewriter {
    /// Create a new reveal job
    pub fn new(text: impl Into<String>, speed: Duration) -> Self {
        Self {
            text: text.into(),
            speed,
            revealed: 0,
            ticks: 0,
            elapsed: Duration::ZERO,
            done: false,
            cancelled: false,
            on_complete: None,
        }
    }

    /// Create a job at the default terminal speed
    pub fn with_default_speed(text: impl Into<String>) -> Self {
        Self::new(text, Duration::from_millis(DEFAULT_SPEED_MS))
    }

    /// Attach a completion callback
    #[must_use]
    pub fn on_complete(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// The prefix revealed so far
    pub fn visible(&self) -> &str {
        &self.text[..self.revealed]
    }

    /// Number of ticks that revealed a character
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Whether the owner cancelled this job
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Restart with new inputs.
    ///
    /// Does nothing if text and speed are unchanged. Otherwise the reveal
    /// starts over from an empty prefix and the completion callback fires
    /// again when the new text is fully revealed. A cancelled job restarts
    /// without a callback.
    pub fn restart(&mut self, text: impl Into<String>, speed: Duration) {
        let text = text.into();
        if text == self.text && speed == self.speed && !self.cancelled {
            return;
        }

        self.text = text;
        self.speed = speed;
        self.revealed = 0;
        self.ticks = 0;
        self.elapsed = Duration::ZERO;
        self.done = false;
        self.cancelled = false;
    }

    /// Cancel the job, releasing its completion callback
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.on_complete = None;
    }

    /// Reveal a single character.
    ///
    /// Completion fires on the tick that reveals the last character, or on
    /// the first tick of an empty text.
    pub fn tick(&mut self) -> Progress {
        if self.done || self.cancelled {
            return Progress::default();
        }

        let mut progress = Progress::default();
        if let Some(c) = self.text[self.revealed..].chars().next() {
            self.revealed += c.len_utf8();
            self.ticks += 1;
            progress.revealed = 1;
        }
        progress.completed = self.complete_if_finished();
        progress
    }

    /// Advance the job by the elapsed time, ticking once per `speed`
    pub fn advance(&mut self, delta: Duration) -> Progress {
        if self.done || self.cancelled {
            return Progress::default();
        }

        let mut progress = Progress {
            revealed: 0,
            completed: self.complete_if_finished(),
        };
        if progress.completed {
            return progress;
        }

        self.elapsed += delta;
        while !self.done && self.elapsed >= self.speed {
            self.elapsed -= self.speed;
            let step = self.tick();
            progress.revealed += step.revealed;
            progress.completed |= step.completed;
        }
        progress
    }

    /// Check for completion without revealing anything
    pub fn poll(&mut self) -> Progress {
        self.advance(Duration::ZERO)
    }

    /// Reveal the remaining text at once and complete
    pub fn finish(&mut self) -> Progress {
        if self.done || self.cancelled {
            return Progress::default();
        }

        let remaining = self.text[self.revealed..].chars().count();
        self.revealed = self.text.len();
        self.ticks += remaining;
        Progress {
            revealed: remaining,
            completed: self.complete_if_finished(),
        }
    }

    fn complete_if_finished(&mut self) -> bool {
        if self.done || self.revealed < self.text.len() {
            return false;
        }

        self.done = true;
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
        true
    }
}

impl fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typewriter")
            .field("text", &self.text)
            .field("speed", &self.speed)
            .field("revealed", &self.revealed)
            .field("done", &self.done)
            .field("cancelled", &self.cancelled)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}
