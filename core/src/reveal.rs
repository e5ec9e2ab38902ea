//! Poem Reveal Sequencer
//!
//! Types a poem out line by line. Only the current line is animating;
//! earlier lines stay fully visible, and the next line starts when the
//! current one completes.

use std::time::Duration;

use crate::poem::Poem;
use crate::typewriter::{Progress, Typewriter};

/// Line-by-line reveal of a [`Poem`]
#[derive(Debug)]
pub struct PoemReveal {
    lines: Vec<String>,
    current: usize,
    typewriter: Typewriter,
    speed: Duration,
    finished: bool,
}

impl PoemReveal {
    /// Start revealing `poem` at `speed` per character
    pub fn new(poem: &Poem, speed: Duration) -> Self {
        let lines = poem.lines().to_vec();
        let first = lines.first().cloned().unwrap_or_default();
        Self {
            lines,
            current: 0,
            typewriter: Typewriter::new(first, speed),
            speed,
            finished: false,
        }
    }

    /// Index of the line currently typing
    pub fn current_line(&self) -> usize {
        self.current
    }

    /// Whether every line has been revealed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Lines visible right now; the last one may be partial
    pub fn visible_lines(&self) -> Vec<&str> {
        let mut visible: Vec<&str> = self.lines[..self.current]
            .iter()
            .map(String::as_str)
            .collect();
        visible.push(self.typewriter.visible());
        visible
    }

    /// Advance the active line. Returns true if anything visible changed.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.finished {
            return false;
        }

        let progress = self.typewriter.advance(delta);
        self.on_progress(progress)
    }

    /// Reveal every remaining line at once
    pub fn finish(&mut self) {
        while !self.finished {
            let progress = self.typewriter.finish();
            self.on_progress(progress);
        }
    }

    fn on_progress(&mut self, progress: Progress) -> bool {
        if progress.completed {
            if self.current + 1 < self.lines.len() {
                self.current += 1;
                self.typewriter = Typewriter::new(self.lines[self.current].clone(), self.speed);
            } else {
                self.finished = true;
            }
        }
        progress.changed()
    }
}
