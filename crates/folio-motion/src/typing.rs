//! Typewriter text that cycles through a word list.

use crate::error::{MotionError, MotionResult};
use crate::host::{FrameScheduler, HostRef, TimerId};
use crate::surface::SurfaceRef;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Words shown in the hero banner
pub const DEFAULT_WORDS: [&str; 5] = [
    "Web Developer",
    "Frontend Designer",
    "UI/UX Enthusiast",
    "Creative Coder",
    "Problem Solver",
];

/// Delays of the typing cycle, in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingTimings {
    /// Delay after typing a character
    pub type_ms: f64,
    /// Delay after deleting a character
    pub delete_ms: f64,
    /// Pause once a word is complete
    pub word_pause_ms: f64,
    /// Pause once a word is erased
    pub next_word_pause_ms: f64,
    /// Delay before the first character
    pub initial_delay_ms: f64,
}

impl Default for TypingTimings {
    fn default() -> Self {
        Self {
            type_ms: 150.0,
            delete_ms: 50.0,
            word_pause_ms: 2000.0,
            next_word_pause_ms: 500.0,
            initial_delay_ms: 1000.0,
        }
    }
}

/// Text to show and how long until the next step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypingFrame {
    /// Text content
    pub text: String,
    /// Delay before the next step
    pub next_delay_ms: f64,
}

/// Typing state machine.
///
/// Each step types or deletes one character. A finished word pauses, is
/// deleted back to empty, pauses again and the next word starts.
#[derive(Clone, Debug)]
pub struct TypingEffect {
    words: Vec<Vec<char>>,
    timings: TypingTimings,
    word_index: usize,
    char_index: usize,
    deleting: bool,
}

impl TypingEffect {
    /// Create over `words`; the list and every word must be non-empty.
    pub fn new<I, S>(words: I) -> MotionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<Vec<char>> = words
            .into_iter()
            .map(|w| w.as_ref().chars().collect())
            .collect();
        if words.is_empty() {
            return Err(MotionError::config("typing effect needs at least one word"));
        }
        if let Some(index) = words.iter().position(Vec::is_empty) {
            return Err(MotionError::config(format!(
                "typing effect word {index} is empty"
            )));
        }
        Ok(Self {
            words,
            timings: TypingTimings::default(),
            word_index: 0,
            char_index: 0,
            deleting: false,
        })
    }

    /// Effect over [`DEFAULT_WORDS`]
    pub fn portfolio() -> MotionResult<Self> {
        Self::new(DEFAULT_WORDS)
    }

    /// Replace the timings
    #[must_use]
    pub fn with_timings(mut self, timings: TypingTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Timings in use
    #[must_use]
    pub fn timings(&self) -> &TypingTimings {
        &self.timings
    }

    /// Index of the word being typed
    #[must_use]
    pub fn word_index(&self) -> usize {
        self.word_index
    }

    /// Whether the current word is being erased
    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Advance one character.
    pub fn step(&mut self) -> TypingFrame {
        let word = &self.words[self.word_index];
        let mut delay;
        if self.deleting {
            self.char_index = self.char_index.saturating_sub(1);
            delay = self.timings.delete_ms;
        } else {
            self.char_index = (self.char_index + 1).min(word.len());
            delay = self.timings.type_ms;
        }
        let text: String = word[..self.char_index].iter().collect();

        if !self.deleting && self.char_index == word.len() {
            self.deleting = true;
            delay = self.timings.word_pause_ms;
        } else if self.deleting && self.char_index == 0 {
            self.deleting = false;
            self.word_index = (self.word_index + 1) % self.words.len();
            delay = self.timings.next_word_pause_ms;
        }

        TypingFrame {
            text,
            next_delay_ms: delay,
        }
    }

    /// Drive the effect on `surface` with host timers.
    ///
    /// The first character appears after the initial delay.
    pub fn start(self, host: HostRef, surface: SurfaceRef) -> TypingHandle {
        let initial = self.timings.initial_delay_ms;
        let runner = Rc::new(TypingRunner {
            host,
            surface,
            effect: RefCell::new(self),
            timer: Cell::new(None),
            stopped: Cell::new(false),
        });
        TypingRunner::schedule(&runner, initial);
        TypingHandle { runner }
    }
}

struct TypingRunner {
    host: HostRef,
    surface: SurfaceRef,
    effect: RefCell<TypingEffect>,
    timer: Cell<Option<TimerId>>,
    stopped: Cell<bool>,
}

impl TypingRunner {
    fn schedule(runner: &Rc<Self>, delay_ms: f64) {
        let next = Rc::clone(runner);
        let timer = runner
            .host
            .set_timeout(delay_ms, Box::new(move || Self::tick(&next)));
        runner.timer.set(Some(timer));
    }

    fn tick(runner: &Rc<Self>) {
        runner.timer.set(None);
        if runner.stopped.get() {
            return;
        }
        let frame = runner.effect.borrow_mut().step();
        runner.surface.set_text(&frame.text);
        tracing::trace!(text = %frame.text, next_delay_ms = frame.next_delay_ms, "typing step");
        Self::schedule(runner, frame.next_delay_ms);
    }
}

/// Handle on a running typing effect.
pub struct TypingHandle {
    runner: Rc<TypingRunner>,
}

impl fmt::Debug for TypingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingHandle")
            .field("stopped", &self.runner.stopped.get())
            .finish_non_exhaustive()
    }
}

impl TypingHandle {
    /// Stop typing, leaving the current text in place
    pub fn stop(&self) {
        self.runner.stopped.set(true);
        if let Some(timer) = self.runner.timer.take() {
            self.runner.host.clear_timeout(timer);
        }
    }

    /// Whether [`TypingHandle::stop`] was called
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.runner.stopped.get()
    }
}
