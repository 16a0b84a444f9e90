//! Statistic counters that count up to their `data-target`.

use crate::error::{MotionError, MotionResult};
use crate::host::{FrameScheduler, HostRef};
use crate::surface::SurfaceRef;
use std::rc::Rc;

/// Attribute holding a counter's final value
pub const TARGET_ATTRIBUTE: &str = "data-target";

/// Default counting time
pub const DEFAULT_DURATION_MS: f64 = 2000.0;

/// Nominal frame length the increment is computed for
const FRAME_MS: f64 = 16.0;

/// Displayed value after one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterStep {
    /// Still counting; shows the floored running value
    Counting(i64),
    /// Reached the target
    Done(i64),
}

impl CounterStep {
    /// Displayed value
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::Counting(v) | Self::Done(v) => v,
        }
    }
}

/// Fixed-increment counter.
///
/// Each step adds `target / (duration / 16)`. The frame where the running
/// value reaches the target shows the exact target.
#[derive(Clone, Debug, PartialEq)]
pub struct Counter {
    target: i64,
    increment: f64,
    current: f64,
}

impl Counter {
    /// Count to `target` over roughly `duration_ms` of 16 ms frames
    pub fn new(target: i64, duration_ms: f64) -> MotionResult<Self> {
        if !(duration_ms.is_finite() && duration_ms > 0.0) {
            return Err(MotionError::InvalidDuration { duration_ms });
        }
        Ok(Self {
            target,
            increment: target as f64 / (duration_ms / FRAME_MS),
            current: 0.0,
        })
    }

    /// Counter for the integer in the surface's `data-target`.
    ///
    /// Reads the leading integer, so `"150+"` counts to 150.
    pub fn from_surface(surface: &SurfaceRef, duration_ms: f64) -> MotionResult<Self> {
        let raw = surface.attribute(TARGET_ATTRIBUTE).ok_or_else(|| {
            MotionError::config(format!("{} has no {TARGET_ATTRIBUTE}", surface.id()))
        })?;
        let target = parse_leading_int(&raw).ok_or_else(|| {
            MotionError::config(format!("{TARGET_ATTRIBUTE} '{raw}' is not an integer"))
        })?;
        Self::new(target, duration_ms)
    }

    /// Final value
    #[must_use]
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Advance one frame
    pub fn step(&mut self) -> CounterStep {
        self.current += self.increment;
        if self.current < self.target as f64 {
            CounterStep::Counting(self.current.floor() as i64)
        } else {
            CounterStep::Done(self.target)
        }
    }

    /// Count on `surface`'s text, first step now, then one per frame
    pub fn start(mut self, host: HostRef, surface: SurfaceRef) {
        let step = self.step();
        surface.set_text(&step.value().to_string());
        if let CounterStep::Counting(_) = step {
            let next_host = Rc::clone(&host);
            host.request_frame(Box::new(move |_| self.start(next_host, surface)));
        }
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let digits_start = usize::from(s.starts_with(|c: char| c == '+' || c == '-'));
    let end = s[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + digits_start);
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Start a counter on every surface from its `data-target`.
///
/// Surfaces without a usable target are skipped with a warning.
pub fn animate_counters(host: &HostRef, surfaces: &[SurfaceRef], duration_ms: f64) -> usize {
    let mut started = 0;
    for surface in surfaces {
        match Counter::from_surface(surface, duration_ms) {
            Ok(counter) => {
                counter.start(Rc::clone(host), Rc::clone(surface));
                started += 1;
            }
            Err(err) => tracing::warn!(surface = %surface.id(), error = %err, "counter skipped"),
        }
    }
    started
}
