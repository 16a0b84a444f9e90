//! Host scheduling primitives.
//!
//! Everything in this crate runs on one cooperative thread. The host offers
//! two ways to run code later: per-frame callbacks (display refresh cadence,
//! receiving the frame timestamp) and delayed timers. [`FrameScheduler`] is the
//! seam; [`SimulatedHost`] is a deterministic implementation driven by the
//! caller, used by tests and the CLI.
//!
//! Ordering within one [`SimulatedHost::tick`]:
//!
//! 1. timers due at or before the tick fire in due order, with the clock set
//!    to each timer's due time;
//! 2. the clock moves to the tick timestamp;
//! 3. frame callbacks queued before step 3 run with the tick timestamp.
//!    Callbacks they request run on the next tick.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Callback run on the next frame, receiving the frame timestamp in ms.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Callback run once a timer elapses.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Shared handle to the host scheduler.
pub type HostRef = Rc<dyn FrameScheduler>;

/// Identifier of a pending timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw timer number
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Frame and timer scheduling, as provided by the rendering host.
pub trait FrameScheduler {
    /// Current host time in milliseconds.
    fn now_ms(&self) -> f64;

    /// Run `callback` once on the next frame.
    fn request_frame(&self, callback: FrameCallback);

    /// Run `callback` once after `delay_ms`.
    fn set_timeout(&self, delay_ms: f64, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already fired.
    fn clear_timeout(&self, id: TimerId) -> bool;
}

/// Cheap, cloneable read handle on a host clock.
#[derive(Clone, Debug, Default)]
pub struct HostClock(Rc<Cell<f64>>);

impl HostClock {
    /// Create a clock at `start_ms`
    #[must_use]
    pub fn new(start_ms: f64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    /// Current time in milliseconds
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.0.get()
    }

    fn set(&self, ms: f64) {
        self.0.set(ms);
    }
}

struct PendingTimer {
    id: TimerId,
    due_ms: f64,
    callback: TimerCallback,
}

/// Deterministic host driven by explicit ticks.
pub struct SimulatedHost {
    clock: HostClock,
    frames: RefCell<Vec<FrameCallback>>,
    timers: RefCell<Vec<PendingTimer>>,
    next_timer: Cell<u64>,
    frames_run: Cell<u64>,
    timers_fired: Cell<u64>,
}

impl fmt::Debug for SimulatedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedHost")
            .field("now_ms", &self.clock.now_ms())
            .field("pending_frames", &self.frames.borrow().len())
            .field("pending_timers", &self.timers.borrow().len())
            .field("frames_run", &self.frames_run.get())
            .field("timers_fired", &self.timers_fired.get())
            .finish()
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    /// Create a host with its clock at 0 ms
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a host with its clock at `start_ms`
    #[must_use]
    pub fn starting_at(start_ms: f64) -> Self {
        Self {
            clock: HostClock::new(start_ms),
            frames: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            next_timer: Cell::new(0),
            frames_run: Cell::new(0),
            timers_fired: Cell::new(0),
        }
    }

    /// Create a shared host
    #[must_use]
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Read handle on this host's clock
    #[must_use]
    pub fn clock(&self) -> HostClock {
        self.clock.clone()
    }

    /// Number of frame callbacks waiting for the next tick
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Number of timers not yet fired
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Whether no frame or timer is pending
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending_frames() == 0 && self.pending_timers() == 0
    }

    /// Total frame callbacks run so far
    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }

    /// Total timers fired so far
    #[must_use]
    pub fn timers_fired(&self) -> u64 {
        self.timers_fired.get()
    }

    /// Render one frame at `timestamp_ms`.
    ///
    /// Timestamps earlier than the current clock are raised to it, so frame
    /// time never goes backwards. Returns the number of frame callbacks run.
    pub fn tick(&self, timestamp_ms: f64) -> usize {
        let now = self.monotonic(timestamp_ms);
        self.fire_timers_until(now);
        self.clock.set(now);

        let callbacks = std::mem::take(&mut *self.frames.borrow_mut());
        let count = callbacks.len();
        for callback in callbacks {
            callback(now);
        }
        self.frames_run.set(self.frames_run.get() + count as u64);
        tracing::trace!(timestamp_ms = now, callbacks = count, "frame");
        count
    }

    /// Render one frame at each timestamp in order.
    pub fn run_frames(&self, timestamps: &[f64]) -> usize {
        timestamps.iter().map(|&ts| self.tick(ts)).sum()
    }

    /// Let time pass to `timestamp_ms` without rendering a frame.
    ///
    /// Due timers fire; frame callbacks stay queued.
    pub fn advance_to(&self, timestamp_ms: f64) {
        let now = self.monotonic(timestamp_ms);
        self.fire_timers_until(now);
        self.clock.set(now);
    }

    /// Tick every `frame_interval_ms` until nothing is pending or
    /// `max_frames` frames were rendered. Returns the frames rendered.
    pub fn run_until_idle(&self, frame_interval_ms: f64, max_frames: usize) -> usize {
        let interval = if frame_interval_ms > 0.0 {
            frame_interval_ms
        } else {
            1000.0 / 60.0
        };
        let mut rendered = 0;
        while !self.is_idle() && rendered < max_frames {
            self.tick(self.clock.now_ms() + interval);
            rendered += 1;
        }
        if !self.is_idle() {
            tracing::warn!(
                max_frames,
                pending_frames = self.pending_frames(),
                pending_timers = self.pending_timers(),
                "host still busy after frame budget"
            );
        }
        rendered
    }

    fn monotonic(&self, timestamp_ms: f64) -> f64 {
        let current = self.clock.now_ms();
        if timestamp_ms < current {
            tracing::debug!(
                requested = timestamp_ms,
                current,
                "tick timestamp behind clock, holding clock"
            );
            current
        } else {
            timestamp_ms
        }
    }

    fn fire_timers_until(&self, now: f64) {
        while let Some(timer) = self.pop_due_timer(now) {
            self.clock.set(timer.due_ms.max(self.clock.now_ms()));
            self.timers_fired.set(self.timers_fired.get() + 1);
            (timer.callback)();
        }
    }

    fn pop_due_timer(&self, now: f64) -> Option<PendingTimer> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map(|(i, _)| i)?;
        Some(timers.remove(index))
    }
}

impl FrameScheduler for SimulatedHost {
    fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    fn request_frame(&self, callback: FrameCallback) {
        self.frames.borrow_mut().push(callback);
    }

    fn set_timeout(&self, delay_ms: f64, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.timers.borrow_mut().push(PendingTimer {
            id,
            due_ms: self.clock.now_ms() + delay,
            callback,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        let removed = {
            let mut timers = self.timers.borrow_mut();
            timers
                .iter()
                .position(|t| t.id == id)
                .map(|index| timers.remove(index))
        };
        // Dropped outside the borrow: the callback may own handles that
        // touch the host when they are dropped.
        removed.is_some()
    }
}
