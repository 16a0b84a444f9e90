//! Frame-driven tween engine.
//!
//! A tween interpolates numeric style properties of one surface from their
//! current computed values to target values, one write per frame, shaped by
//! an [`Easing`] curve:
//!
//! ```text
//! progress = min(elapsed / duration, 1)
//! value    = start + (target - start) * easing(progress)
//! ```
//!
//! Start values are read when the tween is requested. On the frame where
//! progress reaches 1 the exact targets are written, the completion callback
//! runs once and the [`TweenHandle`] future resolves.
//!
//! # Leases
//!
//! Each `(surface, property)` pair is held by at most one live tween. A new
//! request for a held pair follows its [`ConflictPolicy`]: `Replace` takes
//! the property away from the older tween (which resolves
//! [`TweenOutcome::Superseded`] once it holds nothing), `Reject` fails with
//! [`MotionError::LeaseConflict`]. Properties are compared by hyphenated
//! name, so `zIndex` and `z-index` share one lease.
//!
//! # Example
//!
//! ```
//! use folio_motion::{Properties, RecordingSurface, SimulatedHost, TweenEngine, TweenOptions};
//! use folio_motion::{Easing, SurfaceRef};
//! use std::rc::Rc;
//!
//! let host = SimulatedHost::shared();
//! let engine = TweenEngine::new(host.clone());
//! let card = RecordingSurface::with_clock(host.clock()).shared();
//!
//! let options = TweenOptions::default().with_duration(100.0).with_easing(Easing::Linear);
//! let target: SurfaceRef = card.clone();
//! engine
//!     .animate(&target, Properties::new().with("width", 100.0), &options)
//!     .unwrap();
//!
//! host.run_frames(&[50.0, 100.0]);
//! assert_eq!(card.writes_for("width"), vec!["50px", "100px"]);
//! ```

use crate::config::EngineConfig;
use crate::easing::Easing;
use crate::error::{MotionError, MotionResult};
use crate::host::{FrameScheduler, HostRef, TimerId};
use crate::style::{
    css_property_name, format_value, is_verbatim_property, start_value, Properties,
    PropertyValue,
};
use crate::surface::{SurfaceId, SurfaceRef};
use futures::channel::oneshot;
use futures::future::{join_all, JoinAll};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Callback run once when a tween completes.
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Identity of one tween.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweenId(u64);

impl TweenId {
    /// Wrap a raw id
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tween#{}", self.0)
    }
}

/// How a tween ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TweenOutcome {
    /// Reached progress 1 and wrote its targets
    Completed,
    /// Stopped by its handle, or never started
    Cancelled,
    /// Lost every property to newer tweens
    Superseded,
}

impl fmt::Display for TweenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Superseded => "superseded",
        };
        f.write_str(s)
    }
}

/// What a new tween does with a property another live tween holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictPolicy {
    /// Take the property over; the older tween stops writing it
    #[default]
    Replace,
    /// Refuse the new request
    Reject,
}

/// Timing and curve of a tween request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenOptions {
    /// Duration in milliseconds, must be positive
    pub duration_ms: f64,
    /// Easing curve
    pub easing: Easing,
    /// Lease conflict handling
    pub conflict: ConflictPolicy,
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            easing: Easing::EaseOutCubic,
            conflict: ConflictPolicy::Replace,
        }
    }
}

impl TweenOptions {
    /// Set the duration
    #[must_use]
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the easing curve
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the easing curve by registry name
    pub fn with_easing_name(mut self, name: &str) -> MotionResult<Self> {
        self.easing = Easing::from_name(name)?;
        Ok(self)
    }

    /// Set the conflict policy
    #[must_use]
    pub fn with_conflict(mut self, conflict: ConflictPolicy) -> Self {
        self.conflict = conflict;
        self
    }

    fn validate(&self) -> MotionResult<()> {
        if self.duration_ms.is_finite() && self.duration_ms > 0.0 {
            Ok(())
        } else {
            Err(MotionError::InvalidDuration {
                duration_ms: self.duration_ms,
            })
        }
    }
}

#[derive(Debug)]
enum TrackKind {
    Interpolated { from: f64, to: f64 },
    Verbatim(String),
}

#[derive(Debug)]
struct Track {
    property: String,
    kind: TrackKind,
}

impl Track {
    fn capture(target: &SurfaceRef, property: &str, value: &PropertyValue) -> Self {
        let kind = match value {
            PropertyValue::Number(to) if !is_verbatim_property(property) => {
                let from = start_value(target.computed_style(property).as_deref());
                TrackKind::Interpolated { from, to: *to }
            }
            other => TrackKind::Verbatim(other.to_string()),
        };
        Self {
            property: property.to_string(),
            kind,
        }
    }

    fn value_at(&self, progress: f64, eased: f64) -> String {
        match &self.kind {
            TrackKind::Interpolated { to, .. } if progress >= 1.0 => {
                format_value(&self.property, *to)
            }
            TrackKind::Interpolated { from, to } => {
                format_value(&self.property, from + (to - from) * eased)
            }
            TrackKind::Verbatim(value) => value.clone(),
        }
    }
}

struct Run {
    target: SurfaceRef,
    tracks: Vec<Track>,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
    on_complete: Option<CompletionCallback>,
    sender: Option<oneshot::Sender<TweenOutcome>>,
    outcome: Rc<Cell<Option<TweenOutcome>>>,
}

#[derive(Default)]
struct EngineState {
    next_id: u64,
    runs: HashMap<TweenId, Run>,
    // Keyed by hyphenated property name
    leases: HashMap<(SurfaceId, String), TweenId>,
}

fn lease_key(surface: SurfaceId, property: &str) -> (SurfaceId, String) {
    (surface, css_property_name(property).into_owned())
}

struct EngineInner {
    host: HostRef,
    config: EngineConfig,
    state: RefCell<EngineState>,
}

/// Runs tweens on a host's frame callbacks.
///
/// Cloning is cheap; clones share the same tweens and lease table. A
/// running tween keeps its engine alive until it resolves.
#[derive(Clone)]
pub struct TweenEngine {
    inner: Rc<EngineInner>,
}

impl fmt::Debug for TweenEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("TweenEngine")
            .field("config", &self.inner.config)
            .field("active_tweens", &state.runs.len())
            .field("leased_properties", &state.leases.len())
            .finish()
    }
}

impl TweenEngine {
    /// Create an engine with default configuration
    #[must_use]
    pub fn new(host: HostRef) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    /// Create an engine with the given defaults
    #[must_use]
    pub fn with_config(host: HostRef, config: EngineConfig) -> Self {
        Self {
            inner: Rc::new(EngineInner {
                host,
                config,
                state: RefCell::new(EngineState::default()),
            }),
        }
    }

    /// Engine defaults
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Host this engine schedules on
    #[must_use]
    pub fn host(&self) -> HostRef {
        Rc::clone(&self.inner.host)
    }

    /// Options carrying this engine's defaults
    #[must_use]
    pub fn options(&self) -> TweenOptions {
        self.inner.config.tween_options()
    }

    /// Start a tween on `target`.
    ///
    /// Validation happens before anything is read or scheduled. The first
    /// write happens on the next frame.
    pub fn animate(
        &self,
        target: &SurfaceRef,
        properties: Properties,
        options: &TweenOptions,
    ) -> MotionResult<TweenHandle> {
        self.animate_inner(target, &properties, options, None)
    }

    /// Start a tween and run `on_complete` when it completes.
    ///
    /// The callback never runs for a cancelled or superseded tween.
    pub fn animate_then(
        &self,
        target: &SurfaceRef,
        properties: Properties,
        options: &TweenOptions,
        on_complete: impl FnOnce() + 'static,
    ) -> MotionResult<TweenHandle> {
        self.animate_inner(target, &properties, options, Some(Box::new(on_complete)))
    }

    /// Start a tween with an easing given by name.
    ///
    /// `None` duration or easing fall back to the engine defaults. Unknown
    /// names fail with [`MotionError::UnknownEasing`].
    pub fn animate_named(
        &self,
        target: &SurfaceRef,
        properties: Properties,
        duration_ms: Option<f64>,
        easing: Option<&str>,
        on_complete: Option<CompletionCallback>,
    ) -> MotionResult<TweenHandle> {
        let mut options = self.options();
        if let Some(duration_ms) = duration_ms {
            options.duration_ms = duration_ms;
        }
        if let Some(name) = easing {
            options.easing = Easing::from_name(name)?;
        }
        self.animate_inner(target, &properties, &options, on_complete)
    }

    /// Start the same tween on every target, target `i` after `i * delay_ms`.
    ///
    /// Every start goes through a host timer, including the first. Lease
    /// conflicts are resolved when each tween starts; a start that fails
    /// resolves as [`TweenOutcome::Cancelled`].
    pub fn stagger(
        &self,
        targets: &[SurfaceRef],
        properties: Properties,
        options: &TweenOptions,
        delay_ms: f64,
    ) -> MotionResult<StaggerHandle> {
        if properties.is_empty() {
            return Err(MotionError::EmptyProperties);
        }
        options.validate()?;
        if !(delay_ms.is_finite() && delay_ms >= 0.0) {
            return Err(MotionError::InvalidDelay { delay_ms });
        }

        let started = Rc::new(RefCell::new(Vec::with_capacity(targets.len())));
        let mut timers = Vec::with_capacity(targets.len());
        let mut completions = Vec::with_capacity(targets.len());

        for (index, target) in targets.iter().enumerate() {
            let (sender, receiver) = oneshot::channel();
            let outcome = Rc::new(Cell::new(None));
            completions.push(Completion::new(receiver));

            let engine = self.clone();
            let target = Rc::clone(target);
            let properties = properties.clone();
            let options = options.clone();
            let started_cb = Rc::clone(&started);
            let timer = self.inner.host.set_timeout(
                index as f64 * delay_ms,
                Box::new(move || {
                    match engine.launch(&target, &properties, &options, None, sender, outcome) {
                        Ok(id) => started_cb.borrow_mut().push(id),
                        Err(err) => {
                            tracing::warn!(
                                index,
                                surface = %target.id(),
                                error = %err,
                                "staggered tween did not start"
                            );
                        }
                    }
                }),
            );
            timers.push(timer);
        }

        tracing::debug!(targets = targets.len(), delay_ms, "stagger scheduled");
        Ok(StaggerHandle {
            engine: self.clone(),
            timers,
            started,
            all: Box::pin(join_all(completions)),
        })
    }

    /// Number of tweens still running
    #[must_use]
    pub fn active_tweens(&self) -> usize {
        self.inner.state.borrow().runs.len()
    }

    /// Number of `(surface, property)` pairs currently held
    #[must_use]
    pub fn leased_properties(&self) -> usize {
        self.inner.state.borrow().leases.len()
    }

    /// Tween currently holding `property` on `surface`
    #[must_use]
    pub fn lease_holder(&self, surface: SurfaceId, property: &str) -> Option<TweenId> {
        self.inner
            .state
            .borrow()
            .leases
            .get(&lease_key(surface, property))
            .copied()
    }

    /// Whether `property` on `surface` is held by a live tween
    #[must_use]
    pub fn is_leased(&self, surface: SurfaceId, property: &str) -> bool {
        self.lease_holder(surface, property).is_some()
    }

    /// Stop `id` without writing further. Returns `false` if it already ended.
    pub fn cancel(&self, id: TweenId) -> bool {
        self.finish(id, TweenOutcome::Cancelled)
    }

    fn animate_inner(
        &self,
        target: &SurfaceRef,
        properties: &Properties,
        options: &TweenOptions,
        on_complete: Option<CompletionCallback>,
    ) -> MotionResult<TweenHandle> {
        let (sender, receiver) = oneshot::channel();
        let outcome = Rc::new(Cell::new(None));
        let id = self.launch(
            target,
            properties,
            options,
            on_complete,
            sender,
            Rc::clone(&outcome),
        )?;
        Ok(TweenHandle {
            id,
            engine: self.clone(),
            outcome,
            completion: Completion::new(receiver),
        })
    }

    fn launch(
        &self,
        target: &SurfaceRef,
        properties: &Properties,
        options: &TweenOptions,
        on_complete: Option<CompletionCallback>,
        sender: oneshot::Sender<TweenOutcome>,
        outcome: Rc<Cell<Option<TweenOutcome>>>,
    ) -> MotionResult<TweenId> {
        if properties.is_empty() {
            return Err(MotionError::EmptyProperties);
        }
        options.validate()?;

        let surface = target.id();
        let (id, emptied) = {
            let mut state = self.inner.state.borrow_mut();

            if options.conflict == ConflictPolicy::Reject {
                for property in properties.names() {
                    if let Some(&holder) = state.leases.get(&lease_key(surface, property)) {
                        return Err(MotionError::LeaseConflict {
                            surface,
                            property: property.to_string(),
                            holder,
                        });
                    }
                }
            }

            let id = TweenId(state.next_id);
            state.next_id += 1;

            let mut emptied = Vec::new();
            for property in properties.names() {
                let key = lease_key(surface, property);
                if let Some(holder) = state.leases.insert(key, id) {
                    if let Some(run) = state.runs.get_mut(&holder) {
                        let name = css_property_name(property);
                        run.tracks.retain(|t| css_property_name(&t.property) != name);
                        if run.tracks.is_empty() && !emptied.contains(&holder) {
                            emptied.push(holder);
                        }
                    }
                    tracing::debug!(%surface, property, from = %holder, to = %id, "lease replaced");
                }
            }

            let tracks = properties
                .iter()
                .map(|(property, value)| Track::capture(target, property, value))
                .collect();
            let start_ms = self.inner.host.now_ms();
            state.runs.insert(
                id,
                Run {
                    target: Rc::clone(target),
                    tracks,
                    start_ms,
                    duration_ms: options.duration_ms,
                    easing: options.easing,
                    on_complete,
                    sender: Some(sender),
                    outcome,
                },
            );
            tracing::debug!(
                %id,
                %surface,
                start_ms,
                duration_ms = options.duration_ms,
                easing = %options.easing,
                properties = properties.len(),
                "tween started"
            );
            (id, emptied)
        };

        for holder in emptied {
            self.finish(holder, TweenOutcome::Superseded);
        }
        self.schedule(id);
        Ok(id)
    }

    fn schedule(&self, id: TweenId) {
        let engine = self.clone();
        self.inner
            .host
            .request_frame(Box::new(move |timestamp| engine.step(id, timestamp)));
    }

    fn step(&self, id: TweenId, timestamp: f64) {
        let (target, writes, finished) = {
            let state = self.inner.state.borrow();
            let Some(run) = state.runs.get(&id) else {
                return;
            };
            let elapsed = (timestamp - run.start_ms).max(0.0);
            let progress = (elapsed / run.duration_ms).min(1.0);
            let eased = run.easing.evaluate(progress);
            let writes: Vec<(String, String)> = run
                .tracks
                .iter()
                .map(|t| (t.property.clone(), t.value_at(progress, eased)))
                .collect();
            (Rc::clone(&run.target), writes, progress >= 1.0)
        };

        for (property, value) in &writes {
            target.set_style(property, value);
        }
        tracing::trace!(%id, timestamp, writes = writes.len(), "tween frame");

        if finished {
            self.finish(id, TweenOutcome::Completed);
        } else {
            self.schedule(id);
        }
    }

    fn finish(&self, id: TweenId, outcome: TweenOutcome) -> bool {
        let run = {
            let mut state = self.inner.state.borrow_mut();
            let Some(run) = state.runs.remove(&id) else {
                return false;
            };
            state.leases.retain(|_, holder| *holder != id);
            run
        };

        let Run {
            on_complete,
            sender,
            outcome: outcome_cell,
            ..
        } = run;
        outcome_cell.set(Some(outcome));
        if outcome == TweenOutcome::Completed {
            if let Some(callback) = on_complete {
                callback();
            }
        }
        if let Some(sender) = sender {
            // Receiver may be gone if the handle was dropped
            let _ = sender.send(outcome);
        }
        tracing::debug!(%id, %outcome, "tween finished");
        true
    }
}

/// Future over one tween's outcome.
///
/// A dropped sender resolves as [`TweenOutcome::Cancelled`].
#[derive(Debug)]
pub struct Completion {
    receiver: oneshot::Receiver<TweenOutcome>,
}

impl Completion {
    fn new(receiver: oneshot::Receiver<TweenOutcome>) -> Self {
        Self { receiver }
    }
}

impl Future for Completion {
    type Output = TweenOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(TweenOutcome::Cancelled))
    }
}

/// Handle on a running tween; awaiting it yields the outcome.
pub struct TweenHandle {
    id: TweenId,
    engine: TweenEngine,
    outcome: Rc<Cell<Option<TweenOutcome>>>,
    completion: Completion,
}

impl fmt::Debug for TweenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenHandle")
            .field("id", &self.id)
            .field("outcome", &self.outcome.get())
            .finish_non_exhaustive()
    }
}

impl TweenHandle {
    /// Tween identity
    #[must_use]
    pub fn id(&self) -> TweenId {
        self.id
    }

    /// Stop the tween. Returns `false` if it already ended.
    pub fn cancel(&self) -> bool {
        self.engine.cancel(self.id)
    }

    /// Outcome, once the tween has ended
    #[must_use]
    pub fn outcome(&self) -> Option<TweenOutcome> {
        self.outcome.get()
    }

    /// Whether the tween has ended
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome.get().is_some()
    }
}

impl Future for TweenHandle {
    type Output = TweenOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.completion).poll(cx)
    }
}

/// Handle on a staggered group; awaiting it yields every outcome in target
/// order.
pub struct StaggerHandle {
    engine: TweenEngine,
    timers: Vec<TimerId>,
    started: Rc<RefCell<Vec<TweenId>>>,
    all: Pin<Box<JoinAll<Completion>>>,
}

impl fmt::Debug for StaggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaggerHandle")
            .field("timers", &self.timers)
            .field("started", &self.started.borrow())
            .finish_non_exhaustive()
    }
}

impl StaggerHandle {
    /// Tweens started so far, in start order
    #[must_use]
    pub fn started(&self) -> Vec<TweenId> {
        self.started.borrow().clone()
    }

    /// Drop pending starts and cancel started tweens.
    ///
    /// Returns how many pending starts were dropped.
    pub fn cancel(&self) -> usize {
        let host = self.engine.host();
        let dropped = self
            .timers
            .iter()
            .filter(|&&timer| host.clear_timeout(timer))
            .count();
        let started = self.started.borrow().clone();
        for id in started {
            self.engine.cancel(id);
        }
        dropped
    }
}

impl Future for StaggerHandle {
    type Output = Vec<TweenOutcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.all.as_mut().poll(cx)
    }
}
