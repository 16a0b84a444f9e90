//! Folio Motion: frame-driven tweens and portfolio UI effects
//!
//! A small motion library for a single-page portfolio. Everything runs on
//! one thread against two injected seams: a [`FrameScheduler`] that hands
//! out frames and timers, and [`Surface`]s that receive style writes. The
//! [`SimulatedHost`] and [`RecordingSurface`] implementations make every
//! effect deterministic under test.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      FOLIO MOTION                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────┐   ┌──────────────────┐    │
//! │  │ Observer   │──►│ TweenEngine  │──►│ Surface          │    │
//! │  │ ScrollChr. │   │ Easing       │   │ (style writes)   │    │
//! │  └────────────┘   │ leases       │   └──────────────────┘    │
//! │                   └──────┬───────┘                           │
//! │                          │ frames / timers                   │
//! │                   ┌──────▼─────────┐                         │
//! │                   │ FrameScheduler │                         │
//! │                   └────────────────┘                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Engine defaults loaded from YAML or JSON
pub mod config;
/// Counters that count up to their target
pub mod counter;
/// Easing curves and keyframe verification
pub mod easing;
/// Pointer and scroll driven transforms
pub mod effects;
mod error;
/// Contact form validation
pub mod form;
/// Frame and timer scheduling
pub mod host;
/// Viewport intersection and reveal-on-scroll
pub mod observer;
/// Floating background particles
pub mod particles;
/// Persisted theme preference
pub mod preference;
/// Scroll-position page chrome
pub mod scroll;
/// Proptest strategies
#[cfg(feature = "proptest")]
pub mod strategies;
/// Style values and formatting
pub mod style;
/// Style targets
pub mod surface;
/// Text effects
pub mod text;
/// Tween engine
pub mod tween;
/// Typewriter text
pub mod typing;

pub use config::EngineConfig;
pub use counter::{animate_counters, Counter, CounterStep};
pub use easing::{sample_easing, verify_easing, Easing, EasingVerification, Keyframe};
pub use effects::{
    card_hover, hero_parallax, CustomCursor, MagneticButton, MouseTrail, Parallax, Pointer,
    Ripple, Tilt, TrailOptions,
};
pub use error::{MotionError, MotionResult};
pub use form::{
    is_valid_email, ContactForm, ContactFormController, FieldError, FormField, Submission,
};
pub use host::{FrameScheduler, HostClock, HostRef, SimulatedHost, TimerId};
pub use observer::{
    ObserverOptions, OnceHandling, Rect, RevealAction, RootMargin, Viewport, VisibilityChange,
    VisibilityObserver,
};
pub use particles::{Particle, ParticleField, ParticleOptions};
pub use preference::{JsonFileStore, MemoryStore, PreferenceStore, Theme, ThemeController};
pub use scroll::{
    hide_loader, ChromeState, NavMenu, ProgressBars, ScrollChrome, Section, VisibilityLatch,
};
pub use style::{Properties, PropertyValue};
pub use surface::{
    MemoryDocument, ProviderRef, RecordingSurface, StyleWrite, Surface, SurfaceId,
    SurfaceProvider, SurfaceRef,
};
pub use text::{
    animate_text, floating_animation, split_text, wave_animation, FloatOptions, GlitchEffect,
    GlitchHandle, TextAnimation,
};
pub use tween::{
    Completion, CompletionCallback, ConflictPolicy, StaggerHandle, TweenEngine, TweenHandle,
    TweenId, TweenOptions, TweenOutcome,
};
pub use typing::{TypingEffect, TypingFrame, TypingHandle, TypingTimings};
