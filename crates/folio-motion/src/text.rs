//! Text effects: per-character entrances, glitch scrambling and looping
//! CSS animations.

use crate::error::MotionError;
use crate::host::{FrameScheduler, HostRef, TimerId};
use crate::style::css_number;
use crate::surface::{SurfaceProvider, SurfaceRef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Characters a glitched letter is replaced with
pub const GLITCH_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Delay between characters of [`animate_text`]
pub const DEFAULT_CHAR_STEP_MS: f64 = 50.0;

/// Delay between the entry and the rest transform
const SETTLE_MS: f64 = 10.0;

/// Glitch frames are this far apart
pub const DEFAULT_GLITCH_INTERVAL_MS: f64 = 100.0;

/// Replace `parent`'s text with one inline-block surface per character.
///
/// Spaces become non-breaking spaces so they keep their width. The new
/// surfaces are returned in reading order.
pub fn split_text(provider: &dyn SurfaceProvider, parent: &SurfaceRef) -> Vec<SurfaceRef> {
    let text = parent.text();
    parent.set_text("");
    text.chars()
        .map(|c| {
            let span = provider.create();
            let shown = if c == ' ' { '\u{a0}' } else { c };
            span.set_text(shown.encode_utf8(&mut [0; 4]));
            span.set_style("display", "inline-block");
            span
        })
        .collect()
}

/// Entrance used by [`animate_text`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAnimation {
    /// Rise 20px into place
    #[default]
    FadeInUp,
    /// Grow from nothing
    Scale,
    /// Turn in around the vertical axis
    Rotate,
}

impl TextAnimation {
    /// Every entrance
    pub const ALL: [Self; 3] = [Self::FadeInUp, Self::Scale, Self::Rotate];

    /// Name as written in markup
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FadeInUp => "fadeInUp",
            Self::Scale => "scale",
            Self::Rotate => "rotate",
        }
    }

    /// Transform a character starts from
    #[must_use]
    pub const fn entry_transform(self) -> &'static str {
        match self {
            Self::FadeInUp => "translateY(20px)",
            Self::Scale => "scale(0)",
            Self::Rotate => "rotateY(90deg)",
        }
    }

    /// Transform a character settles on
    #[must_use]
    pub const fn rest_transform(self) -> &'static str {
        match self {
            Self::FadeInUp => "translateY(0)",
            Self::Scale => "scale(1)",
            Self::Rotate => "rotateY(0)",
        }
    }
}

impl fmt::Display for TextAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextAnimation {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| MotionError::config(format!("unknown text animation '{s}'")))
    }
}

/// Split `parent` and bring its characters in one after another.
///
/// Each character is hidden at once. After `i * step_ms` it gets a CSS
/// transition, full opacity and the entry transform; 10 ms later the rest
/// transform, which the transition animates to.
pub fn animate_text(
    host: &HostRef,
    provider: &dyn SurfaceProvider,
    parent: &SurfaceRef,
    animation: TextAnimation,
    step_ms: f64,
) -> Vec<SurfaceRef> {
    let chars = split_text(provider, parent);
    for (i, span) in chars.iter().enumerate() {
        span.set_style("opacity", "0");
        let span = Rc::clone(span);
        let settle_host = Rc::clone(host);
        host.set_timeout(
            i as f64 * step_ms,
            Box::new(move || {
                span.set_style("transition", "all 0.5s ease");
                span.set_style("opacity", "1");
                span.set_style("transform", animation.entry_transform());
                settle_host.set_timeout(
                    SETTLE_MS,
                    Box::new(move || span.set_style("transform", animation.rest_transform())),
                );
            }),
        );
    }
    tracing::debug!(chars = chars.len(), %animation, "text animation scheduled");
    chars
}

/// Text scrambler that reveals the original left to right.
///
/// Every tick re-rolls the unrevealed characters; one more character is
/// revealed every third tick. The tick that shows the whole text is the
/// last.
#[derive(Debug)]
pub struct GlitchEffect {
    original: Vec<char>,
    glitch: Vec<char>,
    ticks: usize,
    rng: StdRng,
}

impl GlitchEffect {
    /// Scramble `original` with a fixed seed
    #[must_use]
    pub fn new(original: &str, seed: u64) -> Self {
        Self {
            original: original.chars().collect(),
            glitch: GLITCH_CHARS.chars().collect(),
            ticks: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Number of leading characters shown as-is
    #[must_use]
    pub fn revealed(&self) -> usize {
        self.ticks.div_ceil(3).min(self.original.len())
    }

    /// Whether the last frame was produced
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.ticks > 3 * self.original.len()
    }

    /// Next frame, or `None` once the original was shown
    pub fn tick(&mut self) -> Option<String> {
        if self.is_done() {
            return None;
        }
        let revealed = self.revealed();
        let text = self
            .original
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if i < revealed {
                    c
                } else {
                    self.glitch[self.rng.random_range(0..self.glitch.len())]
                }
            })
            .collect();
        self.ticks += 1;
        Some(text)
    }

    /// Scramble `surface`'s current text every `interval_ms`.
    ///
    /// The first frame lands one interval after the call.
    pub fn start(host: HostRef, surface: SurfaceRef, interval_ms: f64, seed: u64) -> GlitchHandle {
        let runner = Rc::new(GlitchRunner {
            effect: RefCell::new(Self::new(&surface.text(), seed)),
            host,
            surface,
            interval_ms,
            timer: Cell::new(None),
        });
        GlitchRunner::schedule(&runner);
        GlitchHandle { runner }
    }
}

struct GlitchRunner {
    host: HostRef,
    surface: SurfaceRef,
    effect: RefCell<GlitchEffect>,
    interval_ms: f64,
    timer: Cell<Option<TimerId>>,
}

impl GlitchRunner {
    fn tick(runner: &Rc<Self>) {
        runner.timer.set(None);
        let Some(text) = runner.effect.borrow_mut().tick() else {
            return;
        };
        runner.surface.set_text(&text);
        if !runner.effect.borrow().is_done() {
            Self::schedule(runner);
        }
    }

    fn schedule(runner: &Rc<Self>) {
        let next = Rc::clone(runner);
        let timer = runner
            .host
            .set_timeout(runner.interval_ms, Box::new(move || Self::tick(&next)));
        runner.timer.set(Some(timer));
    }
}

/// Handle on a running glitch effect.
pub struct GlitchHandle {
    runner: Rc<GlitchRunner>,
}

impl fmt::Debug for GlitchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlitchHandle")
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}

impl GlitchHandle {
    /// Whether the original text is back
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.runner.effect.borrow().is_done()
    }

    /// Stop scrambling, leaving the current frame
    pub fn stop(&self) -> bool {
        self.runner
            .timer
            .take()
            .is_some_and(|timer| self.runner.host.clear_timeout(timer))
    }
}

/// Loop the `wave` keyframes, each target `delay_ms` behind the previous
pub fn wave_animation(targets: &[SurfaceRef], delay_ms: f64) {
    for (i, target) in targets.iter().enumerate() {
        target.set_style(
            "animation",
            &format!("wave 2s ease-in-out {}ms infinite", css_number(i as f64 * delay_ms)),
        );
    }
}

/// Settings of [`floating_animation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatOptions {
    /// Loop length in seconds; random in 3..5 when unset
    pub duration_s: Option<f64>,
    /// Start delay in seconds; `0.2 * index` when unset
    pub delay_s: Option<f64>,
    /// Float height in px
    pub distance_px: f64,
    /// Seed for random durations
    pub seed: u64,
}

impl Default for FloatOptions {
    fn default() -> Self {
        Self {
            duration_s: None,
            delay_s: None,
            distance_px: 20.0,
            seed: 0,
        }
    }
}

/// Loop the `float` keyframes on every target.
///
/// The distance is passed through the `--float-distance` custom property.
pub fn floating_animation(targets: &[SurfaceRef], options: &FloatOptions) {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let distance = format!("{}px", css_number(options.distance_px));
    for (i, target) in targets.iter().enumerate() {
        let duration = options
            .duration_s
            .unwrap_or_else(|| rng.random_range(3.0..5.0));
        let delay = options.delay_s.unwrap_or(i as f64 * 0.2);
        target.set_style(
            "animation",
            &format!(
                "float {}s ease-in-out {}s infinite",
                css_number(duration),
                css_number(delay)
            ),
        );
        target.set_style("--float-distance", &distance);
    }
}
