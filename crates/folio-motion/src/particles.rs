//! Decorative floating particles behind the hero section.
//!
//! Particle geometry is random but reproducible: the field owns a seeded
//! [`StdRng`], so the same seed lays out the same particles.
//!
//! Two looks exist. The default field only sizes and places plain
//! `.particle` elements and leaves the animation to the stylesheet.
//! [`ParticleOptions::system`] paints each particle itself: a coloured radial
//! gradient, a random opacity and an inline `floatParticle` animation.

use crate::style::css_number;
use crate::surface::{SurfaceProvider, SurfaceRef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Class on every particle surface
pub const PARTICLE_CLASS: &str = "particle";

/// Particle count of the hero background
pub const DEFAULT_PARTICLE_COUNT: usize = 50;

/// Colour of self-painted particles
pub const DEFAULT_PARTICLE_COLOR: &str = "#6C63FF";

/// Keyframes used by self-painted particles
pub const FLOAT_KEYFRAMES: &str = "floatParticle";

/// Layout ranges for a particle field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleOptions {
    /// Number of particles
    pub count: usize,
    /// Edge length in px
    pub size_px: Range<f64>,
    /// CSS animation duration in seconds
    pub duration_s: Range<f64>,
    /// CSS animation delay in seconds
    pub delay_s: Range<f64>,
    /// Gradient colour; `None` leaves painting to the stylesheet
    pub color: Option<String>,
    /// Opacity range; `None` leaves opacity to the stylesheet
    pub opacity: Option<Range<f64>>,
    /// Keyframes written as an inline `animation`; `None` writes only the duration
    pub keyframes: Option<String>,
    /// RNG seed
    pub seed: u64,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            size_px: 2.0..7.0,
            duration_s: 10.0..30.0,
            delay_s: 0.0..5.0,
            color: None,
            opacity: None,
            keyframes: None,
            seed: 0,
        }
    }
}

impl ParticleOptions {
    /// Self-painted particles: 2..6 px gradients at 0.3..0.8 opacity
    /// floating for 10..30 s
    #[must_use]
    pub fn system() -> Self {
        Self {
            size_px: 2.0..6.0,
            color: Some(DEFAULT_PARTICLE_COLOR.to_string()),
            opacity: Some(0.3..0.8),
            keyframes: Some(FLOAT_KEYFRAMES.to_string()),
            ..Self::default()
        }
    }

    /// Set the gradient colour
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the particle count
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Layout of one particle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Particle {
    /// Edge length in px
    pub size: f64,
    /// Horizontal position in percent of the container
    pub left: f64,
    /// Vertical position in percent of the container
    pub top: f64,
    /// Animation duration in seconds
    pub duration: f64,
    /// Animation delay in seconds
    pub delay: f64,
    /// Gradient colour, when self-painted
    pub color: Option<String>,
    /// Opacity, when self-painted
    pub opacity: Option<f64>,
    /// Inline animation keyframes, when self-animated
    pub keyframes: Option<String>,
}

impl Particle {
    /// Inline styles for this particle
    #[must_use]
    pub fn styles(&self) -> Vec<(&'static str, String)> {
        let size = format!("{}px", css_number(self.size));
        let mut styles = vec![("width", size.clone()), ("height", size)];
        if let Some(color) = &self.color {
            styles.push(("borderRadius", "50%".to_string()));
            styles.push((
                "background",
                format!("radial-gradient(circle, {color} 0%, transparent 70%)"),
            ));
        }
        styles.push(("left", format!("{}%", css_number(self.left))));
        styles.push(("top", format!("{}%", css_number(self.top))));
        if let Some(opacity) = self.opacity {
            styles.push(("opacity", css_number(opacity)));
        }
        match &self.keyframes {
            Some(name) => styles.push((
                "animation",
                format!("{name} {}s linear infinite", css_number(self.duration)),
            )),
            None => styles.push(("animationDuration", format!("{}s", css_number(self.duration)))),
        }
        styles.push(("animationDelay", format!("{}s", css_number(self.delay))));
        styles
    }
}

/// Seeded particle generator.
#[derive(Debug)]
pub struct ParticleField {
    options: ParticleOptions,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field with `options`
    #[must_use]
    pub fn new(options: ParticleOptions) -> Self {
        let rng = StdRng::seed_from_u64(options.seed);
        Self { options, rng }
    }

    /// Options in use
    #[must_use]
    pub fn options(&self) -> &ParticleOptions {
        &self.options
    }

    /// Lay out the next particle
    pub fn next_particle(&mut self) -> Particle {
        let size = sample(&mut self.rng, &self.options.size_px);
        let left = self.rng.random_range(0.0..100.0);
        let top = self.rng.random_range(0.0..100.0);
        let duration = sample(&mut self.rng, &self.options.duration_s);
        let delay = sample(&mut self.rng, &self.options.delay_s);
        let opacity = self
            .options
            .opacity
            .as_ref()
            .map(|range| sample(&mut self.rng, range));
        Particle {
            size,
            left,
            top,
            duration,
            delay,
            color: self.options.color.clone(),
            opacity,
            keyframes: self.options.keyframes.clone(),
        }
    }

    /// Lay out `count` particles without creating surfaces
    pub fn layout(&mut self) -> Vec<Particle> {
        (0..self.options.count).map(|_| self.next_particle()).collect()
    }

    /// Create one styled surface per particle
    pub fn spawn(&mut self, provider: &dyn SurfaceProvider) -> Vec<SurfaceRef> {
        let surfaces: Vec<SurfaceRef> = self
            .layout()
            .iter()
            .map(|particle| {
                let surface = provider.create();
                surface.add_class(PARTICLE_CLASS);
                for (property, value) in particle.styles() {
                    surface.set_style(property, &value);
                }
                surface
            })
            .collect();
        tracing::debug!(count = surfaces.len(), seed = self.options.seed, "particles spawned");
        surfaces
    }
}

// Empty or inverted ranges collapse to their start.
fn sample(rng: &mut StdRng, range: &Range<f64>) -> f64 {
    if range.is_empty() {
        range.start
    } else {
        rng.random_range(range.clone())
    }
}
