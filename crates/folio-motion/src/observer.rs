//! Scroll-driven visibility observer.
//!
//! Targets are registered with their layout rectangle in document
//! coordinates. Each [`VisibilityObserver::update`] takes the scroll offset,
//! intersects every target with the viewport (grown or shrunk by the root
//! margin) and reports the targets whose visibility changed. The first
//! update after a target is observed always reports it.

use crate::error::{MotionError, MotionResult};
use crate::style::Properties;
use crate::surface::{SurfaceId, SurfaceRef};
use crate::tween::{TweenEngine, TweenOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top edge
    pub top: f64,
    /// Left edge
    pub left: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a rectangle
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Centre point `(x, y)`
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Same rectangle moved up by `dy`
    #[must_use]
    pub fn offset_y(&self, dy: f64) -> Self {
        Self {
            top: self.top - dy,
            ..*self
        }
    }

    /// Area of the overlap with `other`
    #[must_use]
    pub fn overlap_area(&self, other: &Self) -> f64 {
        let w = self.right().min(other.right()) - self.left.max(other.left);
        let h = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// Visible area of the page.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in px
    pub width: f64,
    /// Height in px
    pub height: f64,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Per-edge adjustment of the viewport, in px.
///
/// Positive values grow the observed area, negative values shrink it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootMargin {
    /// Top edge
    pub top: f64,
    /// Right edge
    pub right: f64,
    /// Bottom edge
    pub bottom: f64,
    /// Left edge
    pub left: f64,
}

impl RootMargin {
    /// Parse a CSS margin shorthand of one to four px lengths.
    ///
    /// `"10px"` applies to all edges, `"10px 20px"` is vertical/horizontal,
    /// `"1px 2px 3px"` is top/horizontal/bottom, four values go clockwise
    /// from the top. A bare `0` is accepted.
    pub fn parse(margin: &str) -> MotionResult<Self> {
        let invalid = || MotionError::InvalidMargin {
            margin: margin.to_string(),
        };
        let values = margin
            .split_whitespace()
            .map(|part| {
                let number = if part == "0" {
                    Some("0")
                } else {
                    part.strip_suffix("px")
                };
                number
                    .and_then(|n| n.parse::<f64>().ok())
                    .filter(|v| v.is_finite())
                    .ok_or_else(invalid)
            })
            .collect::<MotionResult<Vec<f64>>>()?;

        let [top, right, bottom, left] = match values.as_slice() {
            [all] => [*all; 4],
            [v, h] => [*v, *h, *v, *h],
            [t, h, b] => [*t, *h, *b, *h],
            [t, r, b, l] => [*t, *r, *b, *l],
            _ => return Err(invalid()),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Apply to a root rectangle
    #[must_use]
    pub fn apply(&self, root: Rect) -> Rect {
        Rect {
            top: root.top - self.top,
            left: root.left - self.left,
            width: root.width + self.left + self.right,
            height: root.height + self.top + self.bottom,
        }
    }
}

/// What the observer does with the `once` option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnceHandling {
    /// `once` is ignored: targets stay observed and lose the class on exit
    #[default]
    Legacy,
    /// `once` stops observing a target after it first becomes visible
    Honor,
}

/// Observer configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// Fraction of a target that must be visible, in `0..=1`
    pub threshold: f64,
    /// Root margin shorthand
    pub root_margin: String,
    /// Class added to visible targets
    pub animation_class: String,
    /// Reveal each target only once
    pub once: bool,
    /// How `once` is interpreted
    pub once_handling: OnceHandling,
    /// Remove the class when a target leaves
    pub remove_on_exit: bool,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px".to_string(),
            animation_class: "animated".to_string(),
            once: false,
            once_handling: OnceHandling::Legacy,
            remove_on_exit: true,
        }
    }
}

impl ObserverOptions {
    /// Section reveal preset: adds `revealed` 50 px before the viewport
    /// bottom and never removes it.
    #[must_use]
    pub fn reveal() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            animation_class: "revealed".to_string(),
            remove_on_exit: false,
            ..Self::default()
        }
    }

    /// Set the threshold
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the root margin
    #[must_use]
    pub fn with_root_margin(mut self, margin: impl Into<String>) -> Self {
        self.root_margin = margin.into();
        self
    }

    /// Set the class toggled on visible targets
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.animation_class = class.into();
        self
    }

    /// Set `once` and how it is handled
    #[must_use]
    pub fn with_once(mut self, once: bool, handling: OnceHandling) -> Self {
        self.once = once;
        self.once_handling = handling;
        self
    }

    fn honors_once(&self) -> bool {
        self.once && self.once_handling == OnceHandling::Honor
    }
}

/// What happens to a target when it becomes visible.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RevealAction {
    /// Add the animation class; remove it on exit per the options
    #[default]
    ToggleClass,
    /// Start a tween on the target
    Animate {
        /// Property targets
        properties: Properties,
        /// Tween options
        options: TweenOptions,
    },
    /// Move `data-src` to `src`, then stop observing
    LoadImage,
}

/// A reported visibility change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VisibilityChange {
    /// Target surface
    pub surface: SurfaceId,
    /// Whether the target is now visible
    pub intersecting: bool,
    /// Visible fraction of the target
    pub ratio: f64,
}

struct Observed {
    surface: SurfaceRef,
    rect: Rect,
    action: RevealAction,
    intersecting: Option<bool>,
}

/// Reveals targets as they scroll into view.
pub struct VisibilityObserver {
    options: ObserverOptions,
    margin: RootMargin,
    viewport: Viewport,
    engine: Option<TweenEngine>,
    targets: Vec<Observed>,
}

impl fmt::Debug for VisibilityObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityObserver")
            .field("options", &self.options)
            .field("viewport", &self.viewport)
            .field("targets", &self.targets.len())
            .finish_non_exhaustive()
    }
}

impl VisibilityObserver {
    /// Create an observer, validating threshold and margin.
    pub fn new(options: ObserverOptions, viewport: Viewport) -> MotionResult<Self> {
        if !(0.0..=1.0).contains(&options.threshold) {
            return Err(MotionError::InvalidThreshold {
                threshold: options.threshold,
            });
        }
        let margin = RootMargin::parse(&options.root_margin)?;
        if options.once && options.once_handling == OnceHandling::Legacy {
            tracing::warn!(
                class = %options.animation_class,
                "`once` is ignored under legacy handling; targets keep being observed"
            );
        }
        Ok(Self {
            options,
            margin,
            viewport,
            engine: None,
            targets: Vec::new(),
        })
    }

    /// Use `engine` for [`RevealAction::Animate`] targets
    #[must_use]
    pub fn with_engine(mut self, engine: TweenEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Observer options
    #[must_use]
    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Observe a target that toggles the animation class
    pub fn observe(&mut self, surface: SurfaceRef, rect: Rect) {
        self.observe_with(surface, rect, RevealAction::ToggleClass);
    }

    /// Observe a target with a specific action.
    ///
    /// Observing a surface again replaces its rectangle and action.
    pub fn observe_with(&mut self, surface: SurfaceRef, rect: Rect, action: RevealAction) {
        let id = surface.id();
        self.targets.retain(|t| t.surface.id() != id);
        self.targets.push(Observed {
            surface,
            rect,
            action,
            intersecting: None,
        });
    }

    /// Stop observing. Returns `false` if the surface was not observed.
    pub fn unobserve(&mut self, id: SurfaceId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.surface.id() != id);
        self.targets.len() != before
    }

    /// Whether `id` is observed
    #[must_use]
    pub fn is_observing(&self, id: SurfaceId) -> bool {
        self.targets.iter().any(|t| t.surface.id() == id)
    }

    /// Number of observed targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether nothing is observed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Move a target after a layout change
    pub fn set_rect(&mut self, id: SurfaceId, rect: Rect) -> bool {
        match self.targets.iter_mut().find(|t| t.surface.id() == id) {
            Some(target) => {
                target.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Resize the viewport
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Visible fraction of `rect` (document coordinates) at `scroll_y`.
    ///
    /// Zero-area targets count as fully visible when they sit inside the
    /// root.
    #[must_use]
    pub fn intersection_ratio(&self, rect: &Rect, scroll_y: f64) -> f64 {
        let root = self
            .margin
            .apply(Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height));
        let target = rect.offset_y(scroll_y);
        let area = target.width * target.height;
        if area <= 0.0 {
            let inside = target.top >= root.top
                && target.bottom() <= root.bottom()
                && target.left >= root.left
                && target.right() <= root.right();
            return if inside { 1.0 } else { 0.0 };
        }
        (target.overlap_area(&root) / area).clamp(0.0, 1.0)
    }

    fn is_intersecting(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.options.threshold
    }

    /// Recompute visibility at `scroll_y` and apply actions.
    ///
    /// Returns the targets whose state changed, in observation order.
    pub fn update(&mut self, scroll_y: f64) -> Vec<VisibilityChange> {
        let mut changes = Vec::new();
        let mut done = Vec::new();

        for index in 0..self.targets.len() {
            let ratio = self.intersection_ratio(&self.targets[index].rect, scroll_y);
            let intersecting = self.is_intersecting(ratio);
            let target = &self.targets[index];
            if target.intersecting == Some(intersecting) {
                continue;
            }
            changes.push(VisibilityChange {
                surface: target.surface.id(),
                intersecting,
                ratio,
            });
            if intersecting {
                if self.enter(target) {
                    done.push(target.surface.id());
                }
            } else {
                self.exit(target);
            }
            self.targets[index].intersecting = Some(intersecting);
        }

        for id in done {
            self.unobserve(id);
        }
        if !changes.is_empty() {
            tracing::debug!(scroll_y, changes = changes.len(), "visibility changed");
        }
        changes
    }

    /// Returns whether the target should stop being observed.
    fn enter(&self, target: &Observed) -> bool {
        match &target.action {
            RevealAction::ToggleClass => {
                target.surface.add_class(&self.options.animation_class);
                self.options.honors_once()
            }
            RevealAction::Animate {
                properties,
                options,
            } => {
                match &self.engine {
                    Some(engine) => {
                        if let Err(err) =
                            engine.animate(&target.surface, properties.clone(), options)
                        {
                            tracing::warn!(
                                surface = %target.surface.id(),
                                error = %err,
                                "reveal tween rejected"
                            );
                        }
                    }
                    None => {
                        tracing::warn!(
                            surface = %target.surface.id(),
                            "reveal tween requested without an engine"
                        );
                    }
                }
                self.options.honors_once()
            }
            RevealAction::LoadImage => {
                if let Some(src) = target.surface.attribute("data-src") {
                    target.surface.set_attribute("src", &src);
                    target.surface.remove_attribute("data-src");
                }
                true
            }
        }
    }

    fn exit(&self, target: &Observed) {
        if matches!(target.action, RevealAction::ToggleClass)
            && self.options.remove_on_exit
            && !self.options.honors_once()
        {
            target.surface.remove_class(&self.options.animation_class);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::host::SimulatedHost;
    use crate::surface::{RecordingSurface, Surface};
    use std::rc::Rc;

    const VIEW: Viewport = Viewport::new(1000.0, 800.0);

    fn target() -> (Rc<RecordingSurface>, SurfaceRef) {
        let surface = RecordingSurface::new().shared();
        let as_ref: SurfaceRef = surface.clone();
        (surface, as_ref)
    }

    #[test]
    fn test_root_margin_shorthand() {
        assert_eq!(
            RootMargin::parse("10px").unwrap(),
            RootMargin { top: 10.0, right: 10.0, bottom: 10.0, left: 10.0 }
        );
        assert_eq!(
            RootMargin::parse("5px 20px").unwrap(),
            RootMargin { top: 5.0, right: 20.0, bottom: 5.0, left: 20.0 }
        );
        assert_eq!(
            RootMargin::parse("1px 2px 3px").unwrap(),
            RootMargin { top: 1.0, right: 2.0, bottom: 3.0, left: 2.0 }
        );
        assert_eq!(
            RootMargin::parse("0px 0px -50px 0").unwrap(),
            RootMargin { top: 0.0, right: 0.0, bottom: -50.0, left: 0.0 }
        );
    }

    #[test]
    fn test_root_margin_rejects_garbage() {
        for bad in ["", "10", "10%", "1px 2px 3px 4px 5px", "abcpx"] {
            assert!(
                matches!(RootMargin::parse(bad), Err(MotionError::InvalidMargin { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_invalid_threshold() {
        let err = VisibilityObserver::new(ObserverOptions::default().with_threshold(1.5), VIEW)
            .unwrap_err();
        assert!(matches!(err, MotionError::InvalidThreshold { .. }));
    }

    #[test]
    fn test_intersection_ratio() {
        let observer = VisibilityObserver::new(ObserverOptions::default(), VIEW).unwrap();
        let rect = Rect::new(700.0, 0.0, 100.0, 200.0);
        assert_eq!(observer.intersection_ratio(&rect, 0.0), 0.5);
        assert_eq!(observer.intersection_ratio(&rect, 200.0), 1.0);
        assert_eq!(observer.intersection_ratio(&rect, -200.0), 0.0);
    }

    #[test]
    fn test_negative_bottom_margin_shrinks_root() {
        let observer = VisibilityObserver::new(ObserverOptions::reveal(), VIEW).unwrap();
        // Top 760: 40px inside the viewport but within the 50px margin
        let rect = Rect::new(760.0, 0.0, 100.0, 100.0);
        assert_eq!(observer.intersection_ratio(&rect, 0.0), 0.0);
        assert!((observer.intersection_ratio(&rect, 30.0) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_first_update_reports_every_target() {
        let mut observer = VisibilityObserver::new(ObserverOptions::default(), VIEW).unwrap();
        let (visible, visible_ref) = target();
        let (hidden, hidden_ref) = target();
        observer.observe(visible_ref, Rect::new(100.0, 0.0, 100.0, 100.0));
        observer.observe(hidden_ref, Rect::new(2000.0, 0.0, 100.0, 100.0));

        let changes = observer.update(0.0);
        assert_eq!(changes.len(), 2);
        assert!(changes[0].intersecting);
        assert!(!changes[1].intersecting);
        assert!(visible.has_class("animated"));
        assert!(!hidden.has_class("animated"));

        assert!(observer.update(10.0).is_empty());
    }

    #[test]
    fn test_threshold_gates_entry() {
        let options = ObserverOptions::default().with_threshold(0.5);
        let mut observer = VisibilityObserver::new(options, VIEW).unwrap();
        let (card, card_ref) = target();
        observer.observe(card_ref, Rect::new(760.0, 0.0, 100.0, 100.0));

        observer.update(0.0);
        assert!(!card.has_class("animated"));
        observer.update(5.0);
        assert!(!card.has_class("animated"));
        observer.update(60.0);
        assert!(card.has_class("animated"));
    }

    #[test]
    fn test_legacy_ignores_once() {
        let options = ObserverOptions::default().with_once(true, OnceHandling::Legacy);
        let mut observer = VisibilityObserver::new(options, VIEW).unwrap();
        let (card, card_ref) = target();
        observer.observe(card_ref, Rect::new(100.0, 0.0, 100.0, 100.0));

        observer.update(0.0);
        assert!(card.has_class("animated"));
        observer.update(5000.0);
        assert!(!card.has_class("animated"));
        assert!(observer.is_observing(card.id()));
    }

    #[test]
    fn test_honor_once_unobserves() {
        let options = ObserverOptions::default().with_once(true, OnceHandling::Honor);
        let mut observer = VisibilityObserver::new(options, VIEW).unwrap();
        let (card, card_ref) = target();
        observer.observe(card_ref, Rect::new(100.0, 0.0, 100.0, 100.0));

        observer.update(0.0);
        assert!(!observer.is_observing(card.id()));
        observer.update(5000.0);
        assert!(card.has_class("animated"));
    }

    #[test]
    fn test_reveal_preset_keeps_class() {
        let mut observer = VisibilityObserver::new(ObserverOptions::reveal(), VIEW).unwrap();
        let (section, section_ref) = target();
        observer.observe(section_ref, Rect::new(100.0, 0.0, 100.0, 100.0));

        observer.update(0.0);
        observer.update(5000.0);
        assert!(section.has_class("revealed"));
        assert!(observer.is_observing(section.id()));
    }

    #[test]
    fn test_animate_action_starts_tween() {
        let host = SimulatedHost::shared();
        let engine = TweenEngine::new(host.clone());
        let mut observer = VisibilityObserver::new(ObserverOptions::default(), VIEW)
            .unwrap()
            .with_engine(engine.clone());
        let (card, card_ref) = target();
        observer.observe_with(
            card_ref,
            Rect::new(100.0, 0.0, 100.0, 100.0),
            RevealAction::Animate {
                properties: Properties::new().with("opacity", 1.0),
                options: TweenOptions::default()
                    .with_duration(100.0)
                    .with_easing(Easing::Linear),
            },
        );

        observer.update(0.0);
        assert_eq!(engine.active_tweens(), 1);
        host.tick(100.0);
        assert_eq!(card.last_value("opacity").as_deref(), Some("1"));
        assert!(!card.has_class("animated"));
    }

    #[test]
    fn test_lazy_image_loads_once() {
        let mut observer = VisibilityObserver::new(
            ObserverOptions::default().with_threshold(0.0),
            VIEW,
        )
        .unwrap();
        let img = RecordingSurface::new()
            .with_attribute("data-src", "/img/project.png")
            .shared();
        observer.observe_with(
            img.clone(),
            Rect::new(1200.0, 0.0, 50.0, 50.0),
            RevealAction::LoadImage,
        );

        observer.update(0.0);
        assert_eq!(img.attribute("src"), None);
        observer.update(600.0);
        assert_eq!(img.attribute("src").as_deref(), Some("/img/project.png"));
        assert_eq!(img.attribute("data-src"), None);
        assert!(observer.is_empty());
    }

    #[test]
    fn test_observe_again_replaces() {
        let mut observer = VisibilityObserver::new(ObserverOptions::default(), VIEW).unwrap();
        let (card, card_ref) = target();
        observer.observe(card_ref.clone(), Rect::new(2000.0, 0.0, 10.0, 10.0));
        observer.observe(card_ref, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(observer.len(), 1);
        observer.update(0.0);
        assert!(card.has_class("animated"));
        assert!(observer.unobserve(card.id()));
        assert!(!observer.unobserve(card.id()));
    }
}
