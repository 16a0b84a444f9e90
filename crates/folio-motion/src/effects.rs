//! Pointer and scroll effects.
//!
//! These write transforms directly from pointer or scroll geometry and do
//! not go through the tween engine. Transient elements (ripples, trail dots)
//! are created through a [`SurfaceProvider`] and removed by host timers.

use crate::host::{FrameScheduler, HostRef};
use crate::observer::Rect;
use crate::style::css_number;
use crate::surface::{ProviderRef, SurfaceId, SurfaceProvider, SurfaceRef};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Pointer position in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Pointer {
    /// Create a pointer position
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Widths above this count as desktop
pub const DESKTOP_MIN_WIDTH: f64 = 768.0;

fn set_styles(surface: &SurfaceRef, styles: &[(&str, String)]) {
    for (property, value) in styles {
        surface.set_style(property, value);
    }
}

fn px(value: f64) -> String {
    format!("{}px", css_number(value))
}

/// Button that leans towards the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagneticButton {
    /// Fraction of the pointer offset applied
    pub strength: f64,
}

impl Default for MagneticButton {
    fn default() -> Self {
        Self { strength: 0.3 }
    }
}

impl MagneticButton {
    /// Create with a strength
    #[must_use]
    pub const fn new(strength: f64) -> Self {
        Self { strength }
    }

    /// Transform for a pointer over `rect`
    #[must_use]
    pub fn transform(&self, rect: &Rect, pointer: Pointer) -> String {
        let (cx, cy) = rect.center();
        format!(
            "translate({}, {})",
            px((pointer.x - cx) * self.strength),
            px((pointer.y - cy) * self.strength)
        )
    }

    /// Pointer moved over the button
    pub fn on_move(&self, button: &SurfaceRef, rect: &Rect, pointer: Pointer) {
        button.set_style("transform", &self.transform(rect, pointer));
    }

    /// Pointer left the button
    pub fn on_leave(&self, button: &SurfaceRef) {
        button.set_style("transform", "translate(0, 0)");
    }
}

/// Card that tilts in 3D under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tilt {
    /// Maximum rotation in degrees at the card edges
    pub max_tilt: f64,
}

impl Default for Tilt {
    fn default() -> Self {
        Self { max_tilt: 20.0 }
    }
}

impl Tilt {
    /// Rest transform
    pub const RESET: &'static str = "perspective(1000px) rotateX(0) rotateY(0) scale3d(1, 1, 1)";

    /// Create with a maximum tilt
    #[must_use]
    pub const fn new(max_tilt: f64) -> Self {
        Self { max_tilt }
    }

    /// Rotation `(x, y)` in degrees for a pointer over `rect`.
    ///
    /// A degenerate rectangle does not tilt on that axis.
    #[must_use]
    pub fn angles(&self, rect: &Rect, pointer: Pointer) -> (f64, f64) {
        let x = pointer.x - rect.left;
        let y = pointer.y - rect.top;
        let cx = rect.width / 2.0;
        let cy = rect.height / 2.0;
        let tilt_x = if cy > 0.0 {
            ((y - cy) / cy) * self.max_tilt
        } else {
            0.0
        };
        let tilt_y = if cx > 0.0 {
            ((cx - x) / cx) * self.max_tilt
        } else {
            0.0
        };
        (tilt_x, tilt_y)
    }

    /// Transform for a pointer over `rect`
    #[must_use]
    pub fn transform(&self, rect: &Rect, pointer: Pointer) -> String {
        let (tilt_x, tilt_y) = self.angles(rect, pointer);
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg) scale3d(1.05, 1.05, 1.05)",
            css_number(tilt_x),
            css_number(tilt_y)
        )
    }

    /// Pointer moved over the card
    pub fn on_move(&self, card: &SurfaceRef, rect: &Rect, pointer: Pointer) {
        card.set_style("transform", &self.transform(rect, pointer));
    }

    /// Pointer left the card
    pub fn on_leave(&self, card: &SurfaceRef) {
        card.set_style("transform", Self::RESET);
    }
}

/// Expanding circle spawned on click.
#[derive(Clone)]
pub struct Ripple {
    host: HostRef,
    provider: ProviderRef,
}

impl std::fmt::Debug for Ripple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ripple").finish_non_exhaustive()
    }
}

impl Ripple {
    /// How long a ripple lives
    pub const LIFETIME_MS: f64 = 600.0;

    /// Create a ripple spawner
    #[must_use]
    pub fn new(host: HostRef, provider: ProviderRef) -> Self {
        Self { host, provider }
    }

    /// Spawn a ripple for a click on `element`.
    ///
    /// The ripple is a square of the element's larger side, centred on the
    /// click, and is removed after [`Ripple::LIFETIME_MS`].
    pub fn on_click(&self, element: &SurfaceRef, rect: &Rect, pointer: Pointer) -> SurfaceId {
        let size = rect.width.max(rect.height);
        let x = pointer.x - rect.left - size / 2.0;
        let y = pointer.y - rect.top - size / 2.0;

        let ripple = self.provider.create();
        ripple.set_attribute("data-parent", &element.id().as_raw().to_string());
        set_styles(
            &ripple,
            &[
                ("position", "absolute".into()),
                ("width", px(size)),
                ("height", px(size)),
                ("border-radius", "50%".into()),
                ("background", "rgba(255, 255, 255, 0.6)".into()),
                ("top", px(y)),
                ("left", px(x)),
                ("pointer-events", "none".into()),
                ("animation", "ripple 0.6s ease-out".into()),
            ],
        );
        element.set_style("position", "relative");
        element.set_style("overflow", "hidden");

        let id = ripple.id();
        schedule_removal(&self.host, &self.provider, id, Self::LIFETIME_MS);
        id
    }
}

fn schedule_removal(host: &HostRef, provider: &ProviderRef, id: SurfaceId, after_ms: f64) {
    let provider = Rc::clone(provider);
    host.set_timeout(
        after_ms,
        Box::new(move || {
            provider.remove(id);
        }),
    );
}

/// Options for [`MouseTrail`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailOptions {
    /// Dot colour
    pub color: String,
    /// Dot diameter in px
    pub size: f64,
    /// Dot lifetime in ms
    pub duration_ms: f64,
}

impl Default for TrailOptions {
    fn default() -> Self {
        Self {
            color: "#6C63FF".to_string(),
            size: 20.0,
            duration_ms: 500.0,
        }
    }
}

/// Fading dots left behind the pointer.
#[derive(Clone)]
pub struct MouseTrail {
    options: TrailOptions,
    host: HostRef,
    provider: ProviderRef,
}

impl std::fmt::Debug for MouseTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MouseTrail")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl MouseTrail {
    /// Create a trail
    #[must_use]
    pub fn new(options: TrailOptions, host: HostRef, provider: ProviderRef) -> Self {
        Self {
            options,
            host,
            provider,
        }
    }

    /// Leave a dot centred on the pointer
    pub fn on_move(&self, pointer: Pointer) -> SurfaceId {
        let size = self.options.size;
        let dot = self.provider.create();
        set_styles(
            &dot,
            &[
                ("position", "fixed".into()),
                ("width", px(size)),
                ("height", px(size)),
                ("border-radius", "50%".into()),
                ("background", self.options.color.clone()),
                ("left", px(pointer.x - size / 2.0)),
                ("top", px(pointer.y - size / 2.0)),
                ("pointer-events", "none".into()),
                ("z-index", "9999".into()),
                ("opacity", "0.6".into()),
                (
                    "animation",
                    format!(
                        "fadeOutScale {}ms ease-out forwards",
                        css_number(self.options.duration_ms)
                    ),
                ),
            ],
        );
        let id = dot.id();
        schedule_removal(&self.host, &self.provider, id, self.options.duration_ms);
        id
    }
}

/// Layers that scroll slower than the page.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parallax {
    /// Default speed; a layer's `data-speed` attribute overrides it
    pub speed: f64,
}

impl Default for Parallax {
    fn default() -> Self {
        Self { speed: 0.5 }
    }
}

impl Parallax {
    /// Create with a default speed
    #[must_use]
    pub const fn new(speed: f64) -> Self {
        Self { speed }
    }

    /// Speed of one layer
    #[must_use]
    pub fn speed_of(&self, layer: &SurfaceRef) -> f64 {
        layer
            .attribute("data-speed")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(self.speed)
    }

    /// Reposition every layer for `scroll_y`
    pub fn update(&self, layers: &[SurfaceRef], scroll_y: f64) {
        for layer in layers {
            let offset = -(scroll_y * self.speed_of(layer));
            layer.set_style("transform", &format!("translate3d(0, {}, 0)", px(offset)));
        }
    }
}

/// Hero image drift: moves down at half the scroll speed.
pub fn hero_parallax(hero: &SurfaceRef, scroll_y: f64) {
    hero.set_style("transform", &format!("translateY({})", px(scroll_y * 0.5)));
}

/// Project card lift on hover.
pub fn card_hover(card: &SurfaceRef, hovered: bool) {
    let transform = if hovered {
        "translateY(-10px)"
    } else {
        "translateY(0)"
    };
    card.set_style("transform", transform);
}

/// Ring that follows the pointer on desktop widths.
#[derive(Clone)]
pub struct CustomCursor {
    cursor: SurfaceRef,
    enabled: bool,
}

impl std::fmt::Debug for CustomCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomCursor")
            .field("cursor", &self.cursor.id())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl CustomCursor {
    /// Create the cursor element; it only shows above
    /// [`DESKTOP_MIN_WIDTH`].
    pub fn install(provider: &dyn SurfaceProvider, viewport_width: f64) -> Self {
        let cursor = provider.create();
        cursor.add_class("custom-cursor");
        set_styles(
            &cursor,
            &[
                ("width", "20px".into()),
                ("height", "20px".into()),
                ("border", "2px solid var(--primary-color)".into()),
                ("border-radius", "50%".into()),
                ("position", "fixed".into()),
                ("pointer-events", "none".into()),
                ("z-index", "9999".into()),
                ("display", "none".into()),
                ("transition", "transform 0.2s ease".into()),
            ],
        );
        let enabled = viewport_width > DESKTOP_MIN_WIDTH;
        if enabled {
            cursor.set_style("display", "block");
        }
        Self { cursor, enabled }
    }

    /// Whether the cursor follows the pointer
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cursor element
    #[must_use]
    pub fn surface(&self) -> &SurfaceRef {
        &self.cursor
    }

    /// Pointer moved
    pub fn on_move(&self, pointer: Pointer) {
        if self.enabled {
            self.cursor.set_style("left", &px(pointer.x));
            self.cursor.set_style("top", &px(pointer.y));
        }
    }

    /// Pointer entered or left a clickable element
    pub fn on_clickable(&self, hovered: bool) {
        if self.enabled {
            let scale = if hovered { "scale(1.5)" } else { "scale(1)" };
            self.cursor.set_style("transform", scale);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;
    use crate::surface::{MemoryDocument, RecordingSurface, Surface};

    fn element() -> (Rc<RecordingSurface>, SurfaceRef) {
        let surface = RecordingSurface::new().shared();
        let as_ref: SurfaceRef = surface.clone();
        (surface, as_ref)
    }

    #[test]
    fn test_magnetic_offset() {
        let (button, button_ref) = element();
        let magnetic = MagneticButton::new(0.5);
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);

        magnetic.on_move(&button_ref, &rect, Pointer::new(70.0, 30.0));
        assert_eq!(button.last_value("transform").as_deref(), Some("translate(10px, 5px)"));

        magnetic.on_leave(&button_ref);
        assert_eq!(button.last_value("transform").as_deref(), Some("translate(0, 0)"));
    }

    #[test]
    fn test_tilt_angles() {
        let tilt = Tilt::new(10.0);
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(tilt.angles(&rect, Pointer::new(100.0, 50.0)), (0.0, 0.0));
        assert_eq!(tilt.angles(&rect, Pointer::new(0.0, 100.0)), (10.0, 10.0));
        assert_eq!(
            tilt.transform(&rect, Pointer::new(200.0, 0.0)),
            "perspective(1000px) rotateX(-10deg) rotateY(-10deg) scale3d(1.05, 1.05, 1.05)"
        );
    }

    #[test]
    fn test_tilt_degenerate_rect_and_reset() {
        let (card, card_ref) = element();
        let tilt = Tilt::default();
        assert_eq!(tilt.angles(&Rect::default(), Pointer::new(5.0, 5.0)), (0.0, 0.0));
        tilt.on_leave(&card_ref);
        assert_eq!(card.last_value("transform").as_deref(), Some(Tilt::RESET));
    }

    #[test]
    fn test_ripple_geometry_and_removal() {
        let host = SimulatedHost::shared();
        let doc = Rc::new(MemoryDocument::new());
        let ripple = Ripple::new(host.clone(), doc.clone());
        let (button, button_ref) = element();

        let id = ripple.on_click(
            &button_ref,
            &Rect::new(100.0, 50.0, 120.0, 40.0),
            Pointer::new(80.0, 110.0),
        );
        let spawned = doc.recording(id).unwrap();
        assert_eq!(spawned.last_value("width").as_deref(), Some("120px"));
        assert_eq!(spawned.last_value("left").as_deref(), Some("-30px"));
        assert_eq!(spawned.last_value("top").as_deref(), Some("-50px"));
        assert_eq!(button.last_value("overflow").as_deref(), Some("hidden"));

        host.advance_to(599.0);
        assert_eq!(doc.len(), 1);
        host.advance_to(600.0);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_trail_dot() {
        let host = SimulatedHost::shared();
        let doc = Rc::new(MemoryDocument::new());
        let trail = MouseTrail::new(TrailOptions::default(), host.clone(), doc.clone());

        let id = trail.on_move(Pointer::new(100.0, 40.0));
        let dot = doc.recording(id).unwrap();
        assert_eq!(dot.last_value("left").as_deref(), Some("90px"));
        assert_eq!(dot.last_value("top").as_deref(), Some("30px"));
        assert_eq!(
            dot.last_value("animation").as_deref(),
            Some("fadeOutScale 500ms ease-out forwards")
        );

        host.advance_to(500.0);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parallax_layers() {
        let (plain, plain_ref) = element();
        let fast = RecordingSurface::new().with_attribute("data-speed", "0.75").shared();
        let fast_ref: SurfaceRef = fast.clone();

        let parallax = Parallax::new(0.25);
        parallax.update(&[plain_ref.clone(), fast_ref], 100.0);
        assert_eq!(
            plain.last_value("transform").as_deref(),
            Some("translate3d(0, -25px, 0)")
        );
        assert_eq!(
            fast.last_value("transform").as_deref(),
            Some("translate3d(0, -75px, 0)")
        );

        parallax.update(&[plain_ref], 0.0);
        assert_eq!(
            plain.last_value("transform").as_deref(),
            Some("translate3d(0, 0px, 0)")
        );
    }

    #[test]
    fn test_hero_and_card_hover() {
        let (hero, hero_ref) = element();
        hero_parallax(&hero_ref, 200.0);
        assert_eq!(hero.last_value("transform").as_deref(), Some("translateY(100px)"));

        card_hover(&hero_ref, true);
        assert_eq!(hero.last_value("transform").as_deref(), Some("translateY(-10px)"));
        card_hover(&hero_ref, false);
        assert_eq!(hero.last_value("transform").as_deref(), Some("translateY(0)"));
    }

    #[test]
    fn test_custom_cursor_desktop_only() {
        let doc = MemoryDocument::new();
        let mobile = CustomCursor::install(&doc, 600.0);
        mobile.on_move(Pointer::new(10.0, 10.0));
        assert!(!mobile.is_enabled());
        assert_eq!(mobile.surface().inline_style("left"), None);
        assert_eq!(mobile.surface().inline_style("display").as_deref(), Some("none"));

        let desktop = CustomCursor::install(&doc, 1280.0);
        desktop.on_move(Pointer::new(10.0, 20.0));
        desktop.on_clickable(true);
        assert_eq!(desktop.surface().inline_style("top").as_deref(), Some("20px"));
        assert_eq!(
            desktop.surface().inline_style("transform").as_deref(),
            Some("scale(1.5)")
        );
        assert_eq!(doc.query_all(".custom-cursor").len(), 2);
    }
}
