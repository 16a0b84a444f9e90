//! Page chrome driven by the scroll position.
//!
//! Section and document geometry is in document coordinates; latch checks
//! take rectangles already relative to the viewport.

use crate::host::{HostRef, TimerId};
use crate::observer::Rect;
use crate::style::css_number;
use crate::surface::SurfaceRef;
use serde::Serialize;

/// Header gets [`SCROLLED_CLASS`] past this offset
pub const HEADER_SCROLLED_AFTER: f64 = 50.0;

/// Back-to-top button is shown past this offset
pub const BACK_TO_TOP_AFTER: f64 = 300.0;

/// A section becomes active this far before its top reaches the viewport
pub const SECTION_ACTIVATION_OFFSET: f64 = 100.0;

/// Space left above a section scrolled to from the navigation (fixed header)
pub const SCROLL_TARGET_OFFSET: f64 = 80.0;

/// Class on a header once the page is scrolled
pub const SCROLLED_CLASS: &str = "scrolled";

/// Class shared by visible buttons, open menus and active links
pub const ACTIVE_CLASS: &str = "active";

/// Class on a visible back-to-top button
pub const SHOW_CLASS: &str = "show";

/// Attribute holding a skill bar's percentage
pub const PROGRESS_ATTRIBUTE: &str = "data-progress";

/// Delay between page load and hiding the loader
pub const LOADER_HIDE_AFTER_MS: f64 = 1000.0;

/// Class that hides the loading overlay
pub const HIDDEN_CLASS: &str = "hidden";

/// Page section the navigation links to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    /// Fragment id, without `#`
    pub id: String,
    /// Offset of the section's top from the document top
    pub top: f64,
}

impl Section {
    /// Create a section
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64) -> Self {
        Self { id: id.into(), top }
    }
}

/// Last section whose top, less [`SECTION_ACTIVATION_OFFSET`], has been
/// scrolled past.
#[must_use]
pub fn active_section(sections: &[Section], scroll_y: f64) -> Option<&str> {
    sections
        .iter()
        .rev()
        .find(|s| scroll_y >= s.top - SECTION_ACTIVATION_OFFSET)
        .map(|s| s.id.as_str())
}

/// Percentage of the scrollable distance covered.
///
/// A page that fits the viewport reports 0.
#[must_use]
pub fn scroll_progress(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let total = document_height - viewport_height;
    if total <= 0.0 {
        return 0.0;
    }
    (scroll_y / total * 100.0).clamp(0.0, 100.0)
}

/// Where to scroll to bring a section below the fixed header
#[must_use]
pub fn scroll_target(section_top: f64) -> f64 {
    (section_top - SCROLL_TARGET_OFFSET).max(0.0)
}

/// What [`ScrollChrome::update`] applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChromeState {
    /// Header carries [`SCROLLED_CLASS`]
    pub header_scrolled: bool,
    /// Back-to-top button carries [`SHOW_CLASS`]
    pub back_to_top_visible: bool,
    /// Id of the highlighted section
    pub active_section: Option<String>,
    /// Scroll progress in percent
    pub progress_percent: f64,
}

/// Header, back-to-top button, navigation highlight and progress bar.
///
/// Every part is optional; missing parts are skipped.
#[derive(Default)]
pub struct ScrollChrome {
    header: Option<SurfaceRef>,
    back_to_top: Option<SurfaceRef>,
    progress_bar: Option<SurfaceRef>,
    nav_links: Vec<SurfaceRef>,
    sections: Vec<Section>,
    document_height: f64,
    viewport_height: f64,
}

impl std::fmt::Debug for ScrollChrome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollChrome")
            .field("sections", &self.sections)
            .field("nav_links", &self.nav_links.len())
            .field("document_height", &self.document_height)
            .field("viewport_height", &self.viewport_height)
            .finish_non_exhaustive()
    }
}

impl ScrollChrome {
    /// Chrome for a document of the given heights
    #[must_use]
    pub fn new(document_height: f64, viewport_height: f64) -> Self {
        Self {
            document_height,
            viewport_height,
            ..Self::default()
        }
    }

    /// Set the header
    #[must_use]
    pub fn with_header(mut self, header: SurfaceRef) -> Self {
        self.header = Some(header);
        self
    }

    /// Set the back-to-top button
    #[must_use]
    pub fn with_back_to_top(mut self, button: SurfaceRef) -> Self {
        self.back_to_top = Some(button);
        self
    }

    /// Set the reading progress bar
    #[must_use]
    pub fn with_progress_bar(mut self, bar: SurfaceRef) -> Self {
        self.progress_bar = Some(bar);
        self
    }

    /// Set the navigation: links carry an `href` of `#section-id`
    #[must_use]
    pub fn with_navigation(mut self, links: Vec<SurfaceRef>, sections: Vec<Section>) -> Self {
        self.nav_links = links;
        self.sections = sections;
        self
    }

    /// Document height changed (content loaded, resize)
    pub fn set_heights(&mut self, document_height: f64, viewport_height: f64) {
        self.document_height = document_height;
        self.viewport_height = viewport_height;
    }

    /// Apply the chrome for `scroll_y`
    pub fn update(&self, scroll_y: f64) -> ChromeState {
        let header_scrolled = scroll_y > HEADER_SCROLLED_AFTER;
        if let Some(header) = &self.header {
            toggle_class(header, SCROLLED_CLASS, header_scrolled);
        }

        let back_to_top_visible = scroll_y > BACK_TO_TOP_AFTER;
        if let Some(button) = &self.back_to_top {
            toggle_class(button, SHOW_CLASS, back_to_top_visible);
        }

        let active = active_section(&self.sections, scroll_y).map(str::to_string);
        let active_href = active.as_ref().map(|id| format!("#{id}"));
        for link in &self.nav_links {
            let is_active = active_href.is_some() && link.attribute("href") == active_href;
            toggle_class(link, ACTIVE_CLASS, is_active);
        }

        let progress_percent =
            scroll_progress(scroll_y, self.document_height, self.viewport_height);
        if let Some(bar) = &self.progress_bar {
            bar.set_style("width", &format!("{}%", css_number(progress_percent)));
        }

        ChromeState {
            header_scrolled,
            back_to_top_visible,
            active_section: active,
            progress_percent,
        }
    }
}

fn toggle_class(surface: &SurfaceRef, class: &str, on: bool) {
    if on {
        surface.add_class(class);
    } else {
        surface.remove_class(class);
    }
}

/// One-shot check that a section has entered the viewport.
///
/// Visible means the section's top is above the viewport bottom and its
/// bottom has not scrolled above the viewport top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityLatch {
    fired: bool,
}

impl VisibilityLatch {
    /// Create an unfired latch
    #[must_use]
    pub const fn new() -> Self {
        Self { fired: false }
    }

    /// Whether the latch already fired
    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }

    /// True exactly once, the first time `rect` is visible
    pub fn check(&mut self, rect: &Rect, viewport_height: f64) -> bool {
        if self.fired {
            return false;
        }
        self.fired = rect.top < viewport_height && rect.bottom() >= 0.0;
        self.fired
    }
}

/// Skill bars filled to their `data-progress` once the section is seen.
pub struct ProgressBars {
    bars: Vec<SurfaceRef>,
    latch: VisibilityLatch,
}

impl std::fmt::Debug for ProgressBars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressBars")
            .field("bars", &self.bars.len())
            .field("latch", &self.latch)
            .finish()
    }
}

impl ProgressBars {
    /// Watch `bars`
    #[must_use]
    pub fn new(bars: Vec<SurfaceRef>) -> Self {
        Self {
            bars,
            latch: VisibilityLatch::new(),
        }
    }

    /// Whether the bars were filled
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.latch.has_fired()
    }

    /// Fill the bars if the section just became visible.
    ///
    /// Returns the number of bars written. Bars without a progress value
    /// are left alone.
    pub fn update(&mut self, section: &Rect, viewport_height: f64) -> usize {
        if !self.latch.check(section, viewport_height) {
            return 0;
        }
        let mut filled = 0;
        for bar in &self.bars {
            match bar.attribute(PROGRESS_ATTRIBUTE) {
                Some(progress) => {
                    bar.set_style("width", &format!("{}%", progress.trim()));
                    filled += 1;
                }
                None => tracing::warn!(bar = %bar.id(), "progress bar has no {PROGRESS_ATTRIBUTE}"),
            }
        }
        tracing::debug!(filled, "progress bars filled");
        filled
    }
}

/// Mobile navigation menu.
pub struct NavMenu {
    toggle: SurfaceRef,
    menu: SurfaceRef,
    body: SurfaceRef,
}

impl std::fmt::Debug for NavMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavMenu")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl NavMenu {
    /// Menu opened by `toggle`; `body` scrolling is locked while open
    #[must_use]
    pub fn new(toggle: SurfaceRef, menu: SurfaceRef, body: SurfaceRef) -> Self {
        Self { toggle, menu, body }
    }

    /// Whether the menu is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.menu.has_class(ACTIVE_CLASS)
    }

    /// Open or close; returns the new state
    pub fn toggle(&self) -> bool {
        let open = !self.is_open();
        toggle_class(&self.toggle, ACTIVE_CLASS, open);
        toggle_class(&self.menu, ACTIVE_CLASS, open);
        self.body.set_style("overflow", if open { "hidden" } else { "" });
        open
    }

    /// Close the menu, as after following a link
    pub fn close(&self) {
        self.toggle.remove_class(ACTIVE_CLASS);
        self.menu.remove_class(ACTIVE_CLASS);
        self.body.set_style("overflow", "");
    }

    /// Escape closes an open menu; returns whether the key was handled
    pub fn on_key(&self, key: &str) -> bool {
        if key == "Escape" && self.is_open() {
            self.close();
            true
        } else {
            false
        }
    }
}

/// Hide the loading overlay [`LOADER_HIDE_AFTER_MS`] after page load.
///
/// Call once the page has loaded; the returned timer can be cleared to keep
/// the loader up.
pub fn hide_loader(host: &HostRef, loader: &SurfaceRef) -> TimerId {
    let loader = SurfaceRef::clone(loader);
    host.set_timeout(
        LOADER_HIDE_AFTER_MS,
        Box::new(move || {
            loader.add_class(HIDDEN_CLASS);
            tracing::debug!(surface = %loader.id(), "loader hidden");
        }),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::counter::{animate_counters, TARGET_ATTRIBUTE};
    use crate::host::{FrameScheduler, HostRef, SimulatedHost};
    use crate::surface::{RecordingSurface, Surface};

    #[test]
    fn test_loader_hidden_after_one_second() {
        let host = SimulatedHost::shared();
        let loader = RecordingSurface::new().shared();
        hide_loader(&(host.clone() as HostRef), &(loader.clone() as SurfaceRef));

        host.advance_to(999.0);
        assert!(!loader.has_class(HIDDEN_CLASS));
        host.advance_to(1000.0);
        assert!(loader.has_class(HIDDEN_CLASS));
    }

    #[test]
    fn test_loader_timer_can_be_cleared() {
        let host = SimulatedHost::shared();
        let loader = RecordingSurface::new().shared();
        let timer = hide_loader(&(host.clone() as HostRef), &(loader.clone() as SurfaceRef));

        assert!(host.clear_timeout(timer));
        host.advance_to(5000.0);
        assert!(!loader.has_class(HIDDEN_CLASS));
    }

    fn sections() -> Vec<Section> {
        vec![
            Section::new("home", 0.0),
            Section::new("about", 800.0),
            Section::new("skills", 1600.0),
        ]
    }

    #[test]
    fn test_active_section_boundaries() {
        let sections = sections();
        assert_eq!(active_section(&sections, 0.0), Some("home"));
        assert_eq!(active_section(&sections, 699.0), Some("home"));
        assert_eq!(active_section(&sections, 700.0), Some("about"));
        assert_eq!(active_section(&sections, 5000.0), Some("skills"));
        assert_eq!(active_section(&sections[1..], 10.0), None);
    }

    #[test]
    fn test_scroll_progress_guard() {
        assert_eq!(scroll_progress(250.0, 1800.0, 800.0), 25.0);
        assert_eq!(scroll_progress(0.0, 600.0, 800.0), 0.0);
        assert_eq!(scroll_progress(0.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_progress(2000.0, 1800.0, 800.0), 100.0);
    }

    #[test]
    fn test_scroll_target() {
        assert_eq!(scroll_target(800.0), 720.0);
        assert_eq!(scroll_target(30.0), 0.0);
    }

    #[test]
    fn test_chrome_thresholds() {
        let header = RecordingSurface::new().shared();
        let button = RecordingSurface::new().shared();
        let chrome = ScrollChrome::new(1800.0, 800.0)
            .with_header(header.clone())
            .with_back_to_top(button.clone());

        let state = chrome.update(50.0);
        assert!(!state.header_scrolled);
        assert!(!header.has_class(SCROLLED_CLASS));

        chrome.update(51.0);
        assert!(header.has_class(SCROLLED_CLASS));
        assert!(!button.has_class(SHOW_CLASS));

        let state = chrome.update(301.0);
        assert!(state.back_to_top_visible);
        assert!(button.has_class(SHOW_CLASS));

        chrome.update(10.0);
        assert!(!header.has_class(SCROLLED_CLASS));
        assert!(!button.has_class(SHOW_CLASS));
    }

    #[test]
    fn test_chrome_highlights_nav_link() {
        let home = RecordingSurface::new().with_attribute("href", "#home").shared();
        let about = RecordingSurface::new().with_attribute("href", "#about").shared();
        let external = RecordingSurface::new().with_attribute("href", "/blog").shared();
        let links: Vec<SurfaceRef> = vec![home.clone(), about.clone(), external.clone()];
        let chrome = ScrollChrome::new(2400.0, 800.0).with_navigation(links, sections());

        chrome.update(0.0);
        assert!(home.has_class(ACTIVE_CLASS));
        assert!(!about.has_class(ACTIVE_CLASS));

        let state = chrome.update(750.0);
        assert_eq!(state.active_section.as_deref(), Some("about"));
        assert!(!home.has_class(ACTIVE_CLASS));
        assert!(about.has_class(ACTIVE_CLASS));
        assert!(!external.has_class(ACTIVE_CLASS));
    }

    #[test]
    fn test_chrome_progress_bar_width() {
        let bar = RecordingSurface::new().shared();
        let chrome = ScrollChrome::new(1800.0, 800.0).with_progress_bar(bar.clone());
        chrome.update(500.0);
        assert_eq!(bar.last_value("width").as_deref(), Some("50%"));
    }

    #[test]
    fn test_latch_fires_once() {
        let mut latch = VisibilityLatch::new();
        assert!(!latch.check(&Rect::new(900.0, 0.0, 100.0, 400.0), 800.0));
        assert!(latch.check(&Rect::new(700.0, 0.0, 100.0, 400.0), 800.0));
        assert!(!latch.check(&Rect::new(100.0, 0.0, 100.0, 400.0), 800.0));
        assert!(latch.has_fired());
    }

    #[test]
    fn test_latch_section_above_viewport() {
        let mut latch = VisibilityLatch::new();
        assert!(!latch.check(&Rect::new(-500.0, 0.0, 100.0, 400.0), 800.0));
        assert!(latch.check(&Rect::new(-400.0, 0.0, 100.0, 400.0), 800.0));
    }

    #[test]
    fn test_progress_bars_fill_once() {
        let html = RecordingSurface::new()
            .with_attribute(PROGRESS_ATTRIBUTE, "90")
            .shared();
        let unset = RecordingSurface::new().shared();
        let mut bars = ProgressBars::new(vec![html.clone(), unset.clone()]);

        assert_eq!(bars.update(&Rect::new(1200.0, 0.0, 100.0, 300.0), 800.0), 0);
        assert_eq!(bars.update(&Rect::new(500.0, 0.0, 100.0, 300.0), 800.0), 1);
        assert_eq!(html.last_value("width").as_deref(), Some("90%"));
        assert_eq!(unset.write_count(), 0);

        html.clear_writes();
        assert_eq!(bars.update(&Rect::new(400.0, 0.0, 100.0, 300.0), 800.0), 0);
        assert_eq!(html.write_count(), 0);
        assert!(bars.is_filled());
    }

    #[test]
    fn test_latch_starts_counters() {
        let host = SimulatedHost::shared();
        let stat = RecordingSurface::new()
            .with_attribute(TARGET_ATTRIBUTE, "32")
            .shared();
        let stats: Vec<SurfaceRef> = vec![stat.clone()];
        let mut latch = VisibilityLatch::new();

        for top in [1500.0, 1000.0, 600.0, 200.0] {
            if latch.check(&Rect::new(top, 0.0, 100.0, 500.0), 800.0) {
                animate_counters(&(host.clone() as HostRef), &stats, 64.0);
            }
        }
        host.run_until_idle(16.0, 20);
        assert_eq!(stat.text(), "32");
    }

    #[test]
    fn test_nav_menu() {
        let toggle = RecordingSurface::new().shared();
        let menu = RecordingSurface::new().shared();
        let body = RecordingSurface::new().shared();
        let nav = NavMenu::new(toggle.clone(), menu.clone(), body.clone());

        assert!(!nav.on_key("Escape"));
        assert!(nav.toggle());
        assert!(toggle.has_class(ACTIVE_CLASS));
        assert_eq!(body.last_value("overflow").as_deref(), Some("hidden"));

        assert!(!nav.on_key("Enter"));
        assert!(nav.is_open());
        assert!(nav.on_key("Escape"));
        assert!(!menu.has_class(ACTIVE_CLASS));
        assert_eq!(body.last_value("overflow").as_deref(), Some(""));

        assert!(nav.toggle());
        nav.close();
        assert!(!nav.is_open());
    }
}
