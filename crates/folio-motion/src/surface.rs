//! Render surfaces: the things effects write styles, classes and text to.
//!
//! The engine never looks surfaces up on its own. Callers hand it a
//! [`SurfaceRef`], or inject a [`SurfaceProvider`] that resolves surfaces by
//! id or by class/id selector.

use crate::host::HostClock;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Allocate a fresh, process-unique id
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }

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

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// A styled element on the host.
///
/// Mutators take `&self`: surfaces are shared between the engine, effects
/// and the caller on one thread.
pub trait Surface {
    /// Identity of this surface
    fn id(&self) -> SurfaceId;

    /// Resolved value of a style property, as the host would report it
    fn computed_style(&self, property: &str) -> Option<String>;

    /// Value set directly on the surface, if any
    fn inline_style(&self, property: &str) -> Option<String>;

    /// Write an inline style property
    fn set_style(&self, property: &str, value: &str);

    /// Add a class to the class list
    fn add_class(&self, class: &str);

    /// Remove a class from the class list
    fn remove_class(&self, class: &str);

    /// Whether the class list contains `class`
    fn has_class(&self, class: &str) -> bool;

    /// Set an attribute
    fn set_attribute(&self, name: &str, value: &str);

    /// Read an attribute
    fn attribute(&self, name: &str) -> Option<String>;

    /// Remove an attribute
    fn remove_attribute(&self, name: &str);

    /// Replace the text content
    fn set_text(&self, text: &str);

    /// Current text content
    fn text(&self) -> String;
}

/// Shared handle to a surface.
pub type SurfaceRef = Rc<dyn Surface>;

/// One recorded inline style write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleWrite {
    /// Style property written
    pub property: String,
    /// Value written
    pub value: String,
    /// Host time of the write, when the surface has a clock
    pub at_ms: Option<f64>,
}

#[derive(Debug, Default)]
struct RecordingState {
    computed: BTreeMap<String, String>,
    inline: BTreeMap<String, String>,
    writes: Vec<StyleWrite>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    text: String,
}

/// In-memory surface that keeps every style write.
///
/// Computed style resolves to the inline value when one was written, then
/// to the seeded computed value.
#[derive(Debug)]
pub struct RecordingSurface {
    id: SurfaceId,
    clock: Option<HostClock>,
    state: RefCell<RecordingState>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Create an empty surface with a fresh id
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SurfaceId::next(),
            clock: None,
            state: RefCell::new(RecordingState::default()),
        }
    }

    /// Create an empty surface that stamps writes with `clock`
    #[must_use]
    pub fn with_clock(clock: HostClock) -> Self {
        Self {
            clock: Some(clock),
            ..Self::new()
        }
    }

    /// Seed a computed style value
    #[must_use]
    pub fn with_computed(self, property: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .computed
            .insert(property.to_string(), value.to_string());
        self
    }

    /// Seed a class
    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Seed an attribute
    #[must_use]
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Wrap in a shared handle
    #[must_use]
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Every style write so far, oldest first
    #[must_use]
    pub fn writes(&self) -> Vec<StyleWrite> {
        self.state.borrow().writes.clone()
    }

    /// Values written to `property`, oldest first
    #[must_use]
    pub fn writes_for(&self, property: &str) -> Vec<String> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|w| w.property == property)
            .map(|w| w.value.clone())
            .collect()
    }

    /// Most recent value written to `property`
    #[must_use]
    pub fn last_value(&self, property: &str) -> Option<String> {
        self.state.borrow().inline.get(property).cloned()
    }

    /// Number of style writes so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes.len()
    }

    /// Forget the write log, keeping current styles
    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }

    /// Classes currently on the surface, sorted
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.state.borrow().classes.iter().cloned().collect()
    }
}

impl Surface for RecordingSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn computed_style(&self, property: &str) -> Option<String> {
        let state = self.state.borrow();
        state
            .inline
            .get(property)
            .or_else(|| state.computed.get(property))
            .cloned()
    }

    fn inline_style(&self, property: &str) -> Option<String> {
        self.state.borrow().inline.get(property).cloned()
    }

    fn set_style(&self, property: &str, value: &str) {
        let at_ms = self.clock.as_ref().map(HostClock::now_ms);
        let mut state = self.state.borrow_mut();
        state
            .inline
            .insert(property.to_string(), value.to_string());
        state.writes.push(StyleWrite {
            property: property.to_string(),
            value: value.to_string(),
            at_ms,
        });
    }

    fn add_class(&self, class: &str) {
        self.state.borrow_mut().classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.state.borrow_mut().classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.contains(class)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    fn remove_attribute(&self, name: &str) {
        self.state.borrow_mut().attributes.remove(name);
    }

    fn set_text(&self, text: &str) {
        text.clone_into(&mut self.state.borrow_mut().text);
    }

    fn text(&self) -> String {
        self.state.borrow().text.clone()
    }
}

/// Injected lookup of surfaces.
pub trait SurfaceProvider {
    /// Surface with the given id
    fn by_id(&self, id: SurfaceId) -> Option<SurfaceRef>;

    /// Surfaces matching a selector list such as `".card, #hero"`.
    ///
    /// Supports `.class` and `#id` selectors, where `#id` matches the `id`
    /// attribute. Results keep document order without duplicates.
    fn query_all(&self, selector: &str) -> Vec<SurfaceRef>;

    /// Create and attach a new surface
    fn create(&self) -> SurfaceRef;

    /// Detach a surface. Returns `false` if it was not attached.
    fn remove(&self, id: SurfaceId) -> bool;
}

/// Shared handle to a surface provider.
pub type ProviderRef = Rc<dyn SurfaceProvider>;

/// Ordered in-memory collection of [`RecordingSurface`]s.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    clock: Option<HostClock>,
    surfaces: RefCell<Vec<Rc<RecordingSurface>>>,
}

impl MemoryDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document whose surfaces stamp writes with `clock`
    #[must_use]
    pub fn with_clock(clock: HostClock) -> Self {
        Self {
            clock: Some(clock),
            surfaces: RefCell::new(Vec::new()),
        }
    }

    /// Attach an existing surface
    pub fn insert(&self, surface: Rc<RecordingSurface>) {
        self.surfaces.borrow_mut().push(surface);
    }

    /// Create, attach and return a concrete recording surface
    pub fn create_recording(&self) -> Rc<RecordingSurface> {
        let surface = match &self.clock {
            Some(clock) => RecordingSurface::with_clock(clock.clone()),
            None => RecordingSurface::new(),
        }
        .shared();
        self.insert(Rc::clone(&surface));
        surface
    }

    /// Concrete surface with the given id
    #[must_use]
    pub fn recording(&self, id: SurfaceId) -> Option<Rc<RecordingSurface>> {
        self.surfaces.borrow().iter().find(|s| s.id() == id).cloned()
    }

    /// Number of attached surfaces
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.borrow().len()
    }

    /// Whether no surface is attached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.borrow().is_empty()
    }
}

fn matches_selector(surface: &RecordingSurface, selector: &str) -> bool {
    if let Some(class) = selector.strip_prefix('.') {
        surface.has_class(class)
    } else if let Some(id) = selector.strip_prefix('#') {
        surface.attribute("id").as_deref() == Some(id)
    } else {
        false
    }
}

impl SurfaceProvider for MemoryDocument {
    fn by_id(&self, id: SurfaceId) -> Option<SurfaceRef> {
        self.recording(id).map(|s| s as SurfaceRef)
    }

    fn query_all(&self, selector: &str) -> Vec<SurfaceRef> {
        let selectors: Vec<&str> = selector
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        self.surfaces
            .borrow()
            .iter()
            .filter(|s| selectors.iter().any(|sel| matches_selector(s, sel)))
            .map(|s| Rc::clone(s) as SurfaceRef)
            .collect()
    }

    fn create(&self) -> SurfaceRef {
        self.create_recording()
    }

    fn remove(&self, id: SurfaceId) -> bool {
        let mut surfaces = self.surfaces.borrow_mut();
        let before = surfaces.len();
        surfaces.retain(|s| s.id() != id);
        surfaces.len() != before
    }
}
