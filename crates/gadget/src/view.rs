//! The view: root of an element tree.
//!
//! A [`View`] owns the element arena, the top-level [`Elements`] container,
//! the element name table, focus/hover/grab state, the timer table and the
//! capabilities injected by the host (graphics factory, element factory and
//! image loader).
//!
//! The host drives it with three calls:
//!
//! - [`View::on_mouse_event`] for input
//! - [`View::process_timers`] when [`View::next_timer_deadline`] passes
//! - [`View::draw`] whenever [`View::is_redraw_queued`] reports pending changes
//!
//! ```
//! use gadget::{Color, ContainerId, View, widgets::Div};
//!
//! let mut view = View::new(40.0, 30.0);
//! let panel = view.append(ContainerId::View, "div", None).unwrap();
//! view.element_mut(panel).unwrap().set_rect(10.0, 10.0, 20.0, 10.0);
//! view.update_behavior::<Div>(panel, |div| div.set_background(Some(Color::RED)));
//!
//! assert!(view.draw());
//! let surface = view.surface().unwrap();
//! assert_eq!(surface.pixel(15, 15), Color::RED);
//! assert_eq!(surface.pixel(5, 5), Color::TRANSPARENT);
//!
//! // Nothing changed since, so the next pass reuses every cached canvas.
//! assert!(!view.draw());
//! ```

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use gadget_core::{TimerTable, TimerToken};
use gadget_render::{
    Color, GraphicsFactory, Image, ImageLoader, MemoryImageLoader, Size, SoftwareGraphics, Surface,
};
use slotmap::{Key, SlotMap};

use crate::config::{DebugMode, ViewConfig};
use crate::container::Elements;
use crate::element::{ContainerId, ElementBehavior, ElementId, ElementMut, ElementNode};
use crate::error::ViewResult;
use crate::event::{CursorType, ElementEvent, EventType};
use crate::factory::{DefaultElementFactory, ElementFactory};
use crate::listener::{Listener, ListenerId};

const VIEW_TARGET: &str = gadget_core::logging::targets::VIEW;

/// Timer callback: receives the view, the timer token and, for animations,
/// the interpolated value.
pub type TimerSlot = Rc<dyn Fn(&mut View, TimerToken, i32)>;

/// The root of an element tree.
pub struct View {
    pub(crate) nodes: SlotMap<ElementId, ElementNode>,
    pub(crate) root: Elements,
    width: f64,
    height: f64,
    /// First registered element per name.
    names: HashMap<String, ElementId>,
    pub(crate) focus: Option<ElementId>,
    pub(crate) hover: Option<ElementId>,
    pub(crate) grab: Option<ElementId>,
    timers: TimerTable<TimerSlot>,
    clock: Box<dyn Fn() -> Instant>,
    pub(crate) graphics: Rc<dyn GraphicsFactory>,
    pub(crate) factory: Rc<dyn ElementFactory>,
    loader: Rc<dyn ImageLoader>,
    pub(crate) debug_mode: DebugMode,
    redraw_queued: bool,
    redraw_requests: usize,
    pub(crate) listeners: SlotMap<ListenerId, Listener>,
    pub(crate) listener_seq: u64,
    pub(crate) pending_events: VecDeque<(ElementId, ElementEvent)>,
    pub(crate) dispatch_depth: usize,
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("elements", &self.nodes.len())
            .field("focus", &self.focus)
            .field("hover", &self.hover)
            .field("timers", &self.timers.len())
            .field("debug_mode", &self.debug_mode)
            .field("redraw_queued", &self.redraw_queued)
            .finish_non_exhaustive()
    }
}

impl View {
    /// Create a view with the software graphics factory, the default element
    /// kinds and an empty in-memory image loader.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_capabilities(
            width,
            height,
            Rc::new(SoftwareGraphics::new()),
            Rc::new(DefaultElementFactory::new()),
            Rc::new(MemoryImageLoader::new()),
        )
    }

    /// Create a view from a configuration with injected capabilities.
    pub fn with_config(
        config: &ViewConfig,
        graphics: Rc<dyn GraphicsFactory>,
        factory: Rc<dyn ElementFactory>,
        loader: Rc<dyn ImageLoader>,
    ) -> Self {
        let mut view = Self::with_capabilities(config.width, config.height, graphics, factory, loader);
        view.timers = TimerTable::with_animation_interval(config.animation_interval());
        view.debug_mode = config.debug_mode;
        view
    }

    /// Create a view from a configuration, using the software graphics
    /// factory and the default element kinds.
    pub fn from_config(config: &ViewConfig, loader: Rc<dyn ImageLoader>) -> Self {
        Self::with_config(
            config,
            Rc::new(config.software_graphics()),
            Rc::new(DefaultElementFactory::new()),
            loader,
        )
    }

    fn with_capabilities(
        width: f64,
        height: f64,
        graphics: Rc<dyn GraphicsFactory>,
        factory: Rc<dyn ElementFactory>,
        loader: Rc<dyn ImageLoader>,
    ) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: Elements::new(None),
            width: width.max(0.0),
            height: height.max(0.0),
            names: HashMap::new(),
            focus: None,
            hover: None,
            grab: None,
            timers: TimerTable::new(),
            clock: Box::new(Instant::now),
            graphics,
            factory,
            loader,
            debug_mode: DebugMode::Off,
            redraw_queued: false,
            redraw_requests: 0,
            listeners: SlotMap::with_key(),
            listener_seq: 0,
            pending_events: VecDeque::new(),
            dispatch_depth: 0,
        }
    }

    // =========================================================================
    // Size
    // =========================================================================

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resize the view. Relative geometry follows at the next layout and
    /// view listeners receive a `Size` event.
    pub fn set_size(&mut self, width: f64, height: f64) -> bool {
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            tracing::debug!(target: VIEW_TARGET, width, height, "invalid view size ignored");
            return false;
        }
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        tracing::debug!(target: VIEW_TARGET, width, height, "view resized");
        self.queue_redraw();
        self.fire_view_event(&ElementEvent::simple(EventType::Size));
        true
    }

    // =========================================================================
    // Elements
    // =========================================================================

    pub fn element(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<ElementMut<'_>> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        Some(ElementMut::new(self, id))
    }

    /// Number of live elements in the whole tree.
    pub fn element_count(&self) -> usize {
        self.nodes.len()
    }

    /// The first registered element with this name anywhere in the tree.
    pub fn element_by_name(&self, name: &str) -> Option<ElementId> {
        self.names.get(name).copied()
    }

    /// The behavior of `id`, if it is of type `T`.
    pub fn behavior<T: ElementBehavior>(&self, id: ElementId) -> Option<&T> {
        self.nodes
            .get(id)?
            .behavior
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// Mutable access to the behavior of `id`. Does not mark anything dirty;
    /// see [`update_behavior`](Self::update_behavior).
    pub fn behavior_mut<T: ElementBehavior>(&mut self, id: ElementId) -> Option<&mut T> {
        self.nodes
            .get_mut(id)?
            .behavior
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Edit the behavior of `id`. When `f` reports a change the element's
    /// content is marked dirty and a redraw is requested.
    pub fn update_behavior<T: ElementBehavior>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut T) -> bool,
    ) -> Option<bool> {
        let changed = f(self.behavior_mut::<T>(id)?);
        if changed {
            self.queue_draw(id);
        }
        Some(changed)
    }

    /// Run a behavior hook with the behavior taken out of its node.
    ///
    /// Returns `None` when the element is gone or its behavior is already
    /// running. The behavior is put back only if the node survived the hook.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut dyn ElementBehavior, &mut View) -> R,
    ) -> Option<R> {
        let mut behavior = self.nodes.get_mut(id)?.behavior.take()?;
        let result = f(behavior.as_mut(), self);
        match self.nodes.get_mut(id) {
            Some(node) => node.behavior = Some(behavior),
            None => {
                tracing::trace!(target: "gadget::element", ?id, "element destroyed by its own callback");
            }
        }
        Some(result)
    }

    /// Mark the content of `id` as changed and request a redraw.
    pub fn queue_draw(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.queue_draw();
            self.queue_redraw();
        }
    }

    /// Post an event to `id`, delivered once the current dispatch finishes.
    pub fn post_event(&mut self, id: ElementId, event: ElementEvent) {
        self.pending_events.push_back((id, event));
        if self.dispatch_depth == 0 {
            self.flush_pending_events();
        }
    }

    // =========================================================================
    // Name table
    // =========================================================================

    pub(crate) fn register_name(&mut self, id: ElementId, name: Option<&str>) {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.names.entry(name.to_string()).or_insert(id);
        }
    }

    pub(crate) fn unregister_name(&mut self, id: ElementId, name: Option<&str>) {
        if let Some(name) = name {
            if self.names.get(name) == Some(&id) {
                self.names.remove(name);
            }
        }
    }

    pub(crate) fn on_element_added(&mut self, id: ElementId) {
        let name = self.nodes.get(id).and_then(|n| n.name.clone());
        self.register_name(id, name.as_deref());
    }

    /// Forget everything that refers to a node about to be destroyed.
    pub(crate) fn on_element_removed(&mut self, id: ElementId) {
        let name = self.nodes.get(id).and_then(|n| n.name.clone());
        self.unregister_name(id, name.as_deref());
        if self.focus == Some(id) {
            self.focus = None;
        }
        if self.hover == Some(id) {
            self.hover = None;
        }
        if self.grab == Some(id) {
            self.grab = None;
        }
        self.listeners.retain(|_, l| l.target() != Some(id));
        self.pending_events.retain(|(target, _)| *target != id);
    }

    // =========================================================================
    // Redraw
    // =========================================================================

    /// Request a paint pass from the host. Repeated requests before the next
    /// draw collapse into one.
    pub fn queue_redraw(&mut self) {
        if !self.redraw_queued {
            self.redraw_queued = true;
            self.redraw_requests += 1;
            tracing::trace!(target: VIEW_TARGET, "redraw queued");
        }
    }

    pub fn is_redraw_queued(&self) -> bool {
        self.redraw_queued
    }

    /// Number of distinct redraw requests issued so far.
    pub fn redraw_request_count(&self) -> usize {
        self.redraw_requests
    }

    pub(crate) fn redraw_done(&mut self) {
        self.redraw_queued = false;
    }

    /// Force every element and container to redraw.
    pub fn mark_redraw(&mut self) {
        for node in self.nodes.values_mut() {
            node.mark_redraw();
        }
        self.root.structure_changed = true;
        self.queue_redraw();
    }

    pub fn debug_mode(&self) -> DebugMode {
        self.debug_mode
    }

    pub fn set_debug_mode(&mut self, mode: DebugMode) {
        if self.debug_mode != mode {
            self.debug_mode = mode;
            self.mark_redraw();
        }
    }

    /// The composite of the whole view from the last draw.
    pub fn surface(&self) -> Option<&dyn Surface> {
        self.root.composite.as_deref()
    }

    pub fn graphics(&self) -> &dyn GraphicsFactory {
        self.graphics.as_ref()
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Load an image through the view's loader. Failures are logged.
    pub fn load_image(&self, name: &str) -> Option<Image> {
        self.load(name, false)
    }

    /// Load a mask image: black pixels become transparent.
    pub fn load_mask(&self, name: &str) -> Option<Image> {
        self.load(name, true)
    }

    fn load(&self, name: &str, as_mask: bool) -> Option<Image> {
        match self.loader.load(name, as_mask) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::warn!(target: "gadget_render::image", name, as_mask, %err, "image load failed");
                None
            }
        }
    }

    // =========================================================================
    // Focus and hover
    // =========================================================================

    pub fn focused_element(&self) -> Option<ElementId> {
        self.focus
    }

    /// Move keyboard focus, delivering `FocusOut` and `FocusIn`.
    pub fn set_focus(&mut self, target: Option<ElementId>) {
        if self.focus == target {
            return;
        }
        if let Some(id) = target {
            if !self.nodes.contains_key(id) {
                return;
            }
        }
        let old = std::mem::replace(&mut self.focus, target);
        tracing::trace!(target: VIEW_TARGET, ?old, new = ?target, "focus changed");
        if let Some(old) = old {
            if self.nodes.contains_key(old) {
                self.fire_element_event(old, &ElementEvent::simple(EventType::FocusOut));
            }
        }
        if let Some(new) = target {
            if self.focus == Some(new) && self.nodes.contains_key(new) {
                self.fire_element_event(new, &ElementEvent::simple(EventType::FocusIn));
            }
        }
    }

    pub fn hovered_element(&self) -> Option<ElementId> {
        self.hover
    }

    pub fn grabbed_element(&self) -> Option<ElementId> {
        self.grab
    }

    /// Tooltip of the element under the mouse.
    pub fn hovered_tooltip(&self) -> Option<&str> {
        self.nodes.get(self.hover?)?.tooltip()
    }

    /// Cursor of the element under the mouse.
    pub fn hovered_cursor(&self) -> CursorType {
        self.hover
            .and_then(|id| self.nodes.get(id))
            .map_or(CursorType::Arrow, ElementNode::cursor)
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Replace the clock used to schedule timers.
    pub fn set_clock(&mut self, clock: impl Fn() -> Instant + 'static) {
        self.clock = Box::new(clock);
    }

    pub fn now(&self) -> Instant {
        (self.clock)()
    }

    /// Call `slot` once after `delay`.
    pub fn set_timeout(
        &mut self,
        delay: Duration,
        slot: impl Fn(&mut View, TimerToken, i32) + 'static,
    ) -> ViewResult<TimerToken> {
        let now = self.now();
        Ok(self.timers.set_timeout(delay, Rc::new(slot), now)?)
    }

    /// Call `slot` every `period` until cancelled.
    pub fn set_interval(
        &mut self,
        period: Duration,
        slot: impl Fn(&mut View, TimerToken, i32) + 'static,
    ) -> ViewResult<TimerToken> {
        let now = self.now();
        Ok(self.timers.set_interval(period, Rc::new(slot), now)?)
    }

    /// Call `slot` with values interpolated from `start` to `end` over
    /// `duration`, based on elapsed wall-clock time.
    pub fn begin_animation(
        &mut self,
        start: i32,
        end: i32,
        duration: Duration,
        slot: impl Fn(&mut View, TimerToken, i32) + 'static,
    ) -> ViewResult<TimerToken> {
        let now = self.now();
        Ok(self
            .timers
            .begin_animation(start, end, duration, Rc::new(slot), now)?)
    }

    /// Cancel a timer. Unknown tokens are ignored.
    pub fn clear_timer(&mut self, token: TimerToken) -> bool {
        self.timers.cancel(token)
    }

    pub fn is_timer_active(&self, token: TimerToken) -> bool {
        self.timers.is_active(token)
    }

    /// Number of live timers.
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// When the next timer is due.
    pub fn next_timer_deadline(&mut self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Run every timer due at `now`. Returns how many callbacks ran.
    #[tracing::instrument(skip(self), target = "gadget::view", level = "trace")]
    pub fn process_timers(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(due) = self.timers.take_due(now) {
            tracing::trace!(
                target: "gadget_core::timer",
                token = due.token.get(),
                kind = ?due.kind,
                value = due.value,
                "timer fired"
            );
            (due.slot)(self, due.token, due.value);
            fired += 1;
        }
        fired
    }
}

/// Pseudo-random but stable overlay color for an element.
pub(crate) fn debug_color(id: ElementId) -> Color {
    let mut h = id.data().as_ffi().wrapping_mul(0x9e37_79b9_7f4a_7c15);
    h ^= h >> 29;
    let [r, g, b, ..] = h.to_le_bytes();
    Color::from_rgb8(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_queue_redraw_is_idempotent() {
        let mut view = View::new(10.0, 10.0);
        view.queue_redraw();
        view.queue_redraw();
        assert_eq!(view.redraw_request_count(), 1);
        view.redraw_done();
        view.queue_redraw();
        assert_eq!(view.redraw_request_count(), 2);
    }

    #[test]
    fn test_set_size_fires_size_event() {
        let mut view = View::new(10.0, 10.0);
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        view.connect_view(EventType::Size, move |view, _| {
            assert_eq!(view.size(), Size::new(20.0, 5.0));
            counter.set(counter.get() + 1);
            crate::EventResult::Handled
        });
        assert!(view.set_size(20.0, 5.0));
        assert!(!view.set_size(20.0, 5.0));
        assert!(!view.set_size(-1.0, 5.0));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_focus_events() {
        let mut view = View::new(10.0, 10.0);
        let a = view.append(ContainerId::View, "div", None).unwrap();
        let b = view.append(ContainerId::View, "div", None).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (id, tag) in [(a, "a"), (b, "b")] {
            for kind in [EventType::FocusIn, EventType::FocusOut] {
                let log = Rc::clone(&log);
                view.connect(id, kind, move |_, _, e| {
                    log.borrow_mut().push(format!("{tag}:{:?}", e.kind));
                    crate::EventResult::Handled
                })
                .unwrap();
            }
        }
        view.set_focus(Some(a));
        view.set_focus(Some(b));
        view.set_focus(Some(b));
        assert_eq!(*log.borrow(), ["a:FocusIn", "a:FocusOut", "b:FocusIn"]);

        view.remove(ContainerId::View, b);
        assert_eq!(view.focused_element(), None);
    }

    #[test]
    fn test_debug_colors_are_stable() {
        let mut view = View::new(10.0, 10.0);
        let a = view.append(ContainerId::View, "div", None).unwrap();
        assert_eq!(debug_color(a), view.element(a).unwrap().debug_color);
    }

    #[test]
    fn test_update_behavior_dirties_only_on_change() {
        let mut view = View::new(10.0, 10.0);
        let div = view.append(ContainerId::View, "div", None).unwrap();
        view.draw();
        assert_eq!(
            view.update_behavior::<crate::widgets::Div>(div, |d| d.set_background(None)),
            Some(false)
        );
        assert!(!view.element(div).unwrap().dirty().any());
        assert_eq!(
            view.update_behavior::<crate::widgets::Div>(div, |d| d.set_background(Some(Color::RED))),
            Some(true)
        );
        assert!(view.element(div).unwrap().dirty().content);
        assert!(view.update_behavior::<crate::widgets::Img>(div, |_| true).is_none());
    }
}
