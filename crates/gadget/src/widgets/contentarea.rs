//! ContentArea implementation.
//!
//! This module provides [`ContentArea`], a list of content items laid out
//! top to bottom, scrolled by its own scroll bar on overflow.

use std::fmt;
use std::rc::Rc;

use gadget_render::{Color, Rect};

use super::ScrollBar;
use crate::element::{ContainerId, DrawContext, ElementBehavior, ElementId};
use crate::event::{ElementEvent, EventResult, EventType};
use crate::view::View;

const ELEMENT_TARGET: &str = gadget_core::logging::targets::ELEMENT;

/// Extra layout passes allowed when showing or hiding the scroll bar
/// changes whether the content overflows.
const MAX_LAYOUT_DEPTH: u32 = 2;

/// Pixels scrolled per wheel notch.
const LINE_HEIGHT: f64 = 20.0;

/// Height of a content item.
#[derive(Clone)]
pub enum ItemHeight {
    Fixed(f64),
    /// Computed from the width available to items.
    Computed(Rc<dyn Fn(f64) -> f64>),
}

impl ItemHeight {
    fn resolve(&self, width: f64) -> f64 {
        let height = match self {
            Self::Fixed(height) => *height,
            Self::Computed(f) => f(width),
        };
        if height.is_finite() { height.max(0.0) } else { 0.0 }
    }
}

impl fmt::Debug for ItemHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(height) => f.debug_tuple("Fixed").field(height).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// One entry of a [`ContentArea`].
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub height: ItemHeight,
    pub color: Option<Color>,
}

impl ContentItem {
    pub fn fixed(height: f64, color: Option<Color>) -> Self {
        Self {
            height: ItemHeight::Fixed(height),
            color,
        }
    }

    pub fn computed(height: impl Fn(f64) -> f64 + 'static, color: Option<Color>) -> Self {
        Self {
            height: ItemHeight::Computed(Rc::new(height)),
            color,
        }
    }
}

/// A vertical list of items with a scroll bar that appears on overflow.
///
/// The scroll bar is a `scrollbar` child created on demand during layout.
/// Showing it narrows the items, which can change computed item heights and
/// therefore whether the content still overflows; layout re-runs for such
/// flips at most [`MAX_LAYOUT_DEPTH`] times and then keeps the last state.
#[derive(Debug, Clone)]
pub struct ContentArea {
    items: Vec<ContentItem>,
    /// Top and height of each item in content coordinates.
    spans: Vec<(f64, f64)>,
    content_height: f64,
    selected: Option<usize>,
    scroll_y: f64,
    scrollbar: Option<ElementId>,
    scrollbar_shown: bool,
    scrollbar_width: f64,
    background: Option<Color>,
    selected_color: Color,
    layout_depth: u32,
}

impl Default for ContentArea {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            spans: Vec::new(),
            content_height: 0.0,
            selected: None,
            scroll_y: 0.0,
            scrollbar: None,
            scrollbar_shown: false,
            scrollbar_width: 12.0,
            background: None,
            selected_color: Color::from_rgb8(0x33, 0x66, 0xcc),
            layout_depth: 0,
        }
    }
}

impl ContentArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Append an item and return its index.
    pub fn add_item(&mut self, item: ContentItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn remove_item(&mut self, index: usize) -> Option<ContentItem> {
        if index >= self.items.len() {
            return None;
        }
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        Some(self.items.remove(index))
    }

    pub fn clear_items(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        self.selected = None;
        true
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select an item without posting `Change`. Out-of-range indices are
    /// ignored.
    pub fn set_selected(&mut self, index: Option<usize>) -> bool {
        if index.is_some_and(|i| i >= self.items.len()) || self.selected == index {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn set_background(&mut self, background: Option<Color>) -> bool {
        if self.background == background {
            return false;
        }
        self.background = background;
        true
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_y
    }

    /// Total item height from the last layout.
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// The scroll bar child, once created.
    pub fn scrollbar(&self) -> Option<ElementId> {
        self.scrollbar
    }

    pub fn is_scrollbar_shown(&self) -> bool {
        self.scrollbar_shown
    }

    /// Item under a point given in content coordinates.
    pub fn item_at(&self, content_y: f64) -> Option<usize> {
        self.spans
            .iter()
            .position(|&(top, height)| content_y >= top && content_y < top + height)
    }

    fn measure(&mut self, width: f64) {
        self.spans.clear();
        let mut top = 0.0;
        for item in &self.items {
            let height = item.height.resolve(width);
            self.spans.push((top, height));
            top += height;
        }
        self.content_height = top;
    }

    fn layout_pass(&mut self, view: &mut View, id: ElementId, with_scrollbar: bool) {
        let Some(node) = view.element(id) else {
            return;
        };
        let (width, height) = (node.width(), node.height());
        let item_width = if with_scrollbar {
            (width - self.scrollbar_width).max(0.0)
        } else {
            width
        };
        self.measure(item_width);

        let overflow = self.content_height > height;
        if overflow != with_scrollbar {
            if self.layout_depth < MAX_LAYOUT_DEPTH {
                self.layout_depth += 1;
                self.layout_pass(view, id, overflow);
                return;
            }
            tracing::trace!(
                target: ELEMENT_TARGET,
                ?id,
                depth = self.layout_depth,
                "content layout recursion cut off"
            );
        }
        self.apply_layout(view, id, with_scrollbar, width, height);
    }

    fn apply_layout(&mut self, view: &mut View, id: ElementId, with_scrollbar: bool, width: f64, height: f64) {
        if self.scrollbar_shown != with_scrollbar {
            self.scrollbar_shown = with_scrollbar;
            view.queue_draw(id);
        }
        let max_scroll = (self.content_height - height).max(0.0);
        let mut scroll = 0.0;

        if let Some(bar) = self.ensure_scrollbar(view, id, with_scrollbar) {
            if let Some(mut handle) = view.element_mut(bar) {
                handle.set_rect(width - self.scrollbar_width, 0.0, self.scrollbar_width, height);
                handle.set_visible(with_scrollbar);
            }
            let page = height.round() as i32;
            view.update_behavior::<ScrollBar>(bar, |s| {
                s.set_range(0, max_scroll.ceil() as i32) | s.set_page_step(page) | s.set_line_step(LINE_HEIGHT as i32)
            });
            if with_scrollbar {
                scroll = view
                    .behavior::<ScrollBar>(bar)
                    .map_or(0.0, |s| f64::from(s.value()));
            }
        }

        let scroll = scroll.clamp(0.0, max_scroll);
        if scroll != self.scroll_y {
            self.scroll_y = scroll;
            view.queue_draw(id);
        }
    }

    fn ensure_scrollbar(&mut self, view: &mut View, id: ElementId, needed: bool) -> Option<ElementId> {
        if let Some(bar) = self.scrollbar.filter(|&bar| view.element(bar).is_some()) {
            return Some(bar);
        }
        self.scrollbar = None;
        if !needed {
            return None;
        }
        match view.append(ContainerId::Element(id), "scrollbar", None) {
            Ok(bar) => {
                self.scrollbar = Some(bar);
                Some(bar)
            }
            Err(err) => {
                tracing::warn!(target: ELEMENT_TARGET, ?id, %err, "content area has no scroll bar");
                None
            }
        }
    }

    fn scroll_by_wheel(&mut self, view: &mut View, id: ElementId, delta: i32) -> EventResult {
        let Some(node) = view.element(id) else {
            return EventResult::Unhandled;
        };
        let max_scroll = (self.content_height - node.height()).max(0.0);
        let target = (self.scroll_y - f64::from(delta.signum()) * LINE_HEIGHT).clamp(0.0, max_scroll);
        if target == self.scroll_y {
            return EventResult::Unhandled;
        }
        self.scroll_y = target;
        if let Some(bar) = self.scrollbar {
            view.update_behavior::<ScrollBar>(bar, |s| s.set_value(target.round() as i32));
        }
        view.queue_draw(id);
        view.post_event(id, ElementEvent::simple(EventType::Change));
        EventResult::Handled
    }
}

impl ElementBehavior for ContentArea {
    fn kind(&self) -> &'static str {
        "contentarea"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn layout(&mut self, view: &mut View, id: ElementId) {
        self.layout_depth = 0;
        let shown = self.scrollbar_shown;
        self.layout_pass(view, id, shown);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let (w, h) = (ctx.width(), ctx.height());
        if let Some(background) = self.background {
            ctx.surface.draw_filled_rect(Rect::new(0.0, 0.0, w, h), background);
        }
        let item_width = if self.scrollbar_shown {
            (w - self.scrollbar_width).max(0.0)
        } else {
            w
        };
        for (index, (item, &(top, height))) in self.items.iter().zip(&self.spans).enumerate() {
            let y = top - self.scroll_y;
            if y + height <= 0.0 || y >= h {
                continue;
            }
            let color = if self.selected == Some(index) {
                Some(self.selected_color)
            } else {
                item.color
            };
            if let Some(color) = color {
                ctx.surface.draw_filled_rect(Rect::new(0.0, y, item_width, height), color);
            }
        }
        ctx.draw_children(0.0, 0.0);
    }

    fn on_event(&mut self, view: &mut View, id: ElementId, event: &ElementEvent) -> EventResult {
        match event.kind {
            EventType::MouseWheel if event.wheel_delta_y != 0 => {
                self.scroll_by_wheel(view, id, event.wheel_delta_y)
            }
            EventType::Click => {
                let index = self.item_at(event.y + self.scroll_y);
                if index.is_none() || index == self.selected {
                    return EventResult::Unhandled;
                }
                self.selected = index;
                view.queue_draw(id);
                view.post_event(id, ElementEvent::simple(EventType::Change));
                EventResult::Handled
            }
            _ => EventResult::Unhandled,
        }
    }

    impl_as_any!();
}
