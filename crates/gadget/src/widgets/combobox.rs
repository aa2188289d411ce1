//! ComboBox implementation.
//!
//! This module provides [`ComboBox`], a header whose children form a drop
//! list shown below it while expanded.

use gadget_render::{Color, Rect};

use crate::element::{DrawContext, ElementBehavior, ElementId};
use crate::event::{ElementEvent, EventResult, EventType};
use crate::view::View;

/// A header with a drop list.
///
/// Children are the list items. Layout stacks them below the header at the
/// combo box's width and shows them only while the list is expanded; the
/// element's height grows to cover the open list. Clicking the header
/// toggles the list.
#[derive(Debug, Clone)]
pub struct ComboBox {
    header_height: f64,
    expanded: bool,
    header_color: Option<Color>,
    list_color: Option<Color>,
}

impl Default for ComboBox {
    fn default() -> Self {
        Self {
            header_height: 20.0,
            expanded: false,
            header_color: None,
            list_color: None,
        }
    }
}

impl ComboBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) -> bool {
        if self.expanded == expanded {
            return false;
        }
        self.expanded = expanded;
        true
    }

    pub fn header_height(&self) -> f64 {
        self.header_height
    }

    pub fn set_header_height(&mut self, height: f64) -> bool {
        if !height.is_finite() || height < 0.0 || self.header_height == height {
            return false;
        }
        self.header_height = height;
        true
    }

    pub fn set_colors(&mut self, header: Option<Color>, list: Option<Color>) -> bool {
        if self.header_color == header && self.list_color == list {
            return false;
        }
        self.header_color = header;
        self.list_color = list;
        true
    }
}

impl ElementBehavior for ComboBox {
    fn kind(&self) -> &'static str {
        "combobox"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn layout(&mut self, view: &mut View, id: ElementId) {
        let Some(node) = view.element(id) else {
            return;
        };
        let width = node.width();
        let items = node.children().map(|c| c.children().to_vec()).unwrap_or_default();

        let mut bottom = self.header_height;
        for item in items {
            let Some(mut handle) = view.element_mut(item) else {
                continue;
            };
            handle.set_pixel_x(0.0);
            handle.set_pixel_y(bottom);
            handle.set_pixel_width(width);
            handle.set_visible(self.expanded);
            bottom += handle.node().map_or(0.0, |n| n.height());
        }

        let height = if self.expanded { bottom } else { self.header_height };
        if let Some(mut handle) = view.element_mut(id) {
            handle.set_pixel_height(height);
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let (w, h) = (ctx.width(), ctx.height());
        if let Some(color) = self.header_color {
            ctx.surface
                .draw_filled_rect(Rect::new(0.0, 0.0, w, self.header_height.min(h)), color);
        }
        if self.expanded && h > self.header_height {
            if let Some(color) = self.list_color {
                let list = Rect::new(0.0, self.header_height, w, h - self.header_height);
                ctx.surface.draw_filled_rect(list, color);
            }
        }
        ctx.draw_children(0.0, 0.0);
    }

    fn on_event(&mut self, view: &mut View, id: ElementId, event: &ElementEvent) -> EventResult {
        if event.kind == EventType::Click && event.y < self.header_height {
            self.expanded = !self.expanded;
            tracing::trace!(target: "gadget::element", ?id, expanded = self.expanded, "drop list toggled");
            view.queue_draw(id);
            return EventResult::Handled;
        }
        EventResult::Unhandled
    }

    impl_as_any!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ContainerId;
    use crate::event::MouseButton;
    use std::cell::Cell;
    use std::rc::Rc;

    fn click(x: f64, y: f64) -> ElementEvent {
        ElementEvent::mouse(EventType::Click, x, y, MouseButton::Left)
    }

    #[test]
    fn test_header_click_opens_list() {
        let mut view = View::new(100.0, 100.0);
        let combo = view.append(ContainerId::View, "combobox", None).unwrap();
        view.element_mut(combo).unwrap().set_pixel_width(60.0);
        let mut items = Vec::new();
        for _ in 0..2 {
            let item = view.append(combo.into(), "div", None).unwrap();
            view.element_mut(item).unwrap().set_pixel_height(15.0);
            items.push(item);
        }
        view.draw();
        assert_eq!(view.element(combo).unwrap().height(), 20.0);
        assert!(!view.element(items[0]).unwrap().is_visible());

        view.on_mouse_event(&click(5.0, 5.0));
        assert!(view.behavior::<ComboBox>(combo).unwrap().is_expanded());
        view.draw();
        assert_eq!(view.element(combo).unwrap().height(), 50.0);
        let second = view.element(items[1]).unwrap();
        assert!(second.is_visible());
        assert_eq!((second.y(), second.width()), (35.0, 60.0));

        let picked = Rc::new(Cell::new(false));
        let flag = Rc::clone(&picked);
        view.connect(items[1], EventType::Click, move |_, _, _| {
            flag.set(true);
            EventResult::Handled
        })
        .unwrap();
        view.on_mouse_event(&click(5.0, 40.0));
        assert!(picked.get());
        assert!(view.behavior::<ComboBox>(combo).unwrap().is_expanded());
    }

    #[test]
    fn test_layout_is_stable() {
        let mut view = View::new(100.0, 100.0);
        let combo = view.append(ContainerId::View, "combobox", None).unwrap();
        view.append(combo.into(), "div", None).unwrap();
        view.draw();
        assert!(!view.is_redraw_queued());
        assert!(!view.draw());
    }
}
