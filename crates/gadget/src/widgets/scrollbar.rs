//! ScrollBar implementation.
//!
//! This module provides [`ScrollBar`], an integer value in a range that
//! track clicks change by pages and the mouse wheel by lines.

use gadget_render::{Color, Rect};

use crate::element::{DrawContext, ElementBehavior, ElementId};
use crate::event::{ElementEvent, EventResult, EventType, MouseButton};
use crate::view::View;

/// Scroll bar orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Smallest thumb length in pixels.
const MIN_THUMB: f64 = 8.0;

/// A scroll bar with a track and a thumb.
///
/// Pressing the track on either side of the thumb moves by one page; the
/// mouse wheel moves by one line. Both post a `Change` event to the element.
#[derive(Debug, Clone)]
pub struct ScrollBar {
    min: i32,
    max: i32,
    value: i32,
    line_step: i32,
    page_step: i32,
    orientation: Orientation,
    track_color: Color,
    thumb_color: Color,
}

impl Default for ScrollBar {
    fn default() -> Self {
        Self {
            min: 0,
            max: 100,
            value: 0,
            line_step: 1,
            page_step: 10,
            orientation: Orientation::Vertical,
            track_color: Color::from_rgb8(0xdd, 0xdd, 0xdd),
            thumb_color: Color::from_rgb8(0x88, 0x88, 0x88),
        }
    }
}

impl ScrollBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Set the value, clamped to the range. Does not post `Change`.
    pub fn set_value(&mut self, value: i32) -> bool {
        let clamped = value.clamp(self.min, self.max);
        if self.value == clamped {
            return false;
        }
        self.value = clamped;
        true
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Set the range. A `max` below `min` is raised to `min`.
    pub fn set_range(&mut self, min: i32, max: i32) -> bool {
        let max = max.max(min);
        if self.min == min && self.max == max {
            return false;
        }
        self.min = min;
        self.max = max;
        self.value = self.value.clamp(min, max);
        true
    }

    pub fn line_step(&self) -> i32 {
        self.line_step
    }

    pub fn set_line_step(&mut self, step: i32) -> bool {
        let step = step.max(1);
        if self.line_step == step {
            return false;
        }
        self.line_step = step;
        true
    }

    pub fn page_step(&self) -> i32 {
        self.page_step
    }

    pub fn set_page_step(&mut self, step: i32) -> bool {
        let step = step.max(1);
        if self.page_step == step {
            return false;
        }
        self.page_step = step;
        true
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if self.orientation == orientation {
            return false;
        }
        self.orientation = orientation;
        true
    }

    pub fn set_colors(&mut self, track: Color, thumb: Color) -> bool {
        if self.track_color == track && self.thumb_color == thumb {
            return false;
        }
        self.track_color = track;
        self.thumb_color = thumb;
        true
    }

    /// Start and length of the thumb along a track of `length` pixels.
    fn thumb_span(&self, length: f64) -> (f64, f64) {
        let range = f64::from(self.max) - f64::from(self.min);
        if range <= 0.0 {
            return (0.0, length);
        }
        let page = f64::from(self.page_step);
        let thumb = (length * page / (range + page)).clamp(MIN_THUMB.min(length), length);
        let start = (length - thumb) * (f64::from(self.value) - f64::from(self.min)) / range;
        (start, thumb)
    }

    /// The thumb rectangle for a bar of the given size.
    pub fn thumb_rect(&self, width: f64, height: f64) -> Rect {
        match self.orientation {
            Orientation::Vertical => {
                let (start, len) = self.thumb_span(height);
                Rect::new(0.0, start, width, len)
            }
            Orientation::Horizontal => {
                let (start, len) = self.thumb_span(width);
                Rect::new(start, 0.0, len, height)
            }
        }
    }

    fn step_by(&mut self, view: &mut View, id: ElementId, delta: i32) -> bool {
        if !self.set_value(self.value.saturating_add(delta)) {
            return false;
        }
        view.queue_draw(id);
        view.post_event(id, ElementEvent::simple(EventType::Change));
        true
    }
}

impl ElementBehavior for ScrollBar {
    fn kind(&self) -> &'static str {
        "scrollbar"
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let (w, h) = (ctx.width(), ctx.height());
        ctx.surface.draw_filled_rect(Rect::new(0.0, 0.0, w, h), self.track_color);
        ctx.surface.draw_filled_rect(self.thumb_rect(w, h), self.thumb_color);
    }

    fn on_event(&mut self, view: &mut View, id: ElementId, event: &ElementEvent) -> EventResult {
        match event.kind {
            EventType::MouseDown if event.button == MouseButton::Left => {
                let Some(node) = view.element(id) else {
                    return EventResult::Unhandled;
                };
                let (pos, length) = match self.orientation {
                    Orientation::Vertical => (event.y, node.height()),
                    Orientation::Horizontal => (event.x, node.width()),
                };
                let (start, thumb) = self.thumb_span(length);
                let delta = if pos < start {
                    -self.page_step
                } else if pos >= start + thumb {
                    self.page_step
                } else {
                    // Thumb dragging is not supported.
                    return EventResult::Unhandled;
                };
                self.step_by(view, id, delta);
                EventResult::Handled
            }
            EventType::MouseWheel => {
                let delta = match self.orientation {
                    Orientation::Vertical => event.wheel_delta_y,
                    Orientation::Horizontal => event.wheel_delta_x,
                };
                if delta == 0 {
                    return EventResult::Unhandled;
                }
                self.step_by(view, id, -delta.signum() * self.line_step);
                EventResult::Handled
            }
            _ => EventResult::Unhandled,
        }
    }

    impl_as_any!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ContainerId;
    use std::cell::Cell;
    use std::rc::Rc;

    fn bar(view: &mut View) -> ElementId {
        let id = view.append(ContainerId::View, "scrollbar", None).unwrap();
        view.element_mut(id).unwrap().set_rect(0.0, 0.0, 10.0, 100.0);
        view.update_behavior::<ScrollBar>(id, |s| s.set_range(0, 90));
        view.layout();
        id
    }

    #[test]
    fn test_thumb_geometry() {
        let mut s = ScrollBar::new();
        s.set_range(0, 90);
        assert_eq!(s.thumb_rect(10.0, 100.0), Rect::new(0.0, 0.0, 10.0, 10.0));
        s.set_value(90);
        assert_eq!(s.thumb_rect(10.0, 100.0), Rect::new(0.0, 90.0, 10.0, 10.0));
        s.set_range(5, 5);
        assert_eq!(s.value(), 5);
        assert_eq!(s.thumb_rect(10.0, 100.0), Rect::new(0.0, 0.0, 10.0, 100.0));
    }

    #[test]
    fn test_track_press_pages() {
        let mut view = View::new(20.0, 100.0);
        let id = bar(&mut view);
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        view.connect(id, EventType::Change, move |_, _, _| {
            counter.set(counter.get() + 1);
            EventResult::Handled
        })
        .unwrap();

        let down = |y| ElementEvent::mouse(EventType::MouseDown, 5.0, y, MouseButton::Left);
        let up = ElementEvent::mouse(EventType::MouseUp, 5.0, 50.0, MouseButton::Left);
        view.on_mouse_event(&down(50.0));
        view.on_mouse_event(&up);
        assert_eq!(view.behavior::<ScrollBar>(id).unwrap().value(), 10);
        // Thumb now spans 10..20; pressing on it does nothing.
        assert_eq!(view.on_mouse_event(&down(15.0)), EventResult::Unhandled);
        view.on_mouse_event(&up);
        view.on_mouse_event(&down(2.0));
        view.on_mouse_event(&up);
        assert_eq!(view.behavior::<ScrollBar>(id).unwrap().value(), 0);
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn test_wheel_steps_by_line() {
        let mut view = View::new(20.0, 100.0);
        let id = bar(&mut view);
        view.on_mouse_event(&ElementEvent::wheel(5.0, 50.0, 0, -3));
        assert_eq!(view.behavior::<ScrollBar>(id).unwrap().value(), 1);
        view.on_mouse_event(&ElementEvent::wheel(5.0, 50.0, 0, 1));
        view.on_mouse_event(&ElementEvent::wheel(5.0, 50.0, 0, 1));
        assert_eq!(view.behavior::<ScrollBar>(id).unwrap().value(), 0);
    }

    #[test]
    fn test_full_i32_range() {
        let mut view = View::new(20.0, 100.0);
        let id = bar(&mut view);
        view.update_behavior::<ScrollBar>(id, |s| s.set_range(i32::MIN, i32::MAX));
        assert!(view.draw());

        let thumb = view.behavior::<ScrollBar>(id).unwrap().thumb_rect(10.0, 100.0);
        assert_eq!(thumb.height(), MIN_THUMB);
        assert!((thumb.top() - 46.0).abs() < 0.01);

        let down = |y| ElementEvent::mouse(EventType::MouseDown, 5.0, y, MouseButton::Left);
        let up = ElementEvent::mouse(EventType::MouseUp, 5.0, 50.0, MouseButton::Left);
        view.on_mouse_event(&down(2.0));
        view.on_mouse_event(&up);
        assert_eq!(view.behavior::<ScrollBar>(id).unwrap().value(), -10);

        view.update_behavior::<ScrollBar>(id, |s| s.set_value(i32::MAX));
        view.on_mouse_event(&down(2.0));
        view.on_mouse_event(&up);
        assert_eq!(view.behavior::<ScrollBar>(id).unwrap().value(), i32::MAX - 10);
        view.draw();
    }
}
