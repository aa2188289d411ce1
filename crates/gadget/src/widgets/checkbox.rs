//! CheckBox implementation.
//!
//! This module provides [`CheckBox`], a two-state toggle drawn from one
//! image per value and button state.

use gadget_render::{Image, Size};

use super::{ButtonState, MouseTracker};
use crate::element::{DrawContext, ElementBehavior, ElementId};
use crate::event::{ElementEvent, EventResult, EventType};
use crate::view::View;

/// A two-state check box.
///
/// A click toggles the value and posts a `Change` event to the element.
/// Listeners can cancel the click to keep the value.
#[derive(Debug, Clone, Default)]
pub struct CheckBox {
    checked: bool,
    /// Images indexed by `[checked as usize][state]`.
    images: [[Option<Image>; ButtonState::COUNT]; 2],
    on_right: bool,
    mouse: MouseTracker,
}

impl CheckBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Set the value without posting `Change`.
    pub fn set_checked(&mut self, checked: bool) -> bool {
        if self.checked == checked {
            return false;
        }
        self.checked = checked;
        true
    }

    pub fn image(&self, checked: bool, state: ButtonState) -> Option<&Image> {
        self.images[usize::from(checked)][state.index()].as_ref()
    }

    pub fn set_image(&mut self, checked: bool, state: ButtonState, image: Option<Image>) -> bool {
        let slot = &mut self.images[usize::from(checked)][state.index()];
        if slot.as_ref().map(Image::tag) == image.as_ref().map(Image::tag) {
            return false;
        }
        *slot = image;
        true
    }

    /// Whether the box is drawn at the right edge instead of the left.
    pub fn is_checkbox_on_right(&self) -> bool {
        self.on_right
    }

    pub fn set_checkbox_on_right(&mut self, on_right: bool) -> bool {
        if self.on_right == on_right {
            return false;
        }
        self.on_right = on_right;
        true
    }

    fn current_image(&self, enabled: bool) -> Option<&Image> {
        self.image(self.checked, self.mouse.state(enabled))
            .or_else(|| self.image(self.checked, ButtonState::Normal))
    }
}

impl ElementBehavior for CheckBox {
    fn kind(&self) -> &'static str {
        "checkbox"
    }

    fn default_size(&self) -> Size {
        self.image(false, ButtonState::Normal)
            .or_else(|| self.image(true, ButtonState::Normal))
            .map_or(Size::ZERO, Image::size)
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let Some(image) = self.current_image(ctx.node.is_enabled()) else {
            return;
        };
        let x = if self.on_right { ctx.width() - image.width() } else { 0.0 };
        let y = (ctx.height() - image.height()) / 2.0;
        image.draw(ctx.surface, x, y);
    }

    fn on_event(&mut self, view: &mut View, id: ElementId, event: &ElementEvent) -> EventResult {
        if event.kind == EventType::Click {
            self.checked = !self.checked;
            tracing::trace!(target: "gadget::element", ?id, checked = self.checked, "check box toggled");
            view.queue_draw(id);
            view.post_event(id, ElementEvent::simple(EventType::Change));
            return EventResult::Handled;
        }
        if self.mouse.track(event) {
            view.queue_draw(id);
            return EventResult::Handled;
        }
        EventResult::Unhandled
    }

    impl_as_any!();
}
