//! Button implementation.
//!
//! This module provides [`Button`], an image button with normal, hover,
//! pressed and disabled states.

use gadget_render::blit::{StretchBorders, stretch_middle_draw};
use gadget_render::{Image, Rect, Size};

use super::{ButtonState, MouseTracker};
use crate::element::{DrawContext, ElementBehavior, ElementId};
use crate::event::{ElementEvent, EventResult};
use crate::view::View;

/// A push button showing one image per [`ButtonState`].
///
/// States without an image fall back to the normal image. Without
/// stretch-middle borders the image is drawn centered at its natural size.
#[derive(Debug, Clone, Default)]
pub struct Button {
    images: [Option<Image>; ButtonState::COUNT],
    stretch_middle: Option<StretchBorders>,
    mouse: MouseTracker,
}

impl Button {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self, state: ButtonState) -> Option<&Image> {
        self.images[state.index()].as_ref()
    }

    pub fn set_image(&mut self, state: ButtonState, image: Option<Image>) -> bool {
        let slot = &mut self.images[state.index()];
        if slot.as_ref().map(Image::tag) == image.as_ref().map(Image::tag) {
            return false;
        }
        *slot = image;
        true
    }

    pub fn stretch_middle(&self) -> Option<StretchBorders> {
        self.stretch_middle
    }

    pub fn set_stretch_middle(&mut self, borders: Option<StretchBorders>) -> bool {
        if self.stretch_middle == borders {
            return false;
        }
        self.stretch_middle = borders;
        true
    }

    /// The state the button is drawn in.
    pub fn state(&self, enabled: bool) -> ButtonState {
        self.mouse.state(enabled)
    }

    fn current_image(&self, enabled: bool) -> Option<&Image> {
        self.image(self.state(enabled))
            .or_else(|| self.image(ButtonState::Normal))
    }
}

impl ElementBehavior for Button {
    fn kind(&self) -> &'static str {
        "button"
    }

    fn default_size(&self) -> Size {
        self.image(ButtonState::Normal).map_or(Size::ZERO, Image::size)
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let Some(image) = self.current_image(ctx.node.is_enabled()) else {
            return;
        };
        let (w, h) = (ctx.width(), ctx.height());
        match self.stretch_middle {
            Some(borders) => {
                stretch_middle_draw(image.surface(), ctx.surface, Rect::new(0.0, 0.0, w, h), borders);
            }
            None => image.draw(ctx.surface, (w - image.width()) / 2.0, (h - image.height()) / 2.0),
        }
    }

    fn on_event(&mut self, view: &mut View, id: ElementId, event: &ElementEvent) -> EventResult {
        if self.mouse.track(event) {
            view.queue_draw(id);
            return EventResult::Handled;
        }
        EventResult::Unhandled
    }

    impl_as_any!();
}
