//! Built-in element kinds.
//!
//! Each kind is an [`ElementBehavior`](crate::ElementBehavior) registered in
//! [`DefaultElementFactory`](crate::DefaultElementFactory) under its kind
//! name. Their state is reached through
//! [`View::behavior`](crate::View::behavior) and
//! [`View::update_behavior`](crate::View::update_behavior).

use crate::event::{ElementEvent, EventType, MouseButton};

macro_rules! impl_as_any {
    () => {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

mod button;
mod checkbox;
mod combobox;
mod contentarea;
mod div;
mod img;
mod scrollbar;

pub use button::Button;
pub use checkbox::CheckBox;
pub use combobox::ComboBox;
pub use contentarea::{ContentArea, ContentItem, ItemHeight};
pub use div::Div;
pub use img::Img;
pub use scrollbar::{Orientation, ScrollBar};

/// Visual state of a clickable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Over,
    Down,
    Disabled,
}

impl ButtonState {
    pub(crate) const COUNT: usize = 4;

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Pointer state shared by clickable kinds.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MouseTracker {
    over: bool,
    down: bool,
}

impl MouseTracker {
    /// Follow hover and press events. Returns whether the state changed.
    pub(crate) fn track(&mut self, event: &ElementEvent) -> bool {
        let before = (self.over, self.down);
        match event.kind {
            EventType::MouseOver => self.over = true,
            EventType::MouseOut => {
                self.over = false;
                self.down = false;
            }
            EventType::MouseDown if event.button == MouseButton::Left => self.down = true,
            EventType::MouseUp => self.down = false,
            _ => {}
        }
        before != (self.over, self.down)
    }

    pub(crate) fn state(&self, enabled: bool) -> ButtonState {
        if !enabled {
            ButtonState::Disabled
        } else if self.down {
            ButtonState::Down
        } else if self.over {
            ButtonState::Over
        } else {
            ButtonState::Normal
        }
    }
}
