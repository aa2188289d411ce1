//! Events delivered to elements and views.
//!
//! Mouse events enter through [`View::on_mouse_event`](crate::View::on_mouse_event)
//! in view coordinates. While they travel down the tree their position is
//! rewritten into the local space of each element they reach, so handlers
//! always see coordinates relative to their own top-left corner.

/// The type of an element event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    MouseDown,
    MouseUp,
    Click,
    DblClick,
    MouseMove,
    MouseWheel,
    /// The pointer entered an element (or the view).
    MouseOver,
    /// The pointer left an element (or the view).
    MouseOut,
    FocusIn,
    FocusOut,
    /// An element's value changed, e.g. a checkbox was toggled.
    Change,
    /// The view was resized.
    Size,
}

impl EventType {
    /// Whether this is a mouse event carrying a position.
    pub fn is_mouse(self) -> bool {
        matches!(
            self,
            Self::MouseDown
                | Self::MouseUp
                | Self::Click
                | Self::DblClick
                | Self::MouseMove
                | Self::MouseWheel
                | Self::MouseOver
                | Self::MouseOut
        )
    }

    /// Whether view-level listeners receive this event after an element
    /// handled it.
    pub(crate) fn fans_out_to_view(self) -> bool {
        matches!(
            self,
            Self::Click | Self::DblClick | Self::MouseDown | Self::MouseUp
        )
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    None,
    Left,
    Middle,
    Right,
}

/// An event delivered to an element or a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementEvent {
    pub kind: EventType,
    /// Position in the receiver's own coordinates.
    pub x: f64,
    pub y: f64,
    pub button: MouseButton,
    pub wheel_delta_x: i32,
    pub wheel_delta_y: i32,
}

impl ElementEvent {
    /// A positioned mouse event.
    pub fn mouse(kind: EventType, x: f64, y: f64, button: MouseButton) -> Self {
        Self {
            kind,
            x,
            y,
            button,
            wheel_delta_x: 0,
            wheel_delta_y: 0,
        }
    }

    /// A wheel event. Positive deltas scroll up / left.
    pub fn wheel(x: f64, y: f64, delta_x: i32, delta_y: i32) -> Self {
        Self {
            wheel_delta_x: delta_x,
            wheel_delta_y: delta_y,
            ..Self::mouse(EventType::MouseWheel, x, y, MouseButton::None)
        }
    }

    /// An event without position, such as `Change` or `FocusIn`.
    pub fn simple(kind: EventType) -> Self {
        Self::mouse(kind, 0.0, 0.0, MouseButton::None)
    }

    /// The same event at another position.
    pub fn at(&self, x: f64, y: f64) -> Self {
        Self { x, y, ..*self }
    }
}

/// Outcome of delivering an event.
///
/// Results combine by taking the maximum, so a single `Canceled` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EventResult {
    /// Nobody handled the event.
    #[default]
    Unhandled,
    /// The event was handled.
    Handled,
    /// A listener canceled the event; built-in element behavior is skipped.
    Canceled,
}

/// Which part of an element takes part in hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitTest {
    /// Normal client area.
    #[default]
    Client,
    /// Invisible to the mouse; events fall through to what lies below.
    Transparent,
    /// Window caption; hosts use it to drag the gadget.
    Caption,
}

/// Mouse cursor shown over an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorType {
    #[default]
    Arrow,
    IBeam,
    Wait,
    Cross,
    UpArrow,
    SizeNwse,
    SizeNesw,
    SizeWe,
    SizeNs,
    SizeAll,
    No,
    Hand,
    Busy,
    Help,
}

/// Mirroring applied to an element's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlipMode {
    pub horizontal: bool,
    pub vertical: bool,
}

impl FlipMode {
    pub const NONE: Self = Self::new(false, false);
    pub const HORIZONTAL: Self = Self::new(true, false);
    pub const VERTICAL: Self = Self::new(false, true);
    pub const BOTH: Self = Self::new(true, true);

    pub const fn new(horizontal: bool, vertical: bool) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Whether any axis is mirrored.
    pub fn is_flipped(self) -> bool {
        self.horizontal || self.vertical
    }
}
