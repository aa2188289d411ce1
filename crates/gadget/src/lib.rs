//! Element composition, layout and incremental redraw for desktop gadgets.
//!
//! A gadget's user interface is a tree of elements owned by a [`View`]:
//!
//! - **Elements**: every node has pixel or relative geometry, a pin point to
//!   rotate around, opacity, visibility, an optional mask, and a boxed
//!   [`ElementBehavior`] supplying what is specific to its kind (see
//!   [`widgets`])
//! - **Containers**: ordered children, painted first to last and hit tested
//!   last to first ([`Elements`])
//! - **Layout**: relative geometry is re-resolved against the parent before
//!   each paint ([`View::layout`])
//! - **Redraw**: each element caches its canvas and repaints only when its
//!   content changed; moves only recomposite the parent ([`View::draw`])
//! - **Events**: mouse routing with grab, hover and focus, plus listeners
//!   that may freely edit the tree ([`View::on_mouse_event`],
//!   [`View::connect`])
//! - **Timers**: timeouts, intervals and animations driven by the host
//!   ([`View::process_timers`])
//!
//! # Example
//!
//! ```
//! use gadget::{Color, ContainerId, ElementEvent, EventResult, EventType, MouseButton, View};
//! use gadget::widgets::{CheckBox, Div};
//!
//! let mut view = View::new(100.0, 60.0);
//! let panel = view.append(ContainerId::View, "div", Some("panel")).unwrap();
//! {
//!     let mut panel = view.element_mut(panel).unwrap();
//!     panel.set_relative_width(1.0);
//!     panel.set_relative_height(0.5);
//! }
//! view.update_behavior::<Div>(panel, |div| div.set_background(Some(Color::BLUE)));
//!
//! let check = view.append(panel.into(), "checkbox", None).unwrap();
//! view.element_mut(check).unwrap().set_rect(10.0, 10.0, 12.0, 12.0);
//!
//! view.draw();
//! assert_eq!(view.element(panel).unwrap().height(), 30.0);
//! assert_eq!(view.surface().unwrap().pixel(50, 20), Color::BLUE);
//!
//! let click = ElementEvent::mouse(EventType::Click, 15.0, 15.0, MouseButton::Left);
//! assert_eq!(view.on_mouse_event(&click), EventResult::Handled);
//! assert!(view.behavior::<CheckBox>(check).unwrap().is_checked());
//! ```

mod config;
mod container;
mod debug;
mod dispatch;
mod draw;
pub mod element;
mod error;
mod event;
mod factory;
mod layout;
mod listener;
mod view;
pub mod widgets;

pub use config::{DebugMode, ViewConfig};
pub use container::Elements;
pub use debug::{ElementTreeDebug, TreeFormatOptions, TreeStyle};
pub use element::{
    ContainerId, Dimension, DirtyFlags, DrawContext, ElementBehavior, ElementId, ElementMut,
    ElementNode, GeometryProperty,
};
pub use error::{ConfigError, ElementError, ViewError, ViewResult};
pub use event::{
    CursorType, ElementEvent, EventResult, EventType, FlipMode, HitTest, MouseButton,
};
pub use factory::{BehaviorConstructor, DefaultElementFactory, ElementFactory};
pub use listener::{ElementListener, ListenerId, ViewListener};
pub use view::{TimerSlot, View};

pub use gadget_core::{GeometryValue, TimerToken};
pub use gadget_render::{Color, Image, Point, Rect, Size};

static_assertions::assert_impl_all!(ElementId: Send, Sync, Copy);
static_assertions::assert_impl_all!(ViewConfig: Send, Sync, Clone);
static_assertions::assert_impl_all!(ElementError: Send, Sync, Clone);
static_assertions::assert_not_impl_any!(View: Send, Sync);
