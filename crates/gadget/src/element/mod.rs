//! Element nodes.
//!
//! Every element of a view lives in the view's node arena and is addressed
//! by an [`ElementId`]. A node is an [`ElementNode`] (the shared geometry,
//! dirty tracking and caching machinery) plus a boxed [`ElementBehavior`]
//! supplying what is specific to its kind.
//!
//! Nodes are edited through an [`ElementMut`] obtained from
//! [`View::element_mut`](crate::View::element_mut). All setters detect
//! no-op changes, so repeating a value never dirties anything or requests a
//! redraw:
//!
//! ```
//! use gadget::{ContainerId, View};
//!
//! let mut view = View::new(100.0, 100.0);
//! let id = view.append(ContainerId::View, "div", Some("panel")).unwrap();
//!
//! let mut panel = view.element_mut(id).unwrap();
//! assert!(panel.set_pixel_width(40.0));
//! assert!(!panel.set_pixel_width(40.0));
//! ```

mod behavior;
mod geometry;
mod handle;
mod node;

pub use behavior::{DrawContext, ElementBehavior};
pub use geometry::{Dimension, DirtyFlags, GeometryProperty};
pub use handle::ElementMut;
pub use node::ElementNode;

slotmap::new_key_type! {
    /// Identifier of an element within its view.
    pub struct ElementId;
}

/// Addresses an element container: the view's top-level container or the
/// child container of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId {
    View,
    Element(ElementId),
}

impl From<ElementId> for ContainerId {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}
