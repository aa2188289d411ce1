//! The per-kind element capability.

use std::any::Any;
use std::fmt;

use gadget_render::{Point, Size, Surface};

use super::ElementId;
use super::node::ElementNode;
use crate::event::{ElementEvent, EventResult};
use crate::view::View;

/// What a concrete element kind adds on top of the shared node machinery.
///
/// The node owns geometry, dirty tracking, caching and compositing; the
/// behavior paints the node's own content, reacts to events and may adjust
/// the subtree during layout. Every hook has a default, so a plain container
/// kind only needs [`kind`](Self::kind) and the `Any` accessors.
///
/// Hooks that receive `&mut View` run with the behavior taken out of its
/// node. They may freely edit the tree, including removing their own node.
pub trait ElementBehavior: Any + fmt::Debug {
    /// The kind name the factory creates this behavior for.
    fn kind(&self) -> &'static str;

    /// Whether nodes of this kind own a child container.
    fn has_children(&self) -> bool {
        false
    }

    /// Size used for axes the element has no explicit size for.
    fn default_size(&self) -> Size {
        Size::ZERO
    }

    /// Paint the node's content. The surface is clipped to the node and
    /// already carries the node opacity.
    fn draw(&self, ctx: &mut DrawContext<'_>) {
        ctx.draw_children(0.0, 0.0);
    }

    /// Handle an event that reached this element.
    fn on_event(&mut self, view: &mut View, id: ElementId, event: &ElementEvent) -> EventResult {
        let _ = (view, id, event);
        EventResult::Unhandled
    }

    /// Adjust the subtree after the node's own geometry was resolved and
    /// before its children are laid out.
    fn layout(&mut self, view: &mut View, id: ElementId) {
        let _ = (view, id);
    }

    /// Map a point from this element's space into `child`'s space.
    fn self_coord_to_child_coord(&self, child: &ElementNode, point: Point) -> Point {
        child.parent_coord_to_self_coord(point)
    }

    /// Map a point from `child`'s space into this element's space.
    fn child_coord_to_self_coord(&self, child: &ElementNode, point: Point) -> Point {
        child.self_coord_to_parent_coord(point)
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Drawing state handed to [`ElementBehavior::draw`].
pub struct DrawContext<'a> {
    /// Target surface, sized to the node.
    pub surface: &'a mut dyn Surface,
    /// The node being drawn.
    pub node: &'a ElementNode,
    /// Composite of the node's children, if any were drawn.
    pub children: Option<&'a dyn Surface>,
}

impl DrawContext<'_> {
    #[inline]
    pub fn width(&self) -> f64 {
        self.node.width()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.node.height()
    }

    /// Draw the children composite with its origin at `(x, y)`.
    pub fn draw_children(&mut self, x: f64, y: f64) {
        if let Some(children) = self.children {
            self.surface.draw_surface(x, y, children);
        }
    }
}
