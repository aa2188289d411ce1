//! The element node: geometry, presentation and cached render state.

use std::fmt;

use gadget_core::GeometryValue;
use gadget_render::coords::{
    child_coord_to_parent_coord, degrees_to_radians, get_child_extent_in_parent,
    is_point_in_element, parent_coord_to_child_coord,
};
use gadget_render::{Color, Image, Point, Size, Surface, flip_transform};

use super::behavior::ElementBehavior;
use super::geometry::{Dimension, DirtyFlags, GeometryProperty};
use super::{ContainerId, ElementId};
use crate::container::Elements;
use crate::event::{CursorType, FlipMode, HitTest};

const ELEMENT_TARGET: &str = gadget_core::logging::targets::ELEMENT;

/// One visual node of the element tree.
///
/// The node holds everything the shared machinery needs: geometry in both
/// pixel and relative form, presentation attributes, dirty flags, the cached
/// canvas and, for container kinds, the child [`Elements`]. Kind specific
/// painting and input handling live in the node's [`ElementBehavior`].
pub struct ElementNode {
    pub(crate) id: ElementId,
    kind: String,
    pub(crate) name: Option<String>,
    pub(crate) parent: ContainerId,

    x: Dimension,
    y: Dimension,
    width: Dimension,
    height: Dimension,
    pin_x: Dimension,
    pin_y: Dimension,
    rotation: f64,
    opacity: f64,
    visible: bool,
    enabled: bool,
    flip: FlipMode,
    mask: Option<Image>,
    cursor: CursorType,
    tooltip: Option<String>,
    hittest: HitTest,
    drop_target: bool,

    pub(crate) dirty: DirtyFlags,
    pub(crate) canvas: Option<Box<dyn Surface>>,
    /// Whether the last draw left visible pixels in `canvas`.
    pub(crate) had_content: bool,
    pub(crate) allocation_failed: bool,
    pub(crate) debug_color: Color,

    pub(crate) children: Option<Elements>,
    /// Taken out while one of its hooks runs.
    pub(crate) behavior: Option<Box<dyn ElementBehavior>>,
}

impl fmt::Debug for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementNode")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("x", &self.x.pixel())
            .field("y", &self.y.pixel())
            .field("width", &self.width.pixel())
            .field("height", &self.height.pixel())
            .field("visible", &self.visible)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl ElementNode {
    pub(crate) fn new(
        id: ElementId,
        parent: ContainerId,
        name: Option<String>,
        behavior: Box<dyn ElementBehavior>,
        debug_color: Color,
    ) -> Self {
        let children = behavior.has_children().then(|| Elements::new(Some(id)));
        Self {
            id,
            kind: behavior.kind().to_string(),
            name,
            parent,
            x: Dimension::default(),
            y: Dimension::default(),
            width: Dimension::default(),
            height: Dimension::default(),
            pin_x: Dimension::default(),
            pin_y: Dimension::default(),
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            enabled: true,
            flip: FlipMode::NONE,
            mask: None,
            cursor: CursorType::Arrow,
            tooltip: None,
            hittest: HitTest::Client,
            drop_target: false,
            dirty: DirtyFlags::ALL,
            canvas: None,
            had_content: false,
            allocation_failed: false,
            debug_color,
            children,
            behavior: Some(behavior),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The element kind, e.g. `"button"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The container this node lives in.
    pub fn parent(&self) -> ContainerId {
        self.parent
    }

    /// The parent element, `None` for top-level elements.
    pub fn parent_element(&self) -> Option<ElementId> {
        match self.parent {
            ContainerId::View => None,
            ContainerId::Element(id) => Some(id),
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[inline]
    pub fn x(&self) -> f64 {
        self.x.pixel()
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y.pixel()
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width.pixel()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height.pixel()
    }

    #[inline]
    pub fn pin_x(&self) -> f64 {
        self.pin_x.pixel()
    }

    #[inline]
    pub fn pin_y(&self) -> f64 {
        self.pin_y.pixel()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x(), self.y())
    }

    pub fn pin(&self) -> Point {
        Point::new(self.pin_x(), self.pin_y())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Full storage of one geometry property.
    pub fn dimension(&self, property: GeometryProperty) -> &Dimension {
        match property {
            GeometryProperty::X => &self.x,
            GeometryProperty::Y => &self.y,
            GeometryProperty::Width => &self.width,
            GeometryProperty::Height => &self.height,
            GeometryProperty::PinX => &self.pin_x,
            GeometryProperty::PinY => &self.pin_y,
        }
    }

    /// Rotation in degrees, clockwise.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation in radians.
    pub fn rotation_radians(&self) -> f64 {
        degrees_to_radians(self.rotation)
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn flip(&self) -> FlipMode {
        self.flip
    }

    pub fn mask(&self) -> Option<&Image> {
        self.mask.as_ref()
    }

    pub fn cursor(&self) -> CursorType {
        self.cursor
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn hittest(&self) -> HitTest {
        self.hittest
    }

    pub fn is_drop_target(&self) -> bool {
        self.drop_target
    }

    // =========================================================================
    // Render state
    // =========================================================================

    /// Dirty flags accumulated since the last draw.
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// The cached canvas, if one was drawn.
    pub fn canvas(&self) -> Option<&dyn Surface> {
        self.canvas.as_deref()
    }

    /// Whether the last canvas allocation failed.
    pub fn allocation_failed(&self) -> bool {
        self.allocation_failed
    }

    /// The child container, for container kinds.
    pub fn children(&self) -> Option<&Elements> {
        self.children.as_ref()
    }

    /// Whether the node paints anything at all.
    pub fn contributes(&self) -> bool {
        self.visible && self.opacity > 0.0 && self.width() > 0.0 && self.height() > 0.0
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Map a point from the parent's space into this node's space.
    pub fn parent_coord_to_self_coord(&self, parent: Point) -> Point {
        parent_coord_to_child_coord(parent, self.position(), self.pin(), self.rotation_radians())
    }

    /// Map a point from this node's space into the parent's space.
    pub fn self_coord_to_parent_coord(&self, local: Point) -> Point {
        child_coord_to_parent_coord(local, self.position(), self.pin(), self.rotation_radians())
    }

    /// Mirror a local point according to the flip mode. The mapping is its
    /// own inverse.
    pub fn mirror_point(&self, local: Point) -> Point {
        if !self.flip.is_flipped() {
            return local;
        }
        flip_transform(self.width(), self.height(), self.flip.horizontal, self.flip.vertical)
            .transform_point(local)
    }

    /// Whether a local point hits this node. Fully transparent mask pixels
    /// are not part of the node.
    pub fn is_point_in(&self, local: Point) -> bool {
        if !is_point_in_element(local.x, local.y, self.width(), self.height()) {
            return false;
        }
        match &self.mask {
            Some(mask) => mask.point_value(local.x, local.y).is_some_and(|c| c.a > 0.0),
            None => true,
        }
    }

    /// Right and bottom edges of the rotated box in parent space.
    pub fn extent_in_parent(&self) -> (f64, f64) {
        get_child_extent_in_parent(self.position(), self.pin(), self.size(), self.rotation_radians())
    }

    // =========================================================================
    // Setters (change detecting, return whether anything changed)
    // =========================================================================

    pub(crate) fn set_geometry(&mut self, property: GeometryProperty, value: GeometryValue) -> bool {
        if property.is_extent() {
            let negative = match value {
                GeometryValue::Pixel(v) | GeometryValue::Relative(v) => v < 0.0,
            };
            if negative {
                tracing::debug!(target: ELEMENT_TARGET, id = ?self.id, ?property, %value, "negative extent ignored");
                return false;
            }
        }
        let changed = match property {
            GeometryProperty::X => self.x.set_value(value),
            GeometryProperty::Y => self.y.set_value(value),
            GeometryProperty::Width => self.width.set_value(value),
            GeometryProperty::Height => self.height.set_value(value),
            GeometryProperty::PinX => self.pin_x.set_value(value),
            GeometryProperty::PinY => self.pin_y.set_value(value),
        };
        if changed {
            if property.is_extent() {
                self.size_changed();
            } else {
                self.dirty.position = true;
            }
        }
        changed
    }

    /// Size changes invalidate the canvas; its pixel size depends on them.
    fn size_changed(&mut self) {
        self.dirty.content = true;
        self.canvas = None;
        self.allocation_failed = false;
    }

    pub(crate) fn set_rotation(&mut self, degrees: f64) -> bool {
        if !degrees.is_finite() {
            tracing::debug!(target: ELEMENT_TARGET, id = ?self.id, degrees, "non-finite rotation ignored");
            return false;
        }
        if self.rotation == degrees {
            return false;
        }
        self.rotation = degrees;
        self.dirty.position = true;
        true
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) -> bool {
        if !(0.0..=1.0).contains(&opacity) {
            tracing::debug!(target: ELEMENT_TARGET, id = ?self.id, opacity, "opacity out of range ignored");
            return false;
        }
        if self.opacity == opacity {
            return false;
        }
        self.opacity = opacity;
        self.dirty.content = true;
        true
    }

    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        self.dirty.visibility = true;
        true
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        // Widgets paint their disabled state differently.
        self.dirty.content = true;
        true
    }

    pub(crate) fn set_flip(&mut self, flip: FlipMode) -> bool {
        if self.flip == flip {
            return false;
        }
        self.flip = flip;
        self.dirty.content = true;
        true
    }

    pub(crate) fn set_mask(&mut self, mask: Option<Image>) -> bool {
        let same = match (&self.mask, &mask) {
            (None, None) => true,
            (Some(a), Some(b)) => a.tag() == b.tag(),
            _ => false,
        };
        if same {
            return false;
        }
        self.mask = mask;
        self.dirty.content = true;
        true
    }

    pub(crate) fn set_cursor(&mut self, cursor: CursorType) -> bool {
        let changed = self.cursor != cursor;
        self.cursor = cursor;
        changed
    }

    pub(crate) fn set_tooltip(&mut self, tooltip: Option<String>) -> bool {
        let changed = self.tooltip != tooltip;
        self.tooltip = tooltip;
        changed
    }

    pub(crate) fn set_hittest(&mut self, hittest: HitTest) -> bool {
        let changed = self.hittest != hittest;
        self.hittest = hittest;
        changed
    }

    pub(crate) fn set_drop_target(&mut self, drop_target: bool) -> bool {
        let changed = self.drop_target != drop_target;
        self.drop_target = drop_target;
        changed
    }

    /// Mark the painted content as stale.
    pub(crate) fn queue_draw(&mut self) {
        self.dirty.content = true;
    }

    /// Force a full redraw of this node.
    pub(crate) fn mark_redraw(&mut self) {
        self.dirty = DirtyFlags::ALL;
        if let Some(children) = &mut self.children {
            children.structure_changed = true;
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Re-derive geometry against the parent extent, in the order size,
    /// position, pin. Only real numeric changes set dirty flags.
    pub(crate) fn resolve_geometry(&mut self, parent: Size, default_size: Size) {
        let mut size_changed = false;
        size_changed |= Self::resolve_extent(&mut self.width, parent.width, default_size.width);
        size_changed |= Self::resolve_extent(&mut self.height, parent.height, default_size.height);
        if size_changed {
            self.size_changed();
        }

        let mut moved = self.x.resolve(parent.width);
        moved |= self.y.resolve(parent.height);
        let own = self.size();
        moved |= self.pin_x.resolve(own.width);
        moved |= self.pin_y.resolve(own.height);
        if moved {
            self.dirty.position = true;
        }
    }

    fn resolve_extent(d: &mut Dimension, parent: f64, default: f64) -> bool {
        if d.is_specified() {
            d.resolve(parent)
        } else {
            d.set_default_pixel(default.max(0.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Div;
    use slotmap::KeyData;

    fn node() -> ElementNode {
        let id = ElementId::from(KeyData::from_ffi(1));
        ElementNode::new(id, ContainerId::View, None, Box::new(Div::new()), Color::BLACK)
    }

    #[test]
    fn test_new_node_is_dirty_and_visible() {
        let n = node();
        assert!(n.dirty().any());
        assert!(n.is_visible());
        assert!(n.is_enabled());
        assert_eq!(n.opacity(), 1.0);
        assert_eq!(n.kind(), "div");
        assert!(n.children().is_some());
    }

    #[test]
    fn test_size_change_drops_canvas() {
        let mut n = node();
        n.canvas = Some(Box::new(gadget_render::SoftwareSurface::new(4, 4)));
        n.dirty.clear();
        assert!(n.set_geometry(GeometryProperty::Width, GeometryValue::Pixel(10.0)));
        assert!(n.canvas().is_none());
        assert!(n.dirty().content);
        assert!(!n.dirty().position);
    }

    #[test]
    fn test_position_change_keeps_canvas() {
        let mut n = node();
        n.canvas = Some(Box::new(gadget_render::SoftwareSurface::new(4, 4)));
        n.dirty.clear();
        assert!(n.set_geometry(GeometryProperty::PinX, GeometryValue::Pixel(2.0)));
        assert!(n.canvas().is_some());
        assert!(n.dirty().position);
        assert!(!n.dirty().content);
    }

    #[test]
    fn test_rejected_values() {
        let mut n = node();
        assert!(!n.set_geometry(GeometryProperty::Width, GeometryValue::Pixel(-1.0)));
        assert!(!n.set_opacity(1.5));
        assert!(!n.set_rotation(f64::NAN));
        assert!(!n.set_opacity(1.0));
        assert!(n.set_opacity(0.5));
    }

    #[test]
    fn test_resolve_geometry_order() {
        let mut n = node();
        n.set_geometry(GeometryProperty::Width, GeometryValue::Relative(0.5));
        n.set_geometry(GeometryProperty::Height, GeometryValue::Pixel(10.0));
        n.set_geometry(GeometryProperty::X, GeometryValue::Relative(0.25));
        n.set_geometry(GeometryProperty::PinX, GeometryValue::Relative(0.5));
        n.dirty.clear();

        n.resolve_geometry(Size::new(200.0, 100.0), Size::ZERO);
        assert_eq!(n.width(), 100.0);
        assert_eq!(n.x(), 50.0);
        // The pin follows the freshly resolved width.
        assert_eq!(n.pin_x(), 50.0);
        assert!(n.dirty().content);
        assert!(n.dirty().position);

        n.dirty.clear();
        n.resolve_geometry(Size::new(200.0, 100.0), Size::ZERO);
        assert!(!n.dirty().any());
    }

    #[test]
    fn test_unspecified_size_uses_default() {
        let mut n = node();
        n.dirty.clear();
        n.resolve_geometry(Size::new(200.0, 100.0), Size::new(16.0, 12.0));
        assert_eq!(n.size(), Size::new(16.0, 12.0));
        assert!(n.dirty().content);
    }

    #[test]
    fn test_mirror_point() {
        let mut n = node();
        n.set_geometry(GeometryProperty::Width, GeometryValue::Pixel(10.0));
        n.set_geometry(GeometryProperty::Height, GeometryValue::Pixel(4.0));
        n.resolve_geometry(Size::new(100.0, 100.0), Size::ZERO);
        assert_eq!(n.mirror_point(Point::new(2.0, 1.0)), Point::new(2.0, 1.0));
        n.set_flip(FlipMode::HORIZONTAL);
        assert_eq!(n.mirror_point(Point::new(2.0, 1.0)), Point::new(8.0, 1.0));
        n.set_flip(FlipMode::BOTH);
        assert_eq!(n.mirror_point(Point::new(2.0, 1.0)), Point::new(8.0, 3.0));
    }
}
