//! Mutable access to a single element.

use gadget_core::GeometryValue;

use super::geometry::GeometryProperty;
use super::node::ElementNode;
use super::ElementId;
use crate::error::{ElementError, ViewResult};
use crate::event::{CursorType, FlipMode, HitTest};
use crate::view::View;

/// A mutable handle on one element of a view.
///
/// Setters return whether the value actually changed. Changes that affect
/// what is drawn request a redraw from the view.
pub struct ElementMut<'a> {
    view: &'a mut View,
    id: ElementId,
}

impl<'a> ElementMut<'a> {
    pub(crate) fn new(view: &'a mut View, id: ElementId) -> Self {
        Self { view, id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Read access to the node.
    pub fn node(&self) -> Option<&ElementNode> {
        self.view.element(self.id)
    }

    fn update(&mut self, f: impl FnOnce(&mut ElementNode) -> bool) -> bool {
        let changed = self.view.nodes.get_mut(self.id).is_some_and(f);
        if changed {
            self.view.queue_redraw();
        }
        changed
    }

    fn update_quiet(&mut self, f: impl FnOnce(&mut ElementNode) -> bool) -> bool {
        self.view.nodes.get_mut(self.id).is_some_and(f)
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Set a geometry property to a pixel or relative value.
    pub fn set_geometry(&mut self, property: GeometryProperty, value: GeometryValue) -> bool {
        self.update(|n| n.set_geometry(property, value))
    }

    /// Set a geometry property from text such as `"40"` or `"50%"`.
    ///
    /// Malformed text is logged and reported; the element is left unchanged.
    pub fn set_geometry_str(&mut self, property: GeometryProperty, text: &str) -> ViewResult<bool> {
        let parsed = text.parse::<GeometryValue>().and_then(|v| {
            if property.is_extent() {
                v.non_negative()
            } else {
                Ok(v)
            }
        });
        match parsed {
            Ok(value) => Ok(self.set_geometry(property, value)),
            Err(err) => {
                tracing::warn!(
                    target: "gadget::element",
                    id = ?self.id,
                    ?property,
                    text,
                    %err,
                    "invalid geometry value"
                );
                Err(err.into())
            }
        }
    }

    pub fn set_pixel_x(&mut self, x: f64) -> bool {
        self.set_geometry(GeometryProperty::X, GeometryValue::Pixel(x))
    }

    pub fn set_pixel_y(&mut self, y: f64) -> bool {
        self.set_geometry(GeometryProperty::Y, GeometryValue::Pixel(y))
    }

    pub fn set_relative_x(&mut self, x: f64) -> bool {
        self.set_geometry(GeometryProperty::X, GeometryValue::Relative(x))
    }

    pub fn set_relative_y(&mut self, y: f64) -> bool {
        self.set_geometry(GeometryProperty::Y, GeometryValue::Relative(y))
    }

    /// Set the width in pixels. Negative widths are ignored.
    pub fn set_pixel_width(&mut self, width: f64) -> bool {
        self.set_geometry(GeometryProperty::Width, GeometryValue::Pixel(width))
    }

    /// Set the height in pixels. Negative heights are ignored.
    pub fn set_pixel_height(&mut self, height: f64) -> bool {
        self.set_geometry(GeometryProperty::Height, GeometryValue::Pixel(height))
    }

    pub fn set_relative_width(&mut self, width: f64) -> bool {
        self.set_geometry(GeometryProperty::Width, GeometryValue::Relative(width))
    }

    pub fn set_relative_height(&mut self, height: f64) -> bool {
        self.set_geometry(GeometryProperty::Height, GeometryValue::Relative(height))
    }

    pub fn set_pixel_pin_x(&mut self, pin_x: f64) -> bool {
        self.set_geometry(GeometryProperty::PinX, GeometryValue::Pixel(pin_x))
    }

    pub fn set_pixel_pin_y(&mut self, pin_y: f64) -> bool {
        self.set_geometry(GeometryProperty::PinY, GeometryValue::Pixel(pin_y))
    }

    /// Pin as a fraction of the element's own width.
    pub fn set_relative_pin_x(&mut self, pin_x: f64) -> bool {
        self.set_geometry(GeometryProperty::PinX, GeometryValue::Relative(pin_x))
    }

    /// Pin as a fraction of the element's own height.
    pub fn set_relative_pin_y(&mut self, pin_y: f64) -> bool {
        self.set_geometry(GeometryProperty::PinY, GeometryValue::Relative(pin_y))
    }

    /// Set position and size in pixels at once.
    pub fn set_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> bool {
        let mut changed = self.set_pixel_x(x);
        changed |= self.set_pixel_y(y);
        changed |= self.set_pixel_width(width);
        changed |= self.set_pixel_height(height);
        changed
    }

    /// Rotation in degrees around the pin.
    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        self.update(|n| n.set_rotation(degrees))
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Opacity in `0.0..=1.0`; other values are ignored.
    pub fn set_opacity(&mut self, opacity: f64) -> bool {
        self.update(|n| n.set_opacity(opacity))
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        self.update(|n| n.set_visible(visible))
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.update(|n| n.set_enabled(enabled))
    }

    pub fn set_flip(&mut self, flip: FlipMode) -> bool {
        self.update(|n| n.set_flip(flip))
    }

    /// Load and set the mask image, or clear it with `None`.
    ///
    /// A mask that fails to load is logged and leaves the element unmasked.
    pub fn set_mask(&mut self, source: Option<&str>) -> bool {
        let mask = source.and_then(|name| self.view.load_mask(name));
        self.update(|n| n.set_mask(mask))
    }

    pub fn set_cursor(&mut self, cursor: CursorType) -> bool {
        self.update_quiet(|n| n.set_cursor(cursor))
    }

    pub fn set_tooltip(&mut self, tooltip: Option<&str>) -> bool {
        let tooltip = tooltip.map(str::to_owned);
        self.update_quiet(|n| n.set_tooltip(tooltip))
    }

    pub fn set_hittest(&mut self, hittest: HitTest) -> bool {
        self.update_quiet(|n| n.set_hittest(hittest))
    }

    pub fn set_drop_target(&mut self, drop_target: bool) -> bool {
        self.update_quiet(|n| n.set_drop_target(drop_target))
    }

    /// Rename the element, keeping the view's name table in sync.
    pub fn set_name(&mut self, name: Option<&str>) -> ViewResult<bool> {
        let id = self.id;
        let node = self
            .view
            .nodes
            .get_mut(id)
            .ok_or(ElementError::UnknownElement(id))?;
        let name = name.filter(|n| !n.is_empty()).map(str::to_owned);
        if node.name == name {
            return Ok(false);
        }
        let old = std::mem::replace(&mut node.name, name.clone());
        self.view.unregister_name(id, old.as_deref());
        self.view.register_name(id, name.as_deref());
        Ok(true)
    }

    /// Mark the element's painted content as stale.
    pub fn queue_draw(&mut self) {
        self.update(|n| {
            n.queue_draw();
            true
        });
    }
}
