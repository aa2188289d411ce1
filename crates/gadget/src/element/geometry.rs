//! Pixel-or-relative geometry storage and dirty tracking.

use gadget_core::GeometryValue;

/// One geometry axis value of an element (x, y, width, height, pin x or
/// pin y).
///
/// Both representations are stored. The authoritative one is selected by
/// `is_relative`; the other is re-derived during layout against the parent
/// extent of the moment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimension {
    pixel: f64,
    relative: f64,
    is_relative: bool,
    specified: bool,
}

impl Dimension {
    /// Current pixel value.
    #[inline]
    pub fn pixel(&self) -> f64 {
        self.pixel
    }

    /// Current relative value (fraction of the parent extent).
    #[inline]
    pub fn relative(&self) -> f64 {
        self.relative
    }

    /// Whether the relative value is authoritative.
    #[inline]
    pub fn is_relative(&self) -> bool {
        self.is_relative
    }

    /// Whether a value was ever set explicitly.
    #[inline]
    pub fn is_specified(&self) -> bool {
        self.specified
    }

    /// The authoritative value.
    pub fn value(&self) -> GeometryValue {
        if self.is_relative {
            GeometryValue::Relative(self.relative)
        } else {
            GeometryValue::Pixel(self.pixel)
        }
    }

    /// Make the pixel value authoritative. Returns whether anything changed.
    pub fn set_pixel(&mut self, pixel: f64) -> bool {
        if self.specified && !self.is_relative && self.pixel == pixel {
            return false;
        }
        self.pixel = pixel;
        self.is_relative = false;
        self.specified = true;
        true
    }

    /// Make the relative value authoritative. Returns whether anything
    /// changed. The pixel value follows at the next layout.
    pub fn set_relative(&mut self, relative: f64) -> bool {
        if self.specified && self.is_relative && self.relative == relative {
            return false;
        }
        self.relative = relative;
        self.is_relative = true;
        self.specified = true;
        true
    }

    /// Set either representation.
    pub fn set_value(&mut self, value: GeometryValue) -> bool {
        match value {
            GeometryValue::Pixel(v) => self.set_pixel(v),
            GeometryValue::Relative(v) => self.set_relative(v),
        }
    }

    /// Set a pixel value without marking the dimension as specified. Used
    /// for defaults supplied by the element kind.
    pub(crate) fn set_default_pixel(&mut self, pixel: f64) -> bool {
        if self.pixel == pixel {
            return false;
        }
        self.pixel = pixel;
        true
    }

    /// Re-derive the non-authoritative representation against
    /// `parent_extent`. Returns whether the pixel value changed.
    pub(crate) fn resolve(&mut self, parent_extent: f64) -> bool {
        if self.is_relative {
            let pixel = self.relative * parent_extent;
            if pixel == self.pixel {
                return false;
            }
            self.pixel = pixel;
            true
        } else {
            self.relative = if parent_extent > 0.0 {
                self.pixel / parent_extent
            } else {
                0.0
            };
            false
        }
    }
}

/// Per-node dirty flags, cleared at the end of every draw of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    /// Visibility toggled since the last draw.
    pub visibility: bool,
    /// Position, pin or rotation changed.
    pub position: bool,
    /// Size or painted content changed.
    pub content: bool,
}

impl DirtyFlags {
    pub const CLEAN: Self = Self {
        visibility: false,
        position: false,
        content: false,
    };

    pub const ALL: Self = Self {
        visibility: true,
        position: true,
        content: true,
    };

    /// Whether any flag is set.
    pub fn any(&self) -> bool {
        self.visibility || self.position || self.content
    }

    pub fn clear(&mut self) {
        *self = Self::CLEAN;
    }
}

/// Geometry properties settable from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryProperty {
    X,
    Y,
    Width,
    Height,
    PinX,
    PinY,
}

impl GeometryProperty {
    /// Whether negative values are rejected.
    pub fn is_extent(self) -> bool {
        matches!(self, Self::Width | Self::Height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_value_is_not_a_change() {
        let mut d = Dimension::default();
        assert!(!d.is_specified());
        assert!(d.set_pixel(0.0));
        assert!(d.is_specified());
        assert!(!d.set_pixel(0.0));
        assert!(d.set_relative(0.0));
        assert!(!d.set_relative(0.0));
    }

    #[test]
    fn test_resolve_relative() {
        let mut d = Dimension::default();
        d.set_relative(0.25);
        assert!(d.resolve(200.0));
        assert_eq!(d.pixel(), 50.0);
        assert!(!d.resolve(200.0));
        assert!(d.resolve(100.0));
        assert_eq!(d.pixel(), 25.0);
    }

    #[test]
    fn test_resolve_pixel_derives_relative() {
        let mut d = Dimension::default();
        d.set_pixel(30.0);
        assert!(!d.resolve(120.0));
        assert_eq!(d.relative(), 0.25);
        assert_eq!(d.value(), GeometryValue::Pixel(30.0));
        assert!(!d.resolve(0.0));
        assert_eq!(d.relative(), 0.0);
    }

    #[test]
    fn test_default_pixel_keeps_unspecified() {
        let mut d = Dimension::default();
        assert!(d.set_default_pixel(16.0));
        assert!(!d.set_default_pixel(16.0));
        assert!(!d.is_specified());
        assert_eq!(d.pixel(), 16.0);
    }

    #[test]
    fn test_dirty_flags() {
        let mut flags = DirtyFlags::ALL;
        assert!(flags.any());
        flags.clear();
        assert_eq!(flags, DirtyFlags::CLEAN);
        assert!(!flags.any());
    }
}
