//! Basic geometry and color types for rendering.
//!
//! Geometry is kept in `f64` because element positions, pins and rotations
//! flow through the coordinate utilities, which must round-trip exactly.

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Convert to a glam DVec2.
    #[inline]
    pub fn to_dvec2(self) -> glam::DVec2 {
        glam::DVec2::new(self.x, self.y)
    }

    /// Create from a glam DVec2.
    #[inline]
    pub fn from_dvec2(v: glam::DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_squared(self, other: Point) -> f64 {
        self.to_dvec2().distance_squared(other.to_dvec2())
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<glam::DVec2> for Point {
    fn from(v: glam::DVec2) -> Self {
        Self::from_dvec2(v)
    }
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
        }
    }
}

/// A rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle from two corners (min and max points).
    #[inline]
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Get the left edge.
    #[inline]
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    /// Get the top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Get the right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Get the bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Get the width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Get the height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    #[inline]
    pub fn bottom_left(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }

    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Check if the rectangle is empty (zero or negative size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Check if a point is inside the rectangle (half-open on the far edges).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Compute the union (bounding box) of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Offset the rectangle by the given amount.
    #[inline]
    pub fn offset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            self.size.width,
            self.size.height,
        )
    }

    /// Snap the rectangle to whole pixels.
    ///
    /// With `expand` the result is the smallest integer rectangle enclosing
    /// this one. Otherwise each edge is rounded to the nearest integer.
    pub fn integerize(&self, expand: bool) -> Rect {
        let (left, top, right, bottom) = if expand {
            (
                self.left().floor(),
                self.top().floor(),
                self.right().ceil(),
                self.bottom().ceil(),
            )
        } else {
            (
                self.left().round(),
                self.top().round(),
                self.right().round(),
                self.bottom().round(),
            )
        };
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// An RGBA color with premultiplied alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from premultiplied RGBA components (0.0-1.0 range).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from non-premultiplied RGBA components.
    #[inline]
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r * a,
            g: g * a,
            b: b * a,
            a,
        }
    }

    /// Create a color from 8-bit non-premultiplied RGBA components.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque color from 8-bit RGB components.
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "#FF0000FF").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let len = hex.len();

        if (len != 6 && len != 8) || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        let a = if len == 8 {
            u8::from_str_radix(&hex[6..8], 16).ok()?
        } else {
            255
        };

        Some(Self::from_rgba8(r, g, b, a))
    }

    /// Scale every channel, which scales opacity for premultiplied colors.
    #[inline]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a * factor,
        }
    }

    /// Composite `self` over `dst` (premultiplied source-over).
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let inv = 1.0 - self.a;
        Self {
            r: self.r + dst.r * inv,
            g: self.g + dst.g * inv,
            b: self.b + dst.b * inv,
            a: self.a + dst.a * inv,
        }
    }

    /// Convert to an array [r, g, b, a].
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from an array [r, g, b, a].
    #[inline]
    pub fn from_array([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }

    // Common colors
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::from_rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::from_rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::from_rgb(0.0, 0.0, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.99, 9.99)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
        assert!(!r.contains(Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_rect_intersect_and_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 15.0));

        let touching = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert_eq!(a.intersect(&touching), None);
    }

    #[test]
    fn test_integerize() {
        let r = Rect::new(0.4, 1.6, 2.2, 3.0);
        assert_eq!(r.integerize(true), Rect::new(0.0, 1.0, 3.0, 4.0));
        assert_eq!(r.integerize(false), Rect::new(0.0, 2.0, 3.0, 3.0));
    }

    #[test]
    fn test_color_premultiplied() {
        let c = Color::from_rgba(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c, Color::new(0.5, 0.25, 0.0, 0.5));
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("#nothex"), None);
    }

    #[test]
    fn test_color_over() {
        let half_red = Color::from_rgba(1.0, 0.0, 0.0, 0.5);
        let out = half_red.over(Color::BLUE);
        assert_eq!(out, Color::new(0.5, 0.0, 0.5, 1.0));
        assert_eq!(Color::TRANSPARENT.over(Color::GREEN), Color::GREEN);
    }
}
