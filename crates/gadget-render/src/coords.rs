//! Coordinate conversion between parent and child element spaces.
//!
//! A child element is placed in its parent at `pos`, rotated by `rotation`
//! (radians, clockwise in y-down space) around its `pin`, which is expressed
//! in the child's own coordinates. The mapping from child to parent space is
//!
//! ```text
//! parent = R(rotation) * (child - pin) + pos
//! ```
//!
//! and the functions here evaluate it and its inverse in closed form.
//!
//! # Example
//!
//! ```
//! use gadget_render::coords::{child_coord_to_parent_coord, parent_coord_to_child_coord};
//! use gadget_render::Point;
//!
//! let pos = Point::new(40.0, 50.0);
//! let pin = Point::new(3.0, 4.0);
//! let rotation = 30f64.to_radians();
//!
//! let child = parent_coord_to_child_coord(Point::new(45.0, 52.0), pos, pin, rotation);
//! let parent = child_coord_to_parent_coord(child, pos, pin, rotation);
//! assert!((parent.x - 45.0).abs() < 1e-8);
//! assert!((parent.y - 52.0).abs() < 1e-8);
//! ```

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::types::{Point, Rect, Size};

/// Convert degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Convert a point in parent space to the child's space.
#[inline]
pub fn parent_coord_to_child_coord(parent: Point, child_pos: Point, pin: Point, rotation: f64) -> Point {
    ChildCoordCalculator::new(child_pos, pin, rotation).convert(parent)
}

/// Convert a point in child space to the parent's space.
#[inline]
pub fn child_coord_to_parent_coord(child: Point, child_pos: Point, pin: Point, rotation: f64) -> Point {
    ParentCoordCalculator::new(child_pos, pin, rotation).convert(child)
}

/// Parent-to-child conversion with the trigonometry precomputed.
///
/// Useful when many points are mapped through the same child, e.g. while
/// rasterizing or while testing several mouse positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildCoordCalculator {
    sin: f64,
    cos: f64,
    a13: f64,
    a23: f64,
}

impl ChildCoordCalculator {
    pub fn new(child_pos: Point, pin: Point, rotation: f64) -> Self {
        let (sin, cos) = rotation.sin_cos();
        Self {
            sin,
            cos,
            a13: pin.x - child_pos.y * sin - child_pos.x * cos,
            a23: pin.y + child_pos.x * sin - child_pos.y * cos,
        }
    }

    #[inline]
    pub fn child_x(&self, parent: Point) -> f64 {
        parent.x * self.cos + parent.y * self.sin + self.a13
    }

    #[inline]
    pub fn child_y(&self, parent: Point) -> f64 {
        parent.y * self.cos - parent.x * self.sin + self.a23
    }

    #[inline]
    pub fn convert(&self, parent: Point) -> Point {
        Point::new(self.child_x(parent), self.child_y(parent))
    }
}

/// Child-to-parent conversion with the trigonometry precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentCoordCalculator {
    sin: f64,
    cos: f64,
    pos: Point,
    pin: Point,
}

impl ParentCoordCalculator {
    pub fn new(child_pos: Point, pin: Point, rotation: f64) -> Self {
        let (sin, cos) = rotation.sin_cos();
        Self {
            sin,
            cos,
            pos: child_pos,
            pin,
        }
    }

    #[inline]
    pub fn parent_x(&self, child: Point) -> f64 {
        (child.x - self.pin.x) * self.cos - (child.y - self.pin.y) * self.sin + self.pos.x
    }

    #[inline]
    pub fn parent_y(&self, child: Point) -> f64 {
        (child.x - self.pin.x) * self.sin + (child.y - self.pin.y) * self.cos + self.pos.y
    }

    #[inline]
    pub fn convert(&self, child: Point) -> Point {
        Point::new(self.parent_x(child), self.parent_y(child))
    }
}

/// Right and bottom edges, in parent space, of a child's rotated box.
///
/// Only two corners are transformed: the one that ends up rightmost and the
/// one that ends up bottommost. Which corners those are depends only on the
/// quadrant of the rotation.
pub fn get_child_extent_in_parent(child_pos: Point, pin: Point, size: Size, rotation: f64) -> (f64, f64) {
    let (w, h) = (size.width, size.height);
    let r = rotation - TAU * (rotation / TAU).round();

    let (right, bottom) = if (0.0..=FRAC_PI_2).contains(&r) {
        (Point::new(w, 0.0), Point::new(w, h))
    } else if r > FRAC_PI_2 {
        (Point::ZERO, Point::new(w, 0.0))
    } else if r >= -FRAC_PI_2 {
        (Point::new(w, h), Point::new(0.0, h))
    } else {
        (Point::new(0.0, h), Point::ZERO)
    };

    let calc = ParentCoordCalculator::new(child_pos, pin, rotation);
    (calc.parent_x(right), calc.parent_y(bottom))
}

/// Cheap upper bound of [`get_child_extent_in_parent`] for any rotation.
///
/// Every corner lies within `max(pin.x, w - pin.x)` horizontally and
/// `max(pin.y, h - pin.y)` vertically of the pin, so after any rotation its
/// offset from `child_pos` along either axis is at most the sum of the two.
pub fn estimate_child_extent_in_parent(child_pos: Point, pin: Point, size: Size) -> (f64, f64) {
    let reach_x = pin.x.abs().max((size.width - pin.x).abs());
    let reach_y = pin.y.abs().max((size.height - pin.y).abs());
    let reach = reach_x + reach_y;
    (child_pos.x + reach, child_pos.y + reach)
}

/// Half-open containment test in an element's own space.
#[inline]
pub fn is_point_in_element(x: f64, y: f64, width: f64, height: f64) -> bool {
    x >= 0.0 && y >= 0.0 && x < width && y < height
}

/// Axis-aligned bounding box of a quadrilateral given as four `(x, y)` pairs.
pub fn get_rectangle_extents(r: &[f64; 8]) -> Rect {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for corner in r.chunks_exact(2) {
        min.x = min.x.min(corner[0]);
        min.y = min.y.min(corner[1]);
        max.x = max.x.max(corner[0]);
        max.y = max.y.max(corner[1]);
    }
    Rect::from_corners(min, max)
}

/// Whether two rectangles overlap. Touching edges do not count.
#[inline]
pub fn rectangles_overlapped(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && b.left() < a.right() && a.top() < b.bottom() && b.top() < a.bottom()
}

/// Bounding box of two rectangles.
#[inline]
pub fn get_two_rectangles_extents(a: &Rect, b: &Rect) -> Rect {
    a.union(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-8;

    #[test]
    fn test_unrotated_is_translation() {
        let child = parent_coord_to_child_coord(
            Point::new(50.0, 60.0),
            Point::new(40.0, 50.0),
            Point::new(3.0, 4.0),
            0.0,
        );
        assert_eq!(child, Point::new(13.0, 14.0));
    }

    #[test]
    fn test_quarter_turn_maps_axes() {
        // Rotating a child by +90 degrees maps its +x axis to the parent's +y.
        let parent = child_coord_to_parent_coord(
            Point::new(1.0, 0.0),
            Point::ZERO,
            Point::ZERO,
            FRAC_PI_2,
        );
        assert!((parent.x - 0.0).abs() < EPS);
        assert!((parent.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_calculators_agree_with_free_functions() {
        let pos = Point::new(-7.0, 11.5);
        let pin = Point::new(2.0, 9.0);
        let rot = degrees_to_radians(123.0);
        let p = Point::new(3.5, -8.0);
        let calc = ChildCoordCalculator::new(pos, pin, rot);
        assert_eq!(calc.convert(p), parent_coord_to_child_coord(p, pos, pin, rot));
    }

    #[test]
    fn test_extent_unrotated() {
        let size = Size::new(7.0, 8.0);
        let ext = get_child_extent_in_parent(Point::new(40.0, 50.0), Point::ZERO, size, 0.0);
        assert_eq!(ext, (47.0, 58.0));
        let ext = get_child_extent_in_parent(Point::new(40.0, 50.0), Point::new(3.0, 4.0), size, 0.0);
        assert_eq!(ext, (44.0, 54.0));
    }

    #[test]
    fn test_extent_matches_corner_scan() {
        let pos = Point::new(20.0, 30.0);
        let pin = Point::new(2.0, 5.0);
        let size = Size::new(10.0, 6.0);
        for deg in (-720..=720).step_by(15) {
            let rot = degrees_to_radians(f64::from(deg));
            let calc = ParentCoordCalculator::new(pos, pin, rot);
            let corners = [
                calc.convert(Point::ZERO),
                calc.convert(Point::new(size.width, 0.0)),
                calc.convert(Point::new(0.0, size.height)),
                calc.convert(Point::new(size.width, size.height)),
            ];
            let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
            let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
            let (x, y) = get_child_extent_in_parent(pos, pin, size, rot);
            assert!((x - max_x).abs() < EPS, "x at {deg} degrees");
            assert!((y - max_y).abs() < EPS, "y at {deg} degrees");

            let (ex, ey) = estimate_child_extent_in_parent(pos, pin, size);
            assert!(ex >= x - EPS && ey >= y - EPS, "estimate at {deg} degrees");
        }
    }

    #[test]
    fn test_point_in_element() {
        assert!(is_point_in_element(0.0, 0.0, 10.0, 5.0));
        assert!(!is_point_in_element(10.0, 5.0, 10.0, 5.0));
        assert!(!is_point_in_element(-0.1, 1.0, 10.0, 5.0));
        assert!(!is_point_in_element(1.0, -0.1, 10.0, 5.0));
    }

    #[test]
    fn test_rectangle_extents() {
        let r = [10.0, 0.0, 20.0, 10.0, 10.0, 20.0, 0.0, 10.0];
        assert_eq!(get_rectangle_extents(&r), Rect::new(0.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_rectangles_overlapped() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rectangles_overlapped(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!rectangles_overlapped(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!rectangles_overlapped(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert_eq!(
            get_two_rectangles_extents(&a, &Rect::new(20.0, -5.0, 1.0, 1.0)),
            Rect::new(0.0, -5.0, 21.0, 15.0)
        );
    }
}
