//! 2D affine transformations.

use crate::types::{Point, Rect};

/// A 2D affine transformation matrix.
///
/// Stored as a 3x2 matrix in column-major order:
/// ```text
/// | m00 m10 m20 |   | scale_x  skew_x   translate_x |
/// | m01 m11 m21 | = | skew_y   scale_y  translate_y |
/// ```
///
/// Builder methods (`translated`, `rotated`, `scaled_xy`) post-multiply,
/// which matches canvas semantics: the most recently applied operation acts
/// first on drawn coordinates.
///
/// # Examples
///
/// ```
/// use gadget_render::{Transform2D, Point};
///
/// // Place a child at (100, 50), rotate it 90 degrees around its pin (10, 0).
/// let transform = Transform2D::IDENTITY
///     .translated(100.0, 50.0)
///     .rotated(std::f64::consts::FRAC_PI_2)
///     .translated(-10.0, 0.0);
///
/// // The pin itself lands on the child position.
/// let p = transform.transform_point(Point::new(10.0, 0.0));
/// assert!((p.x - 100.0).abs() < 1e-9);
/// assert!((p.y - 50.0).abs() < 1e-9);
///
/// let back = transform.inverse().unwrap().transform_point(p);
/// assert!((back.x - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Matrix elements in column-major order.
    m: [f64; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform (no transformation).
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Create a transform from raw matrix elements.
    ///
    /// Elements are in the order: m00, m01, m10, m11, m20, m21
    #[inline]
    pub const fn from_matrix(m00: f64, m01: f64, m10: f64, m11: f64, m20: f64, m21: f64) -> Self {
        Self {
            m: [m00, m01, m10, m11, m20, m21],
        }
    }

    /// Create a translation transform.
    #[inline]
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, tx, ty],
        }
    }

    /// Create a non-uniform scaling transform.
    #[inline]
    pub const fn scale_xy(sx: f64, sy: f64) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Create a rotation transform (angle in radians, clockwise in y-down space).
    #[inline]
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [cos, sin, -sin, cos, 0.0, 0.0],
        }
    }

    /// Concatenate this transform with another (self * other).
    ///
    /// The resulting transform first applies `other`, then `self`.
    #[inline]
    pub fn then(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        Self {
            m: [
                a[0] * b[0] + a[2] * b[1],
                a[1] * b[0] + a[3] * b[1],
                a[0] * b[2] + a[2] * b[3],
                a[1] * b[2] + a[3] * b[3],
                a[0] * b[4] + a[2] * b[5] + a[4],
                a[1] * b[4] + a[3] * b[5] + a[5],
            ],
        }
    }

    /// Apply a translation to this transform.
    #[inline]
    pub fn translated(&self, tx: f64, ty: f64) -> Self {
        self.then(&Self::translate(tx, ty))
    }

    /// Apply a non-uniform scale to this transform.
    #[inline]
    pub fn scaled_xy(&self, sx: f64, sy: f64) -> Self {
        self.then(&Self::scale_xy(sx, sy))
    }

    /// Apply a rotation to this transform.
    #[inline]
    pub fn rotated(&self, angle: f64) -> Self {
        self.then(&Self::rotate(angle))
    }

    /// Transform a point.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.m[0] * p.x + self.m[2] * p.y + self.m[4],
            y: self.m[1] * p.x + self.m[3] * p.y + self.m[5],
        }
    }

    /// Compute the inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-12 {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Self {
            m: [
                self.m[3] * inv_det,
                -self.m[1] * inv_det,
                -self.m[2] * inv_det,
                self.m[0] * inv_det,
                (self.m[2] * self.m[5] - self.m[3] * self.m[4]) * inv_det,
                (self.m[1] * self.m[4] - self.m[0] * self.m[5]) * inv_det,
            ],
        })
    }

    /// Get the translation component.
    #[inline]
    pub fn translation(&self) -> (f64, f64) {
        (self.m[4], self.m[5])
    }

    /// Get the determinant of the transform matrix.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m[0] * self.m[3] - self.m[1] * self.m[2]
    }

    /// Check if this is the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Check if this transform only contains translation.
    #[inline]
    pub fn is_translation_only(&self) -> bool {
        self.m[0] == 1.0 && self.m[1] == 0.0 && self.m[2] == 0.0 && self.m[3] == 1.0
    }

    /// Get the raw matrix elements.
    #[inline]
    pub fn as_array(&self) -> &[f64; 6] {
        &self.m
    }

    /// Convert to a glam affine transform.
    #[inline]
    pub fn to_daffine2(&self) -> glam::DAffine2 {
        glam::DAffine2::from_cols_array(&self.m)
    }

    /// Create from a glam affine transform.
    #[inline]
    pub fn from_daffine2(affine: glam::DAffine2) -> Self {
        Self {
            m: affine.to_cols_array(),
        }
    }

    /// Transform a rectangle's bounding box.
    ///
    /// Returns the axis-aligned bounding box of the transformed rectangle,
    /// which is larger than the original if rotation is involved.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.transform_point(rect.top_left()),
            self.transform_point(rect.top_right()),
            self.transform_point(rect.bottom_left()),
            self.transform_point(rect.bottom_right()),
        ];

        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = corners
            .iter()
            .map(|p| p.x)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max);

        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

impl From<glam::DAffine2> for Transform2D {
    fn from(affine: glam::DAffine2) -> Self {
        Self::from_daffine2(affine)
    }
}
