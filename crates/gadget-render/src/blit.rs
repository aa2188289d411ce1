//! Area blits and stretch-middle (nine-slice) compositing.
//!
//! None of these functions take ownership of a surface; callers own every
//! surface passed in.
//!
//! # Stretch-middle
//!
//! A stretch-middle draw cuts the source into a 3x3 grid using four border
//! widths. Corners are copied unscaled, top and bottom edges stretch
//! horizontally, left and right edges stretch vertically, and the center
//! stretches both ways:
//!
//! ```
//! use gadget_render::blit::{StretchBorders, StretchPlan, stretch_middle_slices};
//! use gadget_render::{Rect, Size};
//!
//! let plan = stretch_middle_slices(
//!     Size::new(12.0, 12.0),
//!     Rect::new(0.0, 0.0, 100.0, 40.0),
//!     StretchBorders::uniform(4.0),
//! );
//! let StretchPlan::Sliced(slices) = plan else { panic!("expected slices") };
//! // Top-left corner is unscaled.
//! assert_eq!(slices[0].src, Rect::new(0.0, 0.0, 4.0, 4.0));
//! assert_eq!(slices[0].dest, Rect::new(0.0, 0.0, 4.0, 4.0));
//! // Center stretches to fill what the borders leave.
//! assert_eq!(slices[4].dest, Rect::new(4.0, 4.0, 92.0, 32.0));
//! ```

use crate::surface::Surface;
use crate::types::{Point, Rect, Size};

/// Sources narrower or shorter than this are never sliced.
const MIN_SLICE_SOURCE: f64 = 4.0;

/// Draw `src_rect` of `src` scaled onto `dst_rect` of `dst`.
///
/// Drawing is clipped to `dst_rect` snapped to whole pixels, so adjacent
/// destination rectangles neither overlap nor leave seams. Nothing is drawn
/// unless both rectangles have a positive size.
pub fn draw_area(src: &dyn Surface, src_rect: Rect, dst: &mut dyn Surface, dst_rect: Rect) {
    if !(src_rect.width() > 0.0
        && src_rect.height() > 0.0
        && dst_rect.width() > 0.0
        && dst_rect.height() > 0.0)
    {
        return;
    }

    let cx = dst_rect.width() / src_rect.width();
    let cy = dst_rect.height() / src_rect.height();

    dst.push_state();
    dst.intersect_rect_clip(dst_rect.integerize(false));
    dst.scale(cx, cy);
    dst.draw_surface(
        dst_rect.left() / cx - src_rect.left(),
        dst_rect.top() / cy - src_rect.top(),
        src,
    );
    dst.pop_state();
}

/// Border widths for a stretch-middle draw.
///
/// A negative border means "half of the source extent along that axis plus
/// this value", so `-1` is one pixel short of half.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StretchBorders {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl StretchBorders {
    /// No borders: the whole source stretches uniformly.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(width: f64) -> Self {
        Self::new(width, width, width, width)
    }

    /// Whether every border is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }

    /// Replace negative borders by their half-source defaults.
    pub fn resolve(&self, src: Size) -> Self {
        let fix = |border: f64, extent: f64| {
            if border < 0.0 {
                (border + (extent / 2.0).floor()).max(0.0)
            } else {
                border
            }
        };
        Self {
            left: fix(self.left, src.width),
            top: fix(self.top, src.height),
            right: fix(self.right, src.width),
            bottom: fix(self.bottom, src.height),
        }
    }
}

/// One cell of a stretch-middle grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NineSlice {
    pub src: Rect,
    pub dest: Rect,
}

/// How a stretch-middle draw is carried out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StretchPlan {
    /// Scale the whole source onto the destination.
    Uniform,
    /// Sizes match; copy the source as is.
    Direct,
    /// Nine slices in row-major order, top-left first.
    Sliced([NineSlice; 9]),
}

/// Start and length of the three cells along one axis.
type AxisCells = [(f64, f64); 3];

fn slice_axis(src_len: f64, dest_start: f64, dest_len: f64, b0: f64, b1: f64) -> (AxisCells, AxisCells) {
    let (mut s0, mut s1) = (b0, b1);
    if src_len - s0 - s1 <= 0.0 {
        let half = (src_len / 2.0 - 1.0).max(0.0);
        s0 = half;
        s1 = half;
    }
    let src_cells = [
        (0.0, s0),
        (s0, src_len - s0 - s1),
        (src_len - s1, s1),
    ];

    let (d0, d1) = if dest_len - s0 - s1 <= 0.0 {
        (dest_len / 2.0, dest_len / 2.0)
    } else {
        (s0, s1)
    };
    let mid_start = dest_start + d0;
    let mid_end = dest_start + dest_len - d1;
    let dest_cells = [
        (dest_start, d0),
        (mid_start, mid_end - mid_start),
        (mid_end, dest_start + dest_len - mid_end),
    ];

    (src_cells, dest_cells)
}

/// Plan a stretch-middle draw of a `src` sized image onto `dest`.
pub fn stretch_middle_slices(src: Size, dest: Rect, borders: StretchBorders) -> StretchPlan {
    if src.width < MIN_SLICE_SOURCE || src.height < MIN_SLICE_SOURCE || borders.is_zero() {
        return StretchPlan::Uniform;
    }
    if src == dest.size {
        return StretchPlan::Direct;
    }

    let b = borders.resolve(src);
    let (src_cols, dest_cols) = slice_axis(src.width, dest.left(), dest.width(), b.left, b.right);
    let (src_rows, dest_rows) = slice_axis(src.height, dest.top(), dest.height(), b.top, b.bottom);

    let cell = |i: usize| {
        let (row, col) = (i / 3, i % 3);
        NineSlice {
            src: Rect::new(src_cols[col].0, src_rows[row].0, src_cols[col].1, src_rows[row].1),
            dest: Rect::new(dest_cols[col].0, dest_rows[row].0, dest_cols[col].1, dest_rows[row].1),
        }
    };
    StretchPlan::Sliced(std::array::from_fn(cell))
}

/// Draw `src` onto `dest` of `dst` with stretch-middle borders.
pub fn stretch_middle_draw(src: &dyn Surface, dst: &mut dyn Surface, dest: Rect, borders: StretchBorders) {
    let src_size = Size::new(src.width(), src.height());
    match stretch_middle_slices(src_size, dest, borders) {
        StretchPlan::Uniform => {
            draw_area(src, Rect::new(0.0, 0.0, src_size.width, src_size.height), dst, dest);
        }
        StretchPlan::Direct => dst.draw_surface(dest.left(), dest.top(), src),
        StretchPlan::Sliced(slices) => {
            tracing::trace!(target: "gadget_render::blit", ?dest, ?borders, "stretch-middle draw");
            for slice in &slices {
                draw_area(src, slice.src, dst, slice.dest);
            }
        }
    }
}

/// Map a point of a stretch-middle drawn destination back to the source.
///
/// Used for hit testing against the pixels of stretched images.
pub fn map_stretch_middle_coord_dest_to_src(
    dest: Point,
    src_size: Size,
    dest_size: Size,
    borders: StretchBorders,
) -> Point {
    let b = borders.resolve(src_size);
    Point::new(
        map_axis(dest.x, src_size.width, dest_size.width, b.left, b.right),
        map_axis(dest.y, src_size.height, dest_size.height, b.top, b.bottom),
    )
}

fn map_axis(d: f64, src_len: f64, dest_len: f64, b0: f64, b1: f64) -> f64 {
    if d < b0 {
        d
    } else if d < dest_len - b1 {
        let total = b0 + b1;
        if dest_len > total && src_len > total {
            (d - b0) * (src_len - total) / (dest_len - total) + b0
        } else {
            b0
        }
    } else {
        d - dest_len + src_len
    }
}
