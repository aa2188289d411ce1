//! CPU rasterizing surface backed by an `image` buffer.
//!
//! Pixels are stored as premultiplied `f32` RGBA. Every drawing operation
//! maps its user-space bounds to device space, intersects them with the clip
//! and the surface bounds, and then inverse-maps each covered pixel center
//! back to user space for sampling. Sampling is nearest-neighbour.

use std::cell::Cell;

use image::{Rgba, Rgba32FImage, RgbaImage};

use crate::error::{RenderError, RenderResult};
use crate::surface::{GraphicsFactory, RenderStateStack, Surface};
use crate::transform::Transform2D;
use crate::types::{Color, Point, Rect};

/// A software surface.
#[derive(Debug, Clone)]
pub struct SoftwareSurface {
    pixels: Rgba32FImage,
    state: RenderStateStack,
}

impl SoftwareSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: Rgba32FImage::new(width, height),
            state: RenderStateStack::new(),
        }
    }

    /// Create a surface from straight-alpha 8-bit pixels.
    pub fn from_rgba8(image: &RgbaImage) -> Self {
        let mut surface = Self::new(image.width(), image.height());
        for (x, y, px) in image.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            surface.put(x, y, Color::from_rgba8(r, g, b, a));
        }
        surface
    }

    /// Export as straight-alpha 8-bit pixels.
    pub fn to_rgba8(&self) -> RgbaImage {
        RgbaImage::from_fn(self.pixels.width(), self.pixels.height(), |x, y| {
            let c = self.pixel(x, y);
            let (r, g, b) = if c.a > 0.0 {
                (c.r / c.a, c.g / c.a, c.b / c.a)
            } else {
                (0.0, 0.0, 0.0)
            };
            let to8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgba([to8(r), to8(g), to8(b), to8(c.a)])
        })
    }

    /// Raw pixel buffer.
    pub fn pixels(&self) -> &Rgba32FImage {
        &self.pixels
    }

    /// Current state depth, for balancing checks.
    pub fn state_depth(&self) -> usize {
        self.state.depth()
    }

    /// Write one pixel without blending.
    pub fn put(&mut self, x: u32, y: u32, color: Color) {
        if x < self.pixels.width() && y < self.pixels.height() {
            self.pixels.put_pixel(x, y, Rgba(color.to_array()));
        }
    }

    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let dst = self.pixel(x, y);
        self.put(x, y, color.over(dst));
    }

    /// Device pixels whose centers fall inside `user_rect` after transform
    /// and clipping, as `(x0, y0, x1, y1)` half-open bounds.
    fn raster_region(&self, user_rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let mut region = self.state.transform().transform_rect(&user_rect);
        if let Some(clip) = self.state.clip_bounds() {
            region = region.intersect(&clip)?;
        }
        let bounds = Rect::new(0.0, 0.0, self.width(), self.height());
        let region = region.intersect(&bounds)?;

        let x0 = (region.left() - 0.5).ceil().max(0.0);
        let y0 = (region.top() - 0.5).ceil().max(0.0);
        let x1 = (region.right() - 0.5).ceil().min(self.width());
        let y1 = (region.bottom() - 0.5).ceil().min(self.height());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Visit every covered device pixel with its center mapped to user space.
    fn rasterize(&mut self, user_rect: Rect, mut shade: impl FnMut(Point) -> Option<Color>) {
        let Some((x0, y0, x1, y1)) = self.raster_region(user_rect) else {
            return;
        };
        let Some(inverse) = self.state.transform().inverse() else {
            return;
        };
        let translation_only = self.state.transform().is_translation_only();
        let opacity = self.state.current().opacity as f32;
        if opacity <= 0.0 {
            return;
        }

        for py in y0..y1 {
            for px in x0..x1 {
                let center = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                let p = inverse.transform_point(center);
                if !translation_only && !user_rect.contains(p) {
                    continue;
                }
                if let Some(color) = shade(p) {
                    if color.a > 0.0 {
                        self.blend(px, py, color.scaled(opacity));
                    }
                }
            }
        }
    }
}

impl Surface for SoftwareSurface {
    fn width(&self) -> f64 {
        f64::from(self.pixels.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.pixels.height())
    }

    fn push_state(&mut self) {
        self.state.save();
    }

    fn pop_state(&mut self) {
        self.state.restore();
    }

    fn multiply_opacity(&mut self, opacity: f64) {
        self.state.multiply_opacity(opacity);
    }

    fn intersect_rect_clip(&mut self, rect: Rect) {
        self.state.clip_rect(rect);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.scale(sx, sy);
    }

    fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = Rgba([0.0; 4]);
        }
    }

    fn draw_surface(&mut self, x: f64, y: f64, src: &dyn Surface) {
        let rect = Rect::new(x, y, src.width(), src.height());
        self.rasterize(rect, |p| src.point_value(p.x - x, p.y - y));
    }

    fn draw_surface_with_mask(
        &mut self,
        x: f64,
        y: f64,
        src: &dyn Surface,
        mx: f64,
        my: f64,
        mask: &dyn Surface,
    ) {
        let rect = Rect::new(x, y, src.width(), src.height());
        self.rasterize(rect, |p| {
            let alpha = mask.point_value(p.x - mx, p.y - my)?.a;
            Some(src.point_value(p.x - x, p.y - y)?.scaled(alpha))
        });
    }

    fn draw_filled_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.rasterize(rect, |_| Some(color));
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: Color) {
        let start = Point::new(x0, y0);
        let d = Point::new(x1 - x0, y1 - y0);
        let len_sq = d.x * d.x + d.y * d.y;
        if len_sq <= 0.0 || width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let bounds = Rect::new(x0.min(x1), y0.min(y1), d.x.abs(), d.y.abs());
        let bounds = Rect::new(
            bounds.left() - half,
            bounds.top() - half,
            bounds.width() + width,
            bounds.height() + width,
        );
        let len = len_sq.sqrt();
        self.rasterize(bounds, |p| {
            let rel = Point::new(p.x - start.x, p.y - start.y);
            let t = (rel.x * d.x + rel.y * d.y) / len_sq;
            let dist = (rel.x * d.y - rel.y * d.x).abs() / len;
            ((0.0..=1.0).contains(&t) && dist <= half).then_some(color)
        });
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|px| Color::from_array(px.0))
            .unwrap_or(Color::TRANSPARENT)
    }
}

/// Default pixel buffer budget of a [`SoftwareGraphics`] factory, in bytes.
pub const DEFAULT_MAX_SURFACE_BYTES: u64 = 256 * 1024 * 1024;

/// Premultiplied `f32` RGBA.
const BYTES_PER_PIXEL: u64 = 16;

/// Graphics factory producing [`SoftwareSurface`]s.
///
/// Requests whose pixel buffer would exceed the byte budget are refused. An
/// optional per-side limit simulates allocation failure for smaller sizes.
#[derive(Debug)]
pub struct SoftwareGraphics {
    max_dimension: Option<u32>,
    max_bytes: u64,
    allocations: Cell<usize>,
}

impl Default for SoftwareGraphics {
    fn default() -> Self {
        Self {
            max_dimension: None,
            max_bytes: DEFAULT_MAX_SURFACE_BYTES,
            allocations: Cell::new(0),
        }
    }
}

impl SoftwareGraphics {
    /// Create a factory with the default byte budget and no per-side limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory refusing surfaces larger than `limit` on either side.
    pub fn with_max_dimension(limit: u32) -> Self {
        Self {
            max_dimension: Some(limit),
            ..Self::default()
        }
    }

    /// Replace the byte budget.
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    /// The per-side limit, if any.
    pub fn max_dimension(&self) -> Option<u32> {
        self.max_dimension
    }

    /// The pixel buffer budget in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Number of surfaces created so far.
    pub fn allocation_count(&self) -> usize {
        self.allocations.get()
    }

    /// Create a surface, reporting why it could not be created.
    pub fn try_new_surface(&self, width: f64, height: f64) -> RenderResult<SoftwareSurface> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let (wc, hc) = (width.ceil(), height.ceil());
        let over_budget = || RenderError::SurfaceOverBudget {
            width: wc,
            height: hc,
            budget: self.max_bytes,
        };
        if wc > f64::from(u32::MAX) || hc > f64::from(u32::MAX) {
            return Err(over_budget());
        }
        let (w, h) = (wc as u32, hc as u32);
        let bytes = u64::from(w)
            .checked_mul(u64::from(h))
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL));
        if bytes.is_none_or(|bytes| bytes > self.max_bytes) {
            return Err(over_budget());
        }
        if let Some(limit) = self.max_dimension {
            if w > limit || h > limit {
                return Err(RenderError::SurfaceTooLarge {
                    width: w,
                    height: h,
                    limit,
                });
            }
        }
        self.allocations.set(self.allocations.get() + 1);
        Ok(SoftwareSurface::new(w, h))
    }
}

impl GraphicsFactory for SoftwareGraphics {
    fn new_surface(&self, width: f64, height: f64) -> Option<Box<dyn Surface>> {
        match self.try_new_surface(width, height) {
            Ok(surface) => Some(Box::new(surface)),
            Err(err) => {
                tracing::warn!(target: "gadget_render::surface", %err, "surface allocation failed");
                None
            }
        }
    }
}

/// Flip a transform around a box of the given size.
///
/// Used to mirror content horizontally and/or vertically inside its own
/// bounds.
pub fn flip_transform(width: f64, height: f64, horizontal: bool, vertical: bool) -> Transform2D {
    let (sx, tx) = if horizontal { (-1.0, width) } else { (1.0, 0.0) };
    let (sy, ty) = if vertical { (-1.0, height) } else { (1.0, 0.0) };
    Transform2D::translate(tx, ty).scaled_xy(sx, sy)
}
