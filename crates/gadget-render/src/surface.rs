//! Drawable surface capability.
//!
//! This module defines the [`Surface`] trait, the only drawing interface the
//! element tree relies on, and the [`GraphicsFactory`] through which all
//! surfaces are created. Surfaces are exclusively owned: a node owns its
//! cached surface and releases it by dropping it.
//!
//! # State Stack
//!
//! Transform, clip and opacity live in a state stack. `push_state` saves the
//! current state, `pop_state` restores it:
//!
//! ```ignore
//! surface.push_state();
//! surface.translate(x, y);
//! surface.rotate(angle);
//! surface.draw_surface(0.0, 0.0, child.as_ref());
//! surface.pop_state();
//! ```

use std::fmt;

use crate::transform::Transform2D;
use crate::types::{Color, Rect};

/// A drawable pixel surface.
pub trait Surface: fmt::Debug {
    /// Width in pixels.
    fn width(&self) -> f64;

    /// Height in pixels.
    fn height(&self) -> f64;

    // =========================================================================
    // State
    // =========================================================================

    /// Save transform, clip and opacity.
    fn push_state(&mut self);

    /// Restore the most recently saved state. Unbalanced pops are ignored.
    fn pop_state(&mut self);

    /// Multiply the opacity applied to subsequent drawing.
    fn multiply_opacity(&mut self, opacity: f64);

    /// Intersect the clip with a rectangle in the current user space.
    fn intersect_rect_clip(&mut self, rect: Rect);

    /// Translate the user space.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotate the user space (radians).
    fn rotate(&mut self, radians: f64);

    /// Scale the user space. Negative factors mirror.
    fn scale(&mut self, sx: f64, sy: f64);

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Reset every pixel to transparent, ignoring clip and transform.
    fn clear(&mut self);

    /// Draw `src` with its top-left corner at `(x, y)` in user space.
    fn draw_surface(&mut self, x: f64, y: f64, src: &dyn Surface);

    /// Draw `src` at `(x, y)`, multiplying its alpha by the alpha of `mask`
    /// placed at `(mx, my)`. Pixels outside the mask are not drawn.
    fn draw_surface_with_mask(
        &mut self,
        x: f64,
        y: f64,
        src: &dyn Surface,
        mx: f64,
        my: f64,
        mask: &dyn Surface,
    );

    /// Fill a rectangle in user space.
    fn draw_filled_rect(&mut self, rect: Rect, color: Color);

    /// Draw a line segment of the given width in user space.
    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: Color);

    // =========================================================================
    // Readback
    // =========================================================================

    /// Read one pixel. Out of range coordinates read as transparent.
    fn pixel(&self, x: u32, y: u32) -> Color;

    /// Read the pixel covering a fractional point, if it lies on the surface.
    fn point_value(&self, x: f64, y: f64) -> Option<Color> {
        if x < 0.0 || y < 0.0 || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixel(x as u32, y as u32))
    }
}

/// Creates surfaces for the element tree.
///
/// Returning `None` signals resource exhaustion; callers treat it as
/// "nothing to draw" and retry on the next invalidating change.
pub trait GraphicsFactory: fmt::Debug {
    /// Create a transparent surface of at least `width` x `height` pixels.
    fn new_surface(&self, width: f64, height: f64) -> Option<Box<dyn Surface>>;
}

/// Saved surface state for push/pop operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// User space to device space transform.
    pub transform: Transform2D,
    /// Clip bounds in device space, `None` when unclipped.
    pub clip: Option<Rect>,
    /// Opacity multiplier.
    pub opacity: f64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            transform: Transform2D::IDENTITY,
            clip: None,
            opacity: 1.0,
        }
    }
}

/// Common state management for surface implementations.
#[derive(Debug, Clone, Default)]
pub struct RenderStateStack {
    stack: Vec<RenderState>,
    current: RenderState,
}

impl RenderStateStack {
    /// Create a new state stack with default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state.
    #[inline]
    pub fn current(&self) -> &RenderState {
        &self.current
    }

    /// Save the current state.
    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// Restore the previously saved state.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    /// Reset to default state and clear the stack.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.current = RenderState::default();
    }

    /// Get the current transform.
    #[inline]
    pub fn transform(&self) -> &Transform2D {
        &self.current.transform
    }

    /// Apply a translation.
    #[inline]
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.current.transform = self.current.transform.translated(tx, ty);
    }

    /// Apply a scale.
    #[inline]
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current.transform = self.current.transform.scaled_xy(sx, sy);
    }

    /// Apply a rotation.
    #[inline]
    pub fn rotate(&mut self, angle: f64) {
        self.current.transform = self.current.transform.rotated(angle);
    }

    /// Multiply the opacity.
    #[inline]
    pub fn multiply_opacity(&mut self, opacity: f64) {
        self.current.opacity *= opacity.clamp(0.0, 1.0);
    }

    /// Set a clip rect, intersecting with any existing clip.
    ///
    /// An empty intersection yields an empty clip rather than removing it.
    pub fn clip_rect(&mut self, rect: Rect) {
        let transformed = self.current.transform.transform_rect(&rect);

        self.current.clip = Some(match self.current.clip {
            Some(existing) => existing.intersect(&transformed).unwrap_or(Rect::ZERO),
            None => transformed,
        });
    }

    /// Get the current clip bounds.
    #[inline]
    pub fn clip_bounds(&self) -> Option<Rect> {
        self.current.clip
    }

    /// Get the stack depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_state_default() {
        let state = RenderState::default();
        assert!(state.transform.is_identity());
        assert!(state.clip.is_none());
        assert_eq!(state.opacity, 1.0);
    }

    #[test]
    fn test_render_state_stack() {
        let mut stack = RenderStateStack::new();

        stack.translate(10.0, 20.0);
        stack.save();
        stack.translate(5.0, 5.0);
        stack.multiply_opacity(0.5);

        assert_eq!(stack.transform().translation(), (15.0, 25.0));
        assert_eq!(stack.current().opacity, 0.5);

        stack.restore();

        assert_eq!(stack.transform().translation(), (10.0, 20.0));
        assert_eq!(stack.current().opacity, 1.0);
        assert_eq!(stack.depth(), 0);

        // Unbalanced restore is ignored.
        stack.restore();
        assert_eq!(stack.transform().translation(), (10.0, 20.0));
    }

    #[test]
    fn test_clip_intersection() {
        let mut stack = RenderStateStack::new();

        stack.clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(stack.clip_bounds(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

        stack.clip_rect(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(stack.clip_bounds(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        stack.clip_rect(Rect::new(500.0, 500.0, 10.0, 10.0));
        assert_eq!(stack.clip_bounds(), Some(Rect::ZERO));
    }

    #[test]
    fn test_clip_is_stored_in_device_space() {
        let mut stack = RenderStateStack::new();
        stack.translate(10.0, 10.0);
        stack.clip_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(stack.clip_bounds(), Some(Rect::new(10.0, 10.0, 5.0, 5.0)));
    }
}
