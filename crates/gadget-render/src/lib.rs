//! Surfaces, coordinate math and canvas compositing for the gadget runtime.
//!
//! This crate provides the drawing layer the element tree is built on:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`], [`Color`] and [`Transform2D`]
//! - **Coordinates**: the [`coords`] module converts points between parent
//!   and child element spaces and computes rotated extents
//! - **Surfaces**: the [`Surface`] and [`GraphicsFactory`] capabilities, with
//!   a CPU implementation in [`SoftwareSurface`] / [`SoftwareGraphics`]
//! - **Images**: [`Image`] and the [`ImageLoader`] capability
//! - **Compositing**: area blits and stretch-middle drawing in [`blit`]
//!
//! # Drawing Into a Surface
//!
//! ```
//! use gadget_render::{Color, GraphicsFactory, Rect, SoftwareGraphics, Surface};
//!
//! let graphics = SoftwareGraphics::new();
//! let mut surface = graphics.new_surface(20.0, 10.0).unwrap();
//!
//! surface.push_state();
//! surface.translate(5.0, 0.0);
//! surface.draw_filled_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
//! surface.pop_state();
//!
//! assert_eq!(surface.pixel(5, 0), Color::RED);
//! assert_eq!(surface.pixel(4, 0), Color::TRANSPARENT);
//! ```
//!
//! # Stretch-Middle Drawing
//!
//! ```
//! use gadget_render::blit::{StretchBorders, stretch_middle_draw};
//! use gadget_render::{Color, Rect, SoftwareSurface, Surface};
//!
//! let mut frame = SoftwareSurface::new(8, 8);
//! frame.draw_filled_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Color::BLUE);
//!
//! let mut target = SoftwareSurface::new(64, 32);
//! stretch_middle_draw(&frame, &mut target, Rect::new(0.0, 0.0, 64.0, 32.0), StretchBorders::uniform(2.0));
//! assert_eq!(target.pixel(63, 31), Color::BLUE);
//! ```

pub mod blit;
pub mod coords;
mod error;
mod image;
mod software;
mod surface;
mod transform;
mod types;

pub use error::{RenderError, RenderResult};
pub use self::image::{FileImageLoader, Image, ImageLoader, MemoryImageLoader};
pub use software::{DEFAULT_MAX_SURFACE_BYTES, SoftwareGraphics, SoftwareSurface, flip_transform};
pub use surface::{GraphicsFactory, RenderState, RenderStateStack, Surface};
pub use transform::Transform2D;
pub use types::{Color, Point, Rect, Size};

static_assertions::assert_impl_all!(Point: Send, Sync, Copy);
static_assertions::assert_impl_all!(Rect: Send, Sync, Copy);
static_assertions::assert_impl_all!(Transform2D: Send, Sync, Copy);
static_assertions::assert_impl_all!(SoftwareSurface: Send, Sync, Clone);
