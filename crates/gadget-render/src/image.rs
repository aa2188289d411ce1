//! Images and image loading.
//!
//! An [`Image`] is an immutable, cheaply clonable surface with a source tag.
//! Images come from an [`ImageLoader`], which the element tree receives from
//! its host. Two loaders are provided: [`FileImageLoader`] reads files below a
//! base directory and [`MemoryImageLoader`] serves images registered in
//! memory.
//!
//! When loaded as a mask, pure black pixels become fully transparent, so a
//! black-and-white bitmap can describe the visible (and hit-testable) region
//! of an element.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::RgbaImage;

use crate::blit::draw_area;
use crate::error::{RenderError, RenderResult};
use crate::software::SoftwareSurface;
use crate::surface::Surface;
use crate::types::{Color, Rect, Size};

/// A loaded image.
#[derive(Clone)]
pub struct Image {
    tag: String,
    surface: Rc<dyn Surface>,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("tag", &self.tag)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Image {
    /// Wrap a surface as an image.
    pub fn from_surface(tag: impl Into<String>, surface: Rc<dyn Surface>) -> Self {
        Self {
            tag: tag.into(),
            surface,
        }
    }

    /// Build an image from straight-alpha pixels.
    pub fn from_rgba8(tag: impl Into<String>, pixels: &RgbaImage, as_mask: bool) -> Self {
        let surface = if as_mask {
            SoftwareSurface::from_rgba8(&black_to_transparent(pixels))
        } else {
            SoftwareSurface::from_rgba8(pixels)
        };
        Self::from_surface(tag, Rc::new(surface))
    }

    /// The name the image was loaded from.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn width(&self) -> f64 {
        self.surface.width()
    }

    pub fn height(&self) -> f64 {
        self.surface.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// The backing surface.
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Pixel value at a point, `None` outside the image.
    pub fn point_value(&self, x: f64, y: f64) -> Option<Color> {
        self.surface.point_value(x, y)
    }

    /// Draw unscaled with the top-left corner at `(x, y)`.
    pub fn draw(&self, dst: &mut dyn Surface, x: f64, y: f64) {
        dst.draw_surface(x, y, self.surface());
    }

    /// Draw scaled into the given destination rectangle.
    pub fn stretch_draw(&self, dst: &mut dyn Surface, rect: Rect) {
        let src = Rect::new(0.0, 0.0, self.width(), self.height());
        draw_area(self.surface(), src, dst, rect);
    }
}

fn black_to_transparent(pixels: &RgbaImage) -> RgbaImage {
    let mut out = pixels.clone();
    for px in out.pixels_mut() {
        if px.0[0] == 0 && px.0[1] == 0 && px.0[2] == 0 {
            px.0[3] = 0;
        }
    }
    out
}

fn decode(name: &str, bytes: &[u8]) -> RenderResult<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|source| RenderError::ImageDecode {
            name: name.to_string(),
            source,
        })
}

/// Loads images by name.
pub trait ImageLoader: fmt::Debug {
    /// Load the image called `name`. Masks have black pixels made transparent.
    fn load(&self, name: &str, as_mask: bool) -> RenderResult<Image>;
}

/// Loads image files relative to a base directory.
#[derive(Debug, Clone)]
pub struct FileImageLoader {
    base: PathBuf,
}

impl FileImageLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, name: &str, as_mask: bool) -> RenderResult<Image> {
        let path = self.base.join(name);
        let bytes = std::fs::read(&path).map_err(|source| RenderError::ImageLoad {
            path: path.clone(),
            source,
        })?;
        let pixels = decode(name, &bytes)?;
        tracing::debug!(
            target: "gadget_render::image",
            ?path,
            width = pixels.width(),
            height = pixels.height(),
            as_mask,
            "image loaded"
        );
        Ok(Image::from_rgba8(name, &pixels, as_mask))
    }
}

/// Serves images registered in memory.
#[derive(Debug, Default)]
pub struct MemoryImageLoader {
    images: RefCell<HashMap<String, RgbaImage>>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decoded pixels under a name, replacing any previous entry.
    pub fn insert(&self, name: impl Into<String>, pixels: RgbaImage) {
        self.images.borrow_mut().insert(name.into(), pixels);
    }

    /// Decode encoded image bytes (e.g. PNG) and register them.
    pub fn insert_bytes(&self, name: impl Into<String>, bytes: &[u8]) -> RenderResult<()> {
        let name = name.into();
        let pixels = decode(&name, bytes)?;
        self.insert(name, pixels);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.borrow().contains_key(name)
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, name: &str, as_mask: bool) -> RenderResult<Image> {
        let images = self.images.borrow();
        let pixels = images
            .get(name)
            .ok_or_else(|| RenderError::ImageNotFound(name.to_string()))?;
        Ok(Image::from_rgba8(name, pixels, as_mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker() -> RgbaImage {
        RgbaImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn test_mask_makes_black_transparent() {
        let mask = Image::from_rgba8("m", &checker(), true);
        assert_eq!(mask.point_value(0.0, 0.0).map(|c| c.a), Some(0.0));
        assert_eq!(mask.point_value(1.0, 0.0).map(|c| c.a), Some(1.0));

        let plain = Image::from_rgba8("p", &checker(), false);
        assert_eq!(plain.point_value(0.0, 0.0), Some(Color::BLACK));
        assert_eq!(plain.point_value(2.0, 0.0), None);
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryImageLoader::new();
        loader.insert("checker.png", checker());
        let img = loader.load("checker.png", false).unwrap();
        assert_eq!(img.size(), Size::new(2.0, 2.0));
        assert_eq!(img.tag(), "checker.png");
        assert!(matches!(
            loader.load("missing.png", false),
            Err(RenderError::ImageNotFound(_))
        ));
    }

    #[test]
    fn test_memory_loader_rejects_garbage_bytes() {
        let loader = MemoryImageLoader::new();
        let err = loader.insert_bytes("bad.png", b"not a png").unwrap_err();
        assert!(matches!(err, RenderError::ImageDecode { .. }));
        assert!(!loader.contains("bad.png"));
    }

    #[test]
    fn test_stretch_draw_fills_rect() {
        let img = Image::from_rgba8("w", &RgbaImage::from_pixel(1, 1, Rgba([255; 4])), false);
        let mut dst = SoftwareSurface::new(4, 4);
        img.stretch_draw(&mut dst, Rect::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(dst.pixel(1, 1), Color::WHITE);
        assert_eq!(dst.pixel(2, 2), Color::WHITE);
        assert_eq!(dst.pixel(3, 3), Color::TRANSPARENT);
    }
}
