//! Img implementation.
//!
//! This module provides [`Img`], an element that displays a loaded image.

use gadget_render::blit::{StretchBorders, stretch_middle_draw};
use gadget_render::{Image, Rect, Size};

use crate::element::{DrawContext, ElementBehavior};

/// Displays an image, stretched to the element.
///
/// With stretch-middle borders set, the borders keep their pixel size and
/// only the middle part scales. Without an explicit size the element takes
/// the image's natural size.
#[derive(Debug, Clone, Default)]
pub struct Img {
    image: Option<Image>,
    stretch_middle: Option<StretchBorders>,
}

impl Img {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Replace the image. Images are compared by tag.
    pub fn set_image(&mut self, image: Option<Image>) -> bool {
        if self.image.as_ref().map(Image::tag) == image.as_ref().map(Image::tag) {
            return false;
        }
        self.image = image;
        true
    }

    pub fn stretch_middle(&self) -> Option<StretchBorders> {
        self.stretch_middle
    }

    pub fn set_stretch_middle(&mut self, borders: Option<StretchBorders>) -> bool {
        if self.stretch_middle == borders {
            return false;
        }
        self.stretch_middle = borders;
        true
    }
}

impl ElementBehavior for Img {
    fn kind(&self) -> &'static str {
        "img"
    }

    fn default_size(&self) -> Size {
        self.image.as_ref().map_or(Size::ZERO, Image::size)
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let Some(image) = &self.image else {
            return;
        };
        let dest = Rect::new(0.0, 0.0, ctx.width(), ctx.height());
        match self.stretch_middle {
            Some(borders) => stretch_middle_draw(image.surface(), ctx.surface, dest, borders),
            None => image.stretch_draw(ctx.surface, dest),
        }
    }

    impl_as_any!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ContainerId;
    use crate::view::View;
    use gadget_render::{Color, ImageLoader, MemoryImageLoader};
    use image::{Rgba, RgbaImage};

    fn framed(size: u32) -> Image {
        let pixels = RgbaImage::from_fn(size, size, |x, y| {
            if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                Rgba([0, 0, 255, 255])
            } else {
                Rgba([255, 0, 0, 255])
            }
        });
        let loader = MemoryImageLoader::new();
        loader.insert("frame", pixels);
        loader.load("frame", false).unwrap()
    }

    #[test]
    fn test_natural_size() {
        let mut view = View::new(100.0, 100.0);
        let id = view.append(ContainerId::View, "img", None).unwrap();
        view.update_behavior::<Img>(id, |img| img.set_image(Some(framed(6))));
        view.layout();
        assert_eq!(view.element(id).unwrap().size(), Size::new(6.0, 6.0));

        view.element_mut(id).unwrap().set_pixel_width(30.0);
        view.layout();
        assert_eq!(view.element(id).unwrap().size(), Size::new(30.0, 6.0));
    }

    #[test]
    fn test_stretch_middle_keeps_border() {
        let mut view = View::new(40.0, 40.0);
        let id = view.append(ContainerId::View, "img", None).unwrap();
        view.element_mut(id).unwrap().set_rect(0.0, 0.0, 30.0, 30.0);
        view.update_behavior::<Img>(id, |img| {
            img.set_image(Some(framed(6))) | img.set_stretch_middle(Some(StretchBorders::uniform(1.0)))
        });
        view.draw();
        let surface = view.surface().unwrap();
        assert_eq!(surface.pixel(0, 15), Color::BLUE);
        assert_eq!(surface.pixel(1, 15), Color::RED);
        assert_eq!(surface.pixel(29, 15), Color::BLUE);
    }

    #[test]
    fn test_same_image_is_no_change() {
        let mut img = Img::new();
        assert!(img.set_image(Some(framed(4))));
        assert!(!img.set_image(Some(framed(4))));
        assert!(img.set_image(None));
    }
}
