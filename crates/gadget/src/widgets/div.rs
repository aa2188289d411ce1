//! Div implementation.

use gadget_render::{Color, Point, Rect};

use crate::element::{DrawContext, ElementBehavior, ElementNode};

/// A plain container with an optional background and a scroll offset.
///
/// The scroll offset shifts the children both when drawn and when hit
/// tested, so a child at `(0, 0)` of a div scrolled to `(0, 10)` appears
/// 10 pixels above the div's top edge.
#[derive(Debug, Clone, Default)]
pub struct Div {
    background: Option<Color>,
    scroll: Point,
}

impl Div {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<Color>) -> bool {
        if self.background == background {
            return false;
        }
        self.background = background;
        true
    }

    pub fn scroll_position(&self) -> Point {
        self.scroll
    }

    pub fn set_scroll_position(&mut self, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) || (self.scroll.x == x && self.scroll.y == y) {
            return false;
        }
        self.scroll = Point::new(x, y);
        true
    }
}

impl ElementBehavior for Div {
    fn kind(&self) -> &'static str {
        "div"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        if let Some(background) = self.background {
            let rect = Rect::new(0.0, 0.0, ctx.width(), ctx.height());
            ctx.surface.draw_filled_rect(rect, background);
        }
        ctx.draw_children(-self.scroll.x, -self.scroll.y);
    }

    fn self_coord_to_child_coord(&self, child: &ElementNode, point: Point) -> Point {
        child.parent_coord_to_self_coord(Point::new(point.x + self.scroll.x, point.y + self.scroll.y))
    }

    fn child_coord_to_self_coord(&self, child: &ElementNode, point: Point) -> Point {
        let p = child.self_coord_to_parent_coord(point);
        Point::new(p.x - self.scroll.x, p.y - self.scroll.y)
    }

    impl_as_any!();
}
