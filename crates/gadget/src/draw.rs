//! Paint pass: per-node canvas caching and container compositing.
//!
//! Each node keeps its own canvas between passes. A node repaints only when
//! its content, visibility or children changed, or when it has no canvas
//! yet. A container recomposites when its structure changed or any child
//! reported a change (including pure moves, which leave the child's canvas
//! untouched).

use std::rc::Rc;

use gadget_render::{Color, GraphicsFactory, Rect, Surface};

use crate::element::{ContainerId, DrawContext, ElementId, ElementNode};
use crate::view::View;

const DRAW_TARGET: &str = gadget_core::logging::targets::DRAW;

impl View {
    /// Lay out and paint the tree. Returns whether the view surface changed.
    #[tracing::instrument(skip_all, target = "gadget::draw", level = "trace")]
    pub fn draw(&mut self) -> bool {
        self.layout();
        let changed = self.draw_container(ContainerId::View);
        self.redraw_done();
        tracing::trace!(target: DRAW_TARGET, changed, elements = self.element_count(), "paint pass finished");
        changed
    }

    fn draw_container(&mut self, container: ContainerId) -> bool {
        let Ok(elements) = self.container(container) else {
            return false;
        };
        let children = elements.children.clone();
        let generation = elements.generation;
        let (width, height) = elements.extent();
        let mut changed = elements.structure_changed;

        for &child in &children {
            if self.container(container).map(|c| c.generation).ok() != Some(generation) {
                tracing::debug!(target: DRAW_TARGET, ?container, "children modified during draw; pass aborted");
                return true;
            }
            changed |= self.draw_node(child);
        }

        let (previous, failed_size) = match self.container_mut(container) {
            Ok(elements) => {
                elements.structure_changed = false;
                (elements.composite.take(), elements.failed_size.take())
            }
            Err(_) => return changed,
        };

        if width <= 0.0 || height <= 0.0 {
            return changed || previous.is_some();
        }
        let (w, h) = (width.ceil(), height.ceil());
        let reusable = previous
            .as_ref()
            .is_some_and(|s| s.width() == w && s.height() == h);
        if !changed && reusable {
            if let Ok(elements) = self.container_mut(container) {
                elements.composite = previous;
            }
            return false;
        }
        if !changed && failed_size == Some((w, h)) {
            if let Ok(elements) = self.container_mut(container) {
                elements.failed_size = failed_size;
            }
            return false;
        }

        let graphics = Rc::clone(&self.graphics);
        let Some(mut composite) = acquire_surface(graphics.as_ref(), previous, w, h) else {
            tracing::warn!(target: DRAW_TARGET, ?container, width = w, height = h, "container surface allocation failed");
            if let Ok(elements) = self.container_mut(container) {
                elements.failed_size = Some((w, h));
            }
            return true;
        };
        for &child in &children {
            if let Some(node) = self.nodes.get(child) {
                composite_child(composite.as_mut(), node);
            }
        }
        if self.debug_mode.draws_containers() {
            draw_debug_box(composite.as_mut(), width, height, Color::BLACK);
        }
        if let Ok(elements) = self.container_mut(container) {
            elements.composite = Some(composite);
        }
        true
    }

    /// Bring the canvas of one node up to date. Returns whether the parent
    /// has to recomposite.
    fn draw_node(&mut self, id: ElementId) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let flags = node.dirty;

        if !node.is_visible() {
            node.dirty.clear();
            return flags.visibility;
        }
        if !node.contributes() {
            node.dirty.clear();
            let had_content = std::mem::replace(&mut node.had_content, false);
            return had_content || flags.visibility;
        }

        let has_children = node.children.is_some();
        let children_changed = has_children && self.draw_container(ContainerId::Element(id));

        let Some(node) = self.nodes.get_mut(id) else {
            return true;
        };
        if node.allocation_failed && !(flags.visibility || flags.content || children_changed) {
            node.dirty.clear();
            return flags.position;
        }
        let needs_redraw =
            flags.visibility || flags.content || children_changed || node.canvas.is_none();
        if !needs_redraw {
            node.dirty.clear();
            return flags.position;
        }

        let (w, h) = (node.width().ceil(), node.height().ceil());
        let graphics = Rc::clone(&self.graphics);
        let Some(mut canvas) = acquire_surface(graphics.as_ref(), node.canvas.take(), w, h) else {
            tracing::warn!(
                target: DRAW_TARGET,
                ?id,
                kind = node.kind(),
                width = w,
                height = h,
                "element surface allocation failed; nothing drawn"
            );
            node.allocation_failed = true;
            node.had_content = false;
            node.dirty.clear();
            return true;
        };

        let draws_elements = self.debug_mode.draws_elements();
        if let Some(node) = self.nodes.get(id) {
            paint_node(graphics.as_ref(), canvas.as_mut(), node);
            if draws_elements {
                draw_debug_box(canvas.as_mut(), node.width(), node.height(), node.debug_color);
            }
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.canvas = Some(canvas);
            node.allocation_failed = false;
            node.had_content = true;
            node.dirty.clear();
        }
        true
    }
}

/// Reuse `previous` when it already has the requested size, otherwise
/// allocate a new surface.
fn acquire_surface(
    graphics: &dyn GraphicsFactory,
    previous: Option<Box<dyn Surface>>,
    width: f64,
    height: f64,
) -> Option<Box<dyn Surface>> {
    match previous {
        Some(mut surface) if surface.width() == width && surface.height() == height => {
            surface.clear();
            Some(surface)
        }
        _ => graphics.new_surface(width, height),
    }
}

/// Paint a node's content into its canvas.
///
/// Flipped nodes, and translucent nodes with children, are painted into an
/// intermediate layer first so the flip or the opacity applies to the
/// content as a whole.
fn paint_node(graphics: &dyn GraphicsFactory, canvas: &mut dyn Surface, node: &ElementNode) {
    let (w, h) = (node.width(), node.height());
    let has_children = node.children().is_some_and(|c| !c.is_empty());
    let flip = node.flip();
    let indirect = flip.is_flipped() || (node.opacity() < 1.0 && has_children);

    canvas.push_state();
    canvas.intersect_rect_clip(Rect::new(0.0, 0.0, w, h));
    canvas.multiply_opacity(node.opacity());

    let layer = if indirect {
        let layer = graphics.new_surface(w.ceil(), h.ceil());
        if layer.is_none() {
            tracing::warn!(target: DRAW_TARGET, id = ?node.id(), "layer allocation failed; painting directly");
        }
        layer
    } else {
        None
    };

    match layer {
        Some(mut layer) => {
            paint_content(layer.as_mut(), node);
            apply_flip(canvas, node);
            canvas.draw_surface(0.0, 0.0, layer.as_ref());
        }
        None => {
            apply_flip(canvas, node);
            paint_content(canvas, node);
        }
    }
    canvas.pop_state();
}

fn paint_content(surface: &mut dyn Surface, node: &ElementNode) {
    let children = node.children().and_then(|c| c.composite());
    let mut ctx = DrawContext {
        surface,
        node,
        children,
    };
    match node.behavior.as_deref() {
        Some(behavior) => behavior.draw(&mut ctx),
        None => ctx.draw_children(0.0, 0.0),
    }
}

fn apply_flip(surface: &mut dyn Surface, node: &ElementNode) {
    let flip = node.flip();
    if flip.horizontal {
        surface.translate(node.width(), 0.0);
        surface.scale(-1.0, 1.0);
    }
    if flip.vertical {
        surface.translate(0.0, node.height());
        surface.scale(1.0, -1.0);
    }
}

/// Composite one child canvas into its container.
fn composite_child(composite: &mut dyn Surface, node: &ElementNode) {
    if !node.contributes() {
        return;
    }
    let Some(canvas) = node.canvas() else {
        return;
    };

    composite.push_state();
    if node.rotation() == 0.0 {
        composite.translate(node.x() - node.pin_x(), node.y() - node.pin_y());
    } else {
        composite.translate(node.x(), node.y());
        composite.rotate(node.rotation_radians());
        composite.translate(-node.pin_x(), -node.pin_y());
    }
    match node.mask() {
        Some(mask) => composite.draw_surface_with_mask(0.0, 0.0, canvas, 0.0, 0.0, mask.surface()),
        None => composite.draw_surface(0.0, 0.0, canvas),
    }
    composite.pop_state();
}

/// Diagnostic overlay: the four edges and both diagonals.
fn draw_debug_box(surface: &mut dyn Surface, width: f64, height: f64, color: Color) {
    surface.draw_line(0.0, 0.0, 0.0, height, 1.0, color);
    surface.draw_line(0.0, 0.0, width, 0.0, 1.0, color);
    surface.draw_line(width, height, 0.0, height, 1.0, color);
    surface.draw_line(width, height, width, 0.0, 1.0, color);
    surface.draw_line(0.0, 0.0, width, height, 1.0, color);
    surface.draw_line(width, 0.0, 0.0, height, 1.0, color);
}
