//! Layout pass: resolve relative geometry and container extents.

use gadget_render::Size;

use crate::container::children_extent;
use crate::element::{ContainerId, ElementId};
use crate::view::View;

const LAYOUT_TARGET: &str = gadget_core::logging::targets::CONTAINER;

impl View {
    /// Re-derive geometry of the whole tree against the current view size.
    ///
    /// [`draw`](Self::draw) runs this first; calling it directly is only
    /// needed to inspect resolved geometry without painting.
    #[tracing::instrument(skip_all, target = "gadget::view", level = "trace")]
    pub fn layout(&mut self) {
        self.layout_container(ContainerId::View);
    }

    /// Pixel size the children of `container` resolve relative values
    /// against.
    fn parent_size(&self, container: ContainerId) -> Size {
        match container {
            ContainerId::View => self.size(),
            ContainerId::Element(owner) => self.nodes.get(owner).map_or(Size::ZERO, |n| n.size()),
        }
    }

    fn generation_is(&self, container: ContainerId, generation: u64) -> bool {
        self.container(container)
            .is_ok_and(|c| c.generation == generation)
    }

    pub(crate) fn layout_container(&mut self, container: ContainerId) {
        let Ok(elements) = self.container(container) else {
            return;
        };
        let children = elements.children.clone();
        let generation = elements.generation;
        let mut extent_stale = !elements.extent_valid;
        let parent = self.parent_size(container);

        for &child in &children {
            if !self.generation_is(container, generation) {
                tracing::trace!(target: LAYOUT_TARGET, ?container, "children modified during layout; pass aborted");
                return;
            }
            self.layout_node(child, parent);
            if self.nodes.get(child).is_some_and(|n| n.dirty.any()) {
                extent_stale = true;
            }
        }
        if !self.generation_is(container, generation) {
            tracing::trace!(target: LAYOUT_TARGET, ?container, "children modified during layout; pass aborted");
            return;
        }

        let scrollable = self.container(container).is_ok_and(|c| c.is_scrollable());
        let extent = if !scrollable {
            Some((parent.width, parent.height))
        } else if extent_stale {
            let extent = children_extent(children.iter().filter_map(|&id| self.nodes.get(id)));
            tracing::trace!(target: LAYOUT_TARGET, ?container, ?extent, "children extent recomputed");
            Some(extent)
        } else {
            None
        };

        if let Ok(elements) = self.container_mut(container) {
            if let Some((width, height)) = extent {
                elements.width = width;
                elements.height = height;
            }
            elements.extent_valid = true;
        }
    }

    /// Lay out one element: its own geometry in the order size, position,
    /// pin; then the behavior hook; then its children.
    fn layout_node(&mut self, id: ElementId, parent: Size) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let default_size = node
            .behavior
            .as_ref()
            .map_or(Size::ZERO, |b| b.default_size());
        node.resolve_geometry(parent, default_size);
        let has_children = node.children.is_some();

        self.with_behavior(id, |behavior, view| behavior.layout(view, id));

        if has_children && self.nodes.contains_key(id) {
            self.layout_container(ContainerId::Element(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::element::ContainerId;
    use crate::view::View;

    #[test]
    fn test_relative_geometry_follows_view_size() {
        let mut view = View::new(200.0, 100.0);
        let id = view.append(ContainerId::View, "div", None).unwrap();
        {
            let mut e = view.element_mut(id).unwrap();
            e.set_relative_width(0.5);
            e.set_relative_height(0.5);
            e.set_relative_x(0.25);
        }
        view.layout();
        let node = view.element(id).unwrap();
        assert_eq!((node.x(), node.width(), node.height()), (50.0, 100.0, 50.0));

        view.set_size(400.0, 100.0);
        view.layout();
        let node = view.element(id).unwrap();
        assert_eq!((node.x(), node.width()), (100.0, 200.0));
    }

    #[test]
    fn test_non_scrollable_extent_is_owner_size() {
        let mut view = View::new(200.0, 100.0);
        let outer = view.append(ContainerId::View, "div", None).unwrap();
        view.element_mut(outer).unwrap().set_rect(0.0, 0.0, 30.0, 20.0);
        let inner = view.append(outer.into(), "div", None).unwrap();
        view.element_mut(inner).unwrap().set_rect(100.0, 100.0, 5.0, 5.0);
        view.layout();
        assert_eq!(view.children_extent(outer.into()), Some((30.0, 20.0)));
        assert_eq!(view.children_extent(ContainerId::View), Some((200.0, 100.0)));
    }

    #[test]
    fn test_rotated_child_extent() {
        let mut view = View::new(200.0, 100.0);
        let outer = view.append(ContainerId::View, "div", None).unwrap();
        view.set_scrollable(outer.into(), true).unwrap();
        let inner = view.append(outer.into(), "div", None).unwrap();
        {
            let mut e = view.element_mut(inner).unwrap();
            e.set_rect(50.0, 50.0, 10.0, 10.0);
            e.set_pixel_pin_x(5.0);
            e.set_pixel_pin_y(5.0);
            e.set_rotation(45.0);
        }
        view.layout();
        let (w, h) = view.children_extent(outer.into()).unwrap();
        let reach = 50f64.sqrt();
        assert!((w - (50.0 + reach)).abs() < 1e-9);
        assert!((h - (50.0 + reach)).abs() < 1e-9);
    }
}
