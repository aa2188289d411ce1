//! Element containers.
//!
//! An [`Elements`] container is an ordered list of sibling elements.
//! Insertion order is paint order: later children are drawn on top and are
//! hit-tested first. The container caches one composite surface holding all
//! of its children and tracks structural changes separately from the dirty
//! flags of the children themselves.
//!
//! Structural edits go through the owning [`View`], which keeps its name
//! table, focus and hover state consistent with container membership:
//!
//! ```
//! use gadget::{ContainerId, View};
//!
//! let mut view = View::new(200.0, 100.0);
//! let ok = view.append(ContainerId::View, "button", Some("ok")).unwrap();
//! assert_eq!(view.element_by_name("ok"), Some(ok));
//!
//! assert!(view.remove(ContainerId::View, ok));
//! assert_eq!(view.element_by_name("ok"), None);
//! assert_eq!(view.index_by_name(ContainerId::View, "ok"), None);
//! ```

use gadget_render::Surface;
use gadget_render::coords::estimate_child_extent_in_parent;

use crate::element::{ContainerId, ElementId, ElementNode};
use crate::error::{ElementError, ViewResult};
use crate::view::View;

const CONTAINER_TARGET: &str = gadget_core::logging::targets::CONTAINER;

/// An ordered collection of sibling elements.
#[derive(Debug)]
pub struct Elements {
    owner: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    scrollable: bool,
    pub(crate) composite: Option<Box<dyn Surface>>,
    /// Children were added, removed or reordered since the last draw.
    pub(crate) structure_changed: bool,
    pub(crate) extent_valid: bool,
    /// Size of the composite: the owner's size, or the children extent when
    /// scrollable.
    pub(crate) width: f64,
    pub(crate) height: f64,
    /// Composite size whose allocation failed; not retried until the
    /// children or the extent change.
    pub(crate) failed_size: Option<(f64, f64)>,
    /// Bumped on every structural edit; passes iterating the children abort
    /// when it moves under them.
    pub(crate) generation: u64,
}

impl Elements {
    pub(crate) fn new(owner: Option<ElementId>) -> Self {
        Self {
            owner,
            children: Vec::new(),
            scrollable: false,
            composite: None,
            structure_changed: true,
            extent_valid: false,
            width: 0.0,
            height: 0.0,
            failed_size: None,
            generation: 0,
        }
    }

    /// The element owning this container, `None` for the view's container.
    pub fn owner(&self) -> Option<ElementId> {
        self.owner
    }

    pub fn count(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in paint order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn element_by_index(&self, index: usize) -> Option<ElementId> {
        self.children.get(index).copied()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.children.iter().position(|&c| c == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.children.contains(&id)
    }

    pub fn is_scrollable(&self) -> bool {
        self.scrollable
    }

    /// Size of the composite as computed by the last layout.
    pub fn extent(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Whether the last draw could not allocate the composite.
    pub fn allocation_failed(&self) -> bool {
        self.failed_size.is_some()
    }

    /// The composite of all children from the last draw.
    pub fn composite(&self) -> Option<&dyn Surface> {
        self.composite.as_deref()
    }

    fn structure_edited(&mut self) {
        self.structure_changed = true;
        self.extent_valid = false;
        self.generation = self.generation.wrapping_add(1);
    }

    fn insert_at(&mut self, index: usize, id: ElementId) {
        let index = index.min(self.children.len());
        self.children.insert(index, id);
        self.structure_edited();
    }

    fn remove_child(&mut self, id: ElementId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.children.remove(index);
        self.structure_edited();
        true
    }
}

/// Bottom-right extent of a set of children, estimating first and paying for
/// the exact rotated box only when the estimate could grow the extent.
pub(crate) fn children_extent<'a>(children: impl IntoIterator<Item = &'a ElementNode>) -> (f64, f64) {
    let (mut width, mut height) = (0.0f64, 0.0f64);
    for child in children {
        let (est_x, est_y) = estimate_child_extent_in_parent(child.position(), child.pin(), child.size());
        if est_x > width || est_y > height {
            let (x, y) = child.extent_in_parent();
            width = width.max(x);
            height = height.max(y);
        }
    }
    (width, height)
}

impl View {
    /// The container addressed by `container`.
    pub fn elements(&self, container: ContainerId) -> Option<&Elements> {
        self.container(container).ok()
    }

    pub(crate) fn container(&self, container: ContainerId) -> ViewResult<&Elements> {
        match container {
            ContainerId::View => Ok(&self.root),
            ContainerId::Element(id) => {
                let node = self.nodes.get(id).ok_or(ElementError::UnknownElement(id))?;
                Ok(node.children.as_ref().ok_or(ElementError::NoContainer(id))?)
            }
        }
    }

    pub(crate) fn container_mut(&mut self, container: ContainerId) -> ViewResult<&mut Elements> {
        match container {
            ContainerId::View => Ok(&mut self.root),
            ContainerId::Element(id) => {
                let node = self
                    .nodes
                    .get_mut(id)
                    .ok_or(ElementError::UnknownElement(id))?;
                Ok(node.children.as_mut().ok_or(ElementError::NoContainer(id))?)
            }
        }
    }

    /// Create an element of `kind` at the end of `container`.
    pub fn append(&mut self, container: ContainerId, kind: &str, name: Option<&str>) -> ViewResult<ElementId> {
        self.insert(container, kind, None, name)
    }

    /// Create an element of `kind` in `container`, before `before` or at the
    /// end.
    ///
    /// An unknown kind is logged and reported as
    /// [`ElementError::UnknownKind`]; the container is left untouched.
    pub fn insert(
        &mut self,
        container: ContainerId,
        kind: &str,
        before: Option<ElementId>,
        name: Option<&str>,
    ) -> ViewResult<ElementId> {
        let index = {
            let elements = self.container(container)?;
            match before {
                None => elements.count(),
                Some(before) => elements
                    .index_of(before)
                    .ok_or(ElementError::NotAChild(before))?,
            }
        };

        let Some(behavior) = self.factory.create(kind) else {
            tracing::warn!(target: CONTAINER_TARGET, kind, ?container, "unknown element kind");
            return Err(ElementError::UnknownKind(kind.to_string()).into());
        };

        let name = name.filter(|n| !n.is_empty()).map(str::to_owned);
        let id = self.nodes.insert_with_key(|id| {
            ElementNode::new(id, container, name, behavior, crate::view::debug_color(id))
        });
        self.container_mut(container)?.insert_at(index, id);
        self.on_element_added(id);
        self.queue_redraw();
        tracing::debug!(target: CONTAINER_TARGET, ?id, kind, ?container, index, "element added");
        Ok(id)
    }

    /// Remove and destroy `element` with its whole subtree. Returns whether
    /// it was a child of `container`.
    pub fn remove(&mut self, container: ContainerId, element: ElementId) -> bool {
        let removed = self
            .container_mut(container)
            .is_ok_and(|c| c.remove_child(element));
        if removed {
            self.destroy_subtree(element);
            self.queue_redraw();
            tracing::debug!(target: CONTAINER_TARGET, id = ?element, ?container, "element removed");
        }
        removed
    }

    /// Remove and destroy every child of `container`.
    pub fn remove_all(&mut self, container: ContainerId) {
        let children = match self.container_mut(container) {
            Ok(c) if !c.children.is_empty() => {
                let children = std::mem::take(&mut c.children);
                c.structure_edited();
                children
            }
            _ => return,
        };
        let count = children.len();
        for child in children {
            self.destroy_subtree(child);
        }
        self.queue_redraw();
        tracing::debug!(target: CONTAINER_TARGET, ?container, count, "all elements removed");
    }

    /// Move `element` before `before`, or to the end.
    pub fn reorder(
        &mut self,
        container: ContainerId,
        element: ElementId,
        before: Option<ElementId>,
    ) -> ViewResult<()> {
        if before == Some(element) {
            return Ok(());
        }
        let elements = self.container_mut(container)?;
        if !elements.contains(element) {
            return Err(ElementError::NotAChild(element).into());
        }
        if let Some(before) = before {
            if !elements.contains(before) {
                return Err(ElementError::NotAChild(before).into());
            }
        }
        elements.remove_child(element);
        let index = before
            .and_then(|b| elements.index_of(b))
            .unwrap_or(elements.count());
        elements.insert_at(index, element);
        self.queue_redraw();
        Ok(())
    }

    /// Index of the first child named `name`. Empty names never match.
    pub fn index_by_name(&self, container: ContainerId, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        let elements = self.container(container).ok()?;
        elements
            .children
            .iter()
            .position(|&id| self.nodes.get(id).and_then(ElementNode::name) == Some(name))
    }

    /// The first child named `name`.
    pub fn child_by_name(&self, container: ContainerId, name: &str) -> Option<ElementId> {
        let index = self.index_by_name(container, name)?;
        self.container(container).ok()?.element_by_index(index)
    }

    /// Switch between clipping children to the owner and sizing the
    /// composite to the children extent.
    pub fn set_scrollable(&mut self, container: ContainerId, scrollable: bool) -> ViewResult<bool> {
        let elements = self.container_mut(container)?;
        if elements.scrollable == scrollable {
            return Ok(false);
        }
        elements.scrollable = scrollable;
        elements.extent_valid = false;
        elements.structure_changed = true;
        self.queue_redraw();
        Ok(true)
    }

    /// Composite size from the last layout; the children extent for
    /// scrollable containers.
    pub fn children_extent(&self, container: ContainerId) -> Option<(f64, f64)> {
        self.container(container).ok().map(Elements::extent)
    }

    /// Destroy a detached node and everything below it.
    fn destroy_subtree(&mut self, root: ElementId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            self.on_element_removed(id);
            if let Some(node) = self.nodes.remove(id) {
                if let Some(children) = node.children {
                    stack.extend(children.children);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_bump_generation() {
        let mut view = View::new(10.0, 10.0);
        let a = view.append(ContainerId::View, "div", None).unwrap();
        let g = view.root.generation;
        let b = view.insert(ContainerId::View, "div", Some(a), None).unwrap();
        assert_eq!(view.root.children(), &[b, a]);
        assert_ne!(view.root.generation, g);
        assert!(!view.root.extent_valid);
    }

    #[test]
    fn test_insert_before_foreign_element_fails() {
        let mut view = View::new(10.0, 10.0);
        let outer = view.append(ContainerId::View, "div", None).unwrap();
        let inner = view.append(outer.into(), "div", None).unwrap();
        let err = view.insert(ContainerId::View, "div", Some(inner), None).unwrap_err();
        assert!(matches!(err, crate::ViewError::Element(ElementError::NotAChild(id)) if id == inner));
        assert_eq!(view.root.count(), 1);
    }

    #[test]
    fn test_unknown_kind_leaves_container_untouched() {
        let mut view = View::new(10.0, 10.0);
        let err = view.append(ContainerId::View, "marquee", None).unwrap_err();
        assert!(matches!(err, crate::ViewError::Element(ElementError::UnknownKind(_))));
        assert!(view.root.is_empty());
    }

    #[test]
    fn test_leaf_kind_has_no_container() {
        let mut view = View::new(10.0, 10.0);
        let img = view.append(ContainerId::View, "img", None).unwrap();
        let err = view.append(img.into(), "div", None).unwrap_err();
        assert!(matches!(err, crate::ViewError::Element(ElementError::NoContainer(_))));
    }

    #[test]
    fn test_remove_destroys_subtree() {
        let mut view = View::new(10.0, 10.0);
        let outer = view.append(ContainerId::View, "div", Some("outer")).unwrap();
        let inner = view.append(outer.into(), "div", Some("inner")).unwrap();
        assert!(view.remove(ContainerId::View, outer));
        assert!(view.element(inner).is_none());
        assert_eq!(view.element_by_name("inner"), None);
        assert!(!view.remove(ContainerId::View, outer));
    }

    #[test]
    fn test_reorder() {
        let mut view = View::new(10.0, 10.0);
        let a = view.append(ContainerId::View, "div", None).unwrap();
        let b = view.append(ContainerId::View, "div", None).unwrap();
        let c = view.append(ContainerId::View, "div", None).unwrap();
        view.reorder(ContainerId::View, c, Some(a)).unwrap();
        assert_eq!(view.root.children(), &[c, a, b]);
        view.reorder(ContainerId::View, c, None).unwrap();
        assert_eq!(view.root.children(), &[a, b, c]);
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let mut view = View::new(10.0, 10.0);
        let first = view.append(ContainerId::View, "div", Some("x")).unwrap();
        let second = view.append(ContainerId::View, "div", Some("x")).unwrap();
        assert_eq!(view.element_by_name("x"), Some(first));
        assert_eq!(view.child_by_name(ContainerId::View, "x"), Some(first));
        assert_eq!(view.index_by_name(ContainerId::View, ""), None);

        view.remove(ContainerId::View, second);
        assert_eq!(view.element_by_name("x"), Some(first));
    }
}
