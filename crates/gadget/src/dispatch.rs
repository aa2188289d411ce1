//! Mouse event routing.
//!
//! # Event flow
//!
//! 1. **Grab**: after a mouse down, move and up events go straight to the
//!    element that fired for the down, until the button is released.
//!
//! 2. **Hit testing**: otherwise the event descends from the view. Each
//!    container tries its children topmost first, converting the position
//!    into the child's local space and skipping children that are hidden,
//!    fully transparent or marked [`HitTest::Transparent`]. Inside a child,
//!    its own children get the first chance. The first element that fires
//!    stops the search.
//!
//! 3. **Hover**: the topmost element under the pointer becomes the hovered
//!    element. `MouseOut` and `MouseOver` are delivered to the elements that
//!    lose and gain hover.
//!
//! 4. **View fan-out**: click, double click, down and up events that fired
//!    an element are then delivered to view-level listeners. Move and wheel
//!    events never reach view listeners.

use gadget_render::Point;

use crate::element::{ContainerId, ElementId};
use crate::event::{ElementEvent, EventResult, EventType, HitTest};
use crate::view::View;

const EVENT_TARGET: &str = gadget_core::logging::targets::EVENT;

/// Result of routing an event through part of the tree.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DispatchOutcome {
    pub result: EventResult,
    /// The element whose handlers ran.
    pub fired: Option<ElementId>,
    /// The topmost element under the pointer, fired or not.
    pub in_element: Option<ElementId>,
}

impl View {
    /// Route a mouse event given in view coordinates.
    ///
    /// `MouseOver` and `MouseOut` here mean the pointer entered or left the
    /// whole view.
    #[tracing::instrument(skip_all, target = "gadget::event", level = "trace", fields(kind = ?event.kind))]
    pub fn on_mouse_event(&mut self, event: &ElementEvent) -> EventResult {
        match event.kind {
            EventType::MouseOver => return self.fire_view_event(event),
            EventType::MouseOut => {
                self.update_hover(None, event);
                return self.fire_view_event(event);
            }
            kind if !kind.is_mouse() => {
                tracing::debug!(target: EVENT_TARGET, ?kind, "non-mouse event passed to on_mouse_event");
                return EventResult::Unhandled;
            }
            _ => {}
        }

        if let Some(result) = self.dispatch_to_grab(event) {
            return result;
        }

        let outcome = self.dispatch_container(ContainerId::View, event);
        self.update_hover(outcome.in_element, event);

        let mut result = outcome.result;
        if let Some(fired) = outcome.fired {
            tracing::trace!(target: EVENT_TARGET, ?fired, ?result, "mouse event fired");
            if event.kind == EventType::MouseDown && self.nodes.contains_key(fired) {
                self.grab = Some(fired);
                self.set_focus(Some(fired));
            }
            if event.kind.fans_out_to_view() {
                result = result.max(self.fire_view_event(event));
            }
        }
        result
    }

    fn dispatch_to_grab(&mut self, event: &ElementEvent) -> Option<EventResult> {
        let grab = self.grab?;
        if !matches!(event.kind, EventType::MouseMove | EventType::MouseUp) {
            return None;
        }
        let Some(local) = self.view_coord_to_element_coord(grab, Point::new(event.x, event.y)) else {
            self.grab = None;
            return None;
        };

        let enabled = self.nodes.get(grab).is_some_and(|n| n.is_enabled());
        let mut result = if enabled {
            self.fire_element_event(grab, &event.at(local.x, local.y))
        } else {
            EventResult::Unhandled
        };
        if event.kind == EventType::MouseUp {
            self.grab = None;
            result = result.max(self.fire_view_event(event));
        }
        Some(result)
    }

    fn update_hover(&mut self, hovered: Option<ElementId>, event: &ElementEvent) {
        let hovered = hovered.filter(|&id| self.nodes.contains_key(id));
        if self.hover == hovered {
            return;
        }
        let old = std::mem::replace(&mut self.hover, hovered);
        let point = Point::new(event.x, event.y);
        if let Some(old) = old {
            if let Some(local) = self.view_coord_to_element_coord(old, point) {
                let out = ElementEvent::mouse(EventType::MouseOut, local.x, local.y, event.button);
                self.fire_element_event(old, &out);
            }
        }
        if let Some(new) = hovered {
            if self.hover != Some(new) {
                return;
            }
            if let Some(local) = self.view_coord_to_element_coord(new, point) {
                let over = ElementEvent::mouse(EventType::MouseOver, local.x, local.y, event.button);
                self.fire_element_event(new, &over);
            }
        }
    }

    /// Hit test the children of `container`, topmost first. The event
    /// position is in the container owner's space.
    pub(crate) fn dispatch_container(
        &mut self,
        container: ContainerId,
        event: &ElementEvent,
    ) -> DispatchOutcome {
        let Ok(elements) = self.container(container) else {
            return DispatchOutcome::default();
        };
        let owner = elements.owner();
        let children = elements.children.clone();
        let point = Point::new(event.x, event.y);
        let mut outcome = DispatchOutcome::default();

        for &child in children.iter().rev() {
            let Some(node) = self.nodes.get(child) else {
                continue;
            };
            if !node.is_visible() || node.opacity() == 0.0 || node.hittest() == HitTest::Transparent {
                continue;
            }
            let local = self.parent_point_to_child(owner, child, point);
            let Some(node) = self.nodes.get(child) else {
                continue;
            };
            if !node.is_point_in(local) {
                continue;
            }

            let flip = node.flip();
            let mirrored = node.mirror_point(local);
            let mut child_event = event.at(mirrored.x, mirrored.y);
            if flip.horizontal {
                child_event.wheel_delta_x = -child_event.wheel_delta_x;
            }
            if flip.vertical {
                child_event.wheel_delta_y = -child_event.wheel_delta_y;
            }

            let inner = self.dispatch_element(child, &child_event);
            if outcome.in_element.is_none() {
                outcome.in_element = inner.in_element;
            }
            if inner.fired.is_some() || !self.nodes.contains_key(child) {
                outcome.result = inner.result;
                outcome.fired = inner.fired;
                break;
            }
        }
        outcome
    }

    /// Deliver an event to an element hit at a local position: its children
    /// first, then the element itself.
    fn dispatch_element(&mut self, id: ElementId, event: &ElementEvent) -> DispatchOutcome {
        let has_children = self.nodes.get(id).is_some_and(|n| n.children.is_some());
        let inner = if has_children {
            self.dispatch_container(ContainerId::Element(id), event)
        } else {
            DispatchOutcome::default()
        };
        if inner.fired.is_some() {
            return inner;
        }
        let Some(node) = self.nodes.get(id) else {
            return DispatchOutcome {
                result: EventResult::Handled,
                ..inner
            };
        };

        let in_element = inner.in_element.or(Some(id));
        if !node.is_enabled() {
            return DispatchOutcome {
                result: EventResult::Unhandled,
                fired: None,
                in_element,
            };
        }
        let result = self.fire_element_event(id, event);
        DispatchOutcome {
            result,
            fired: Some(id),
            in_element,
        }
    }

    /// Map a point from the space of `owner` (or the view) into `child`,
    /// honoring the owner's coordinate override.
    fn parent_point_to_child(&self, owner: Option<ElementId>, child: ElementId, point: Point) -> Point {
        let Some(node) = self.nodes.get(child) else {
            return point;
        };
        match owner
            .and_then(|o| self.nodes.get(o))
            .and_then(|o| o.behavior.as_deref())
        {
            Some(behavior) => behavior.self_coord_to_child_coord(node, point),
            None => node.parent_coord_to_self_coord(point),
        }
    }

    fn child_point_to_parent(&self, owner: Option<ElementId>, child: ElementId, point: Point) -> Point {
        let Some(node) = self.nodes.get(child) else {
            return point;
        };
        match owner
            .and_then(|o| self.nodes.get(o))
            .and_then(|o| o.behavior.as_deref())
        {
            Some(behavior) => behavior.child_coord_to_self_coord(node, point),
            None => node.self_coord_to_parent_coord(point),
        }
    }

    /// Map a point in view coordinates into the local space of `id`,
    /// through every ancestor. Returns `None` for an unknown element.
    pub fn view_coord_to_element_coord(&self, id: ElementId, point: Point) -> Option<Point> {
        let mut chain = vec![id];
        let mut current = self.nodes.get(id)?.parent_element();
        while let Some(ancestor) = current {
            chain.push(ancestor);
            current = self.nodes.get(ancestor)?.parent_element();
        }

        let mut point = point;
        for &element in chain.iter().rev() {
            let node = self.nodes.get(element)?;
            point = self.parent_point_to_child(node.parent_element(), element, point);
            point = node.mirror_point(point);
        }
        Some(point)
    }

    /// Map a point in the local space of `id` into view coordinates.
    pub fn element_coord_to_view_coord(&self, id: ElementId, point: Point) -> Option<Point> {
        let mut point = point;
        let mut current = Some(id);
        while let Some(element) = current {
            let node = self.nodes.get(element)?;
            point = node.mirror_point(point);
            let owner = node.parent_element();
            point = self.child_point_to_parent(owner, element, point);
            current = owner;
        }
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{FlipMode, MouseButton};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn boxed(view: &mut View, container: ContainerId, x: f64, y: f64, w: f64, h: f64) -> ElementId {
        let id = view.append(container, "div", None).unwrap();
        view.element_mut(id).unwrap().set_rect(x, y, w, h);
        id
    }

    fn record(view: &mut View, id: ElementId, kind: EventType) -> Rc<RefCell<Vec<(f64, f64)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        view.connect(id, kind, move |_, _, e| {
            sink.borrow_mut().push((e.x, e.y));
            EventResult::Handled
        })
        .unwrap();
        log
    }

    fn click(x: f64, y: f64) -> ElementEvent {
        ElementEvent::mouse(EventType::Click, x, y, MouseButton::Left)
    }

    #[test]
    fn test_child_receives_local_coordinates() {
        let mut view = View::new(100.0, 100.0);
        let outer = boxed(&mut view, ContainerId::View, 10.0, 10.0, 50.0, 50.0);
        let inner = boxed(&mut view, outer.into(), 5.0, 5.0, 10.0, 10.0);
        let log = record(&mut view, inner, EventType::Click);
        view.layout();

        assert_eq!(view.on_mouse_event(&click(17.0, 18.0)), EventResult::Handled);
        assert_eq!(*log.borrow(), [(2.0, 3.0)]);
    }

    #[test]
    fn test_transparent_and_disabled_elements() {
        let mut view = View::new(100.0, 100.0);
        let below = boxed(&mut view, ContainerId::View, 0.0, 0.0, 20.0, 20.0);
        let above = boxed(&mut view, ContainerId::View, 0.0, 0.0, 20.0, 20.0);
        let below_log = record(&mut view, below, EventType::Click);
        let above_log = record(&mut view, above, EventType::Click);
        view.layout();

        view.element_mut(above).unwrap().set_hittest(HitTest::Transparent);
        view.on_mouse_event(&click(5.0, 5.0));
        assert_eq!(below_log.borrow().len(), 1);

        view.element_mut(above).unwrap().set_hittest(HitTest::Client);
        view.element_mut(above).unwrap().set_enabled(false);
        view.on_mouse_event(&click(5.0, 5.0));
        assert_eq!(below_log.borrow().len(), 2);
        assert!(above_log.borrow().is_empty());
    }

    #[test]
    fn test_flipped_element_mirrors_coordinates() {
        let mut view = View::new(100.0, 100.0);
        let id = boxed(&mut view, ContainerId::View, 0.0, 0.0, 10.0, 10.0);
        view.element_mut(id).unwrap().set_flip(FlipMode::HORIZONTAL);
        let log = record(&mut view, id, EventType::Click);
        let wheel = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&wheel);
        view.connect(id, EventType::MouseWheel, move |_, _, e| {
            sink.borrow_mut().push((e.wheel_delta_x, e.wheel_delta_y));
            EventResult::Handled
        })
        .unwrap();
        view.layout();

        view.on_mouse_event(&click(2.0, 1.0));
        assert_eq!(*log.borrow(), [(8.0, 1.0)]);
        view.on_mouse_event(&ElementEvent::wheel(2.0, 1.0, 3, 4));
        assert_eq!(*wheel.borrow(), [(-3, 4)]);
    }

    #[test]
    fn test_hover_tracking() {
        let mut view = View::new(100.0, 100.0);
        let a = boxed(&mut view, ContainerId::View, 0.0, 0.0, 10.0, 10.0);
        let b = boxed(&mut view, ContainerId::View, 20.0, 0.0, 10.0, 10.0);
        view.element_mut(b).unwrap().set_tooltip(Some("second"));
        let a_out = record(&mut view, a, EventType::MouseOut);
        let b_over = record(&mut view, b, EventType::MouseOver);
        view.layout();

        let mv = |x, y| ElementEvent::mouse(EventType::MouseMove, x, y, MouseButton::None);
        view.on_mouse_event(&mv(5.0, 5.0));
        assert_eq!(view.hovered_element(), Some(a));
        view.on_mouse_event(&mv(25.0, 5.0));
        assert_eq!(view.hovered_element(), Some(b));
        assert_eq!(view.hovered_tooltip(), Some("second"));
        assert_eq!(*a_out.borrow(), [(25.0, 5.0)]);
        assert_eq!(*b_over.borrow(), [(5.0, 5.0)]);

        view.on_mouse_event(&ElementEvent::simple(EventType::MouseOut));
        assert_eq!(view.hovered_element(), None);
    }

    #[test]
    fn test_view_fan_out() {
        let mut view = View::new(100.0, 100.0);
        let id = boxed(&mut view, ContainerId::View, 0.0, 0.0, 10.0, 10.0);
        view.connect(id, EventType::Click, |_, _, _| EventResult::Handled).unwrap();
        let kinds = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventType::Click, EventType::MouseMove, EventType::MouseWheel] {
            let kinds = Rc::clone(&kinds);
            view.connect_view(kind, move |_, e| {
                kinds.borrow_mut().push(e.kind);
                EventResult::Unhandled
            });
        }
        view.layout();

        view.on_mouse_event(&click(5.0, 5.0));
        view.on_mouse_event(&click(50.0, 50.0));
        view.on_mouse_event(&ElementEvent::mouse(EventType::MouseMove, 5.0, 5.0, MouseButton::None));
        view.on_mouse_event(&ElementEvent::wheel(5.0, 5.0, 0, 1));
        assert_eq!(*kinds.borrow(), [EventType::Click]);
    }

    #[test]
    fn test_coordinate_round_trip_through_ancestors() {
        let mut view = View::new(200.0, 200.0);
        let outer = boxed(&mut view, ContainerId::View, 30.0, 40.0, 100.0, 100.0);
        view.element_mut(outer).unwrap().set_rotation(30.0);
        let inner = boxed(&mut view, outer.into(), 10.0, 5.0, 20.0, 20.0);
        view.element_mut(inner).unwrap().set_flip(FlipMode::VERTICAL);
        view.layout();

        let p = Point::new(57.0, 81.0);
        let local = view.view_coord_to_element_coord(inner, p).unwrap();
        let back = view.element_coord_to_view_coord(inner, local).unwrap();
        assert!((back.x - p.x).abs() < 1e-8);
        assert!((back.y - p.y).abs() < 1e-8);
    }
}
