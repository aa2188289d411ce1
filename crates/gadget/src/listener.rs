//! Event listeners attached to elements and views.
//!
//! Listeners receive `&mut View`, so they can edit the tree, including
//! removing the element they are attached to. A listener returning
//! [`EventResult::Canceled`] suppresses the element's built-in behavior for
//! that event (a canceled click does not toggle a checkbox).

use std::rc::Rc;

use crate::element::ElementId;
use crate::error::{ElementError, ViewResult};
use crate::event::{ElementEvent, EventResult, EventType};
use crate::view::View;

slotmap::new_key_type! {
    /// Identifier of a connected listener.
    pub struct ListenerId;
}

/// Listener attached to an element.
pub type ElementListener = Rc<dyn Fn(&mut View, ElementId, &ElementEvent) -> EventResult>;

/// Listener attached to the view.
pub type ViewListener = Rc<dyn Fn(&mut View, &ElementEvent) -> EventResult>;

#[derive(Clone)]
pub(crate) enum ListenerSlot {
    Element(ElementId, ElementListener),
    View(ViewListener),
}

#[derive(Clone)]
pub(crate) struct Listener {
    kind: EventType,
    /// Connection order; slot map iteration order is not stable.
    seq: u64,
    slot: ListenerSlot,
}

impl Listener {
    pub(crate) fn target(&self) -> Option<ElementId> {
        match self.slot {
            ListenerSlot::Element(id, _) => Some(id),
            ListenerSlot::View(_) => None,
        }
    }
}

impl View {
    fn add_listener(&mut self, kind: EventType, slot: ListenerSlot) -> ListenerId {
        self.listener_seq += 1;
        let seq = self.listener_seq;
        self.listeners.insert(Listener { kind, seq, slot })
    }

    /// Listen for `kind` events on `element`.
    pub fn connect(
        &mut self,
        element: ElementId,
        kind: EventType,
        listener: impl Fn(&mut View, ElementId, &ElementEvent) -> EventResult + 'static,
    ) -> ViewResult<ListenerId> {
        if !self.nodes.contains_key(element) {
            return Err(ElementError::UnknownElement(element).into());
        }
        Ok(self.add_listener(kind, ListenerSlot::Element(element, Rc::new(listener))))
    }

    /// Listen for `kind` events at view level.
    pub fn connect_view(
        &mut self,
        kind: EventType,
        listener: impl Fn(&mut View, &ElementEvent) -> EventResult + 'static,
    ) -> ListenerId {
        self.add_listener(kind, ListenerSlot::View(Rc::new(listener)))
    }

    /// Disconnect a listener. Returns whether it was connected.
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Listeners for one target and event type, in connection order.
    fn matching_listeners(&self, target: Option<ElementId>, kind: EventType) -> Vec<ListenerSlot> {
        let mut matching: Vec<&Listener> = self
            .listeners
            .values()
            .filter(|l| l.kind == kind && l.target() == target)
            .collect();
        matching.sort_by_key(|l| l.seq);
        matching.into_iter().map(|l| l.slot.clone()).collect()
    }

    /// Deliver an event to an element: listeners first, then the built-in
    /// behavior unless a listener canceled it.
    pub(crate) fn fire_element_event(&mut self, id: ElementId, event: &ElementEvent) -> EventResult {
        self.dispatch_depth += 1;
        let result = self.deliver(id, event);
        self.dispatch_depth -= 1;
        if self.dispatch_depth == 0 {
            self.flush_pending_events();
        }
        result
    }

    fn deliver(&mut self, id: ElementId, event: &ElementEvent) -> EventResult {
        let mut result = EventResult::Unhandled;
        for slot in self.matching_listeners(Some(id), event.kind) {
            if !self.nodes.contains_key(id) {
                return result.max(EventResult::Handled);
            }
            if let ListenerSlot::Element(_, listener) = slot {
                result = result.max(listener(self, id, event));
            }
        }
        if !self.nodes.contains_key(id) {
            return result.max(EventResult::Handled);
        }
        if result == EventResult::Canceled {
            tracing::trace!(target: "gadget::event", ?id, kind = ?event.kind, "built-in behavior canceled");
            return result;
        }
        if let Some(handled) = self.with_behavior(id, |behavior, view| behavior.on_event(view, id, event)) {
            result = result.max(handled);
        }
        result
    }

    /// Deliver an event to view-level listeners.
    pub(crate) fn fire_view_event(&mut self, event: &ElementEvent) -> EventResult {
        self.dispatch_depth += 1;
        let mut result = EventResult::Unhandled;
        for slot in self.matching_listeners(None, event.kind) {
            if let ListenerSlot::View(listener) = slot {
                result = result.max(listener(self, event));
            }
        }
        self.dispatch_depth -= 1;
        if self.dispatch_depth == 0 {
            self.flush_pending_events();
        }
        result
    }

    /// Deliver events posted by behaviors, now that every behavior is back in
    /// its node.
    pub(crate) fn flush_pending_events(&mut self) {
        while let Some((id, event)) = self.pending_events.pop_front() {
            if self.nodes.contains_key(id) {
                self.fire_element_event(id, &event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ContainerId;
    use std::cell::RefCell;

    #[test]
    fn test_listeners_run_in_connection_order() {
        let mut view = View::new(10.0, 10.0);
        let id = view.append(ContainerId::View, "div", None).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ids = Vec::new();
        for n in 0..4 {
            let log = Rc::clone(&log);
            ids.push(
                view.connect(id, EventType::Click, move |_, _, _| {
                    log.borrow_mut().push(n);
                    EventResult::Handled
                })
                .unwrap(),
            );
        }
        // Free a slot so a later connection reuses it.
        assert!(view.disconnect(ids[1]));
        assert!(!view.disconnect(ids[1]));
        let log2 = Rc::clone(&log);
        view.connect(id, EventType::Click, move |_, _, _| {
            log2.borrow_mut().push(9);
            EventResult::Unhandled
        })
        .unwrap();

        let result = view.fire_element_event(id, &ElementEvent::simple(EventType::Click));
        assert_eq!(result, EventResult::Handled);
        assert_eq!(*log.borrow(), [0, 2, 3, 9]);
    }

    #[test]
    fn test_connect_to_unknown_element() {
        let mut view = View::new(10.0, 10.0);
        let id = view.append(ContainerId::View, "div", None).unwrap();
        view.remove(ContainerId::View, id);
        assert!(view.connect(id, EventType::Click, |_, _, _| EventResult::Handled).is_err());
    }

    #[test]
    fn test_removed_element_drops_listeners() {
        let mut view = View::new(10.0, 10.0);
        let id = view.append(ContainerId::View, "div", None).unwrap();
        view.connect(id, EventType::Click, |_, _, _| EventResult::Handled).unwrap();
        view.connect_view(EventType::Click, |_, _| EventResult::Handled);
        view.remove(ContainerId::View, id);
        assert_eq!(view.listeners.len(), 1);
    }

    #[test]
    fn test_listener_removing_its_element_is_handled() {
        let mut view = View::new(10.0, 10.0);
        let id = view.append(ContainerId::View, "div", None).unwrap();
        view.connect(id, EventType::Click, |view, id, _| {
            view.remove(ContainerId::View, id);
            EventResult::Unhandled
        })
        .unwrap();
        view.connect(id, EventType::Click, |_, _, _| panic!("listener of a removed element ran"))
            .unwrap();
        let result = view.fire_element_event(id, &ElementEvent::simple(EventType::Click));
        assert_eq!(result, EventResult::Handled);
        assert!(view.element(id).is_none());
    }
}
