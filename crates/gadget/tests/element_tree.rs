//! Integration tests for element trees: structure, redraw bookkeeping and
//! hit testing through a real view.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gadget::widgets::Div;
use gadget::{
    Color, ContainerId, ElementError, ElementEvent, ElementId, EventResult, EventType, MouseButton, View,
    ViewError,
};

fn placed(view: &mut View, container: ContainerId, name: Option<&str>, rect: [f64; 4]) -> ElementId {
    let id = view.append(container, "div", name).unwrap();
    view.element_mut(id).unwrap().set_rect(rect[0], rect[1], rect[2], rect[3]);
    id
}

fn click(x: f64, y: f64) -> ElementEvent {
    ElementEvent::mouse(EventType::Click, x, y, MouseButton::Left)
}

#[test]
fn test_idempotent_setter_requests_one_redraw() {
    let mut view = View::new(100.0, 100.0);
    let id = view.append(ContainerId::View, "div", None).unwrap();
    view.draw();
    let before = view.redraw_request_count();

    assert!(view.element_mut(id).unwrap().set_pixel_width(40.0));
    view.draw();
    assert!(!view.element_mut(id).unwrap().set_pixel_width(40.0));

    assert!(!view.element(id).unwrap().dirty().any());
    assert!(!view.is_redraw_queued());
    assert_eq!(view.redraw_request_count(), before + 1);
}

#[test]
fn test_dirty_flags_cleared_after_draw() {
    let mut view = View::new(100.0, 100.0);
    let shown = placed(&mut view, ContainerId::View, None, [0.0, 0.0, 20.0, 20.0]);
    let hidden = placed(&mut view, ContainerId::View, None, [10.0, 10.0, 20.0, 20.0]);
    let transparent = placed(&mut view, ContainerId::View, None, [10.0, 10.0, 20.0, 20.0]);
    let nested = placed(&mut view, shown.into(), None, [1.0, 1.0, 5.0, 5.0]);
    view.element_mut(hidden).unwrap().set_visible(false);
    view.element_mut(transparent).unwrap().set_opacity(0.0);

    view.draw();
    for id in [shown, hidden, transparent, nested] {
        assert!(!view.element(id).unwrap().dirty().any(), "{id:?} still dirty");
    }
}

#[test]
fn test_topmost_sibling_wins_hit_test() {
    let mut view = View::new(100.0, 100.0);
    let log = Rc::new(RefCell::new(Vec::new()));
    for name in ["A", "B", "C"] {
        let id = placed(&mut view, ContainerId::View, Some(name), [0.0, 0.0, 50.0, 50.0]);
        let log = Rc::clone(&log);
        view.connect(id, EventType::Click, move |_, _, _| {
            log.borrow_mut().push(name);
            EventResult::Handled
        })
        .unwrap();
    }
    view.layout();

    assert_eq!(view.on_mouse_event(&click(25.0, 25.0)), EventResult::Handled);
    assert_eq!(*log.borrow(), ["C"]);
}

#[test]
fn test_append_remove_keeps_name_table_consistent() {
    let mut view = View::new(100.0, 100.0);
    let panel = view.append(ContainerId::View, "div", Some("panel")).unwrap();
    let label = view.append(panel.into(), "img", Some("label")).unwrap();
    assert_eq!(view.index_by_name(panel.into(), "label"), Some(0));
    assert_eq!(view.element_by_name("label"), Some(label));

    assert!(view.remove(panel.into(), label));
    assert_eq!(view.index_by_name(panel.into(), "label"), None);
    assert_eq!(view.element_by_name("label"), None);
    assert!(!view.remove(panel.into(), label));

    view.append(panel.into(), "img", Some("label")).unwrap();
    view.remove(ContainerId::View, panel);
    assert_eq!(view.element_by_name("panel"), None);
    assert_eq!(view.element_by_name("label"), None);
    assert_eq!(view.element_count(), 0);
}

#[test]
fn test_unknown_kind_is_recoverable() {
    let mut view = View::new(100.0, 100.0);
    let err = view.append(ContainerId::View, "marquee", Some("m")).unwrap_err();
    assert!(matches!(err, ViewError::Element(ElementError::UnknownKind(ref kind)) if kind == "marquee"));
    assert_eq!(view.element_count(), 0);
    assert_eq!(view.element_by_name("m"), None);
}

#[test]
fn test_scrollable_container_extent() {
    let mut view = View::new(200.0, 200.0);
    let outer = view.append(ContainerId::View, "div", None).unwrap();
    view.set_scrollable(outer.into(), true).unwrap();
    let child = placed(&mut view, outer.into(), None, [40.0, 50.0, 7.0, 8.0]);

    view.layout();
    assert_eq!(view.children_extent(outer.into()), Some((47.0, 58.0)));

    {
        let mut e = view.element_mut(child).unwrap();
        e.set_pixel_pin_x(3.0);
        e.set_pixel_pin_y(4.0);
    }
    view.layout();
    assert_eq!(view.children_extent(outer.into()), Some((44.0, 54.0)));
}

#[test]
fn test_click_handler_removing_its_element() {
    let mut view = View::new(100.0, 100.0);
    let below = placed(&mut view, ContainerId::View, None, [0.0, 0.0, 50.0, 50.0]);
    let doomed = placed(&mut view, ContainerId::View, Some("doomed"), [0.0, 0.0, 50.0, 50.0]);
    let below_clicked = Rc::new(Cell::new(false));
    let flag = Rc::clone(&below_clicked);
    view.connect(below, EventType::Click, move |_, _, _| {
        flag.set(true);
        EventResult::Handled
    })
    .unwrap();
    view.connect(doomed, EventType::Click, |view, id, _| {
        view.remove(ContainerId::View, id);
        EventResult::Unhandled
    })
    .unwrap();
    view.draw();

    assert_eq!(view.on_mouse_event(&click(10.0, 10.0)), EventResult::Handled);
    assert!(view.element(doomed).is_none());
    assert!(!below_clicked.get());
    assert_eq!(view.hovered_element(), None);

    assert!(view.draw());
    view.on_mouse_event(&click(10.0, 10.0));
    assert!(below_clicked.get());
}

#[test]
fn test_clearing_container_during_layout_aborts_pass() {
    #[derive(Debug)]
    struct Clearer;

    impl gadget::ElementBehavior for Clearer {
        fn kind(&self) -> &'static str {
            "clearer"
        }

        fn layout(&mut self, view: &mut View, _id: ElementId) {
            view.remove_all(ContainerId::View);
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    let mut factory = gadget::DefaultElementFactory::new();
    factory.register("clearer", || Box::new(Clearer));
    let config = gadget::ViewConfig {
        width: 50.0,
        height: 50.0,
        ..Default::default()
    };
    let mut view = View::with_config(
        &config,
        Rc::new(gadget_render::SoftwareGraphics::new()),
        Rc::new(factory),
        Rc::new(gadget_render::MemoryImageLoader::new()),
    );
    view.append(ContainerId::View, "clearer", None).unwrap();
    placed(&mut view, ContainerId::View, None, [0.0, 0.0, 10.0, 10.0]);

    assert!(view.draw());
    assert_eq!(view.element_count(), 0);
    view.draw();
    assert_eq!(view.surface().unwrap().pixel(1, 1), Color::TRANSPARENT);
}

#[test]
fn test_reorder_changes_paint_order() {
    let mut view = View::new(20.0, 20.0);
    let red = placed(&mut view, ContainerId::View, None, [0.0, 0.0, 10.0, 10.0]);
    let blue = placed(&mut view, ContainerId::View, None, [0.0, 0.0, 10.0, 10.0]);
    view.update_behavior::<Div>(red, |d| d.set_background(Some(Color::RED)));
    view.update_behavior::<Div>(blue, |d| d.set_background(Some(Color::BLUE)));
    view.draw();
    assert_eq!(view.surface().unwrap().pixel(5, 5), Color::BLUE);

    view.reorder(ContainerId::View, blue, Some(red)).unwrap();
    assert_eq!(view.elements(ContainerId::View).unwrap().children(), [blue, red]);
    assert!(view.draw());
    assert_eq!(view.surface().unwrap().pixel(5, 5), Color::RED);
}

#[test]
fn test_geometry_strings() {
    let mut view = View::new(200.0, 100.0);
    let id = view.append(ContainerId::View, "div", None).unwrap();
    {
        let mut e = view.element_mut(id).unwrap();
        assert!(e.set_geometry_str(gadget::GeometryProperty::Width, "50%").unwrap());
        assert!(e.set_geometry_str(gadget::GeometryProperty::X, "40").unwrap());
        assert!(e.set_geometry_str(gadget::GeometryProperty::Height, "50x%").is_err());
        assert!(e.set_geometry_str(gadget::GeometryProperty::Height, "-5").is_err());
    }
    view.layout();
    let node = view.element(id).unwrap();
    assert_eq!((node.x(), node.width()), (40.0, 100.0));
}
