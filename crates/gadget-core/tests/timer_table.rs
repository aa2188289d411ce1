//! Integration tests for the timer table.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use gadget_core::{GadgetError, TimerError, TimerKind, TimerTable, TimerToken};

type Slot = Rc<dyn Fn(&mut Vec<String>, i32)>;

fn slot(f: impl Fn(&mut Vec<String>, i32) + 'static) -> Slot {
    Rc::new(f)
}

fn drain(table: &mut TimerTable<Slot>, now: Instant, log: &mut Vec<String>) {
    while let Some(due) = table.take_due(now) {
        (due.slot)(log, due.value);
    }
}

#[test]
fn test_mixed_timers_fire_in_deadline_order() {
    let now = Instant::now();
    let mut table: TimerTable<Slot> = TimerTable::new();
    let mut log = Vec::new();

    table
        .set_timeout(Duration::from_millis(30), slot(|l, _| l.push("late".into())), now)
        .unwrap();
    table
        .set_timeout(Duration::from_millis(10), slot(|l, _| l.push("early".into())), now)
        .unwrap();

    drain(&mut table, now + Duration::from_millis(40), &mut log);
    assert_eq!(log, vec!["early".to_string(), "late".to_string()]);
    assert!(table.is_empty());
}

#[test]
fn test_slot_can_cancel_its_own_interval() {
    let now = Instant::now();
    let table = Rc::new(RefCell::new(TimerTable::<Slot>::new()));

    let tick = slot(|l, _| l.push("tick".into()));
    let token = table
        .borrow_mut()
        .set_interval(Duration::from_millis(5), tick, now)
        .unwrap();

    let mut log = Vec::new();
    let due = table.borrow_mut().take_due(now + Duration::from_millis(5));
    if let Some(due) = due {
        (due.slot)(&mut log, due.value);
        assert_eq!(due.kind, TimerKind::Interval);
        assert_eq!(due.token, token);
        assert!(table.borrow_mut().cancel(due.token));
    }

    assert_eq!(log, vec!["tick".to_string()]);
    assert!(table.borrow_mut().take_due(now + Duration::from_secs(1)).is_none());
}

#[test]
fn test_animation_values_are_monotonic() {
    let now = Instant::now();
    let mut table: TimerTable<Slot> = TimerTable::new();
    let mut log = Vec::new();
    table
        .begin_animation(
            0,
            10,
            Duration::from_millis(100),
            slot(|l, v| l.push(v.to_string())),
            now,
        )
        .unwrap();

    let mut t = now;
    for _ in 0..20 {
        t += Duration::from_millis(10);
        drain(&mut table, t, &mut log);
    }

    let values: Vec<i32> = log.iter().filter_map(|v| v.parse().ok()).collect();
    assert_eq!(values.last(), Some(&10));
    assert!(values.windows(2).all(|w| w[0] < w[1]));
    assert!(table.is_empty());
}

#[test]
fn test_unknown_token_error() {
    let mut table: TimerTable<()> = TimerTable::new();
    let err = table.try_cancel(TimerToken::from_raw(42)).unwrap_err();
    assert!(matches!(
        err,
        GadgetError::Timer(TimerError::UnknownToken(token)) if token.get() == 42
    ));
    assert!(err.to_string().contains("42"));
}
