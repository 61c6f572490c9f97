//! Integration tests for the tween layer
//!
//! Covers endpoint snapshotting, eased interpolation, composite payloads,
//! and target exclusivity between tweens.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cadence_animation::{Easing, Properties, Scheduler, Tween, Value};

fn target_with(key: &str, value: impl Into<Value>) -> Rc<RefCell<Properties>> {
    Rc::new(RefCell::new(Properties::new().with(key, value)))
}

#[test]
fn test_out3_eased_midpoint() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);

    Tween::new()
        .to("value", 10.0)
        .ease_named("out3")
        .spawn(&scheduler, &target, 1.0);

    scheduler.tick(0.5);

    // out3(0.5) = 1 - (1 - 0.5)^3 = 0.875
    let value = target.borrow().number("value").unwrap();
    assert!((value - 8.75).abs() < 1e-4);

    scheduler.tick(0.5);
    assert_eq!(target.borrow().number("value"), Some(10.0));
}

#[test]
fn test_linear_default_ease() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);

    Tween::new().to("value", 4.0).spawn(&scheduler, &target, 1.0);
    scheduler.tick(0.25);

    let value = target.borrow().number("value").unwrap();
    assert!((value - 1.0).abs() < 1e-4);
}

#[test]
fn test_custom_ease_function() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);

    Tween::new()
        .to("value", 10.0)
        .ease(Easing::custom(|t| t * t))
        .spawn(&scheduler, &target, 1.0);
    scheduler.tick(0.5);

    let value = target.borrow().number("value").unwrap();
    assert!((value - 2.5).abs() < 1e-4);
}

#[test]
fn test_endpoints_snapshot_at_creation() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);

    Tween::new().to("value", 10.0).spawn(&scheduler, &target, 1.0);

    // Mutating the live target does not move the snapshotted endpoints
    target.borrow_mut().set("value", 99.0);
    scheduler.tick(0.5);
    let value = target.borrow().number("value").unwrap();
    assert!((value - 5.0).abs() < 1e-4);

    scheduler.tick(0.5);
    assert_eq!(target.borrow().number("value"), Some(10.0));
}

#[test]
fn test_explicit_from_overrides_current_value() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 1.0);

    Tween::new()
        .from("value", 8.0)
        .to("value", 10.0)
        .spawn(&scheduler, &target, 1.0);
    scheduler.tick(0.5);

    let value = target.borrow().number("value").unwrap();
    assert!((value - 9.0).abs() < 1e-4);
}

#[test]
fn test_from_only_key_snapshots_current_as_destination() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 1.0);

    // "to" is snapshotted from the target's current value (1.0)
    Tween::new().from("value", 5.0).spawn(&scheduler, &target, 1.0);
    scheduler.tick(0.5);

    let value = target.borrow().number("value").unwrap();
    assert!((value - 3.0).abs() < 1e-4);
}

#[test]
fn test_composite_interpolates_named_fields_in_place() {
    let scheduler = Scheduler::new();
    let target = Rc::new(RefCell::new(Properties::new().with(
        "rotation",
        Value::composite([("x", 0.0), ("y", 2.0), ("z", 0.5)]),
    )));

    Tween::new()
        .to("rotation", Value::composite([("x", 1.0), ("y", 0.0)]))
        .spawn(&scheduler, &target, 1.0);
    scheduler.tick(0.5);

    let props = target.borrow();
    let rotation = props.get("rotation").unwrap();
    assert!((rotation.field("x").unwrap() - 0.5).abs() < 1e-4);
    assert!((rotation.field("y").unwrap() - 1.0).abs() < 1e-4);
    // Field absent from "to" holds its snapshotted value
    assert!((rotation.field("z").unwrap() - 0.5).abs() < 1e-4);
}

#[test]
fn test_unknown_key_is_ignored() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);

    Tween::new()
        .to("value", 1.0)
        .to("missing", 5.0)
        .spawn(&scheduler, &target, 1.0);
    scheduler.tick(1.0);

    let props = target.borrow();
    assert_eq!(props.number("value"), Some(1.0));
    assert!(props.get("missing").is_none());
}

#[test]
fn test_second_tween_for_same_target_cancels_first() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);
    let first_completed = Rc::new(Cell::new(false));

    let completed = first_completed.clone();
    let first = Tween::new()
        .to("value", 10.0)
        .on_complete(move || completed.set(true))
        .spawn(&scheduler, &target, 1.0);

    scheduler.tick(0.1);

    let second = Tween::new().to("value", 0.0).spawn(&scheduler, &target, 1.0);
    assert!(first.is_destroyed());
    assert!(!second.is_destroyed());

    // The first tween never completes, and only the second one writes
    scheduler.tick(1.0);
    assert!(!first_completed.get());
    assert_eq!(target.borrow().number("value"), Some(0.0));
}

#[test]
fn test_tweens_on_distinct_targets_coexist() {
    let scheduler = Scheduler::new();
    let a = target_with("value", 0.0);
    let b = target_with("value", 0.0);

    let first = Tween::new().to("value", 1.0).spawn(&scheduler, &a, 1.0);
    let second = Tween::new().to("value", 2.0).spawn(&scheduler, &b, 1.0);
    assert!(!first.is_destroyed());
    assert!(!second.is_destroyed());

    scheduler.tick(1.0);
    assert_eq!(a.borrow().number("value"), Some(1.0));
    assert_eq!(b.borrow().number("value"), Some(2.0));
}

#[test]
fn test_on_change_fires_after_interpolation() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);
    let observed = Rc::new(RefCell::new(Vec::new()));

    let observed_cb = observed.clone();
    let target_cb = target.clone();
    Tween::new()
        .to("value", 10.0)
        .on_change(move || {
            observed_cb
                .borrow_mut()
                .push(target_cb.borrow().number("value").unwrap());
        })
        .spawn(&scheduler, &target, 1.0);

    scheduler.tick(0.5);
    scheduler.tick(0.5);

    // Each observation sees the value already written for that frame
    let observed = observed.borrow();
    assert_eq!(observed.len(), 2);
    assert!((observed[0] - 5.0).abs() < 1e-4);
    assert!((observed[1] - 10.0).abs() < 1e-4);
}

#[test]
fn test_on_complete_fires_once() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);
    let completions = Rc::new(Cell::new(0u32));

    let completions_cb = completions.clone();
    Tween::new()
        .to("value", 1.0)
        .on_complete(move || completions_cb.set(completions_cb.get() + 1))
        .spawn(&scheduler, &target, 0.5);

    scheduler.tick(0.5);
    scheduler.tick(0.5);
    assert_eq!(completions.get(), 1);
}

#[test]
fn test_delayed_tween_holds_until_start() {
    let scheduler = Scheduler::new();
    let target = target_with("value", 0.0);

    Tween::new()
        .to("value", 10.0)
        .spawn(&scheduler, &target, (1.0, 0.5));

    scheduler.tick(0.25);
    assert_eq!(target.borrow().number("value"), Some(0.0));

    scheduler.tick(0.25);
    assert_eq!(target.borrow().number("value"), Some(0.0));

    scheduler.tick(0.5);
    let value = target.borrow().number("value").unwrap();
    assert!((value - 5.0).abs() < 1e-4);
}
