use uuid::Uuid;

use super::*;
use crate::sensor::{DragBackend, SensorConfig};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn pressed(sensor: SensorConfig) -> (DragMachine, LeadId) {
    let mut machine = DragMachine::new(sensor);
    let id = Uuid::new_v4();
    machine.pointer_down(id, LeadStatus::Qualified, pt(0.0, 0.0), 0);
    (machine, id)
}

fn dragging() -> (DragMachine, LeadId) {
    let (mut machine, id) = pressed(SensorConfig::standard());
    let event = machine.pointer_move(pt(20.0, 0.0), Some(LeadStatus::Qualified), 10);
    assert_eq!(event, DragEvent::Started { lead_id: id });
    (machine, id)
}

// =============================================================
// Activation
// =============================================================

#[test]
fn starts_idle() {
    let machine = DragMachine::default();
    assert!(machine.state().is_idle());
    assert_eq!(machine.state().active_id(), None);
}

#[test]
fn press_is_pending_not_dragging() {
    let (machine, id) = pressed(SensorConfig::standard());
    assert!(matches!(machine.state(), DragState::Pending { lead_id, .. } if *lead_id == id));
    assert_eq!(machine.state().active_id(), None);
}

#[test]
fn small_move_stays_pending() {
    let (mut machine, _) = pressed(SensorConfig::standard());
    assert_eq!(machine.pointer_move(pt(4.0, 0.0), None, 5), DragEvent::None);
    assert!(matches!(machine.state(), DragState::Pending { .. }));
}

#[test]
fn move_past_threshold_activates_with_hover() {
    let (machine, id) = dragging();
    assert_eq!(machine.state().active_id(), Some(id));
    assert_eq!(machine.state().over(), Some(LeadStatus::Qualified));
}

#[test]
fn second_press_while_pending_is_ignored() {
    let (mut machine, id) = pressed(SensorConfig::standard());
    machine.pointer_down(Uuid::new_v4(), LeadStatus::New, pt(50.0, 50.0), 1);
    assert!(matches!(machine.state(), DragState::Pending { lead_id, .. } if *lead_id == id));
}

#[test]
fn touch_activates_on_tick_after_delay() {
    let (mut machine, id) = pressed(SensorConfig::touch());
    assert_eq!(machine.tick(100), DragEvent::None);
    assert_eq!(machine.tick(260), DragEvent::Started { lead_id: id });
    assert_eq!(machine.state().active_id(), Some(id));
    assert_eq!(machine.state().over(), None);
}

#[test]
fn touch_abandons_when_scrolling() {
    let (mut machine, id) = pressed(SensorConfig::touch());
    assert_eq!(machine.pointer_move(pt(0.0, 30.0), None, 50), DragEvent::Abandoned { lead_id: id });
    assert!(machine.state().is_idle());
}

#[test]
fn native_backend_activates_on_first_move() {
    let sensor = SensorConfig { backend: DragBackend::Native, ..SensorConfig::standard() };
    let (mut machine, id) = pressed(sensor);
    assert_eq!(machine.pointer_move(pt(1.0, 0.0), None, 1), DragEvent::Started { lead_id: id });
}

#[test]
fn tick_never_activates_distance_or_native_sensors() {
    for sensor in [SensorConfig::immediate(), SensorConfig::native(), SensorConfig::standard()] {
        let (mut machine, id) = pressed(sensor);
        assert_eq!(machine.tick(10_000), DragEvent::None);
        assert!(matches!(machine.state(), DragState::Pending { .. }));
        assert_eq!(machine.pointer_up(Some(LeadStatus::Meeting)), DragEvent::Clicked { lead_id: id });
    }
}

#[test]
fn tick_outside_pending_does_nothing() {
    let (mut machine, _) = dragging();
    assert_eq!(machine.tick(10_000), DragEvent::None);
    let mut idle = DragMachine::default();
    assert_eq!(idle.tick(10_000), DragEvent::None);
}

// =============================================================
// Hover
// =============================================================

#[test]
fn hover_change_is_reported_once() {
    let (mut machine, _) = dragging();
    assert_eq!(
        machine.pointer_move(pt(200.0, 0.0), Some(LeadStatus::Meeting), 20),
        DragEvent::HoverChanged { over: Some(LeadStatus::Meeting) }
    );
    assert_eq!(machine.pointer_move(pt(210.0, 0.0), Some(LeadStatus::Meeting), 21), DragEvent::None);
    assert_eq!(
        machine.pointer_move(pt(900.0, 0.0), None, 22),
        DragEvent::HoverChanged { over: None }
    );
}

// =============================================================
// Release
// =============================================================

#[test]
fn release_while_pending_is_a_click() {
    let (mut machine, id) = pressed(SensorConfig::standard());
    assert_eq!(machine.pointer_up(Some(LeadStatus::Meeting)), DragEvent::Clicked { lead_id: id });
    assert!(machine.state().is_idle());
}

#[test]
fn release_over_other_column_drops() {
    let (mut machine, id) = dragging();
    assert_eq!(
        machine.pointer_up(Some(LeadStatus::Meeting)),
        DragEvent::Dropped { lead_id: id, from: LeadStatus::Qualified, to: LeadStatus::Meeting }
    );
    assert!(machine.state().is_idle());
}

#[test]
fn release_over_same_column_is_ignored() {
    let (mut machine, id) = dragging();
    assert_eq!(
        machine.pointer_up(Some(LeadStatus::Qualified)),
        DragEvent::Ignored { lead_id: id, reason: DropIgnored::SameColumn }
    );
    assert!(machine.state().is_idle());
}

#[test]
fn release_outside_columns_is_ignored() {
    let (mut machine, id) = dragging();
    assert_eq!(machine.pointer_up(None), DragEvent::Ignored { lead_id: id, reason: DropIgnored::NoTarget });
}

#[test]
fn release_while_idle_does_nothing() {
    let mut machine = DragMachine::default();
    assert_eq!(machine.pointer_up(Some(LeadStatus::New)), DragEvent::None);
}

// =============================================================
// Cancel
// =============================================================

#[test]
fn cancel_resets_from_any_state() {
    let (mut machine, id) = dragging();
    assert_eq!(machine.cancel(), DragEvent::Cancelled { lead_id: id });
    assert!(machine.state().is_idle());

    let (mut pending, pid) = pressed(SensorConfig::standard());
    assert_eq!(pending.cancel(), DragEvent::Cancelled { lead_id: pid });

    let mut idle = DragMachine::default();
    assert_eq!(idle.cancel(), DragEvent::None);
}

#[test]
fn resolve_drop_covers_every_case() {
    assert_eq!(resolve_drop(LeadStatus::New, None), Err(DropIgnored::NoTarget));
    assert_eq!(resolve_drop(LeadStatus::New, Some(LeadStatus::New)), Err(DropIgnored::SameColumn));
    assert_eq!(resolve_drop(LeadStatus::New, Some(LeadStatus::Lost)), Ok(LeadStatus::Lost));
}
