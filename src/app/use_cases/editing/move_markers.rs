//! Use-Case: Marker in der Dateiliste um eine Position verschieben.

use super::apply_to_active;
use crate::app::actions::{can_shift, EditAction, MoveDirection, ReorderMarkersAction};
use crate::app::AppState;
use crate::core::MarkerId;

/// Verschiebt die Marker im aktiven Dokument um eine Position.
///
/// Auch ein Schritt an der Listengrenze landet in der History (als No-op).
pub fn move_markers(state: &mut AppState, markers: Vec<MarkerId>, direction: MoveDirection) -> bool {
    if markers.is_empty() {
        return false;
    }
    apply_to_active(state, |_, key| {
        let action: Box<dyn EditAction> =
            Box::new(ReorderMarkersAction::new(key.clone(), markers, direction));
        Some(action)
    })
}

fn can_move(state: &AppState, markers: &[MarkerId], direction: MoveDirection) -> bool {
    match (state.pack(), state.active_document()) {
        (Some(pack), Some(key)) => can_shift(pack.markers_in(key), markers, direction),
        _ => false,
    }
}

/// Ob mindestens ein Marker der Auswahl nach oben rücken kann.
pub fn can_move_up(state: &AppState, markers: &[MarkerId]) -> bool {
    can_move(state, markers, MoveDirection::Up)
}

/// Ob mindestens ein Marker der Auswahl nach unten rücken kann.
pub fn can_move_down(state: &AppState, markers: &[MarkerId]) -> bool {
    can_move(state, markers, MoveDirection::Down)
}
