//! Use-Case: Marker aus dem aktiven Dokument löschen.

use super::apply_to_active;
use crate::app::actions::{DeleteMarkersAction, EditAction};
use crate::app::AppState;
use crate::core::MarkerId;

/// Löscht die gegebenen Marker aus der Liste des aktiven Dokuments.
///
/// Marker, die nicht in dieser Liste stehen, werden ignoriert.
pub fn delete_markers(state: &mut AppState, markers: Vec<MarkerId>) -> bool {
    if markers.is_empty() {
        return false;
    }
    let count = markers.len();
    let applied = apply_to_active(state, |_, key| {
        let action: Box<dyn EditAction> = Box::new(DeleteMarkersAction::new(key.clone(), markers));
        Some(action)
    });
    if applied {
        log::info!("{} Marker gelöscht", count);
    }
    applied
}
