//! Use-Case: Map-ID, Position oder Typ eines Markers ändern.

use super::apply_to_active;
use crate::app::actions::{EditAction, UpdateMarkerAction};
use crate::app::AppState;
use crate::core::{MarkerFields, MarkerId};

/// Ändert die Felder eines Markers des aktiven Dokuments.
///
/// Gibt `false` zurück, wenn sich nichts ändert oder der Marker nicht zum
/// aktiven Dokument gehört.
pub fn update_marker(state: &mut AppState, marker: MarkerId, fields: MarkerFields) -> bool {
    apply_to_active(state, |pack, key| {
        if pack.index_of(key, marker).is_none() {
            log::warn!("Marker {} gehört nicht zu {}", marker.raw(), key);
            return None;
        }
        let action: Box<dyn EditAction> = Box::new(UpdateMarkerAction::new(marker, fields));
        Some(action)
    })
}
