//! Use-Case: Neuen Marker in das aktive Dokument einfügen.

use super::apply_to_active;
use crate::app::actions::{AddMarkerAction, EditAction};
use crate::app::capabilities::PositionSource;
use crate::app::AppState;
use crate::core::{Marker, MarkerFields, MarkerId};

/// Fügt einen neuen Marker mit den gegebenen Feldern ein.
///
/// `index` außerhalb der Liste (oder `None`) hängt ans Ende an. Gibt das Handle
/// des neuen Markers zurück, falls er eingefügt wurde.
pub fn insert_marker(
    state: &mut AppState,
    index: Option<usize>,
    fields: MarkerFields,
) -> Option<MarkerId> {
    let mut inserted = None;
    let applied = apply_to_active(state, |pack, key| {
        let marker = Marker::new_tracked(
            fields.map_id,
            fields.position,
            fields.marker_type,
            key.clone(),
        );
        let id = pack.allocate_marker(marker);
        inserted = Some(id);
        let action: Box<dyn EditAction> = Box::new(AddMarkerAction::new(key.clone(), id, index));
        Some(action)
    });

    if applied {
        log::info!("Marker eingefügt (Index {:?})", index);
        return inserted;
    }
    // Verworfene Aktion: angelegten Arena-Eintrag wieder freigeben
    if let (Some(id), Some(pack)) = (inserted, state.pack_mut()) {
        pack.release_marker(id);
    }
    None
}

/// Legt einen Marker an der aktuellen Spielerposition an.
///
/// Der Typ ist der volle Name der gewählten Kategorie (leer ohne Auswahl), der
/// Marker wird ans Ende der Liste gehängt.
pub fn add_marker_from_position(
    state: &mut AppState,
    source: &dyn PositionSource,
) -> Option<MarkerId> {
    let Some(player) = source.current_position() else {
        log::warn!("Keine Spielerposition verfügbar");
        return None;
    };

    let marker_type = match (state.pack(), state.selected_category) {
        (Some(pack), Some(category)) => pack.categories().full_name(category),
        _ => String::new(),
    };

    insert_marker(
        state,
        None,
        MarkerFields {
            map_id: player.map_id,
            position: player.position,
            marker_type,
        },
    )
}
