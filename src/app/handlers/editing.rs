//! Handler für Marker-Editing.

use crate::app::actions::MoveDirection;
use crate::app::capabilities::PositionSource;
use crate::app::use_cases;
use crate::app::AppState;
use crate::core::{CategoryId, MarkerFields, MarkerId};

/// Fügt einen Marker an `index` ein (None = anhängen).
pub fn insert_marker(state: &mut AppState, index: Option<usize>, fields: MarkerFields) {
    use_cases::editing::insert_marker(state, index, fields);
}

/// Legt einen Marker an der Spielerposition an.
pub fn add_at_player_position(state: &mut AppState, source: Option<&dyn PositionSource>) {
    let Some(source) = source else {
        log::warn!("Keine Positionsquelle angebunden");
        state.status_message = Some("Keine Spielerposition verfügbar".to_string());
        return;
    };
    use_cases::editing::add_marker_from_position(state, source);
}

/// Löscht Marker aus dem aktiven Dokument.
pub fn delete_markers(state: &mut AppState, markers: Vec<MarkerId>) {
    use_cases::editing::delete_markers(state, markers);
}

/// Verschiebt Marker um eine Position.
pub fn move_markers(state: &mut AppState, markers: Vec<MarkerId>, direction: MoveDirection) {
    use_cases::editing::move_markers(state, markers, direction);
}

/// Ändert die Felder eines Markers.
pub fn update_marker(state: &mut AppState, marker: MarkerId, fields: MarkerFields) {
    use_cases::editing::update_marker(state, marker, fields);
}

/// Wählt die Kategorie, die neue Marker als Typ bekommen.
pub fn select_category(state: &mut AppState, category: Option<CategoryId>) {
    let valid = match (category, state.pack()) {
        (None, _) => true,
        (Some(id), Some(pack)) => pack.categories().get(id).is_some(),
        (Some(_), None) => false,
    };
    if valid {
        state.selected_category = category;
    } else {
        log::warn!("Unbekannte Kategorie: {:?}", category);
    }
}
