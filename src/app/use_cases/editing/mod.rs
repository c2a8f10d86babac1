//! Use-Case-Funktionen für Marker-Editing.
//!
//! Aufgeteilt nach Operation:
//! - `add_marker` — Marker einfügen (explizit oder an der Spielerposition)
//! - `delete_markers` — Marker löschen
//! - `move_markers` — Marker in der Dateiliste verschieben
//! - `update_marker` — Felder eines Markers ändern
//!
//! Jede Mutation läuft als `EditAction` über die History des aktiven Dokuments.

mod add_marker;
mod delete_markers;
mod move_markers;
mod update_marker;

pub use add_marker::{add_marker_from_position, insert_marker};
pub use delete_markers::delete_markers;
pub use move_markers::{can_move_down, can_move_up, move_markers};
pub use update_marker::update_marker;

use crate::app::actions::EditAction;
use crate::app::AppState;
use crate::core::{FileKey, LoadedMarkerPack};

/// Baut eine Action gegen das aktive Dokument und führt sie über die History aus.
///
/// Ohne geladenen Workspace oder aktives Dokument ist das ein No-op.
fn apply_to_active<F>(state: &mut AppState, build: F) -> bool
where
    F: FnOnce(&mut LoadedMarkerPack, &FileKey) -> Option<Box<dyn EditAction>>,
{
    let Some(workspace) = state.workspace.as_mut() else {
        log::warn!("Keine Änderung möglich: kein Workspace geladen");
        return false;
    };
    let Some(key) = workspace.active_document().cloned() else {
        log::warn!("Keine Änderung möglich: kein aktives Dokument");
        return false;
    };

    let Some(action) = build(&mut workspace.pack, &key) else {
        return false;
    };
    state.history.apply(action, &mut workspace.pack)
}
