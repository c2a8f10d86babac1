//! Umkehrbare Edit-Aktionen auf einem `LoadedMarkerPack`.
//!
//! Jede Aktion kennt genau den Zustand, den sie braucht (Datei, Marker-Handles,
//! erfasste Indizes). Sie hängt nicht von der aktuellen Selektion ab, damit
//! Undo auch nach einem Ansichtswechsel korrekt bleibt.

mod add_marker;
mod delete_markers;
mod reorder_markers;
mod update_marker;

pub use add_marker::AddMarkerAction;
pub use delete_markers::DeleteMarkersAction;
pub use reorder_markers::{MoveDirection, ReorderMarkersAction};
pub(crate) use reorder_markers::can_shift;
pub use update_marker::UpdateMarkerAction;

use crate::core::{FileKey, LoadedMarkerPack};

/// Grobe Art einer Aktion (nur für UI-Heuristiken wie "letzte Aktion war ein Add").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Other,
    AddMarker,
    DeleteMarkers,
    ReorderMarkers,
    ChangeProperties,
}

/// Eine umkehrbare Änderung am Pack.
pub trait EditAction: std::fmt::Debug {
    /// Führt die Aktion aus. `false` = nichts geändert.
    fn execute(&mut self, pack: &mut LoadedMarkerPack) -> bool;

    /// Macht die Aktion rückgängig.
    fn undo(&mut self, pack: &mut LoadedMarkerPack) -> bool;

    fn kind(&self) -> ActionKind {
        ActionKind::Other
    }

    /// Zieht eine gemerkte Dateireferenz nach einem Umbenennen (Speichern unter) nach.
    fn rename_file(&mut self, _old: &FileKey, _new: &FileKey) {}
}

/// Ersetzt `file` durch `new`, falls es auf `old` zeigt.
fn rekey_file(file: &mut FileKey, old: &FileKey, new: &FileKey) {
    if file == old {
        *file = new.clone();
    }
}
