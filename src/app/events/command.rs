use crate::app::actions::MoveDirection;
use crate::core::{CategoryId, FileKey, MarkerFields, MarkerId};
use crate::shared::EditorOptions;
use std::path::PathBuf;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Workspace (Datei, Ordner oder Archiv) öffnen
    OpenWorkspace { path: PathBuf },
    /// Neues, leeres Dokument anlegen
    NewDocument,
    /// Workspace schließen (nur ohne ungespeicherte Änderungen)
    CloseWorkspace,
    /// Anderes Dokument des Workspaces bearbeiten (leert die History)
    SetActiveDocument { key: FileKey },
    /// Aktives Dokument speichern (ggf. über die Dateiauswahl)
    SaveActiveDocument,
    /// Aktives Dokument unter neuem Pfad speichern
    SaveActiveDocumentAs { path: PathBuf },
    /// Aktives Dokument auf den zuletzt gespeicherten Stand zurücksetzen
    RevertActiveDocument,
    /// Änderungen einer Datei verwerfen ("Nicht speichern")
    DiscardChanges { key: FileKey },

    /// Marker mit Feldern einfügen (None = anhängen)
    InsertMarker {
        index: Option<usize>,
        fields: MarkerFields,
    },
    /// Marker an der aktuellen Spielerposition anlegen
    AddMarkerAtPlayerPosition,
    /// Marker löschen
    DeleteMarkers { markers: Vec<MarkerId> },
    /// Marker um eine Position verschieben
    MoveMarkers {
        markers: Vec<MarkerId>,
        direction: MoveDirection,
    },
    /// Felder eines Markers ändern
    UpdateMarker {
        marker: MarkerId,
        fields: MarkerFields,
    },
    /// Kategorie für neue Marker wählen
    SelectCategory { category: Option<CategoryId> },

    /// Undo: Letzte Aktion rückgängig machen
    Undo,
    /// Redo: Rückgängig gemachte Aktion wiederherstellen
    Redo,
    /// Letztes Hinzufügen rückgängig machen (nur wenn es die letzte Aktion war)
    UndoLastAdd,

    /// Optionen anwenden und speichern
    ApplyOptions { options: EditorOptions },
}
