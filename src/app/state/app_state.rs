use super::Workspace;
use crate::app::history::EditHistory;
use crate::app::CommandLog;
use crate::core::{CategoryId, FileKey, LoadedMarkerPack};
use crate::shared::EditorOptions;
use crate::xml::PackLoadError;

/// Hauptzustand der Anwendung
#[derive(Debug)]
pub struct AppState {
    /// Geöffneter Workspace (None = nichts geladen)
    pub workspace: Option<Workspace>,
    /// Undo/Redo-History des aktiven Dokuments
    pub history: EditHistory,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Einzeldatei-Fehler des letzten Ladevorgangs
    pub last_load_errors: Vec<PackLoadError>,
    /// Im Kategorie-Baum gewählte Kategorie (Typ neuer Marker)
    pub selected_category: Option<CategoryId>,
    /// Letzte Statusmeldung für die Statusleiste
    pub status_message: Option<String>,
    untitled_counter: usize,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// Erstellt einen leeren App-State mit gegebenen Optionen.
    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            workspace: None,
            history: EditHistory::new_with_capacity(options.history_depth),
            options,
            command_log: CommandLog::new(),
            last_load_errors: Vec::new(),
            selected_category: None,
            status_message: None,
            untitled_counter: 0,
        }
    }

    pub fn pack(&self) -> Option<&LoadedMarkerPack> {
        self.workspace.as_ref().map(|ws| &ws.pack)
    }

    pub fn pack_mut(&mut self) -> Option<&mut LoadedMarkerPack> {
        self.workspace.as_mut().map(|ws| &mut ws.pack)
    }

    pub fn active_document(&self) -> Option<&FileKey> {
        self.workspace.as_ref().and_then(Workspace::active_document)
    }

    /// Ob das aktive Dokument ungespeicherte Änderungen hat.
    pub fn active_document_is_dirty(&self) -> bool {
        match (self.pack(), self.active_document()) {
            (Some(pack), Some(key)) => pack.has_unsaved_changes(key),
            _ => false,
        }
    }

    /// Gibt die Anzahl der Marker im aktiven Dokument zurück (für UI-Anzeige)
    pub fn active_marker_count(&self) -> usize {
        match (self.pack(), self.active_document()) {
            (Some(pack), Some(key)) => pack.markers_in(key).len(),
            _ => 0,
        }
    }

    /// Undo/Redo helpers
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Nächster freier Name für ein neues Dokument (`Untitled-1.xml`, ...).
    pub(crate) fn next_untitled_name(&mut self) -> String {
        self.untitled_counter += 1;
        format!(
            "{}-{}.{}",
            self.options.untitled_prefix, self.untitled_counter, self.options.document_extension
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
