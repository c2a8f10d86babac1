//! Fehlertypen der Workspace-Orchestrierung, auf die ein Aufrufer reagieren kann.

use crate::core::FileKey;
use std::path::PathBuf;
use thiserror::Error;

/// Fehler beim Speichern eines Dokuments.
///
/// In jedem Fall bleibt der In-Memory-Zustand (Dirty-Flags, Added/Deleted) unverändert.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Kein Workspace geöffnet")]
    NoWorkspace,

    #[error("Kein aktives Dokument")]
    NoActiveDocument,

    #[error("Ungültiges Speicherziel (Archiv): {}", path.display())]
    InvalidTarget { path: PathBuf },

    #[error("Dateiname bereits durch ein anderes Dokument belegt: {key}")]
    NameConflict { key: FileKey },

    #[error("Dokument nicht geladen: {key}")]
    MissingDocument { key: FileKey },

    #[error("Schreiben nach {} fehlgeschlagen: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fehler beim Öffnen oder Schließen eines Workspaces.
///
/// Ein fehlgeschlagenes Öffnen lässt den vorherigen Workspace unangetastet.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Keine lesbaren Dokumente in {}", path.display())]
    NoDocuments { path: PathBuf },

    #[error("Ungespeicherte Änderungen in {} Datei(en)", files.len())]
    UnsavedChanges { files: Vec<FileKey> },

    #[error(transparent)]
    Source(#[from] anyhow::Error),
}
