//! Use-Case-Funktionen für Dateiaktionen.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert.

use crate::app::capabilities::SavePathPicker;
use crate::app::error::{SaveError, WorkspaceError};
use crate::app::state::{SaveTarget, Workspace};
use crate::app::AppState;
use crate::core::{FileKey, PackSourceKind};
use crate::storage::{read_pack_source, write_atomically};
use crate::xml::parser::attach_document;
use crate::xml::{parse_marker_pack, parse_pack_document, render_document, rewrite_pois_section};
use anyhow::Context;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Inhalt eines neu angelegten Dokuments.
const NEW_DOCUMENT_TEMPLATE: &str =
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<OverlayData>\n  <POIs/>\n</OverlayData>\n";

/// Ergebnis von "Speichern".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Geschrieben nach Pfad
    Saved(PathBuf),
    /// Kein Speicherort bekannt, der Aufrufer muss "Speichern unter" anbieten
    NeedsSaveAs { suggested_name: String },
}

/// Lehnt Workspace-Wechsel ab, solange ungespeicherte Änderungen bestehen.
fn ensure_no_unsaved_changes(state: &AppState) -> Result<(), WorkspaceError> {
    let files = state
        .workspace
        .as_ref()
        .map(Workspace::unsaved_documents)
        .unwrap_or_default();
    if files.is_empty() {
        Ok(())
    } else {
        Err(WorkspaceError::UnsavedChanges { files })
    }
}

/// Öffnet einen Workspace von der Platte (Datei, Ordner oder Archiv).
///
/// Schlägt das Öffnen fehl, bleibt der bisherige Workspace unverändert.
pub fn open_workspace(state: &mut AppState, path: &Path) -> Result<(), WorkspaceError> {
    ensure_no_unsaved_changes(state)?;
    let raw = read_pack_source(path, &state.options)?;
    open_from_memory(state, raw.files, Some(raw.path), raw.kind)
}

/// Öffnet einen Workspace aus bereits eingesammelten Rohbytes.
pub fn open_from_memory(
    state: &mut AppState,
    files: IndexMap<FileKey, Vec<u8>>,
    path: Option<PathBuf>,
    kind: PackSourceKind,
) -> Result<(), WorkspaceError> {
    ensure_no_unsaved_changes(state)?;

    let result = parse_marker_pack(files, path.clone(), kind, &state.options.document_extension);
    if result.pack.document_count() == 0 {
        for error in &result.errors {
            log::warn!("{}: {}", error.file_key, error.message);
        }
        return Err(WorkspaceError::NoDocuments {
            path: path.unwrap_or_default(),
        });
    }

    let message = format!(
        "{} Dokumente, {} Marker geladen ({} Fehler)",
        result.pack.document_count(),
        result.pack.marker_count(),
        result.errors.len()
    );
    log::info!("{}", message);

    state.workspace = Some(Workspace::new(result.pack));
    state.last_load_errors = result.errors;
    state.selected_category = None;
    state.history.clear();
    state.status_message = Some(message);
    Ok(())
}

/// Legt ein neues, leeres Dokument `Untitled-N.xml` ohne Speicherort an.
pub fn new_document(state: &mut AppState) -> Result<FileKey, WorkspaceError> {
    ensure_no_unsaved_changes(state)?;

    let key = FileKey::new(state.next_untitled_name());
    let mut files = IndexMap::new();
    files.insert(key.clone(), NEW_DOCUMENT_TEMPLATE.as_bytes().to_vec());
    open_from_memory(state, files, None, PackSourceKind::InMemory)?;

    log::info!("Neues Dokument: {}", key);
    Ok(key)
}

/// Schließt den Workspace. Ungespeicherte Änderungen müssen vorher gelöst sein.
pub fn close_workspace(state: &mut AppState) -> Result<(), WorkspaceError> {
    ensure_no_unsaved_changes(state)?;
    state.workspace = None;
    state.last_load_errors.clear();
    state.selected_category = None;
    state.history.clear();
    log::info!("Workspace geschlossen");
    Ok(())
}

/// Wechselt das aktive Dokument. Undo/Redo gilt nie dokumentübergreifend.
pub fn set_active_document(state: &mut AppState, key: &FileKey) -> bool {
    let Some(workspace) = state.workspace.as_mut() else {
        return false;
    };
    if workspace.active_document() == Some(key) {
        return true;
    }
    if !workspace.set_active_document(key) {
        log::warn!("Dokument nicht geladen: {}", key);
        return false;
    }
    state.history.clear();
    true
}

/// Speichert das aktive Dokument an seinem bekannten Speicherort.
pub fn save_active_document(state: &mut AppState) -> Result<SaveOutcome, SaveError> {
    let indent_unit = state.options.indent_unit.clone();
    let workspace = state.workspace.as_mut().ok_or(SaveError::NoWorkspace)?;
    let key = workspace
        .active_document()
        .cloned()
        .ok_or(SaveError::NoActiveDocument)?;

    match workspace.resolve_save_target(&key) {
        SaveTarget::Path(path) => {
            write_document(workspace, &key, &path, &indent_unit)?;
            state.status_message = Some(format!("Gespeichert: {}", path.display()));
            Ok(SaveOutcome::Saved(path))
        }
        SaveTarget::NeedsSaveAs { suggested_name } => {
            log::info!("{}: kein Speicherort, Speichern unter nötig", key);
            Ok(SaveOutcome::NeedsSaveAs { suggested_name })
        }
    }
}

/// Speichert das aktive Dokument unter einem neuen Pfad.
///
/// Archiv-Endungen und Namenskollisionen werden vor jedem Schreibzugriff
/// abgelehnt. Nach Erfolg ist der neue Pfad der kanonische Speicherort des
/// Dokuments, sein Dateischlüssel wird umbenannt.
pub fn save_active_document_as(state: &mut AppState, path: &Path) -> Result<PathBuf, SaveError> {
    if state.options.is_archive_path(path) {
        log::warn!("Speichern in Archiv abgelehnt: {}", path.display());
        return Err(SaveError::InvalidTarget {
            path: path.to_path_buf(),
        });
    }

    let indent_unit = state.options.indent_unit.clone();
    let workspace = state.workspace.as_mut().ok_or(SaveError::NoWorkspace)?;
    let key = workspace
        .active_document()
        .cloned()
        .ok_or(SaveError::NoActiveDocument)?;
    let new_key = workspace
        .key_for_path(path)
        .ok_or_else(|| SaveError::InvalidTarget {
            path: path.to_path_buf(),
        })?;
    if new_key != key && workspace.pack.has_document(&new_key) {
        return Err(SaveError::NameConflict { key: new_key });
    }

    write_document(workspace, &key, path, &indent_unit)?;

    if !workspace.pack.rename_document(&key, new_key.clone()) {
        return Err(SaveError::MissingDocument { key });
    }
    workspace.forget_save_location(&key);
    workspace.set_save_location(new_key.clone(), path.to_path_buf());
    workspace.set_active_document(&new_key);
    state.history.rename_file(&key, &new_key);

    log::info!("{} gespeichert unter {}", key, path.display());
    state.status_message = Some(format!("Gespeichert unter: {}", path.display()));
    Ok(path.to_path_buf())
}

/// "Speichern" mit Rückfall auf die Dateiauswahl.
///
/// Gibt `Ok(None)` zurück, wenn die Auswahl abgebrochen wurde.
pub fn save_active_document_with(
    state: &mut AppState,
    picker: &mut dyn SavePathPicker,
) -> Result<Option<PathBuf>, SaveError> {
    match save_active_document(state)? {
        SaveOutcome::Saved(path) => Ok(Some(path)),
        SaveOutcome::NeedsSaveAs { suggested_name } => {
            let Some(path) = picker.pick_save_path(&suggested_name) else {
                log::info!("Speichern unter abgebrochen");
                return Ok(None);
            };
            save_active_document_as(state, &path).map(Some)
        }
    }
}

/// Schreibt ein Dokument atomar und gleicht danach den Änderungszustand ab.
///
/// Das Dokument wird auf einer Kopie neu aufgebaut, bei einem I/O-Fehler bleibt
/// der Workspace unverändert.
fn write_document(
    workspace: &mut Workspace,
    key: &FileKey,
    path: &Path,
    indent_unit: &str,
) -> Result<(), SaveError> {
    let pack = &mut workspace.pack;
    let mut document = pack
        .document(key)
        .cloned()
        .ok_or_else(|| SaveError::MissingDocument { key: key.clone() })?;

    rewrite_pois_section(
        &mut document,
        pack.iter_markers_in(key),
        pack.unmanaged_nodes(key),
        indent_unit,
    )
    .map_err(|e| SaveError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other(format!("{:#}", e)),
    })?;
    let bytes = render_document(&document);

    write_atomically(path, &bytes).map_err(|source| {
        log::error!("Speichern nach {} fehlgeschlagen: {}", path.display(), source);
        SaveError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if let Some(slot) = pack.document_mut(key) {
        *slot = document;
    }
    pack.clear_unsaved_state(key);
    pack.set_original_content(key.clone(), bytes);

    log::info!("{} gespeichert nach {}", key, path.display());
    Ok(())
}

/// Verwirft alle Änderungen am aktiven Dokument und parst den zuletzt
/// gespeicherten Stand neu.
pub fn revert_active_document(state: &mut AppState) -> anyhow::Result<()> {
    let workspace = state
        .workspace
        .as_mut()
        .context("Kein Workspace geöffnet")?;
    let key = workspace
        .active_document()
        .cloned()
        .context("Kein aktives Dokument")?;
    let pack = &mut workspace.pack;

    let bytes = pack
        .original_content(&key)
        .with_context(|| format!("Kein gespeicherter Stand für {}", key))?;
    let parsed = parse_pack_document(&key, bytes)
        .with_context(|| format!("Gespeicherter Stand von {} nicht lesbar", key))?;

    pack.discard_file_markers(&key);
    attach_document(pack, &key, parsed);
    state.history.clear();

    log::info!("{} auf gespeicherten Stand zurückgesetzt", key);
    state.status_message = Some(format!("Zurückgesetzt: {}", key));
    Ok(())
}

/// Verwirft den Änderungszustand einer Datei, ohne die Markerliste anzufassen
/// ("Nicht speichern" im Speichern-Dialog).
pub fn discard_changes(state: &mut AppState, key: &FileKey) -> bool {
    let Some(pack) = state.pack_mut() else {
        return false;
    };
    if !pack.has_document(key) {
        return false;
    }
    pack.clear_unsaved_state(key);
    log::info!("Änderungen an {} verworfen", key);
    true
}

/// Alle Dokumente mit ungespeicherten Änderungen (für den Speichern-Dialog).
pub fn unsaved_documents(state: &AppState) -> Vec<FileKey> {
    state
        .workspace
        .as_ref()
        .map(Workspace::unsaved_documents)
        .unwrap_or_default()
}
