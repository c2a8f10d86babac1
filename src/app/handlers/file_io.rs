//! Handler für Datei-Operationen (Öffnen, Speichern, Zurücksetzen).

use crate::app::capabilities::SavePathPicker;
use crate::app::use_cases;
use crate::app::use_cases::file_io::SaveOutcome;
use crate::app::AppState;
use crate::core::FileKey;
use std::path::Path;

/// Öffnet einen Workspace aus dem übergebenen Pfad.
pub fn open(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    use_cases::file_io::open_workspace(state, path)?;
    Ok(())
}

/// Legt ein neues, leeres Dokument an.
pub fn new_document(state: &mut AppState) -> anyhow::Result<()> {
    use_cases::file_io::new_document(state)?;
    Ok(())
}

/// Schließt den Workspace.
pub fn close(state: &mut AppState) -> anyhow::Result<()> {
    use_cases::file_io::close_workspace(state)?;
    Ok(())
}

/// Wechselt das aktive Dokument.
pub fn set_active_document(state: &mut AppState, key: &FileKey) {
    use_cases::file_io::set_active_document(state, key);
}

/// Speichert das aktive Dokument.
///
/// Ohne bekannten Speicherort wird die Dateiauswahl gefragt. Ist keine angebunden,
/// bleibt es bei einer Statusmeldung.
pub fn save(state: &mut AppState, picker: Option<&mut dyn SavePathPicker>) -> anyhow::Result<()> {
    match picker {
        Some(picker) => {
            use_cases::file_io::save_active_document_with(state, picker)?;
        }
        None => {
            if let SaveOutcome::NeedsSaveAs { suggested_name } =
                use_cases::file_io::save_active_document(state)?
            {
                state.status_message = Some(format!(
                    "Kein Speicherort für {}: bitte \"Speichern unter\" verwenden",
                    suggested_name
                ));
            }
        }
    }
    Ok(())
}

/// Speichert das aktive Dokument unter einem neuen Pfad.
pub fn save_as(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    use_cases::file_io::save_active_document_as(state, path)?;
    Ok(())
}

/// Setzt das aktive Dokument auf den gespeicherten Stand zurück.
pub fn revert(state: &mut AppState) -> anyhow::Result<()> {
    use_cases::file_io::revert_active_document(state)
}

/// Verwirft den Änderungszustand einer Datei.
pub fn discard_changes(state: &mut AppState, key: &FileKey) {
    use_cases::file_io::discard_changes(state, key);
}
