//! Handler für Undo/Redo-Operationen.

use crate::app::actions::ActionKind;
use crate::app::AppState;

/// Führt einen Undo-Schritt aus, falls vorhanden.
pub fn undo(state: &mut AppState) {
    let Some(workspace) = state.workspace.as_mut() else {
        log::debug!("Undo: kein Workspace");
        return;
    };
    if state.history.undo(&mut workspace.pack) {
        log::info!("Undo ausgeführt");
    } else {
        log::debug!("Undo: nichts zu tun");
    }
}

/// Führt einen Redo-Schritt aus, falls vorhanden.
pub fn redo(state: &mut AppState) {
    let Some(workspace) = state.workspace.as_mut() else {
        log::debug!("Redo: kein Workspace");
        return;
    };
    if state.history.redo(&mut workspace.pack) {
        log::info!("Redo ausgeführt");
    } else {
        log::debug!("Redo: nichts zu tun");
    }
}

/// Macht das letzte Hinzufügen rückgängig, aber nur wenn es die letzte Aktion war.
pub fn undo_last_add(state: &mut AppState) {
    if state.history.peek_last_kind() == Some(ActionKind::AddMarker) {
        undo(state);
    } else {
        log::debug!("Letzte Aktion war kein Hinzufügen");
    }
}
