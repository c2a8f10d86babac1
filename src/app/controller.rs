//! Application Controller für zentrale Command-Verarbeitung.

use super::capabilities::{PositionSource, SavePathPicker};
use super::{AppCommand, AppState};

/// Orchestriert Commands und Use-Cases auf den AppState.
///
/// Hält die externen Kollaborateure (Dateiauswahl, Positionsquelle), die der
/// Host beim Aufbau hereinreicht.
#[derive(Default)]
pub struct AppController {
    save_picker: Option<Box<dyn SavePathPicker>>,
    position_source: Option<Box<dyn PositionSource>>,
}

impl AppController {
    /// Erstellt einen neuen Controller ohne externe Kollaborateure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindet die Dateiauswahl für "Speichern unter" an.
    pub fn with_save_picker(mut self, picker: Box<dyn SavePathPicker>) -> Self {
        self.save_picker = Some(picker);
        self
    }

    /// Bindet die Live-Positionsquelle an.
    pub fn with_position_source(mut self, source: Box<dyn PositionSource>) -> Self {
        self.position_source = Some(source);
        self
    }

    /// Führt mutierende Commands auf dem AppState aus und protokolliert sie.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        let document = state.active_document().cloned();
        let logged = command.clone();
        let result = self.dispatch(state, command);
        state.command_log.record(logged, document, result.is_ok());
        result
    }

    /// Dispatcht an Feature-Handler in `handlers/`.
    fn dispatch(&mut self, state: &mut AppState, command: AppCommand) -> anyhow::Result<()> {
        use super::handlers;

        match command {
            // === Datei-I/O ===
            AppCommand::OpenWorkspace { path } => handlers::file_io::open(state, &path)?,
            AppCommand::NewDocument => handlers::file_io::new_document(state)?,
            AppCommand::CloseWorkspace => handlers::file_io::close(state)?,
            AppCommand::SetActiveDocument { key } => {
                handlers::file_io::set_active_document(state, &key)
            }
            AppCommand::SaveActiveDocument => {
                let picker: Option<&mut dyn SavePathPicker> = match self.save_picker.as_mut() {
                    Some(picker) => Some(picker.as_mut()),
                    None => None,
                };
                handlers::file_io::save(state, picker)?
            }
            AppCommand::SaveActiveDocumentAs { path } => handlers::file_io::save_as(state, &path)?,
            AppCommand::RevertActiveDocument => handlers::file_io::revert(state)?,
            AppCommand::DiscardChanges { key } => handlers::file_io::discard_changes(state, &key),

            // === Editing ===
            AppCommand::InsertMarker { index, fields } => {
                handlers::editing::insert_marker(state, index, fields)
            }
            AppCommand::AddMarkerAtPlayerPosition => {
                handlers::editing::add_at_player_position(state, self.position_source.as_deref())
            }
            AppCommand::DeleteMarkers { markers } => {
                handlers::editing::delete_markers(state, markers)
            }
            AppCommand::MoveMarkers { markers, direction } => {
                handlers::editing::move_markers(state, markers, direction)
            }
            AppCommand::UpdateMarker { marker, fields } => {
                handlers::editing::update_marker(state, marker, fields)
            }
            AppCommand::SelectCategory { category } => {
                handlers::editing::select_category(state, category)
            }

            // === History ===
            AppCommand::Undo => handlers::history::undo(state),
            AppCommand::Redo => handlers::history::redo(state),
            AppCommand::UndoLastAdd => handlers::history::undo_last_add(state),

            // === Optionen ===
            AppCommand::ApplyOptions { options } => {
                handlers::options::apply_options(state, options)?
            }
        }

        Ok(())
    }
}
