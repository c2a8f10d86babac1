//! Application-Layer: Controller, State, Actions, History und Use-Cases.

pub mod actions;
pub mod capabilities;
pub mod command_log;
pub mod controller;
pub mod error;
pub mod events;
pub mod handlers;
pub mod history;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Anwendung (geöffneter Workspace, History, Optionen).
pub mod state;
pub mod use_cases;

pub use actions::{
    ActionKind, AddMarkerAction, DeleteMarkersAction, EditAction, MoveDirection,
    ReorderMarkersAction, UpdateMarkerAction,
};
pub use capabilities::{PlayerPosition, PositionSource, SavePathPicker};
pub use command_log::{CommandLog, CommandRecord};
pub use controller::AppController;
pub use error::{SaveError, WorkspaceError};
pub use events::AppCommand;
pub use history::EditHistory;
pub use state::{AppState, SaveTarget, Workspace};
pub use use_cases::file_io::SaveOutcome;
