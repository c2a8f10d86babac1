//! Marker-Pack-Editor Library.
//! Editor-Kern für TacO-Marker-Packs als Library exportiert für CLI, Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod shared;
pub mod storage;
pub mod xml;

pub use app::{
    ActionKind, AppCommand, AppController, AppState, EditAction, EditHistory, SaveError,
    SaveOutcome, WorkspaceError,
};
pub use core::{
    Category, CategoryId, CategoryTree, FileKey, LoadedMarkerPack, Marker, MarkerFields, MarkerId,
    PackSourceKind,
};
pub use shared::EditorOptions;
pub use xml::{parse_marker_pack, rewrite_pois_section, PackLoadError, PackLoadResult};
