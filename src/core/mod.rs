//! Core-Domänentypen: Marker, Kategorien, Dateischlüssel und das geladene Pack.

pub mod category;
pub mod file_key;
/// Core-Datenmodelle für Marker-Packs
///
/// - LoadedMarkerPack: Container für Dokumente, Marker und Kategorie-Baum
/// - Marker: Einzelner POI mit Position, Map und Kategorie-Pfad
/// - CategoryTree: Arena der Kategorien mit Marker-Zuordnung
pub mod marker;
pub mod pack;

pub use category::{Category, CategoryDeclaration, CategoryId, CategoryTree};
pub use file_key::FileKey;
pub use marker::{Marker, MarkerFields, MarkerId};
pub use pack::{LoadedMarkerPack, PackSourceKind};
