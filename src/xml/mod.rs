//! XML Import/Export für TacO-Marker-Packs.
//!
//! Pack-Dokumente werden verlustfrei als Baum gehalten. Beim Speichern wird nur
//! der `<POIs>`-Container neu aufgebaut, alles andere bleibt Byte für Byte erhalten.

pub mod document;
/// Parser: Dokumente → Marker, Kategorie-Deklarationen, nicht verwaltete Knoten
pub mod parser;
pub mod writer;

pub use document::{XmlAttribute, XmlDocument, XmlElement, XmlNode};
pub use parser::{
    decode_document_bytes, parse_marker_pack, parse_pack_document, PackLoadError, PackLoadResult,
    ParsedDocument,
};
pub use writer::{render_document, rewrite_pois_section};

/// Root-Element eines Overlay-Dokuments.
pub const OVERLAY_DATA: &str = "OverlayData";
/// Container der Marker.
pub const POIS: &str = "POIs";
/// Kategorie-Deklaration (verschachtelbar).
pub const MARKER_CATEGORY: &str = "MarkerCategory";
/// Einzelner Marker.
pub const POI: &str = "POI";

pub const ATTR_NAME: &str = "name";
pub const ATTR_DISPLAY_NAME: &str = "DisplayName";
pub const ATTR_IS_SEPARATOR: &str = "IsSeparator";
pub const ATTR_GUID: &str = "GUID";
pub const ATTR_MAP_ID: &str = "MapID";
pub const ATTR_XPOS: &str = "xpos";
pub const ATTR_YPOS: &str = "ypos";
pub const ATTR_ZPOS: &str = "zpos";
pub const ATTR_TYPE: &str = "type";
