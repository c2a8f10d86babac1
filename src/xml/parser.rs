//! Parser für TacO-Marker-Packs.
//!
//! Eingabe ist eine Zuordnung Dateischlüssel → Rohbytes (bereits von der
//! Storage-Schicht eingesammelt). Fehlerhafte Dateien werden isoliert als
//! `PackLoadError` gemeldet, der Rest des Packs lädt trotzdem.

mod categories;
mod markers;

use crate::core::{CategoryDeclaration, FileKey, LoadedMarkerPack, Marker, PackSourceKind};
use crate::xml::{XmlDocument, XmlNode, POIS};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::path::PathBuf;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Fehler beim Parsen einer einzelnen Datei.
#[derive(Debug, Clone, PartialEq)]
pub struct PackLoadError {
    pub file_key: FileKey,
    pub message: String,
}

/// Ergebnis eines Pack-Ladevorgangs: das Pack plus alle Einzeldatei-Fehler.
#[derive(Debug)]
pub struct PackLoadResult {
    pub pack: LoadedMarkerPack,
    pub errors: Vec<PackLoadError>,
}

impl PackLoadResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Eine geparste Datei, bevor sie ins Pack eingehängt wird.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub document: XmlDocument,
    /// Marker in Dokumentreihenfolge (noch ohne Change-Tracking)
    pub markers: Vec<Marker>,
    /// Nicht verwaltete Knoten aus dem `<POIs>`-Container
    pub unmanaged: Vec<XmlNode>,
    pub categories: Vec<CategoryDeclaration>,
}

/// Dekodiert Dokument-Bytes als UTF-8; ein BOM wird entfernt.
pub fn decode_document_bytes(bytes: &[u8]) -> Result<&str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    std::str::from_utf8(bytes).context("Dokument ist kein gültiges UTF-8")
}

/// Parsed eine einzelne Pack-Datei.
pub fn parse_pack_document(file_key: &FileKey, bytes: &[u8]) -> Result<ParsedDocument> {
    let text = decode_document_bytes(bytes)?;
    let document = XmlDocument::parse(text)?;

    let (markers, unmanaged) = match document.find_element(POIS) {
        Some(container) => markers::split_poi_children(container, file_key),
        None => (Vec::new(), Vec::new()),
    };
    let categories = categories::collect_declarations(&document);

    Ok(ParsedDocument {
        document,
        markers,
        unmanaged,
        categories,
    })
}

/// Parsed alle Dokumente eines Packs.
///
/// Ablauf: Dateien einzeln parsen, dann die Kategorie-Deklarationen aller Dateien
/// zusammenführen (spätere Dateien überschreiben Anzeigenamen), erst danach
/// die Marker einsortieren und ihr Change-Tracking aktivieren.
pub fn parse_marker_pack(
    files: IndexMap<FileKey, Vec<u8>>,
    workspace_path: Option<PathBuf>,
    source_kind: PackSourceKind,
    document_extension: &str,
) -> PackLoadResult {
    let mut pack = LoadedMarkerPack::new(workspace_path, source_kind);
    let mut errors = Vec::new();
    let mut parsed_documents: Vec<(FileKey, ParsedDocument)> = Vec::new();

    for (file_key, bytes) in &files {
        if !file_key.has_extension(document_extension) {
            continue;
        }

        match parse_pack_document(file_key, bytes) {
            Ok(parsed) => parsed_documents.push((file_key.clone(), parsed)),
            Err(e) => {
                log::warn!("Datei {} konnte nicht geparst werden: {:#}", file_key, e);
                errors.push(PackLoadError {
                    file_key: file_key.clone(),
                    message: format!("XML-Fehler: {:#}", e),
                });
            }
        }
    }

    for (file_key, bytes) in files {
        pack.set_original_content(file_key, bytes);
    }

    for (file_key, parsed) in &parsed_documents {
        merge_declarations(&mut pack, file_key, &parsed.categories);
    }

    for (file_key, parsed) in parsed_documents {
        pack.insert_document(file_key.clone(), parsed.document, parsed.unmanaged);
        attach_markers(&mut pack, &file_key, parsed.markers);
    }

    log::info!(
        "Pack geladen: {} Dokumente, {} Marker, {} Kategorien, {} Fehler",
        pack.document_count(),
        pack.marker_count(),
        pack.categories().len().saturating_sub(1),
        errors.len()
    );

    PackLoadResult { pack, errors }
}

/// Hängt eine neu geparste Datei in ein bestehendes Pack ein (Revert).
///
/// Die Markerliste der Datei muss vorher geleert worden sein.
pub(crate) fn attach_document(pack: &mut LoadedMarkerPack, file_key: &FileKey, parsed: ParsedDocument) {
    merge_declarations(pack, file_key, &parsed.categories);
    pack.insert_document(file_key.clone(), parsed.document, parsed.unmanaged);
    attach_markers(pack, file_key, parsed.markers);
}

fn merge_declarations(
    pack: &mut LoadedMarkerPack,
    file_key: &FileKey,
    declarations: &[CategoryDeclaration],
) {
    let root = pack.categories().root();
    for declaration in declarations {
        pack.categories_mut()
            .merge_declaration(root, declaration, file_key);
    }
}

fn attach_markers(pack: &mut LoadedMarkerPack, file_key: &FileKey, markers: Vec<Marker>) {
    for marker in markers {
        let id = pack.allocate_marker(marker);
        if let Some(list) = pack.marker_list_mut(file_key) {
            list.push(id);
        }
        pack.file_marker_by_type(id);
        if let Some(marker) = pack.marker_mut(id) {
            marker.enable_change_tracking();
        }
    }
}
