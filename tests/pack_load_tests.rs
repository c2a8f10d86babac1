//! Lade-Szenarien für Einzeldateien, Ordner und Archive.

use approx::assert_relative_eq;
use indexmap::IndexMap;
use marker_pack_editor::storage::read_pack_source;
use marker_pack_editor::{
    parse_marker_pack, EditorOptions, FileKey, PackLoadResult, PackSourceKind,
};
use std::io::Write;
use std::path::{Path, PathBuf};

const TYRIA: &str = include_str!("fixtures/tyria_pack.xml");

fn fixture(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
}

fn load_from(path: &Path) -> PackLoadResult {
    let options = EditorOptions::default();
    let raw = read_pack_source(path, &options).expect("Quelle nicht lesbar");
    parse_marker_pack(
        raw.files,
        Some(raw.path),
        raw.kind,
        &options.document_extension,
    )
}

#[test]
fn test_tyria_fixture_markers() {
    let mut files = IndexMap::new();
    files.insert(FileKey::new("tyria.xml"), TYRIA.as_bytes().to_vec());
    let result = parse_marker_pack(files, None, PackSourceKind::InMemory, "xml");
    assert!(!result.has_errors());

    let pack = &result.pack;
    let key = FileKey::new("tyria.xml");
    let markers: Vec<_> = pack.iter_markers_in(&key).collect();
    assert_eq!(markers.len(), 3, "POI ohne ypos darf kein Marker sein");

    let hearts = markers[0];
    assert_eq!(hearts.map_id(), 15);
    assert_relative_eq!(hearts.x(), 100.1234);
    assert_relative_eq!(hearts.y(), -50.0);
    assert_relative_eq!(hearts.z(), 12.5);
    assert_eq!(hearts.guid_base64(), "MyIRAFVEd2aImaq7zN3u/w==");

    assert_relative_eq!(markers[1].z(), 0.0);

    let fresh = markers[2];
    assert!(!fresh.guid().is_nil());
    assert_eq!(fresh.map_id(), 24);
    assert!(markers.iter().all(|m| m.is_tracking_changes() && !m.is_dirty()));
    assert!(!pack.has_unsaved_changes(&key));
}

#[test]
fn test_tyria_fixture_categories() {
    let mut files = IndexMap::new();
    files.insert(FileKey::new("tyria.xml"), TYRIA.as_bytes().to_vec());
    let result = parse_marker_pack(files, None, PackSourceKind::InMemory, "xml");
    let tree = result.pack.categories();

    let tyria = tree.find_by_path("tyria").unwrap();
    assert_eq!(tree.get(tyria).unwrap().display_name, "Tyria");
    assert_eq!(tree.get(tyria).unwrap().children().len(), 2);

    let separator = tree.find_by_path("tyria.sep").unwrap();
    assert!(tree.get(separator).unwrap().is_separator);

    let hearts = tree.find_by_path("Tyria.Hearts").expect("Pfade sind case-insensitiv");
    assert_eq!(tree.get(hearts).unwrap().marker_count(), 1);
    assert_eq!(tree.markers_recursive(tyria).len(), 2);

    let auto = tree.find_by_path("new.auto.category").expect("Kategorie wird automatisch angelegt");
    assert_eq!(tree.get(auto).unwrap().marker_count(), 1);
    assert_eq!(tree.full_name(auto), "new.auto.category");

    let empty = tree.find_by_path("empty").unwrap();
    assert_eq!(tree.get(empty).unwrap().marker_count(), 0);
}

#[test]
fn test_directory_pack_isolates_broken_file() {
    let result = load_from(&fixture("pack_dir"));
    let pack = &result.pack;

    assert_eq!(pack.source_kind(), PackSourceKind::Directory);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].file_key, FileKey::new("broken.xml"));

    let keys: Vec<String> = pack
        .document_keys()
        .iter()
        .map(|k| k.as_str().to_string())
        .collect();
    assert_eq!(keys, vec!["main.xml", "routes/farm.xml"]);
    assert_eq!(pack.marker_count(), 3);
}

#[test]
fn test_directory_pack_merges_declarations_in_key_order() {
    let result = load_from(&fixture("pack_dir"));
    let tree = result.pack.categories();

    let routes = tree.find_by_path("routes").unwrap();
    let category = tree.get(routes).unwrap();
    assert_eq!(category.display_name, "Routen", "spätere Datei gewinnt");
    assert_eq!(category.source_file, Some(FileKey::new("routes/farm.xml")));
    assert_eq!(category.marker_count(), 2);

    let daily = tree.find_by_path("routes.daily").unwrap();
    assert_eq!(tree.get(daily).unwrap().marker_count(), 1);
}

#[test]
fn test_directory_pack_keeps_original_bytes() {
    let result = load_from(&fixture("pack_dir"));
    let farm = result
        .pack
        .original_content(&FileKey::new("ROUTES/FARM.XML"))
        .unwrap();
    assert!(farm.windows(2).any(|w| w == b"\r\n"), "CRLF muss erhalten bleiben");
    assert!(farm.contains(&b'\t'));
}

#[test]
fn test_archive_pack_loads_documents_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Tyria.taco");
    {
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("Data/tyria.xml", options).unwrap();
        writer.write_all(TYRIA.as_bytes()).unwrap();
        writer.start_file("Data/tyria.png", options).unwrap();
        writer.write_all(&[0x89, b'P', b'N', b'G']).unwrap();
        writer.finish().unwrap();
    }

    let result = load_from(&path);
    assert!(result.pack.is_archive());
    assert_eq!(result.pack.document_count(), 1);
    assert_eq!(result.pack.raw_file_count(), 2);
    assert_eq!(result.pack.markers_in(&FileKey::new("data/tyria.xml")).len(), 3);
}

#[test]
fn test_bom_prefixed_document_loads() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"<OverlayData><POIs><POI xpos=\"1\" ypos=\"2\"/></POIs></OverlayData>");
    let mut files = IndexMap::new();
    files.insert(FileKey::new("bom.xml"), bytes);

    let result = parse_marker_pack(files, None, PackSourceKind::InMemory, "xml");
    assert!(!result.has_errors());
    assert_eq!(result.pack.marker_count(), 1);
}
