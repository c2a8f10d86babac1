//! Round-Trip-Tests für Parser und Writer auf echten Pack-Dateien.

use indexmap::IndexMap;
use marker_pack_editor::xml::{parse_pack_document, render_document, XmlNode};
use marker_pack_editor::{parse_marker_pack, rewrite_pois_section, FileKey, PackSourceKind};

const CANONICAL: &str = include_str!("fixtures/canonical.xml");
const TYRIA: &str = include_str!("fixtures/tyria_pack.xml");

/// Lädt eine Datei als Einzeldatei-Pack und schreibt sie sofort wieder.
fn load_and_render(name: &str, content: &[u8]) -> Vec<u8> {
    let key = FileKey::new(name);
    let mut files = IndexMap::new();
    files.insert(key.clone(), content.to_vec());
    let result = parse_marker_pack(files, None, PackSourceKind::SingleFile, "xml");
    assert!(!result.has_errors(), "Ladefehler: {:?}", result.errors);

    let pack = result.pack;
    let mut document = pack.document(&key).cloned().expect("Dokument fehlt");
    rewrite_pois_section(
        &mut document,
        pack.iter_markers_in(&key),
        pack.unmanaged_nodes(&key),
        "  ",
    )
    .expect("POIs-Container nicht schreibbar");
    render_document(&document)
}

#[test]
fn test_canonical_file_roundtrips_byte_exact() {
    let written = load_and_render("canonical.xml", CANONICAL.as_bytes());
    assert_eq!(
        String::from_utf8(written).unwrap(),
        CANONICAL,
        "Kanonische Datei muss unverändert zurückgeschrieben werden"
    );
}

#[test]
fn test_second_save_is_identical_to_first() {
    let first = load_and_render("tyria.xml", TYRIA.as_bytes());
    let second = load_and_render("tyria.xml", &first);
    assert_eq!(first, second, "Zweites Speichern darf nichts mehr ändern");
}

#[test]
fn test_content_outside_pois_is_preserved() {
    let written = String::from_utf8(load_and_render("tyria.xml", TYRIA.as_bytes())).unwrap();

    let pois_start = TYRIA.find("  <POIs>").unwrap();
    let pois_end = TYRIA.find("</POIs>").unwrap() + "</POIs>".len();
    assert!(written.starts_with(&TYRIA[..pois_start]), "Kopf inkl. Deklarationen verändert");
    assert!(written.ends_with(&TYRIA[pois_end..]), "Dokumentende verändert");

    assert!(written.contains(r#"iconFile="Data/tyria.png""#));
    assert!(written.contains(r#"<MarkerCategory name="hearts" DisplayName="Herzen" iconSize="0.8"/>"#));
}

#[test]
fn test_unmanaged_nodes_survive_in_order() {
    let key = FileKey::new("tyria.xml");
    let original = parse_pack_document(&key, TYRIA.as_bytes()).unwrap();
    let written = load_and_render("tyria.xml", TYRIA.as_bytes());
    let reparsed = parse_pack_document(&key, &written).unwrap();

    assert_eq!(original.unmanaged.len(), 3);
    assert_eq!(reparsed.unmanaged, original.unmanaged);
    assert!(matches!(&reparsed.unmanaged[1], XmlNode::Comment(text) if text.contains("Handgepflegt")));

    let trail = reparsed.unmanaged[0].as_element().expect("Trail-Element erwartet");
    assert_eq!(trail.name(), "Trail");
    assert_eq!(trail.attribute("texture").as_deref(), Some("Data/arrow.png"));
}

#[test]
fn test_markers_keep_identity_across_roundtrip() {
    let key = FileKey::new("tyria.xml");
    let written = load_and_render("tyria.xml", TYRIA.as_bytes());
    let first = parse_pack_document(&key, &written).unwrap();
    let second = parse_pack_document(&key, &load_and_render("tyria.xml", &written)).unwrap();

    assert_eq!(first.markers.len(), 3);
    let guids = |markers: &[marker_pack_editor::Marker]| -> Vec<String> {
        markers.iter().map(|m| m.guid_formatted()).collect()
    };
    assert_eq!(guids(&first.markers), guids(&second.markers));
    assert_eq!(
        first.markers[1].guid_formatted(),
        "00112233445566778899aabbccddeeff"
    );
    assert_eq!(first.markers[2].marker_type(), "new.auto.category");
}

#[test]
fn test_document_without_pois_gets_container() {
    let written = load_and_render("bare.xml", b"<OverlayData>\n</OverlayData>\n");
    let text = String::from_utf8(written).unwrap();
    assert!(text.starts_with("<OverlayData>"));
    assert!(text.contains("<POIs"), "POIs-Container muss angelegt werden: {text}");
}

#[test]
fn test_foreign_text_in_pois_keeps_its_whitespace() {
    let source = b"<OverlayData>\n  <POIs>  note  <Extra/></POIs>\n</OverlayData>\n";
    let first = load_and_render("text.xml", source);
    let text = String::from_utf8(first.clone()).unwrap();
    assert!(text.contains("<POIs>  note  <Extra/>"), "{text}");

    let reparsed = parse_pack_document(&FileKey::new("text.xml"), &first).unwrap();
    assert!(matches!(&reparsed.unmanaged[0], XmlNode::Text(t) if t == "  note  "));
    assert_eq!(load_and_render("text.xml", &first), first);
}
