//! Marker-Parsing: Konvertiert `<POI>`-Elemente in Marker-Objekte.

use crate::core::{FileKey, Marker};
use crate::xml::{XmlElement, XmlNode};
use crate::xml::{ATTR_GUID, ATTR_MAP_ID, ATTR_TYPE, ATTR_XPOS, ATTR_YPOS, ATTR_ZPOS, POI};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use glam::DVec3;
use uuid::Uuid;

/// Liest eine GUID aus dem Pack-Format.
///
/// Reihenfolge: Base64 (16 Bytes, .NET-Byte-Reihenfolge), dann Text-GUID in
/// beliebiger Standardschreibweise. Fehlt der Wert, ist er unlesbar oder Null,
/// wird eine frische zufällige GUID vergeben.
pub(super) fn parse_guid(text: Option<&str>) -> Uuid {
    let parsed = text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(|t| {
            BASE64
                .decode(t)
                .ok()
                .and_then(|bytes| <[u8; 16]>::try_from(bytes.as_slice()).ok())
                .map(Uuid::from_bytes_le)
                .or_else(|| Uuid::parse_str(t).ok())
        })
        .unwrap_or(Uuid::nil());

    if parsed.is_nil() {
        Uuid::new_v4()
    } else {
        parsed
    }
}

fn parse_coordinate(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Baut einen Marker aus einem `<POI>`-Element.
///
/// Ohne `xpos` oder `ypos` ist das Element kein verwalteter Marker (`None`),
/// es bleibt dann als nicht verwalteter Knoten erhalten.
pub(super) fn marker_from_element(element: &XmlElement, source_file: &FileKey) -> Option<Marker> {
    let xpos = element.attribute(ATTR_XPOS)?;
    let ypos = element.attribute(ATTR_YPOS)?;

    let guid = parse_guid(element.attribute(ATTR_GUID).as_deref());
    let map_id = element
        .attribute(ATTR_MAP_ID)
        .and_then(|v| v.trim().parse::<i32>().ok())
        .unwrap_or(0);
    let position = DVec3::new(
        parse_coordinate(Some(&*xpos)),
        parse_coordinate(Some(&*ypos)),
        parse_coordinate(element.attribute(ATTR_ZPOS).as_deref()),
    );
    let marker_type = element
        .attribute(ATTR_TYPE)
        .map(|t| t.into_owned())
        .unwrap_or_default();

    Some(Marker::new(guid, map_id, position, marker_type, source_file.clone()))
}

/// Teilt die Kinder eines `<POIs>`-Containers in Marker und nicht verwaltete Knoten.
///
/// Reiner Whitespace wird verworfen (der Writer erzeugt die Einrückung neu),
/// alle anderen Knoten bleiben in Original-Reihenfolge erhalten. Sonstiger Text
/// wird nur an den Rändern getrimmt.
pub(super) fn split_poi_children(
    container: &XmlElement,
    source_file: &FileKey,
) -> (Vec<Marker>, Vec<XmlNode>) {
    let mut markers = Vec::new();
    let mut unmanaged = Vec::new();

    for child in &container.children {
        match child {
            XmlNode::Element(element) if element.is_named(POI) => {
                match marker_from_element(element, source_file) {
                    Some(marker) => markers.push(marker),
                    None => {
                        log::debug!(
                            "{}: POI ohne xpos/ypos bleibt unverwaltet",
                            source_file
                        );
                        unmanaged.push(child.clone());
                    }
                }
            }
            // Reine Einrückung erzeugt der Writer neu, anderer Text bleibt wörtlich
            node if node.is_whitespace_text() => {}
            node => unmanaged.push(node.clone()),
        }
    }

    (markers, unmanaged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;

    #[test]
    fn guid_accepts_base64_and_text_forms() {
        let guid = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let encoded = BASE64.encode(guid.to_bytes_le());

        assert_eq!(parse_guid(Some(&encoded)), guid);
        assert_eq!(parse_guid(Some("{00112233-4455-6677-8899-AABBCCDDEEFF}")), guid);
        assert_eq!(parse_guid(Some("00112233445566778899aabbccddeeff")), guid);
    }

    #[test]
    fn guid_falls_back_to_fresh_value() {
        for input in [None, Some(""), Some("???"), Some("AAAAAAAAAAAAAAAAAAAAAA==")] {
            let guid = parse_guid(input);
            assert!(!guid.is_nil(), "Eingabe {:?}", input);
        }
        assert_ne!(parse_guid(None), parse_guid(None));
    }

    #[test]
    fn marker_attributes_are_read_case_insensitive() {
        let doc = XmlDocument::parse(
            r#"<POI mapid=" 15 " XPOS="1.5" ypos="-2" type="tyria.hearts"/>"#,
        )
        .unwrap();
        let marker = marker_from_element(doc.root_element().unwrap(), &FileKey::new("a.xml"))
            .unwrap();

        assert_eq!(marker.map_id(), 15);
        assert_eq!(marker.position(), DVec3::new(1.5, -2.0, 0.0));
        assert_eq!(marker.marker_type(), "tyria.hearts");
        assert!(!marker.is_dirty());
    }

    #[test]
    fn unparsable_numbers_default_to_zero() {
        let doc = XmlDocument::parse(r#"<POI MapID="abc" xpos="nan?" ypos="" zpos="4"/>"#).unwrap();
        let marker = marker_from_element(doc.root_element().unwrap(), &FileKey::new("a.xml"))
            .unwrap();
        assert_eq!(marker.map_id(), 0);
        assert_eq!(marker.position(), DVec3::new(0.0, 0.0, 4.0));
        assert_eq!(marker.marker_type(), "");
    }

    #[test]
    fn poi_without_coordinates_stays_unmanaged() {
        let doc = XmlDocument::parse(
            "<POIs>\n  <POI xpos=\"1\" ypos=\"2\"/>\n  <POI xpos=\"1\"/>\n  <!-- c -->\n  <Trail/>\n</POIs>",
        )
        .unwrap();
        let (markers, unmanaged) =
            split_poi_children(doc.root_element().unwrap(), &FileKey::new("a.xml"));

        assert_eq!(markers.len(), 1);
        assert_eq!(unmanaged.len(), 3);
        assert!(matches!(&unmanaged[1], XmlNode::Comment(c) if c == " c "));
    }
}
