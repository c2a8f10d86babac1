//! Writer für TacO-Marker-Packs.
//!
//! Baut ausschließlich den `<POIs>`-Container eines Dokuments neu auf. Die
//! Einrückung wird aus dem Whitespace vor dem Container abgeleitet.

use crate::core::Marker;
use crate::xml::{XmlDocument, XmlElement, XmlNode};
use crate::xml::{ATTR_GUID, ATTR_MAP_ID, ATTR_TYPE, ATTR_XPOS, ATTR_YPOS, ATTR_ZPOS};
use crate::xml::{OVERLAY_DATA, POI, POIS};
use anyhow::{Context, Result};

const DEFAULT_PARENT_INDENT: &str = "\n  ";

/// Schreibt die Marker einer Datei in ihr Dokument.
///
/// # Parameter
/// - `document`: Geparster Baum der Datei (wird in-place geändert)
/// - `markers`: Maßgebliche Marker-Reihenfolge der Datei
/// - `unmanaged`: Erhaltene Fremd-Knoten, werden nach den Markern angehängt
/// - `fallback_indent_unit`: Einrückungsstufe, falls keine ableitbar ist
pub fn rewrite_pois_section<'a>(
    document: &mut XmlDocument,
    markers: impl IntoIterator<Item = &'a Marker>,
    unmanaged: &[XmlNode],
    fallback_indent_unit: &str,
) -> Result<()> {
    let path = locate_pois_container(document, fallback_indent_unit)?;
    let depth = path.len().saturating_sub(1);

    let parent_indent = preceding_indent(document, &path);
    let newline = if parent_indent.contains("\r\n") { "\r\n" } else { "\n" };
    let line_indent = parent_indent.rsplit('\n').next().unwrap_or("");
    let unit = infer_indent_unit(line_indent, depth, fallback_indent_unit);

    let (child_indent, closing_indent) = if parent_indent.contains('\n') {
        (
            format!("{newline}{line_indent}{unit}"),
            format!("{newline}{line_indent}"),
        )
    } else {
        (unit.clone(), parent_indent.clone())
    };

    let container = document
        .element_at_mut(&path)
        .context("POIs-Container nicht erreichbar")?;
    container.children.clear();

    for marker in markers {
        container.children.push(XmlNode::Text(child_indent.clone()));
        container.children.push(XmlNode::Element(poi_element(marker)));
    }
    // Fremder Text bringt seinen Whitespace selbst mit, daneben keine Einrückung
    for node in unmanaged {
        let after_text = matches!(container.children.last(), Some(XmlNode::Text(_)));
        if !after_text && !matches!(node, XmlNode::Text(_)) {
            container.children.push(XmlNode::Text(child_indent.clone()));
        }
        container.children.push(node.clone());
    }

    if container.children.is_empty() {
        container.self_closing = true;
    } else {
        if !matches!(container.children.last(), Some(XmlNode::Text(_))) {
            container.children.push(XmlNode::Text(closing_indent));
        }
        container.self_closing = false;
    }

    Ok(())
}

/// Serialisiert ein Dokument zu UTF-8-Bytes.
pub fn render_document(document: &XmlDocument) -> Vec<u8> {
    document.to_xml_string().into_bytes()
}

/// Ein `<POI>` mit fester Attribut-Reihenfolge.
fn poi_element(marker: &Marker) -> XmlElement {
    let mut element = XmlElement::new(POI)
        .with_attribute(ATTR_MAP_ID, &marker.map_id().to_string())
        .with_attribute(ATTR_XPOS, &format_coordinate(marker.x()))
        .with_attribute(ATTR_YPOS, &format_coordinate(marker.y()))
        .with_attribute(ATTR_ZPOS, &format_coordinate(marker.z()));

    if !marker.marker_type().is_empty() {
        element.set_attribute(ATTR_TYPE, marker.marker_type());
    }
    element.set_attribute(ATTR_GUID, &marker.guid_base64());
    element
}

/// Koordinaten immer mit 4 Nachkommastellen (locale-unabhängig).
fn format_coordinate(value: f64) -> String {
    format!("{:.4}", value)
}

/// Findet den `<POIs>`-Container oder legt ihn unter dem Root an.
fn locate_pois_container(document: &mut XmlDocument, unit: &str) -> Result<Vec<usize>> {
    if let Some(path) = document.find_element_path(|e| e.is_named(POIS)) {
        return Ok(path);
    }

    let root_index = match document
        .nodes
        .iter()
        .position(|n| matches!(n, XmlNode::Element(_)))
    {
        Some(index) => index,
        None => {
            if !document.nodes.is_empty() && !document.nodes.last().is_some_and(XmlNode::is_whitespace_text) {
                document.nodes.push(XmlNode::Text("\n".to_string()));
            }
            document
                .nodes
                .push(XmlNode::Element(XmlElement::new(OVERLAY_DATA)));
            document.nodes.len() - 1
        }
    };

    let root = document
        .nodes
        .get_mut(root_index)
        .and_then(XmlNode::as_element_mut)
        .context("Root-Element nicht erreichbar")?;
    let child_index = insert_container(root, unit);
    Ok(vec![root_index, child_index])
}

/// Hängt einen leeren `<POIs>`-Container an das Root-Element an.
fn insert_container(root: &mut XmlElement, unit: &str) -> usize {
    let indent = root
        .children
        .iter()
        .find_map(|n| match n {
            XmlNode::Text(text) if n.is_whitespace_text() && text.contains('\n') => {
                Some(text.clone())
            }
            _ => None,
        })
        .unwrap_or_else(|| format!("\n{unit}"));

    root.self_closing = false;
    let container = XmlNode::Element(XmlElement::new(POIS));

    if root.children.last().is_some_and(XmlNode::is_whitespace_text) {
        let at = root.children.len() - 1;
        root.children.insert(at, XmlNode::Text(indent));
        root.children.insert(at + 1, container);
        at + 1
    } else {
        root.children.push(XmlNode::Text(indent));
        root.children.push(container);
        root.children.push(XmlNode::Text("\n".to_string()));
        root.children.len() - 2
    }
}

/// Whitespace-Text direkt vor dem Container (oder der Standard).
fn preceding_indent(document: &XmlDocument, path: &[usize]) -> String {
    let Some((last, parent_path)) = path.split_last() else {
        return DEFAULT_PARENT_INDENT.to_string();
    };
    let siblings = if parent_path.is_empty() {
        Some(&document.nodes)
    } else {
        document.element_at(parent_path).map(|p| &p.children)
    };

    siblings
        .and_then(|s| last.checked_sub(1).and_then(|i| s.get(i)))
        .and_then(|node| match node {
            XmlNode::Text(text) if node.is_whitespace_text() => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_PARENT_INDENT.to_string())
}

/// Leitet eine Einrückungsstufe aus der Einrückung des Containers ab.
///
/// Tabs ergeben einen Tab. Reine Leerzeichen werden durch die Verschachtelungstiefe
/// geteilt (4 Leerzeichen auf Tiefe 1 → 4er-Stufe).
fn infer_indent_unit(line_indent: &str, depth: usize, fallback: &str) -> String {
    if line_indent.contains('\t') {
        return "\t".to_string();
    }
    if depth > 0
        && !line_indent.is_empty()
        && line_indent.chars().all(|c| c == ' ')
        && line_indent.len() % depth == 0
    {
        return " ".repeat(line_indent.len() / depth);
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileKey;
    use glam::DVec3;
    use uuid::Uuid;

    fn marker(x: f64, marker_type: &str) -> Marker {
        Marker::new(
            Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap(),
            15,
            DVec3::new(x, 2.0, -3.5),
            marker_type,
            FileKey::new("a.xml"),
        )
    }

    #[test]
    fn test_format_coordinate_precision() {
        assert_eq!(format_coordinate(100.1234), "100.1234");
        assert_eq!(format_coordinate(-50.0), "-50.0000");
        assert_eq!(format_coordinate(1.23456), "1.2346");
    }

    #[test]
    fn test_fixed_attribute_order() {
        let mut doc = XmlDocument::parse("<OverlayData>\n  <POIs/>\n</OverlayData>").unwrap();
        let markers = [marker(1.0, "a.b"), marker(2.0, "")];
        rewrite_pois_section(&mut doc, &markers, &[], "  ").unwrap();

        let expected = "<OverlayData>\n  <POIs>\n    \
<POI MapID=\"15\" xpos=\"1.0000\" ypos=\"2.0000\" zpos=\"-3.5000\" type=\"a.b\" GUID=\"MyIRAFVEd2aImaq7zN3u/w==\" />\n    \
<POI MapID=\"15\" xpos=\"2.0000\" ypos=\"2.0000\" zpos=\"-3.5000\" GUID=\"MyIRAFVEd2aImaq7zN3u/w==\" />\n  \
</POIs>\n</OverlayData>";
        assert_eq!(doc.to_xml_string(), expected);
    }

    #[test]
    fn test_tab_indentation_is_inferred() {
        let mut doc = XmlDocument::parse("<OverlayData>\n\t<POIs></POIs>\n</OverlayData>").unwrap();
        rewrite_pois_section(&mut doc, &[marker(0.0, "")], &[], "  ").unwrap();
        let out = doc.to_xml_string();
        assert!(out.contains("\n\t\t<POI "), "{out}");
        assert!(out.contains("\n\t</POIs>"), "{out}");
    }

    #[test]
    fn test_unmanaged_nodes_follow_markers() {
        let mut doc = XmlDocument::parse("<OverlayData>\n    <POIs/>\n</OverlayData>").unwrap();
        let trail = XmlDocument::parse(r#"<Trail type="x" trailData="t.trl"/>"#).unwrap();
        let unmanaged = vec![
            XmlNode::Element(trail.root_element().unwrap().clone()),
            XmlNode::Comment(" end ".to_string()),
        ];
        rewrite_pois_section(&mut doc, &[marker(0.0, "")], &unmanaged, "  ").unwrap();

        let out = doc.to_xml_string();
        let poi = out.find("<POI ").unwrap();
        let trail = out.find(r#"<Trail type="x" trailData="t.trl"/>"#).unwrap();
        let comment = out.find("<!-- end -->").unwrap();
        assert!(poi < trail && trail < comment);
        assert!(out.contains("\n        <Trail"), "4er-Einrückung erwartet: {out}");
    }

    #[test]
    fn test_empty_marker_list_collapses_container() {
        let mut doc = XmlDocument::parse("<OverlayData>\n  <POIs>\n    <POI xpos=\"1\" ypos=\"1\"/>\n  </POIs>\n</OverlayData>").unwrap();
        rewrite_pois_section(&mut doc, std::iter::empty(), &[], "  ").unwrap();
        assert_eq!(doc.to_xml_string(), "<OverlayData>\n  <POIs/>\n</OverlayData>");
    }

    #[test]
    fn test_missing_container_is_created() {
        let mut doc = XmlDocument::parse(
            "<?xml version=\"1.0\"?>\n<OverlayData>\n  <MarkerCategory name=\"a\"/>\n</OverlayData>",
        )
        .unwrap();
        rewrite_pois_section(&mut doc, &[marker(0.0, "")], &[], "  ").unwrap();

        let out = doc.to_xml_string();
        assert!(out.starts_with("<?xml version=\"1.0\"?>\n<OverlayData>\n  <MarkerCategory name=\"a\"/>\n  <POIs>\n    <POI "), "{out}");
        assert!(out.ends_with("\n  </POIs>\n</OverlayData>"), "{out}");
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let source = "<OverlayData>\n  <POIs>\n    <POI xpos=\"1\" ypos=\"1\"/>\n    note\n  </POIs>\n</OverlayData>";
        let mut first = XmlDocument::parse(source).unwrap();
        let markers = [marker(5.0, "a")];
        let unmanaged = vec![XmlNode::Text("\n    note\n  ".to_string())];

        rewrite_pois_section(&mut first, &markers, &unmanaged, "  ").unwrap();
        let once = first.to_xml_string();
        assert!(once.contains("/>\n    note\n  </POIs>"), "{once}");
        let mut second = XmlDocument::parse(&once).unwrap();
        rewrite_pois_section(&mut second, &markers, &unmanaged, "  ").unwrap();

        assert_eq!(second.to_xml_string(), once);
    }
}
