//! Kategorie-Deklarationen (`<MarkerCategory>`) aus Overlay-Dokumenten lesen.

use crate::core::CategoryDeclaration;
use crate::xml::{XmlDocument, XmlElement};
use crate::xml::{ATTR_DISPLAY_NAME, ATTR_IS_SEPARATOR, ATTR_NAME, MARKER_CATEGORY, OVERLAY_DATA};

fn declaration_from_element(element: &XmlElement) -> CategoryDeclaration {
    CategoryDeclaration {
        name: element
            .attribute(ATTR_NAME)
            .map(|v| v.into_owned())
            .unwrap_or_default(),
        display_name: element.attribute(ATTR_DISPLAY_NAME).map(|v| v.into_owned()),
        is_separator: element.attribute(ATTR_IS_SEPARATOR).as_deref() == Some("1"),
        attributes: element
            .attributes()
            .iter()
            .map(|a| (a.name.clone(), a.value().into_owned()))
            .collect(),
        children: element
            .child_elements()
            .filter(|child| child.is_named(MARKER_CATEGORY))
            .map(declaration_from_element)
            .collect(),
    }
}

/// Alle Kategorie-Deklarationen direkt unter dem `<OverlayData>`-Root.
///
/// Dokumente mit anderem Root-Element deklarieren keine Kategorien.
pub(super) fn collect_declarations(document: &XmlDocument) -> Vec<CategoryDeclaration> {
    let Some(root) = document.root_element().filter(|r| r.is_named(OVERLAY_DATA)) else {
        return Vec::new();
    };

    root.child_elements()
        .filter(|child| child.is_named(MARKER_CATEGORY))
        .map(declaration_from_element)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_declarations_are_collected() {
        let doc = XmlDocument::parse(
            r#"<OverlayData>
  <MarkerCategory name="tyria" DisplayName="Tyria &amp; Co">
    <MarkerCategory name="sep" IsSeparator="1"/>
    <MarkerCategory name="hearts"/>
  </MarkerCategory>
  <POIs/>
</OverlayData>"#,
        )
        .unwrap();

        let declarations = collect_declarations(&doc);
        assert_eq!(declarations.len(), 1);

        let tyria = &declarations[0];
        assert_eq!(tyria.name, "tyria");
        assert_eq!(tyria.display_name.as_deref(), Some("Tyria & Co"));
        assert_eq!(
            tyria.attributes,
            vec![
                ("name".to_string(), "tyria".to_string()),
                ("DisplayName".to_string(), "Tyria & Co".to_string()),
            ]
        );
        assert_eq!(tyria.children.len(), 2);
        assert!(tyria.children[0].is_separator);
        assert!(!tyria.children[1].is_separator);
    }

    #[test]
    fn other_roots_declare_nothing() {
        let doc = XmlDocument::parse(r#"<Other><MarkerCategory name="x"/></Other>"#).unwrap();
        assert!(collect_declarations(&doc).is_empty());
    }
}
