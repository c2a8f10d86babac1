//! Verlustfreier XML-Baum für Pack-Dokumente.
//!
//! Whitespace, Kommentare, CDATA, Processing-Instructions und Entity-Referenzen
//! bleiben unverändert erhalten. Start-Tags, deren Attribute nicht angefasst
//! wurden, werden byte-genau wieder ausgegeben.

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

/// Ein Knoten im Dokument.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Text in roher (escapter) Form, inklusive Entity-Referenzen
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    /// Inhalt von `<?xml ... ?>`
    Declaration(String),
    DocType(String),
}

impl XmlNode {
    /// Reiner Whitespace-Text (Einrückung zwischen Elementen).
    pub fn is_whitespace_text(&self) -> bool {
        matches!(self, XmlNode::Text(text) if text.chars().all(char::is_whitespace))
    }

    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            XmlNode::Element(element) => element.write_to(out),
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::CData(text) => {
                out.push_str("<![CDATA[");
                out.push_str(text);
                out.push_str("]]>");
            }
            XmlNode::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            XmlNode::ProcessingInstruction(text) | XmlNode::Declaration(text) => {
                out.push_str("<?");
                out.push_str(text);
                out.push_str("?>");
            }
            XmlNode::DocType(text) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(text.trim_start());
                out.push('>');
            }
        }
    }
}

/// Attribut mit rohem (escaptem) Wert.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub name: String,
    pub raw_value: String,
}

impl XmlAttribute {
    /// Unescapter Wert; bei ungültigen Entities der Rohwert.
    pub fn value(&self) -> Cow<'_, str> {
        unescape(&self.raw_value).unwrap_or(Cow::Borrowed(self.raw_value.as_str()))
    }
}

/// Element mit Attributen und Kindknoten.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<XmlAttribute>,
    /// Original-Inhalt des Start-Tags, solange die Attribute unverändert sind
    raw_tag: Option<String>,
    pub children: Vec<XmlNode>,
    pub self_closing: bool,
}

impl XmlElement {
    /// Neues, leeres (selbstschließendes) Element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            raw_tag: None,
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Builder-Variante von [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name ohne Namespace-Präfix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Vergleicht den lokalen Namen case-insensitiv.
    pub fn is_named(&self, name: &str) -> bool {
        self.local_name().eq_ignore_ascii_case(name)
    }

    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Unescapter Attributwert, Name case-insensitiv.
    pub fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(XmlAttribute::value)
    }

    /// Setzt (oder ersetzt) ein Attribut; der Wert wird escaped.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let raw_value = escape(value).into_owned();
        self.raw_tag = None;
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.raw_value = raw_value,
            None => self.attributes.push(XmlAttribute {
                name: name.to_string(),
                raw_value,
            }),
        }
    }

    /// Direkte Kind-Elemente.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        match &self.raw_tag {
            Some(raw) => out.push_str(raw),
            None => {
                out.push_str(&self.name);
                for attribute in &self.attributes {
                    out.push(' ');
                    out.push_str(&attribute.name);
                    out.push_str("=\"");
                    out.push_str(&attribute.raw_value.replace('"', "&quot;"));
                    out.push('"');
                }
            }
        }

        if self.self_closing && self.children.is_empty() {
            if self.raw_tag.is_none() {
                out.push_str(" />");
            } else {
                out.push_str("/>");
            }
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Ein komplettes Dokument: Prolog, Root-Element und nachfolgende Knoten.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlDocument {
    pub nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parsed einen XML-String in einen verlustfreien Baum.
    pub fn parse(xml_content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml_content);
        // Kein trim_text: Whitespace gehört zum Dokument

        let mut buffer = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut top_level: Vec<XmlNode> = Vec::new();

        loop {
            match reader.read_event_into(&mut buffer) {
                Ok(Event::Start(ref e)) => stack.push(element_from_tag(e, false)?),
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_tag(e, true)?;
                    push_node(&mut stack, &mut top_level, XmlNode::Element(element));
                }
                Ok(Event::End(ref e)) => {
                    let element = stack.pop().ok_or_else(|| {
                        anyhow!(
                            "Schließendes Tag </{}> ohne offenes Element",
                            lossy(e.name().as_ref())
                        )
                    })?;
                    push_node(&mut stack, &mut top_level, XmlNode::Element(element));
                }
                Ok(Event::Text(ref e)) => push_text(&mut stack, &mut top_level, &lossy(e)),
                Ok(Event::GeneralRef(ref e)) => {
                    push_text(&mut stack, &mut top_level, &format!("&{};", lossy(e)))
                }
                Ok(Event::CData(ref e)) => {
                    push_node(&mut stack, &mut top_level, XmlNode::CData(lossy(e)))
                }
                Ok(Event::Comment(ref e)) => {
                    push_node(&mut stack, &mut top_level, XmlNode::Comment(lossy(e)))
                }
                Ok(Event::PI(ref e)) => push_node(
                    &mut stack,
                    &mut top_level,
                    XmlNode::ProcessingInstruction(lossy(e)),
                ),
                Ok(Event::Decl(ref e)) => {
                    push_node(&mut stack, &mut top_level, XmlNode::Declaration(lossy(e)))
                }
                Ok(Event::DocType(ref e)) => {
                    push_node(&mut stack, &mut top_level, XmlNode::DocType(lossy(e)))
                }
                Ok(Event::Eof) => break,
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("Fehler beim Parsen des XML (Byte {})", reader.error_position())
                    })
                }
                _ => {}
            }
            buffer.clear();
        }

        if let Some(open) = stack.last() {
            bail!("Element <{}> wird nicht geschlossen", open.name);
        }
        if !top_level.iter().any(|n| matches!(n, XmlNode::Element(_))) {
            bail!("Dokument enthält kein Root-Element");
        }

        Ok(Self { nodes: top_level })
    }

    /// Minimales Overlay-Dokument für neue Dateien.
    pub fn new_overlay_document() -> Self {
        Self {
            nodes: vec![
                XmlNode::Declaration(r#"xml version="1.0" encoding="utf-8""#.to_string()),
                XmlNode::Text("\n".to_string()),
                XmlNode::Element(XmlElement::new(super::OVERLAY_DATA)),
            ],
        }
    }

    /// Erstes Top-Level-Element.
    pub fn root_element(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(XmlNode::as_element)
    }

    pub fn root_element_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(XmlNode::as_element_mut)
    }

    /// Pfad (Kind-Indizes ab `nodes`) zum ersten Element in Dokumentreihenfolge,
    /// das `predicate` erfüllt.
    pub fn find_element_path(&self, predicate: impl Fn(&XmlElement) -> bool) -> Option<Vec<usize>> {
        fn visit(
            nodes: &[XmlNode],
            path: &mut Vec<usize>,
            predicate: &dyn Fn(&XmlElement) -> bool,
        ) -> bool {
            for (index, node) in nodes.iter().enumerate() {
                if let XmlNode::Element(element) = node {
                    path.push(index);
                    if predicate(element) || visit(&element.children, path, predicate) {
                        return true;
                    }
                    path.pop();
                }
            }
            false
        }

        let mut path = Vec::new();
        visit(&self.nodes, &mut path, &predicate).then_some(path)
    }

    /// Erstes Element in Dokumentreihenfolge mit passendem Namen (case-insensitiv).
    pub fn find_element(&self, name: &str) -> Option<&XmlElement> {
        let path = self.find_element_path(|e| e.is_named(name))?;
        self.element_at(&path)
    }

    pub fn element_at(&self, path: &[usize]) -> Option<&XmlElement> {
        let (first, rest) = path.split_first()?;
        let mut element = self.nodes.get(*first)?.as_element()?;
        for index in rest {
            element = element.children.get(*index)?.as_element()?;
        }
        Some(element)
    }

    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut XmlElement> {
        let (first, rest) = path.split_first()?;
        let mut element = self.nodes.get_mut(*first)?.as_element_mut()?;
        for index in rest {
            element = element.children.get_mut(*index)?.as_element_mut()?;
        }
        Some(element)
    }

    /// Serialisiert den Baum wieder zu Text.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_to(&mut out);
        }
        out
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn element_from_tag(tag: &BytesStart<'_>, self_closing: bool) -> Result<XmlElement> {
    let mut attributes = Vec::new();
    for attr in tag.attributes() {
        let attr = attr.context("Ungültiges Attribut")?;
        attributes.push(XmlAttribute {
            name: lossy(attr.key.as_ref()),
            raw_value: lossy(&attr.value),
        });
    }

    Ok(XmlElement {
        name: lossy(tag.name().as_ref()),
        attributes,
        raw_tag: Some(lossy(tag)),
        children: Vec::new(),
        self_closing,
    })
}

fn push_node(stack: &mut [XmlElement], top_level: &mut Vec<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top_level.push(node),
    }
}

/// Text und Entity-Referenzen kommen als getrennte Events; benachbarte Stücke
/// werden zu einem Textknoten zusammengeführt.
fn push_text(stack: &mut [XmlElement], top_level: &mut Vec<XmlNode>, text: &str) {
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => top_level,
    };
    if let Some(XmlNode::Text(previous)) = siblings.last_mut() {
        previous.push_str(text);
    } else {
        siblings.push(XmlNode::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_byte_exact() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                   <!-- Pack -->\n\
                   <OverlayData>\n\
                   \t<MarkerCategory name='a' DisplayName=\"A &amp; B\" />\n\
                   \t<Extra><![CDATA[<raw>]]>text &lt;x&gt; &#10;</Extra>\n\
                   \t<?custom data?>\n\
                   </OverlayData>\n";
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.to_xml_string(), xml);
    }

    #[test]
    fn attribute_values_are_unescaped_on_read() {
        let doc = XmlDocument::parse(r#"<r><c Name="A &amp; B"/></r>"#).unwrap();
        let child = doc.root_element().unwrap().child_elements().next().unwrap();
        assert_eq!(child.attribute("name").as_deref(), Some("A & B"));
    }

    #[test]
    fn modified_attributes_are_escaped_on_write() {
        let mut element = XmlElement::new("POI").with_attribute("type", "a<b");
        element.set_attribute("TYPE", "\"x\"");
        let mut out = String::new();
        element.write_to(&mut out);
        assert_eq!(out, r#"<POI type="&quot;x&quot;" />"#);
    }

    #[test]
    fn find_element_searches_depth_first() {
        let doc = XmlDocument::parse("<a><b><pois id='1'/></b><POIs id='2'/></a>").unwrap();
        let found = doc.find_element("POIs").unwrap();
        assert_eq!(found.attribute("id").as_deref(), Some("1"));
        assert_eq!(doc.find_element_path(|e| e.is_named("pois")), Some(vec![0, 0, 0]));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(XmlDocument::parse("<a><b></a>").is_err());
        assert!(XmlDocument::parse("<a>").is_err());
        assert!(XmlDocument::parse("   ").is_err());
    }
}
