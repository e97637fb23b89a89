//! In-memory document tree fed to the encoder
//!
//! Elements live in a flat arena and refer to each other by [`NodeId`]. The root is always the
//! first element.

use derive_more::derive::Index;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, instrument};
use widestring::U16String;

use crate::error::{Error, Result};

/// Index of an element in its [`Document`]
pub type NodeId = usize;

/// A name/value pair of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: U16String,
}

/// An element of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub name: String,

    /// Attributes, in document order
    pub attributes: Vec<Attribute>,

    /// Leading text, only set when the first child node of the element is text
    pub text: Option<U16String>,

    /// Element children, in document order
    pub children: Vec<NodeId>,

    /// Parent element, `None` for the root
    pub parent: Option<NodeId>,
}

impl Element {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent,
        }
    }
}

/// Element arena with a single root
///
/// Indexing with a [`NodeId`] returns the [`Element`]. Ids come from [`Document::root`],
/// [`Document::append_child`] and [`Element::children`].
#[derive(Debug, Clone, PartialEq, Eq, Index)]
pub struct Document {
    #[index]
    nodes: Vec<Element>,
}

impl Document {
    /// Create a document holding only a root element called `root`
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            nodes: vec![Element::new(root, None)],
        }
    }

    /// The root element id
    pub fn root(&self) -> NodeId {
        0
    }

    /// Number of elements in the document
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always holds its root, so this is always false
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id)
    }

    /// Append a new element called `name` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not an element of this document.
    pub fn append_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Element::new(name, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Add an attribute to `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not an element of this document.
    pub fn push_attribute(&mut self, node: NodeId, name: impl Into<String>, value: &str) {
        self.nodes[node].attributes.push(Attribute {
            name: name.into(),
            value: U16String::from_str(value),
        });
    }

    /// Set the leading text of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not an element of this document.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node].text = Some(U16String::from_str(text));
    }

    /// Iterate over every element id, parents before their children and siblings in document order
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            document: self,
            stack: vec![self.root()],
        }
    }

    /// Read and parse the XML document at `path`.
    ///
    /// The encoding follows the byte order mark: UTF-16 in either byte order, otherwise UTF-8.
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&decode_source(&bytes)?)
    }

    /// Parse an XML document.
    ///
    /// Whitespace-only text is skipped. Text is kept only when it is the first child node of its
    /// element; comments, CDATA sections and processing instructions count as child nodes but are
    /// otherwise dropped. Anything outside the root element is ignored.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut nodes: Vec<Element> = Vec::new();
        // Open elements, each with whether a child node was seen yet
        let mut open: Vec<(NodeId, bool)> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let id = push_element(&mut nodes, &mut open, e)?;
                    open.push((id, false));
                }
                Event::Empty(ref e) => {
                    push_element(&mut nodes, &mut open, e)?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(ref e) => {
                    let raw = normalize_line_endings(std::str::from_utf8(e)?);
                    let text = unescape(&raw)?;
                    if is_xml_whitespace(&text) {
                        continue;
                    }
                    if let Some((id, seen)) = open.last_mut() {
                        if !*seen {
                            nodes[*id].text = Some(U16String::from_str(&text));
                        }
                        *seen = true;
                    }
                }
                Event::CData(_) | Event::Comment(_) | Event::PI(_) => {
                    if let Some((_, seen)) = open.last_mut() {
                        *seen = true;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some((id, _)) = open.last() {
            return Err(Error::UnclosedElement(nodes[*id].name.clone()));
        }
        if nodes.is_empty() {
            return Err(Error::MissingRoot);
        }

        debug!(elements = nodes.len(), "parsed document");
        Ok(Self { nodes })
    }
}

fn push_element(
    nodes: &mut Vec<Element>,
    open: &mut [(NodeId, bool)],
    start: &BytesStart,
) -> Result<NodeId> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();

    let parent = match open.last_mut() {
        Some((parent, seen)) => {
            *seen = true;
            Some(*parent)
        }
        None if nodes.is_empty() => None,
        None => return Err(Error::MultipleRoots(name)),
    };

    let mut element = Element::new(name, parent);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        element.attributes.push(Attribute {
            name: std::str::from_utf8(attribute.key.as_ref())?.to_string(),
            value: U16String::from_str(&attribute_value(&attribute.value)?),
        });
    }

    let id = nodes.len();
    nodes.push(element);
    if let Some(parent) = parent {
        nodes[parent].children.push(id);
    }

    Ok(id)
}

/// Decode a source file to text based on its byte order mark
fn decode_source(bytes: &[u8]) -> Result<String> {
    let decode_utf16 = |body: &[u8], unit: fn([u8; 2]) -> u16| -> Result<String> {
        let pairs = body.chunks_exact(2);
        if !pairs.remainder().is_empty() {
            return Err(Error::OddUtf16Length(body.len()));
        }
        let units = pairs.map(|pair| unit([pair[0], pair[1]])).collect::<Vec<_>>();
        Ok(U16String::from_vec(units).to_string()?)
    };

    match bytes {
        [0xFF, 0xFE, body @ ..] => decode_utf16(body, u16::from_le_bytes),
        [0xFE, 0xFF, body @ ..] => decode_utf16(body, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, body @ ..] => Ok(std::str::from_utf8(body)?.to_string()),
        _ => Ok(std::str::from_utf8(bytes)?.to_string()),
    }
}

/// Unescape entity and character references
fn unescape(raw: &str) -> Result<Cow<'_, str>> {
    Ok(quick_xml::escape::unescape(raw).map_err(quick_xml::Error::from)?)
}

/// End-of-line handling: every `\r\n` pair and every lone `\r` becomes `\n`
fn normalize_line_endings(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Attribute-value normalization: every literal tab, line feed and carriage return becomes a
/// space. Character references are expanded afterwards, so `&#10;` still yields a line feed.
fn attribute_value(raw: &[u8]) -> Result<String> {
    let raw = std::str::from_utf8(raw)?;
    let is_break = |c: char| matches!(c, '\t' | '\n' | '\r');
    let normalized = if raw.contains(is_break) {
        Cow::Owned(raw.replace(is_break, " "))
    } else {
        Cow::Borrowed(raw)
    };

    Ok(unescape(&normalized)?.into_owned())
}

fn is_xml_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Pre-order iterator over the elements of a [`Document`]
pub struct PreOrder<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.document[id].children.iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use widestring::U16String;

    use crate::document::{decode_source, Document};
    use crate::error::{Error, Result};

    fn text(doc: &Document, id: usize) -> Option<String> {
        doc[id].text.as_ref().map(|t| t.to_string_lossy())
    }

    #[test]
    fn parse_single_element() -> Result<()> {
        let doc = Document::parse(r#"<?xml version="1.0"?><Unit id="7"/>"#)?;

        assert_eq!(doc.len(), 1);
        let root = &doc[doc.root()];
        assert_eq!(root.name, "Unit");
        assert_eq!(root.attributes.len(), 1);
        assert_eq!(root.attributes[0].name, "id");
        assert_eq!(root.attributes[0].value, U16String::from_str("7"));
        assert_eq!(root.parent, None);

        Ok(())
    }

    #[test]
    fn parse_nested() -> Result<()> {
        let doc = Document::parse(
            r#"
            <Units>
                <Unit name="Pikeman">
                    <Cost type="Food">35</Cost>
                    <Cost type="Wood">25</Cost>
                </Unit>
                <Unit name="Musketeer"/>
            </Units>
            "#,
        )?;

        assert_eq!(doc.len(), 5);
        assert_eq!(doc[0].children, vec![1, 4]);
        assert_eq!(doc[1].children, vec![2, 3]);
        assert_eq!(doc[3].parent, Some(1));
        assert_eq!(text(&doc, 2), Some("35".to_string()));
        assert_eq!(text(&doc, 0), None);
        assert_eq!(doc.pre_order().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);

        Ok(())
    }

    #[test]
    fn parse_unescapes() -> Result<()> {
        let doc = Document::parse(r#"<Tip text="a &lt; b">Fish &amp; Chips</Tip>"#)?;

        assert_eq!(doc[0].attributes[0].value, U16String::from_str("a < b"));
        assert_eq!(text(&doc, 0), Some("Fish & Chips".to_string()));

        Ok(())
    }

    #[test]
    fn parse_normalizes_line_endings() -> Result<()> {
        let doc = Document::parse("<A>line1\r\nline2\rline3<B>kept&#13;</B></A>")?;

        assert_eq!(text(&doc, 0), Some("line1\nline2\nline3".to_string()));
        assert_eq!(text(&doc, 1), Some("kept\r".to_string()));

        Ok(())
    }

    #[test]
    fn parse_normalizes_attribute_whitespace() -> Result<()> {
        let doc = Document::parse("<A v=\"x\r\ny\tz\" w=\"a&#10;b&#9;c\"/>")?;

        assert_eq!(doc[0].attributes[0].value, U16String::from_str("x  y z"));
        assert_eq!(doc[0].attributes[1].value, U16String::from_str("a\nb\tc"));

        Ok(())
    }

    #[test]
    fn decode_sources_by_byte_order_mark() -> Result<()> {
        let xml = "<Name>Français</Name>";

        let mut utf16le = vec![0xFF, 0xFE];
        utf16le.extend(xml.encode_utf16().flat_map(u16::to_le_bytes));
        let mut utf16be = vec![0xFE, 0xFF];
        utf16be.extend(xml.encode_utf16().flat_map(u16::to_be_bytes));
        let mut utf8 = vec![0xEF, 0xBB, 0xBF];
        utf8.extend(xml.as_bytes());

        assert_eq!(decode_source(&utf16le)?, xml);
        assert_eq!(decode_source(&utf16be)?, xml);
        assert_eq!(decode_source(&utf8)?, xml);
        assert_eq!(decode_source(xml.as_bytes())?, xml);

        assert!(matches!(
            decode_source(&[0xFF, 0xFE, 0x3C]),
            Err(Error::OddUtf16Length(1))
        ));
        assert!(matches!(
            decode_source(&[0xFF, 0xFE, 0x00, 0xD8]),
            Err(Error::Utf16Error(_))
        ));

        Ok(())
    }

    #[test]
    fn parse_utf16_source_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("civ.xml");

        let xml = "<?xml version=\"1.0\" encoding=\"utf-16\"?>\r\n<Civ name=\"Français\">Line\r\nNext</Civ>";
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(xml.encode_utf16().flat_map(u16::to_le_bytes));
        std::fs::write(&path, bytes)?;

        let doc = Document::from_path(&path)?;
        assert_eq!(doc[0].attributes[0].value, U16String::from_str("Français"));
        assert_eq!(text(&doc, 0), Some("Line\nNext".to_string()));

        Ok(())
    }

    #[test]
    fn parse_keeps_only_leading_text() -> Result<()> {
        let doc = Document::parse(
            "<Root><A>first<B/>second</A><C><B/>tail</C><D><!-- note -->after</D><E>  padded </E></Root>",
        )?;

        assert_eq!(text(&doc, 1), Some("first".to_string()));
        assert_eq!(text(&doc, 3), None);
        assert_eq!(text(&doc, 5), None);
        assert_eq!(text(&doc, 6), Some("  padded ".to_string()));

        Ok(())
    }

    #[test]
    fn parse_whitespace_is_not_a_node() -> Result<()> {
        let doc = Document::parse("<Root>\n    <!-- c -->text\n</Root>")?;
        assert_eq!(text(&doc, 0), None);

        let doc = Document::parse("<Root>\n    text\n</Root>")?;
        assert_eq!(text(&doc, 0), Some("\n    text\n".to_string()));

        Ok(())
    }

    #[test]
    fn parse_cdata_suppresses_text() -> Result<()> {
        let doc = Document::parse("<Root><![CDATA[raw]]>text</Root>")?;
        assert_eq!(text(&doc, 0), None);

        Ok(())
    }

    #[test]
    fn parse_without_root() {
        assert!(matches!(
            Document::parse("<?xml version=\"1.0\"?><!-- nothing -->"),
            Err(Error::MissingRoot)
        ));
    }

    #[test]
    fn parse_two_roots() {
        assert!(matches!(
            Document::parse("<A/><B/>"),
            Err(Error::MultipleRoots(name)) if name == "B"
        ));
    }

    #[test]
    fn parse_mismatched_end() {
        assert!(Document::parse("<A><B></A>").is_err());
    }

    #[test]
    fn build_document() {
        let mut doc = Document::new("Civ");
        let name = doc.append_child(doc.root(), "Name");
        doc.set_text(name, "British");
        let unit = doc.append_child(doc.root(), "Unit");
        doc.push_attribute(unit, "id", "3");
        let nested = doc.append_child(name, "Alias");

        assert_eq!(doc.len(), 4);
        assert_eq!(doc[0].children, vec![name, unit]);
        assert_eq!(doc[nested].parent, Some(name));
        assert_eq!(text(&doc, name), Some("British".to_string()));
        assert_eq!(doc.pre_order().collect::<Vec<_>>(), vec![0, name, nested, unit]);
    }
}
