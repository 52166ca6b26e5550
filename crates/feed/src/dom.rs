// ABOUTME: Minimal owned XML DOM built on quick-xml event parsing.
// ABOUTME: Preserves attribute order, interleaved text, and verbatim inner markup per element.

use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::FeedError;

/// Index of an element in the document arena.
pub type NodeId = usize;

/// A child slot of an element: a nested element or a run of character data.
#[derive(Debug)]
enum ChildNode {
    Element(NodeId),
    Text(String),
}

#[derive(Debug)]
struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<ChildNode>,
    inner_xml: String,
}

/// A fully parsed XML document with a single root element.
///
/// Elements live in an arena filled in start-tag order, so arena order is
/// document order. Each element keeps its inner markup as a byte slice of
/// the source text rather than a re-serialization, so entities, attribute
/// order, and whitespace survive untouched.
#[derive(Debug)]
pub struct Document {
    elements: Vec<ElementData>,
    root: Option<NodeId>,
}

impl Document {
    /// Parses a complete XML document.
    ///
    /// Fails with `FeedError::Document` on anything that is not
    /// well-formed: reader errors, mismatched or unclosed elements,
    /// undefined entities, character data or a second element outside the
    /// root.
    pub fn parse(xml: &str) -> Result<Self, FeedError> {
        let mut reader = Reader::from_str(xml);
        let mut elements: Vec<ElementData> = Vec::new();
        let mut root: Option<NodeId> = None;
        // Open elements: arena id plus the offset where inner content starts.
        let mut stack: Vec<(NodeId, usize)> = Vec::new();

        loop {
            let event_start = reader.buffer_position() as usize;
            match reader.read_event() {
                Err(err) => return Err(FeedError::document(err)),
                Ok(Event::Eof) => {
                    if let Some(&(id, _)) = stack.last() {
                        return Err(FeedError::document(format!(
                            "unexpected end of document inside <{}>",
                            elements[id].name
                        )));
                    }
                    break;
                }
                Ok(Event::Start(e)) => {
                    let id = new_element(&mut elements, &e)?;
                    attach(&mut elements, &stack, &mut root, id)?;
                    stack.push((id, reader.buffer_position() as usize));
                }
                Ok(Event::Empty(e)) => {
                    let id = new_element(&mut elements, &e)?;
                    attach(&mut elements, &stack, &mut root, id)?;
                }
                Ok(Event::End(_)) => {
                    // The reader has already verified the end tag matches.
                    if let Some((id, inner_start)) = stack.pop() {
                        elements[id].inner_xml = xml[inner_start..event_start].to_string();
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.decode().map_err(FeedError::document)?;
                    append_text(&mut elements, &stack, &text)?;
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    append_text(&mut elements, &stack, &text)?;
                }
                Ok(Event::GeneralRef(e)) => {
                    let resolved = resolve_entity(&e)?;
                    append_text(&mut elements, &stack, &resolved)?;
                }
                // Declarations, comments, processing instructions, doctype.
                Ok(_) => {}
            }
        }

        match root {
            Some(_) => Ok(Document { elements, root }),
            None => Err(FeedError::document("document has no root element")),
        }
    }

    /// The document's root element.
    pub fn root(&self) -> Option<ElementRef<'_>> {
        self.root.map(|id| self.element(id))
    }

    /// First element with the given qualified name in document order, the
    /// root included.
    pub fn find(&self, name: &str) -> Option<ElementRef<'_>> {
        self.elements
            .iter()
            .position(|el| el.name == name)
            .map(|id| self.element(id))
    }

    pub(crate) fn element(&self, id: NodeId) -> ElementRef<'_> {
        ElementRef { doc: self, id }
    }
}

fn new_element(elements: &mut Vec<ElementData>, e: &BytesStart<'_>) -> Result<NodeId, FeedError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(FeedError::document)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(FeedError::document)?
            .into_owned();
        attrs.push((key, value));
    }
    let id = elements.len();
    elements.push(ElementData {
        name,
        attrs,
        children: Vec::new(),
        inner_xml: String::new(),
    });
    Ok(id)
}

fn attach(
    elements: &mut [ElementData],
    stack: &[(NodeId, usize)],
    root: &mut Option<NodeId>,
    id: NodeId,
) -> Result<(), FeedError> {
    match stack.last() {
        Some(&(parent, _)) => {
            elements[parent].children.push(ChildNode::Element(id));
            Ok(())
        }
        None if root.is_some() => Err(FeedError::document("multiple root elements")),
        None => {
            *root = Some(id);
            Ok(())
        }
    }
}

fn append_text(
    elements: &mut [ElementData],
    stack: &[(NodeId, usize)],
    text: &str,
) -> Result<(), FeedError> {
    match stack.last() {
        Some(&(parent, _)) => {
            // Merge adjacent runs so text split across CDATA and entity
            // boundaries reads back as one value.
            if let Some(ChildNode::Text(run)) = elements[parent].children.last_mut() {
                run.push_str(text);
            } else {
                elements[parent]
                    .children
                    .push(ChildNode::Text(text.to_string()));
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(FeedError::document("character data outside the root element")),
    }
}

fn resolve_entity(e: &BytesRef<'_>) -> Result<String, FeedError> {
    let name = String::from_utf8_lossy(&e).into_owned();
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        };
        return match code.and_then(char::from_u32) {
            Some(ch) => Ok(ch.to_string()),
            None => Err(FeedError::document(format!(
                "invalid character reference &{};",
                name
            ))),
        };
    }
    let replacement = match name.as_str() {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "apos" => "'",
        "quot" => "\"",
        _ => {
            return Err(FeedError::document(format!("undefined entity &{};", name)));
        }
    };
    Ok(replacement.to_string())
}

/// Borrowed handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn data(&self) -> &'a ElementData {
        &self.doc.elements[self.id]
    }

    /// Qualified element name, prefix included (`itunes:image`).
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the first attribute in document order, if any.
    pub fn first_attr(&self) -> Option<&'a str> {
        self.data().attrs.first().map(|(_, value)| value.as_str())
    }

    /// Direct child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let doc = self.doc;
        self.data().children.iter().filter_map(move |child| match child {
            ChildNode::Element(id) => Some(doc.element(*id)),
            ChildNode::Text(_) => None,
        })
    }

    /// First direct child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<ElementRef<'a>> {
        self.children().find(|child| child.name() == name)
    }

    /// Descendant elements with the given qualified name, in document
    /// order, this element excluded.
    pub fn descendants(&self, name: &str) -> Descendants<'a> {
        let mut pending: Vec<NodeId> = Vec::new();
        for child in self.data().children.iter().rev() {
            if let ChildNode::Element(id) = child {
                pending.push(*id);
            }
        }
        Descendants {
            doc: self.doc,
            pending,
            name: name.to_string(),
        }
    }

    /// Concatenated character data of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self.doc, self.id, &mut out);
        out
    }

    /// The element's inner markup exactly as it appeared in the source.
    pub fn inner_xml(&self) -> &'a str {
        &self.data().inner_xml
    }
}

/// Depth-first scan over a subtree for elements with one qualified name.
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    pending: Vec<NodeId>,
    name: String,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.pending.pop() {
            let data = &self.doc.elements[id];
            for child in data.children.iter().rev() {
                if let ChildNode::Element(child_id) = child {
                    self.pending.push(*child_id);
                }
            }
            if data.name == self.name {
                return Some(self.doc.element(id));
            }
        }
        None
    }
}

fn collect_text(doc: &Document, id: NodeId, out: &mut String) {
    for child in &doc.elements[id].children {
        match child {
            ChildNode::Text(run) => out.push_str(run),
            ChildNode::Element(child_id) => collect_text(doc, *child_id, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_child_and_attr_lookup() {
        let doc = Document::parse(
            r#"<channel><title>My Show</title><link href="https://example.com/feed"/></channel>"#,
        )
        .unwrap();
        let channel = doc.root().unwrap();
        assert_eq!(channel.name(), "channel");
        assert_eq!(channel.child("title").unwrap().text(), "My Show");
        assert_eq!(
            channel.child("link").unwrap().attr("href"),
            Some("https://example.com/feed")
        );
        assert!(channel.child("missing").is_none());
        assert!(channel.child("link").unwrap().attr("missing").is_none());
    }

    #[test]
    fn test_first_attr_preserves_document_order() {
        let doc = Document::parse(r#"<e second="b" first="a"/>"#).unwrap();
        assert_eq!(doc.root().unwrap().first_attr(), Some("b"));
    }

    #[test]
    fn test_descendants_scoped_and_ordered() {
        let doc = Document::parse(
            "<root><channel><item><n>1</n></item><wrap><item><n>2</n></item></wrap></channel><item><n>3</n></item></root>",
        )
        .unwrap();
        let channel = doc.find("channel").unwrap();
        let numbers: Vec<String> = channel
            .descendants("item")
            .map(|item| item.child("n").unwrap().text())
            .collect();
        // Scoped to the channel subtree; the third item is outside it.
        assert_eq!(numbers, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_find_returns_first_in_document_order() {
        let doc = Document::parse("<a><b id=\"1\"/><c><b id=\"2\"/></c></a>").unwrap();
        assert_eq!(doc.find("b").unwrap().attr("id"), Some("1"));
        assert_eq!(doc.find("a").unwrap().name(), "a");
        assert!(doc.find("z").is_none());
    }

    #[test]
    fn test_text_decodes_entities_and_cdata() {
        let doc =
            Document::parse("<t>Tom &amp; Jerry <![CDATA[<untouched>]]> &#233;</t>").unwrap();
        assert_eq!(doc.root().unwrap().text(), "Tom & Jerry <untouched> é");
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let doc = Document::parse("<a>x<b>y</b>z</a>").unwrap();
        assert_eq!(doc.root().unwrap().text(), "xyz");
    }

    #[test]
    fn test_inner_xml_is_verbatim() {
        let xml = r#"<item><title>Ep &amp; One</title><enclosure url="https://cdn/1.mp3" type="audio/mpeg"/></item>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(
            doc.root().unwrap().inner_xml(),
            r#"<title>Ep &amp; One</title><enclosure url="https://cdn/1.mp3" type="audio/mpeg"/>"#
        );
    }

    #[test]
    fn test_inner_xml_empty_for_self_closing() {
        let doc = Document::parse("<a><b/></a>").unwrap();
        assert_eq!(doc.root().unwrap().child("b").unwrap().inner_xml(), "");
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        assert!(matches!(
            Document::parse("<rss><channel></rss>"),
            Err(FeedError::Document(_))
        ));
        assert!(matches!(
            Document::parse("<rss><channel>"),
            Err(FeedError::Document(_))
        ));
    }

    #[test]
    fn test_undefined_entity_is_an_error() {
        assert!(matches!(
            Document::parse("<t>&nosuch;</t>"),
            Err(FeedError::Document(_))
        ));
    }

    #[test]
    fn test_multiple_roots_are_an_error() {
        assert!(matches!(
            Document::parse("<a/><b/>"),
            Err(FeedError::Document(_))
        ));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(Document::parse(""), Err(FeedError::Document(_))));
    }
}
