// Minimal owned XML element tree
//
// The registry payloads are shallow, attribute-free documents, so a tiny
// tree of local names + text is all the crate needs. Namespace prefixes are
// dropped; attributes are ignored.

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

/// XML that is not well-formed (or not a single-rooted document).
#[derive(Debug, Error)]
#[error("malformed XML: {0}")]
pub struct ParseError(String);

/// One element of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local tag name, without namespace prefix.
    pub name: String,
    /// Unescaped direct text content, verbatim. `None` when the element
    /// carries no text at all.
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Text content as a borrowed str.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// First immediate child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All immediate children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Depth-first search over this element and its descendants.
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Open element on the parser stack plus its accumulated text.
struct Frame {
    element: Element,
    text: String,
}

impl Frame {
    fn open(name: &[u8]) -> Result<Self, ParseError> {
        let name = std::str::from_utf8(name)
            .map_err(|e| ParseError(format!("tag name is not UTF-8: {e}")))?;
        Ok(Self {
            element: Element::new(name),
            text: String::new(),
        })
    }

    fn close(mut self) -> Element {
        if !self.text.is_empty() {
            self.element.text = Some(self.text);
        }
        self.element
    }
}

/// Parse a complete document and return its root element.
pub fn parse(input: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(ParseError("content after the root element".into()));
                }
                stack.push(Frame::open(start.local_name().as_ref())?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(ParseError("content after the root element".into()));
                }
                let element = Frame::open(start.local_name().as_ref())?.close();
                match stack.last_mut() {
                    Some(parent) => parent.element.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| ParseError("closing tag without an open element".into()))?;
                let element = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.element.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError(format!("bad character data: {e}")))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(cdata) => {
                let raw = cdata.into_inner();
                let text = std::str::from_utf8(&raw)
                    .map_err(|e| ParseError(format!("CDATA is not UTF-8: {e}")))?;
                push_text(&mut stack, text)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError(format!(
            "unclosed element <{}>",
            open.element.name
        )));
    }
    root.ok_or_else(|| ParseError("document has no root element".into()))
}

fn push_text(stack: &mut [Frame], text: &str) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError("text outside the root element".into())),
    }
}

/// Escape text for inclusion in element content.
pub fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
