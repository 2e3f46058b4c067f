//! Pull Reader for the Markup Boundary Format
//!
//! Produces start/empty/end element and text events from a `&str`.
//! Comments, processing instructions and DOCTYPE declarations are skipped;
//! CDATA sections surface as text. The reader never fails: an unterminated
//! construct is surfaced as trailing text and recorded for strict callers.

use super::attributes::{is_whitespace, parse_attributes, Attribute};
use super::entities::decode_text;
use memchr::{memchr, memmem};
use std::borrow::Cow;

/// Markup parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    /// Start of an element: <name attrs...>
    StartElement {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
    },
    /// Empty element: <name attrs.../>
    EmptyElement {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
    },
    /// End of an element: </name>
    EndElement { name: &'a str },
    /// Text content between tags (references decoded)
    Text(Cow<'a, str>),
}

/// Zero-copy markup reader over a string slice
pub struct MarkupReader<'a> {
    input: &'a str,
    pos: usize,
    unterminated: Option<usize>,
}

impl<'a> MarkupReader<'a> {
    /// Create a new reader
    pub fn new(input: &'a str) -> Self {
        MarkupReader {
            input,
            pos: 0,
            unterminated: None,
        }
    }

    /// Byte offset of the first unterminated construct, if any
    pub fn unterminated(&self) -> Option<usize> {
        self.unterminated
    }

    /// Get the next markup event
    pub fn next_event(&mut self) -> Option<MarkupEvent<'a>> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            let rest = &self.input[self.pos..];

            if !rest.starts_with('<') {
                let end = memchr(b'<', rest.as_bytes()).unwrap_or(rest.len());
                self.pos += end;
                return Some(MarkupEvent::Text(decode_text(&rest[..end])));
            }

            if let Some(body) = rest.strip_prefix("<!--") {
                match memmem::find(body.as_bytes(), b"-->") {
                    Some(end) => {
                        self.pos += 4 + end + 3;
                        continue;
                    }
                    None => return self.unterminated_rest(),
                }
            }

            if let Some(body) = rest.strip_prefix("<![CDATA[") {
                match memmem::find(body.as_bytes(), b"]]>") {
                    Some(end) => {
                        self.pos += 9 + end + 3;
                        if end == 0 {
                            continue;
                        }
                        return Some(MarkupEvent::Text(Cow::Borrowed(&body[..end])));
                    }
                    None => return self.unterminated_rest(),
                }
            }

            if rest.starts_with("<!") || rest.starts_with("<?") {
                match memchr(b'>', rest.as_bytes()) {
                    Some(end) => {
                        self.pos += end + 1;
                        continue;
                    }
                    None => return self.unterminated_rest(),
                }
            }

            if let Some(body) = rest.strip_prefix("</") {
                return match memchr(b'>', body.as_bytes()) {
                    Some(end) => {
                        self.pos += 2 + end + 1;
                        Some(MarkupEvent::EndElement { name: body[..end].trim() })
                    }
                    None => self.unterminated_rest(),
                };
            }

            let Some(end) = find_tag_end(rest.as_bytes()) else {
                return self.unterminated_rest();
            };
            self.pos += end + 1;

            let mut inner = &rest[1..end];
            let is_empty = inner.ends_with('/');
            if is_empty {
                inner = &inner[..inner.len() - 1];
            }

            let name_end = inner
                .bytes()
                .position(|b| is_whitespace(b) || b == b'/')
                .unwrap_or(inner.len());
            let name = &inner[..name_end];

            if name.is_empty() {
                // A bare '<' in running text, e.g. "1 < 2 > 0"
                return Some(MarkupEvent::Text(decode_text(&rest[..end + 1])));
            }

            let attributes = parse_attributes(&inner[name_end..]);
            return Some(if is_empty {
                MarkupEvent::EmptyElement { name, attributes }
            } else {
                MarkupEvent::StartElement { name, attributes }
            });
        }
    }

    /// Surface everything left as text and remember where it started
    fn unterminated_rest(&mut self) -> Option<MarkupEvent<'a>> {
        if self.unterminated.is_none() {
            self.unterminated = Some(self.pos);
        }
        let rest = &self.input[self.pos..];
        self.pos = self.input.len();
        Some(MarkupEvent::Text(decode_text(rest)))
    }
}

impl<'a> Iterator for MarkupReader<'a> {
    type Item = MarkupEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

/// Find the closing '>' of a tag, ignoring any inside quoted attribute values
fn find_tag_end(bytes: &[u8]) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &str) -> Vec<MarkupEvent<'_>> {
        MarkupReader::new(input).collect()
    }

    #[test]
    fn test_simple_element() {
        let events = events("<p>hello</p>");
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], MarkupEvent::StartElement { name: "p", .. }));
        assert!(matches!(&events[1], MarkupEvent::Text(t) if t == "hello"));
        assert!(matches!(&events[2], MarkupEvent::EndElement { name: "p" }));
    }

    #[test]
    fn test_marker_element() {
        let events = events("<span s-id=\"1\" s-name=\"Name 1\"></span>");
        assert_eq!(events.len(), 2);
        match &events[0] {
            MarkupEvent::StartElement { name, attributes } => {
                assert_eq!(*name, "span");
                assert_eq!(attributes.len(), 2);
                assert_eq!(attributes[1].value, "Name 1");
            }
            other => panic!("Expected StartElement, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_element() {
        let events = events("<br/><span s-id='2' />");
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], MarkupEvent::EmptyElement { name: "br", .. }));
        assert!(matches!(&events[1], MarkupEvent::EmptyElement { name: "span", attributes } if attributes.len() == 1));
    }

    #[test]
    fn test_gt_inside_quoted_value() {
        let events = events("<span s-name=\"a > b\"/>");
        assert_eq!(events.len(), 1);
        match &events[0] {
            MarkupEvent::EmptyElement { attributes, .. } => assert_eq!(attributes[0].value, "a > b"),
            other => panic!("Expected EmptyElement, got {:?}", other),
        }
    }

    #[test]
    fn test_skips_comments_and_declarations() {
        let events = events("<?xml version=\"1.0\"?><!DOCTYPE p><!-- note --><p/>");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_cdata_is_text() {
        let events = events("<p><![CDATA[a < b]]></p>");
        assert!(matches!(&events[1], MarkupEvent::Text(t) if t == "a < b"));
    }

    #[test]
    fn test_unterminated_tag() {
        let mut reader = MarkupReader::new("<p>text<span s-id=\"1\"");
        let events: Vec<_> = reader.by_ref().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[2], MarkupEvent::Text(t) if t.starts_with("<span")));
        assert_eq!(reader.unterminated(), Some(7));
    }

    #[test]
    fn test_bare_less_than_is_text() {
        let events = events("1 < 2 > 0");
        let text: String = events
            .iter()
            .map(|e| match e {
                MarkupEvent::Text(t) => t.to_string(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(text, "1 < 2 > 0");
    }
}
