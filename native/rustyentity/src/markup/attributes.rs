//! Markup Attribute Parsing
//!
//! Parses attributes from the content of a start tag. Parsing is lenient:
//! unquoted values and value-less attributes are accepted, stray characters
//! are skipped.

use super::entities::decode_text;
use std::borrow::Cow;

/// A parsed markup attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name as written
    pub name: &'a str,
    /// Attribute value (references decoded)
    pub value: Cow<'a, str>,
}

impl<'a> Attribute<'a> {
    /// Create a new attribute
    pub fn new(name: &'a str, value: Cow<'a, str>) -> Self {
        Attribute { name, value }
    }
}

/// Find an attribute value by name
pub fn find_attribute<'s>(attrs: &'s [Attribute<'_>], name: &str) -> Option<&'s str> {
    attrs.iter().find(|a| a.name == name).map(|a| a.value.as_ref())
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between the element name and '>' or '/>'.
/// Every index the loop stops at is an ASCII byte, so slicing stays on
/// char boundaries.
pub fn parse_attributes(input: &str) -> Vec<Attribute<'_>> {
    let bytes = input.as_bytes();
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        if pos >= bytes.len() || bytes[pos] == b'/' || bytes[pos] == b'>' {
            break;
        }

        if !is_name_start_char(bytes[pos]) {
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        if pos >= bytes.len() || bytes[pos] != b'=' {
            // Attribute without value (like HTML boolean attributes)
            attrs.push(Attribute::new(name, Cow::Borrowed("")));
            continue;
        }

        pos += 1; // Skip '='

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        if pos >= bytes.len() {
            attrs.push(Attribute::new(name, Cow::Borrowed("")));
            break;
        }

        let quote = bytes[pos];
        if quote != b'"' && quote != b'\'' {
            // Unquoted value (non-standard but handle it)
            let value_start = pos;
            while pos < bytes.len() && !is_whitespace(bytes[pos]) && bytes[pos] != b'/' && bytes[pos] != b'>' {
                pos += 1;
            }
            attrs.push(Attribute::new(name, decode_text(&input[value_start..pos])));
            continue;
        }

        pos += 1; // Skip opening quote
        let value_start = pos;
        while pos < bytes.len() && bytes[pos] != quote {
            pos += 1;
        }

        attrs.push(Attribute::new(name, decode_text(&input[value_start..pos])));

        if pos < bytes.len() {
            pos += 1; // Skip closing quote
        }
    }

    attrs
}

#[inline]
fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

#[inline]
fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
