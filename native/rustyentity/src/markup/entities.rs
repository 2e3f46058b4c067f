//! Character Reference Decoding and Escaping
//!
//! Handles the references markup text and attribute values may carry:
//! - Predefined entities: &lt; &gt; &amp; &quot; &apos; (plus &nbsp;)
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no references are present.

use memchr::{memchr, memchr3};
use std::borrow::Cow;

/// Decode text content, resolving character references
///
/// Returns Borrowed if no references are present (zero-copy),
/// returns Owned if anything was decoded.
#[inline]
pub fn decode_text(input: &str) -> Cow<'_, str> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_references(input))
}

/// Decode all references in the input. Unknown references are kept verbatim.
fn decode_references(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = memchr(b';', rest.as_bytes())
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                result.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Decode a single reference (without & and ;)
fn decode_reference(reference: &str) -> Option<char> {
    if let Some(numeric) = reference.strip_prefix('#') {
        return decode_numeric(numeric);
    }

    match reference {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => None,
    }
}

/// Decode a numeric character reference body (`123` or `x7B`)
fn decode_numeric(body: &str) -> Option<char> {
    let codepoint = match body.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse::<u32>().ok()?,
    };
    if codepoint == 0 {
        return None;
    }
    char::from_u32(codepoint)
}

/// Escape markup special characters into the buffer
///
/// Safe for both text content and double-quoted attribute values.
#[inline]
pub fn escape_to_buf(s: &str, buf: &mut String) {
    let bytes = s.as_bytes();
    if memchr3(b'&', b'<', b'>', bytes).is_none() && memchr(b'"', bytes).is_none() {
        buf.push_str(s);
        return;
    }

    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            _ => buf.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_references_borrows() {
        let decoded = decode_text("plain text");
        assert!(matches!(decoded, Cow::Borrowed("plain text")));
    }

    #[test]
    fn test_predefined_entities() {
        assert_eq!(decode_text("&lt;b&gt; &amp; &quot;q&quot; &apos;"), "<b> & \"q\" '");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_text("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_text("caf&#233;"), "café");
    }

    #[test]
    fn test_unknown_and_broken_references_kept() {
        assert_eq!(decode_text("&bogus; & &#0;"), "&bogus; & &#0;");
        assert_eq!(decode_text("tail &amp"), "tail &amp");
    }

    #[test]
    fn test_escape() {
        let mut buf = String::new();
        escape_to_buf("a < b & \"c\" > d", &mut buf);
        assert_eq!(buf, "a &lt; b &amp; &quot;c&quot; &gt; d");
    }

    #[test]
    fn test_escape_then_decode() {
        let original = "Tom & \"Jerry\" <co>";
        let mut buf = String::new();
        escape_to_buf(original, &mut buf);
        assert_eq!(decode_text(&buf), original);
    }
}
