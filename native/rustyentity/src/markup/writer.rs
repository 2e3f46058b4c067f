//! Markup Writer
//!
//! Appends escaped elements and text to a growing buffer. Elements are always
//! written with an explicit end tag so inline markers stay valid HTML.

use super::entities::escape_to_buf;

/// Buffer-backed markup writer
#[derive(Debug, Default)]
pub struct MarkupWriter {
    buf: String,
}

impl MarkupWriter {
    pub fn new() -> Self {
        MarkupWriter::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MarkupWriter {
            buf: String::with_capacity(capacity),
        }
    }

    /// Write `<name a="v" ...>`
    pub fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(name);
        for &(attr_name, attr_value) in attributes {
            self.buf.push(' ');
            self.buf.push_str(attr_name);
            self.buf.push_str("=\"");
            escape_to_buf(attr_value, &mut self.buf);
            self.buf.push('"');
        }
        self.buf.push('>');
    }

    /// Write `</name>`
    pub fn end_element(&mut self, name: &str) {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
    }

    /// Write `<name ...></name>`
    pub fn leaf_element(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.start_element(name, attributes);
        self.end_element(name);
    }

    /// Write escaped text content
    pub fn text(&mut self, text: &str) {
        escape_to_buf(text, &mut self.buf);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
