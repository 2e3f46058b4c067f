//! Markup Module - Boundary Format
//!
//! Documents and entity markers cross the crate boundary as a small inline
//! markup dialect:
//! - Reader: zero-copy pull reader producing element/text events
//! - Attributes: lenient attribute parsing with reference decoding
//! - Entities: character reference decoding and escaping
//! - Writer: escaped serialization back to markup

pub mod attributes;
pub mod entities;
pub mod reader;
pub mod writer;

pub use attributes::{find_attribute, Attribute};
pub use reader::{MarkupEvent, MarkupReader};
pub use writer::MarkupWriter;
