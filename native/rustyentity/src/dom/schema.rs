//! Document Schema
//!
//! Declares which markup elements become atomic leaves and how their node
//! attributes map to markup attributes in both directions. Everything the
//! schema does not claim is parsed as a plain container element.

use crate::markup::{find_attribute, Attribute};

/// One node attribute and its markup counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpec {
    /// Attribute name on the node
    pub name: String,
    /// Attribute name in markup
    pub markup_name: String,
    /// Value used when the markup omits the attribute; `None` leaves it unset
    pub default: Option<String>,
}

impl AttrSpec {
    pub fn new(name: impl Into<String>, markup_name: impl Into<String>) -> Self {
        AttrSpec {
            name: name.into(),
            markup_name: markup_name.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Specification of an atomic leaf node type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomSpec {
    /// Node type name
    pub name: String,
    /// Markup tag the node is written as
    pub tag: String,
    /// Markup attribute whose presence identifies the node when parsing
    pub marker_attribute: String,
    /// Node attributes
    pub attrs: Vec<AttrSpec>,
    /// Lives inside text blocks
    pub inline: bool,
    /// Can be the target of a node selection
    pub selectable: bool,
    /// Can be dragged as a unit
    pub draggable: bool,
    /// Marks allowed on the node (empty disallows all)
    pub marks: String,
}

impl AtomSpec {
    /// Does a markup element match this spec's parse rule?
    pub fn matches(&self, tag: &str, attributes: &[Attribute<'_>]) -> bool {
        tag == self.tag && find_attribute(attributes, &self.marker_attribute).is_some()
    }

    /// Convert markup attributes into node attributes
    pub fn parse_attributes(&self, attributes: &[Attribute<'_>]) -> Vec<(String, String)> {
        self.attrs
            .iter()
            .filter_map(|spec| {
                let value = find_attribute(attributes, &spec.markup_name)
                    .map(str::to_string)
                    .or_else(|| spec.default.clone())?;
                Some((spec.name.clone(), value))
            })
            .collect()
    }

    /// Convert node attributes into markup attributes, in spec order.
    /// Node attributes this type does not declare are passed through unchanged.
    pub fn markup_attributes<'a>(&'a self, attrs: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        let mut out: Vec<(&str, &str)> = self
            .attrs
            .iter()
            .filter_map(|spec| {
                let value = attrs.iter().find(|(name, _)| *name == spec.name)?.1;
                Some((spec.markup_name.as_str(), value))
            })
            .collect();
        out.extend(
            attrs
                .iter()
                .filter(|(name, _)| self.attrs.iter().all(|spec| spec.name != *name))
                .copied(),
        );
        out
    }
}

/// The set of atom node types a document recognizes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    atoms: Vec<AtomSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// Register an atom node type. A later spec with the same name replaces
    /// the earlier one.
    pub fn with_atom(mut self, spec: AtomSpec) -> Self {
        self.atoms.retain(|existing| existing.name != spec.name);
        self.atoms.push(spec);
        self
    }

    /// Look up an atom spec by node type name
    pub fn atom(&self, name: &str) -> Option<&AtomSpec> {
        self.atoms.iter().find(|spec| spec.name == name)
    }

    /// Match a markup element against the registered parse rules
    pub fn parse_atom(&self, tag: &str, attributes: &[Attribute<'_>]) -> Option<(&AtomSpec, Vec<(String, String)>)> {
        let spec = self.atoms.iter().find(|spec| spec.matches(tag, attributes))?;
        Some((spec, spec.parse_attributes(attributes)))
    }

    pub fn atoms(&self) -> &[AtomSpec] {
        &self.atoms
    }
}
