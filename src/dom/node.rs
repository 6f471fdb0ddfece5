//! Node types stored in the document arena.
//!
//! ```text
//! Document.nodes: Vec<Node>
//!                 [Doc][html][head][body]...
//!                   ↑ NodeId(u32) index, parent stored as plain data
//! ```

use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;

use super::category::Category;

/// Node identifier (index into the document arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Attribute list that keeps insertion order for stable serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(SmallVec<[(String, String); 4]>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    /// Set a value, replacing in place when the name already exists.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            let k = k.into();
            if !attrs.has(&k) {
                attrs.0.push((k, v.into()));
            }
        }
        attrs
    }
}

// =============================================================================
// Element
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    pub category: Category,
    pub attrs: Attrs,
}

impl Element {
    pub fn new(tag: &str, attrs: Attrs) -> Self {
        let tag = tag.to_ascii_lowercase();
        Self {
            category: Category::from_tag(&tag),
            tag,
            attrs,
        }
    }

    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    #[inline]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has(name)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.set(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Append a class unless it is already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", value);
    }
}

// =============================================================================
// Node
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// The arena root; owns the top-level nodes.
    Document,
    Element(Element),
    /// Text, stored exactly as it appears in HTML source.
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: SmallVec::new(),
            data,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.data {
            NodeData::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.data {
            NodeData::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag.as_str())
    }

    pub fn category(&self) -> Option<Category> {
        self.as_element().map(|e| e.category)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.as_element().and_then(|e| e.attr(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_keep_order_and_replace_in_place() {
        let mut attrs: Attrs = [("src", "a.png"), ("width", "10")].into_iter().collect();
        attrs.set("height", "20");
        attrs.set("src", "b.png");

        let names: Vec<_> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["src", "width", "height"]);
        assert_eq!(attrs.get("src"), Some("b.png"));

        assert_eq!(attrs.remove("width").as_deref(), Some("10"));
        assert!(!attrs.has("width"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_add_class() {
        let mut elem = Element::new("AMP-IMG", Attrs::new());
        assert_eq!(elem.tag, "amp-img");

        elem.add_class("a");
        elem.add_class("b");
        elem.add_class("a");
        assert_eq!(elem.attr("class"), Some("a b"));
        assert!(elem.has_class("b"));
        assert!(!elem.has_class("c"));
    }
}
