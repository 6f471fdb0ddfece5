//! Arena-backed mutable document.
//!
//! All nodes live in one `Vec<Node>`. Relationships are `NodeId` indices:
//! children are owned by position in the parent's child list, the parent
//! link is plain data. Detached nodes stay in the arena but are unreachable
//! from the root, so they are never serialized.

use smallvec::SmallVec;

use super::category::Category;
use super::node::{Attrs, Element, Node, NodeData, NodeId};
use crate::error::DomError;
use crate::utils::html;

/// Marker attribute enabling dev mode (on the root) and exempting subtrees.
pub const DEV_MODE_ATTR: &str = "data-ampdevmode";

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    /// Source doctype, emitted verbatim before the tree.
    pub(crate) doctype: Option<String>,
    html: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    dev_mode: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    const ROOT: NodeId = NodeId(0);

    /// Create an empty document (just the arena root).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            doctype: None,
            html: None,
            head: None,
            body: None,
            dev_mode: false,
        }
    }

    // ========================================================================
    // Landmarks
    // ========================================================================

    /// Arena root (the document node).
    #[inline]
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// The `<html>` element, or the first top-level element.
    pub fn root_element(&self) -> Option<NodeId> {
        self.html
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Recompute cached `html`/`head`/`body` handles and the dev-mode flag.
    pub fn refresh_landmarks(&mut self) {
        let top: Vec<NodeId> = self.element_children(Self::ROOT);
        self.html = top
            .iter()
            .copied()
            .find(|&id| self.category(id) == Some(Category::Html))
            .or_else(|| top.first().copied());

        self.head = self.find_one(|n| n.category() == Some(Category::Head));
        self.body = self.find_one(|n| n.category() == Some(Category::Body));
        self.dev_mode = self
            .html
            .and_then(|id| self.get(id))
            .is_some_and(|n| n.attr(DEV_MODE_ATTR).is_some());
    }

    /// True when `id` sits in a dev-mode exempted subtree.
    ///
    /// Only meaningful in dev mode; the root element's own marker switches
    /// dev mode on and does not exempt the whole page.
    pub fn is_exempt(&self, id: NodeId) -> bool {
        if !self.dev_mode {
            return false;
        }
        let mut current = Some(id);
        while let Some(node_id) = current {
            if Some(node_id) == self.html || node_id == Self::ROOT {
                return false;
            }
            let Some(node) = self.get(node_id) else {
                return false;
            };
            if node.attr(DEV_MODE_ATTR).is_some() {
                return true;
            }
            current = node.parent;
        }
        false
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.get_mut(id).ok_or(DomError::NodeNotFound(id))
    }

    pub fn element(&self, id: NodeId) -> Result<&Element> {
        self.node(id)?
            .as_element()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn category(&self, id: NodeId) -> Option<Category> {
        self.get(id).and_then(Node::category)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::tag)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|n| n.attr(name))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(Node::is_element))
            .collect()
    }

    /// Check that `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == Self::ROOT {
                return true;
            }
            current = self.parent(node_id);
        }
        false
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.parent(node_id);
        }
        false
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// All nodes under `start` (inclusive) in document order.
    ///
    /// Iterative, so deeply nested author markup cannot overflow the stack.
    pub fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            out.push(id);
            // Push children in reverse order (so they're visited left-to-right)
            stack.extend(node.children.iter().rev().copied());
        }

        out
    }

    /// Attached elements matching a predicate, in document order.
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(Self::ROOT)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(|n| n.is_element() && predicate(n)))
            .collect()
    }

    /// First attached element matching a predicate.
    pub fn find_one<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.find(predicate).into_iter().next()
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|n| n.tag() == Some(tag))
    }

    /// First descendant element of `start` (exclusive) matching a predicate.
    pub fn find_descendant<F>(&self, start: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(start)
            .into_iter()
            .skip(1)
            .find(|&id| self.get(id).is_some_and(|n| n.is_element() && predicate(n)))
    }

    /// Concatenated, decoded text of a subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for node_id in self.descendants(id) {
            if let Some(Node {
                data: NodeData::Text(t),
                ..
            }) = self.get(node_id)
            {
                text.push_str(&html::unescape(t));
            }
        }
        text
    }

    // ========================================================================
    // Construction
    // ========================================================================

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str, attrs: Attrs) -> NodeId {
        self.push(Node::new(NodeData::Element(Element::new(tag, attrs))))
    }

    /// Create a detached text node from plain (unescaped) text.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(
            html::escape_text(text).into_owned(),
        )))
    }

    /// Create a detached text node from text already in HTML source form.
    pub(crate) fn create_raw_text(&mut self, text: String) -> NodeId {
        self.push(Node::new(NodeData::Text(text)))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(text.to_string())))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Remove `id` from its parent's child list. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            let siblings = &mut self.node_mut(parent)?.children;
            siblings.retain(|c| *c != id);
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if child == Self::ROOT || self.is_ancestor_or_self(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_attach(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Move `new` to just before `reference` in the same parent.
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) -> Result<()> {
        let parent = self
            .node(reference)?
            .parent
            .ok_or(DomError::NodeNotFound(reference))?;
        self.check_attach(parent, new)?;
        self.detach(new)?;
        let siblings: &mut SmallVec<[NodeId; 4]> = &mut self.node_mut(parent)?.children;
        let pos = siblings
            .iter()
            .position(|c| *c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(pos, new);
        self.node_mut(new)?.parent = Some(parent);
        Ok(())
    }

    /// Put `new` where `old` is and detach `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        self.insert_before(old, new)?;
        self.detach(old)
    }

    /// Replace all children of `parent` with a single text node.
    pub fn set_raw_text(&mut self, parent: NodeId, text: String) -> Result<()> {
        for child in self.children(parent).to_vec() {
            self.detach(child)?;
        }
        let id = self.create_raw_text(text);
        self.append_child(parent, id)
    }

    /// Raw (source form) text of a node's direct text children.
    pub fn raw_text(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|&c| match self.get(c).map(|n| &n.data) {
                Some(NodeData::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}
