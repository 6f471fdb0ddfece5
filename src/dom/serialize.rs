//! Arena → HTML text.
//!
//! Serialization is iterative (explicit stack of open/close frames) so it
//! shares the parser's tolerance for deeply nested input.

use super::document::Document;
use super::node::{NodeData, NodeId};
use crate::utils::html;

enum Frame {
    Open(NodeId),
    Close(NodeId),
}

impl Document {
    /// Serialize the whole document, doctype first.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.len() * 16);
        if let Some(doctype) = &self.doctype {
            out.push_str(doctype);
        }
        for &child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize one node and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, start: NodeId, out: &mut String) {
        let mut stack = vec![Frame::Open(start)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Open(id) => {
                    let Some(node) = self.get(id) else {
                        continue;
                    };
                    match &node.data {
                        NodeData::Document => {
                            stack.extend(node.children.iter().rev().map(|&c| Frame::Open(c)));
                        }
                        NodeData::Text(text) => out.push_str(text),
                        NodeData::Comment(text) => {
                            out.push_str("<!--");
                            out.push_str(text);
                            out.push_str("-->");
                        }
                        NodeData::Element(elem) => {
                            out.push('<');
                            out.push_str(&elem.tag);
                            for (name, value) in elem.attrs.iter() {
                                out.push(' ');
                                out.push_str(name);
                                if !value.is_empty() {
                                    out.push_str("=\"");
                                    out.push_str(&html::escape_attr(value));
                                    out.push('"');
                                }
                            }
                            out.push('>');

                            if html::is_void_element(&elem.tag) {
                                continue;
                            }
                            stack.push(Frame::Close(id));
                            stack.extend(node.children.iter().rev().map(|&c| Frame::Open(c)));
                        }
                    }
                }
                Frame::Close(id) => {
                    if let Some(tag) = self.tag(id) {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                }
            }
        }
    }
}
