//! Mutable HTML document model.
//!
//! - `node`: arena node types (`NodeId`, `Element`, `Attrs`)
//! - `category`: tag classification
//! - `document`: the arena plus tree operations
//! - `parse` / `serialize`: HTML text in and out

mod category;
mod document;
mod node;
mod parse;
mod serialize;

pub use category::{AmpTag, Category};
pub use document::{DEV_MODE_ATTR, Document};
pub use node::{Attrs, Element, Node, NodeData, NodeId};
