//! Marks the root element as optimized (`transformed="self;v=1"`).

use super::super::Transformer;
use crate::dom::Document;
use crate::error::{DomError, ErrorCollection};

pub const TRANSFORMED_ATTR: &str = "transformed";
pub const TRANSFORMED_VALUE: &str = "self;v=1";

/// Tags the document so downstream caches recognize optimized markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformedIdentifier;

impl Transformer for TransformedIdentifier {
    fn name(&self) -> &'static str {
        "transformed-identifier"
    }

    fn transform(&self, doc: &mut Document, _errors: &mut ErrorCollection) -> Result<(), DomError> {
        if let Some(root) = doc.root_element() {
            doc.element_mut(root)?
                .set_attr(TRANSFORMED_ATTR, TRANSFORMED_VALUE);
        }
        Ok(())
    }
}
