//! Layout attribute derivation for sizeable AMP elements.
//!
//! For each recognized AMP component, resolves the layout (see
//! [`crate::layout`]) and applies it:
//!
//! - `layout` and `i-amphtml-layout` attributes
//! - `i-amphtml-layout-<name>` class (plus `i-amphtml-layout-size-defined`)
//! - inline `width`/`height` for `fixed`, `height` for `fixed-height`
//! - `hidden` for `nodisplay`
//!
//! Applying the same layout twice is a no-op, so a second run leaves the
//! markup byte-identical.

use super::super::Transformer;
use crate::css::{self, CssUnit};
use crate::dom::{Document, Element, NodeId};
use crate::error::{DomError, ErrorCollection, ErrorKind};
use crate::layout::{self, Layout, LayoutInput, LayoutProblem, Resolved};

const SIZE_DEFINED_CLASS: &str = "i-amphtml-layout-size-defined";

/// Assigns layouts to sizeable AMP elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutTransform {
    default_unit: CssUnit,
}

impl LayoutTransform {
    pub fn new(default_unit: CssUnit) -> Self {
        Self { default_unit }
    }

    fn resolve(&self, doc: &Document, id: NodeId) -> Result<Option<Result<Resolved, LayoutProblem>>, DomError> {
        let elem = doc.element(id)?;
        let Some(tag) = elem.category.sizeable() else {
            return Ok(None);
        };
        let input = LayoutInput {
            layout: elem.attr("layout"),
            width: elem.attr("width"),
            height: elem.attr("height"),
            responsive_hint: elem.has_attr("sizes") || elem.has_attr("heights"),
            placeholder: elem.has_attr("placeholder") || elem.has_attr("fallback"),
        };
        Ok(Some(layout::resolve(tag, &input, self.default_unit)))
    }
}

/// Write the resolved layout onto the element.
fn apply(elem: &mut Element, resolved: &Resolved) {
    let layout = resolved.layout;
    elem.set_attr("layout", layout.as_str());
    elem.set_attr("i-amphtml-layout", layout.as_str());
    elem.add_class(&layout.class_name());
    if layout.is_size_defined() {
        elem.add_class(SIZE_DEFINED_CLASS);
    }

    let mut style = Vec::new();
    match layout {
        Layout::Fixed => {
            if resolved.width.is_numeric() {
                style.push(("width", resolved.width.css()));
            }
            if resolved.height.is_numeric() {
                style.push(("height", resolved.height.css()));
            }
        }
        Layout::FixedHeight if resolved.height.is_numeric() => {
            style.push(("height", resolved.height.css()));
        }
        Layout::Nodisplay => elem.set_attr("hidden", ""),
        _ => {}
    }

    if !style.is_empty() {
        let merged = css::merge_style(elem.attr("style"), &style);
        elem.set_attr("style", merged);
    }
}

impl Transformer for LayoutTransform {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn transform(&self, doc: &mut Document, errors: &mut ErrorCollection) -> Result<(), DomError> {
        let targets = doc.find(|n| n.category().and_then(|c| c.sizeable()).is_some());
        let mut applied = 0usize;

        for id in targets {
            if doc.is_exempt(id) {
                continue;
            }
            match self.resolve(doc, id)? {
                Some(Ok(resolved)) => {
                    apply(doc.element_mut(id)?, &resolved);
                    applied += 1;
                }
                Some(Err(problem)) => {
                    let kind = match problem {
                        LayoutProblem::InvalidLength { .. } => ErrorKind::InvalidLength,
                        LayoutProblem::Unsupported { .. } => ErrorKind::UnsupportedLayout,
                    };
                    errors.record_at(doc, id, kind, problem.to_string());
                }
                None => {}
            }
        }

        crate::debug!("layout"; "applied layout to {} elements", applied);
        Ok(())
    }
}
