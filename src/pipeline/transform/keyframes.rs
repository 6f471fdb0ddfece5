//! Moves safe `@keyframes` blocks into a separate animation stylesheet.
//!
//! ```text
//! <style amp-custom>                      <style amp-custom>
//!   .a { color: red }                       .a { color: red }
//!   @keyframes fade { ... opacity ... }  →  @keyframes spin { ... color ... }
//!   @keyframes spin { ... color ... }     </style>
//! </style>                                ...
//!                                         <style amp-keyframes>
//!                                           @keyframes fade { ... opacity ... }
//!                                         </style>
//! ```
//!
//! A block moves only when every property it declares (vendor prefix
//! stripped) is allow-listed. The scan pointer always advances past the
//! block it just examined, so the loop terminates on any input.

use std::sync::LazyLock;

use regex::Regex;

use super::super::Transformer;
use crate::config::KeyframesConfig;
use crate::css;
use crate::dom::{Attrs, Category, Document, NodeId};
use crate::error::{DomError, ErrorCollection, ErrorKind};

pub const MAIN_STYLE_ATTR: &str = "amp-custom";
pub const KEYFRAMES_STYLE_ATTR: &str = "amp-keyframes";

/// `@keyframes name {` at the start of the haystack, any ASCII case.
static KEYFRAMES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@(?:-[a-zA-Z]+-)?[kK][eE][yY][fF][rR][aA][mM][eE][sS][ \t\r\n]+[^{};]*\{").unwrap()
});

/// Outcome of splitting one stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyframesSplit {
    /// Stylesheet with moved blocks removed.
    pub main: String,
    /// Moved blocks, verbatim, in source order.
    pub keyframes: String,
    pub moved: usize,
    pub rejected: usize,
    /// The scan hit a block whose braces never balance.
    pub unterminated: bool,
}

/// Split `stylesheet` using the configured allow-list and size budget.
pub fn split_keyframes(stylesheet: &str, config: &KeyframesConfig) -> KeyframesSplit {
    split_with_budget(stylesheet, config, config.max_bytes)
}

/// Split with an explicit budget for the moved text.
fn split_with_budget(stylesheet: &str, config: &KeyframesConfig, budget: usize) -> KeyframesSplit {
    let mut split = KeyframesSplit::default();
    let mut pos = 0;
    let mut copied = 0;

    while let Some((start, open)) = next_keyframes(stylesheet, pos) {
        let Some(end) = block_end(stylesheet, open) else {
            split.unterminated = true;
            break;
        };

        let block = &stylesheet[start..end];
        let body = &stylesheet[open + 1..end - 1];
        let fits = split.keyframes.len() + block.len() <= budget;

        if fits && all_allowed(body, config) {
            split.main.push_str(&stylesheet[copied..start]);
            split.keyframes.push_str(block);
            copied = end;
            split.moved += 1;
        } else {
            split.rejected += 1;
        }
        pos = end;
    }

    split.main.push_str(&stylesheet[copied..]);
    split
}

/// Start of the next `@keyframes` rule at or after `from`, and the offset
/// of its `{`. Comments and strings are skipped.
fn next_keyframes(css: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = css.as_bytes();
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2 + css.get(i + 2..)?.find("*/")? + 2;
                continue;
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'@' => {
                if let Some(m) = KEYFRAMES_RE.find(&css[i..]) {
                    return Some((i, i + m.end() - 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index just past the string literal opening at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() && bytes[i] != quote {
        if bytes[i] == b'\\' {
            i += 1;
        }
        i += 1;
    }
    (i + 1).min(bytes.len())
}

/// Index just past the `}` matching the `{` at `open`.
///
/// Braces inside strings and comments do not count.
fn block_end(css: &str, open: usize) -> Option<usize> {
    let bytes = css.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let close = css.get(i + 2..)?.find("*/")?;
                i += 2 + close + 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Check that every declaration in a keyframes body uses allowed properties.
///
/// Anything that does not look like `selector { decl; ... }` repeated counts
/// as not allowed.
fn all_allowed(body: &str, config: &KeyframesConfig) -> bool {
    let body = css::strip_comments(body);
    let mut rest = body.as_ref();

    loop {
        let Some(open) = rest.find('{') else {
            return rest.trim().is_empty();
        };
        let selector = &rest[..open];
        if selector.contains([':', ';', '}']) {
            return false;
        }
        let Some(close) = rest[open + 1..].find('}') else {
            return false;
        };
        let declarations = &rest[open + 1..open + 1 + close];
        if declarations.contains('{') || !declarations_allowed(declarations, config) {
            return false;
        }
        rest = &rest[open + 1 + close + 1..];
    }
}

fn declarations_allowed(block: &str, config: &KeyframesConfig) -> bool {
    css::split_top_level(block, b';')
        .into_iter()
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .all(|decl| match decl.split_once(':') {
            Some((name, _)) => {
                let name = name.trim().to_ascii_lowercase();
                !name.is_empty() && config.allows(css::strip_vendor_prefix(&name))
            }
            None => false,
        })
}

// =============================================================================
// DOM integration
// =============================================================================

/// Moves allow-listed keyframes from `<style amp-custom>` to
/// `<style amp-keyframes>`.
#[derive(Debug, Clone, Default)]
pub struct KeyframesTransform {
    config: KeyframesConfig,
}

impl KeyframesTransform {
    pub fn new(config: KeyframesConfig) -> Self {
        Self { config }
    }

    fn style_with(doc: &Document, marker: &str) -> Option<NodeId> {
        doc.find_one(|n| n.category() == Some(Category::Style) && n.attr(marker).is_some())
    }

    /// Existing animation bucket, or a new one at the end of `<body>`.
    fn bucket(doc: &mut Document) -> Result<Option<NodeId>, DomError> {
        if let Some(id) = Self::style_with(doc, KEYFRAMES_STYLE_ATTR) {
            return Ok(Some(id));
        }
        let Some(parent) = doc.body().or_else(|| doc.root_element()) else {
            return Ok(None);
        };
        let style = doc.create_element(
            "style",
            [(KEYFRAMES_STYLE_ATTR, "")].into_iter().collect::<Attrs>(),
        );
        doc.append_child(parent, style)?;
        Ok(Some(style))
    }
}

impl Transformer for KeyframesTransform {
    fn name(&self) -> &'static str {
        "keyframes"
    }

    fn transform(&self, doc: &mut Document, errors: &mut ErrorCollection) -> Result<(), DomError> {
        let Some(main) = Self::style_with(doc, MAIN_STYLE_ATTR) else {
            return Ok(());
        };
        let stylesheet = doc.raw_text(main);
        if stylesheet.is_empty() {
            return Ok(());
        }

        let existing = Self::style_with(doc, KEYFRAMES_STYLE_ATTR)
            .map(|id| doc.raw_text(id))
            .unwrap_or_default();
        let budget = self.config.max_bytes.saturating_sub(existing.len());
        let split = split_with_budget(&stylesheet, &self.config, budget);

        if split.unterminated {
            errors.record_at(
                doc,
                main,
                ErrorKind::CannotParseCss,
                "unterminated @keyframes block, rest of stylesheet left in place",
            );
        }

        if split.moved > 0
            && let Some(bucket) = Self::bucket(doc)?
        {
            doc.set_raw_text(main, split.main)?;
            doc.set_raw_text(bucket, existing + &split.keyframes)?;
        }

        crate::debug!("keyframes"; "moved {} blocks, kept {}", split.moved, split.rejected);
        Ok(())
    }
}
