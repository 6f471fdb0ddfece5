//! HTML → arena conversion.
//!
//! `tl` does the tokenizing; this module walks its node handles and copies
//! them into the `Document` arena. Attributes are re-read from the raw start
//! tag so source order survives, and raw-text elements keep their content
//! byte-for-byte.
//!
//! `tl` tokenizes `<script>`/`<style>` content like markup, so a `<` inside
//! a script would open bogus tags and swallow the rest of the page. Those
//! bodies are cut out of the source first and put back while building the
//! arena.

use std::borrow::Cow;

use super::document::Document;
use super::node::{Attrs, NodeId};
use crate::error::ParseError;
use crate::utils::html;

impl Document {
    /// Parse an HTML document.
    ///
    /// Fails only when there is nothing to work on: empty input, input with
    /// no element at all, or a tokenizer failure.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let (source, bodies) = RawBodies::extract(input);
        let dom = tl::parse(&source, tl::ParserOptions::default())
            .map_err(|e| ParseError::Parser(format!("{e:?}")))?;
        let parser = dom.parser();

        let mut doc = Document::new();
        doc.doctype = extract_doctype(input);

        let root = doc.root();
        for handle in dom.children() {
            convert(&mut doc, root, *handle, parser, &bodies);
        }

        doc.refresh_landmarks();
        if doc.root_element().is_none() {
            return Err(ParseError::NoElement);
        }
        Ok(doc)
    }
}

/// Delimits a body placeholder. Private-use, so it does not occur in markup.
const MARK: char = '\u{E000}';

const RAW_TAGS: [&str; 2] = ["script", "style"];

/// Raw-text element bodies, indexed by their placeholder number.
#[derive(Debug, Default)]
struct RawBodies(Vec<String>);

impl RawBodies {
    /// Replace every `<script>`/`<style>` body with a numbered placeholder.
    ///
    /// A body runs to the first matching end tag (any case), or to the end
    /// of input when there is none; the end tag is then supplied.
    fn extract(input: &str) -> (Cow<'_, str>, Self) {
        let lower = input.to_ascii_lowercase();
        let mut bodies = Vec::new();
        let mut out = String::new();
        let mut copied = 0;
        let mut pos = 0;

        while let Some(offset) = lower[pos..].find('<') {
            let at = pos + offset;
            let rest = &lower[at..];

            if rest.starts_with("<!--") {
                pos = rest.find("-->").map_or(lower.len(), |end| at + end + 3);
                continue;
            }
            let Some(tag) = RAW_TAGS.iter().find(|tag| opens(rest, tag)) else {
                pos = at + 1;
                continue;
            };
            let Some(tag_end) = html::start_tag_end(&input[at..]) else {
                break;
            };

            let body_start = at + tag_end + 1;
            let close = find_end_tag(&lower, body_start, tag);
            out.push_str(&input[copied..body_start]);
            out.push(MARK);
            out.push_str(&bodies.len().to_string());
            out.push(MARK);
            bodies.push(input[body_start..close.unwrap_or(input.len())].to_string());

            match close {
                Some(close) => {
                    copied = close;
                    pos = close;
                }
                None => {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                    copied = input.len();
                    pos = input.len();
                }
            }
        }

        if bodies.is_empty() {
            return (Cow::Borrowed(input), Self(bodies));
        }
        out.push_str(&input[copied..]);
        (Cow::Owned(out), Self(bodies))
    }

    /// Original body behind a placeholder, if `content` is one.
    fn restore(&self, content: &str) -> Option<&str> {
        let index: usize = content
            .strip_prefix(MARK)?
            .strip_suffix(MARK)?
            .parse()
            .ok()?;
        self.0.get(index).map(String::as_str)
    }
}

fn is_name_end(rest: &str, at: usize) -> bool {
    rest[at..]
        .chars()
        .next()
        .is_none_or(|c| c.is_ascii_whitespace() || c == '>' || c == '/')
}

/// `rest` (lowercased) begins with the start tag `<tag`.
fn opens(rest: &str, tag: &str) -> bool {
    rest.strip_prefix('<')
        .is_some_and(|r| r.starts_with(tag) && is_name_end(r, tag.len()))
}

/// Offset of the first `</tag` end tag at or after `from` in `lower`.
fn find_end_tag(lower: &str, from: usize, tag: &str) -> Option<usize> {
    let needle = format!("</{tag}");
    let mut pos = from;
    while let Some(offset) = lower[pos..].find(&needle) {
        let at = pos + offset;
        if is_name_end(lower, at + needle.len()) {
            return Some(at);
        }
        pos = at + needle.len();
    }
    None
}

/// Leading `<!DOCTYPE ...>` of the input, if any.
fn extract_doctype(input: &str) -> Option<String> {
    let trimmed = input.trim_start();
    let head = trimmed.get(..9)?;
    if !head.eq_ignore_ascii_case("<!doctype") {
        return None;
    }
    let end = trimmed.find('>')?;
    Some(trimmed[..=end].to_string())
}

fn is_doctype(text: &str) -> bool {
    let text = text.trim_start_matches(['<', '!']);
    text.get(..7)
        .is_some_and(|s| s.eq_ignore_ascii_case("doctype"))
}

/// Copy one `tl` node (and its subtree) under `parent`.
fn convert(
    doc: &mut Document,
    parent: NodeId,
    handle: tl::NodeHandle,
    parser: &tl::Parser,
    bodies: &RawBodies,
) {
    let Some(node) = handle.get(parser) else {
        return;
    };

    let id = match node {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            // Declarations carry no element of their own; keep what they wrap
            if name.is_empty() || name.starts_with('!') {
                for child in tag.children().top().iter() {
                    convert(doc, parent, *child, parser, bodies);
                }
                return;
            }
            let raw = tag.raw().as_utf8_str();
            let attrs: Attrs = html::start_tag_attributes(&raw)
                .unwrap_or_default()
                .into_iter()
                .collect();

            let id = doc.create_element(&name, attrs);
            // Parent and child are fresh arena nodes, so attaching cannot fail
            if doc.append_child(parent, id).is_err() {
                return;
            }

            if html::is_raw_text_element(&name) {
                let content = html::raw_inner(&raw, &name)
                    .map(str::to_string)
                    .unwrap_or_else(|| tag.inner_text(parser).into_owned());
                let content = match bodies.restore(&content) {
                    Some(body) => body.to_string(),
                    None => content,
                };
                if !content.is_empty() {
                    let text = doc.create_raw_text(content);
                    let _ = doc.append_child(id, text);
                }
            } else {
                for child in tag.children().top().iter() {
                    convert(doc, id, *child, parser, bodies);
                }
            }
            return;
        }
        tl::Node::Raw(bytes) => doc.create_raw_text(bytes.as_utf8_str().into_owned()),
        tl::Node::Comment(bytes) => {
            let text = bytes.as_utf8_str();
            if is_doctype(&text) {
                return;
            }
            let inner = text
                .strip_prefix("<!--")
                .map(|s| s.strip_suffix("-->").unwrap_or(s))
                .unwrap_or(text.as_ref());
            doc.create_comment(inner)
        }
    };

    let _ = doc.append_child(parent, id);
}
