//! Narrow CSS helpers.
//!
//! Not a CSS engine: just the handful of lexical operations the transformers
//! need (lengths, inline `style` declarations, `url()` values, comments and
//! vendor prefixes).

mod length;

pub use length::{CssLength, CssUnit};

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\([ \t\r\n]*(?:"([^"]*)"|'([^']*)'|([^)"' \t\r\n]*))[ \t\r\n]*\)"#).unwrap()
});

/// Strip a vendor prefix from a property name.
///
/// `-webkit-transform` → `transform`. Custom properties (`--x`) and
/// unprefixed names are returned unchanged.
pub fn strip_vendor_prefix(name: &str) -> &str {
    if name.starts_with("--") {
        return name;
    }
    match name.strip_prefix('-').and_then(|rest| rest.split_once('-')) {
        Some((vendor, property)) if !vendor.is_empty() && !property.is_empty() => property,
        _ => name,
    }
}

/// Remove `/* ... */` comments. An unterminated comment runs to the end.
pub fn strip_comments(css: &str) -> Cow<'_, str> {
    if !css.contains("/*") {
        return Cow::Borrowed(css);
    }

    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Split `s` on `sep`, ignoring separators inside quotes or parentheses.
pub(crate) fn split_top_level(s: &str, sep: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut start = 0;

    for (i, b) in s.bytes().enumerate() {
        match (quote, b) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'(') => depth += 1,
            (None, b')') => depth = depth.saturating_sub(1),
            (None, b) if b == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Parse declarations (`a: b; c: d`) into lowercased-name/value pairs.
///
/// Empty and malformed (colon-less) declarations are dropped.
pub fn parse_declarations(block: &str) -> Vec<(String, String)> {
    split_top_level(block, b';')
        .into_iter()
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

/// Render declarations back into compact inline-style form (`a:b;c:d;`).
pub fn render_declarations(decls: &[(String, String)]) -> String {
    decls.iter().map(|(n, v)| format!("{n}:{v};")).collect()
}

/// Merge declarations into an existing inline style.
///
/// Existing properties are replaced in place, new ones are appended, so
/// merging the same values twice yields the same string.
pub fn merge_style(existing: Option<&str>, updates: &[(&str, String)]) -> String {
    let mut decls = existing.map(parse_declarations).unwrap_or_default();
    for (name, value) in updates {
        match decls.iter_mut().find(|(n, _)| n.as_str() == *name) {
            Some((_, v)) => v.clone_from(value),
            None => decls.push((name.to_string(), value.clone())),
        }
    }
    render_declarations(&decls)
}

/// First `url(...)` target in a CSS value.
pub fn extract_url(value: &str) -> Option<String> {
    let caps = URL_RE.captures(value)?;
    let url = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str()
        .trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Value of `property` in an inline style, if declared.
pub fn style_property(style: &str, property: &str) -> Option<String> {
    parse_declarations(style)
        .into_iter()
        .find(|(n, _)| n == property)
        .map(|(_, v)| v)
}
