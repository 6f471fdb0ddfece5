//! HTML utility functions.
//!
//! Provides the lexical helpers shared by the parser and serializer:
//! - `escape_text()`, `escape_attr()` - HTML entity escaping
//! - `unescape()` - decode common character references
//! - `is_void_element()` - Self-closing elements (br, img, etc.)
//! - `is_raw_text_element()` - Raw text elements (script, style)
//! - `parse_attributes()` - HTML attribute string parsing
//! - `start_tag_attributes()`, `raw_inner()` - slicing raw element source

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Escape text content.
///
/// Input is plain text, so every `&` is escaped; a literal `&lt;` must
/// survive a parse/serialize cycle as the same four characters.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_text("a < b"), "a &lt; b");
/// assert_eq!(escape_text("&copy; 2024"), "&amp;copy; 2024");
/// ```
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, &['<', '>', '&'])
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &['"', '&'])
}

/// Internal: escape with specified character set.
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if !chars.contains(&c) {
            result.push(c);
            continue;
        }
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            other => result.push(other),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
/// Unknown named references are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }

        // Collect entity
        let mut entity = String::new();
        let mut terminated = false;
        while let Some(&next) = chars.peek() {
            if next == ';' {
                chars.next();
                terminated = true;
                break;
            }
            if !(next.is_ascii_alphanumeric() || next == '#') || entity.len() > 10 {
                break;
            }
            entity.push(next);
            chars.next();
        }

        if !terminated || entity.is_empty() {
            result.push('&');
            result.push_str(&entity);
            if terminated {
                result.push(';');
            }
            continue;
        }

        // Decode entity
        match entity.as_str() {
            "lt" => result.push('<'),
            "gt" => result.push('>'),
            "amp" => result.push('&'),
            "quot" => result.push('"'),
            "apos" => result.push('\''),
            "nbsp" => result.push('\u{00A0}'),
            s if s.starts_with('#') => {
                let code = if s.starts_with("#x") || s.starts_with("#X") {
                    u32::from_str_radix(&s[2..], 16).ok()
                } else {
                    s[1..].parse().ok()
                };
                if let Some(c) = code.and_then(char::from_u32) {
                    result.push(c);
                } else {
                    result.push('&');
                    result.push_str(&entity);
                    result.push(';');
                }
            }
            _ => {
                result.push('&');
                result.push_str(&entity);
                result.push(';');
            }
        }
    }

    Cow::Owned(result)
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element (no end tag).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag is a raw text element (content is never escaped or decoded).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

// =============================================================================
// Attribute Parsing
// =============================================================================

/// Parse HTML-style attributes from a string.
///
/// Names are lowercased, values are decoded, and the first occurrence of a
/// duplicated name wins.
///
/// Input: `width="300" class="foo" hidden`
/// Output: `vec![("width", "300"), ("class", "foo"), ("hidden", "")]`
pub fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut name = String::new();
        name.push(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next == '/' || next.is_whitespace() {
                break;
            }
            name.push(next);
            chars.next();
        }

        // Skip whitespace
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        // Check for value
        let value = if chars.peek() == Some(&'=') {
            chars.next(); // consume '='

            // Skip whitespace
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }

            if let Some(quote) = chars.next_if(|&c| c == '"' || c == '\'') {
                let mut val = String::new();
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    val.push(c);
                }
                val
            } else {
                // Unquoted value (read until whitespace)
                let mut val = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    val.push(c);
                    chars.next();
                }
                val
            }
        } else {
            // Boolean attribute (no value)
            String::new()
        };

        let name = name.to_ascii_lowercase();
        if !attrs.iter().any(|(n, _)| *n == name) {
            attrs.push((name, unescape(&value).into_owned()));
        }
    }

    attrs
}

/// Byte offset of the `>` that closes the start tag at the beginning of `raw`.
pub(crate) fn start_tag_end(raw: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in raw.bytes().enumerate() {
        match (quote, b) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Extract the attributes of the start tag at the beginning of `raw`
/// (`<tag a="1" b>...`), in source order.
///
/// Returns `None` when `raw` does not begin with a start tag.
pub fn start_tag_attributes(raw: &str) -> Option<Vec<(String, String)>> {
    let rest = raw.strip_prefix('<')?;
    let end = start_tag_end(raw)?;
    let name_len = rest
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    let attr_source = raw.get(1 + name_len..end)?;
    Some(parse_attributes(attr_source))
}

/// Content between the start tag and the final end tag of a raw-text
/// element's source (`<style amp-custom>body{}</style>` -> `body{}`).
pub fn raw_inner<'a>(raw: &'a str, tag: &str) -> Option<&'a str> {
    let start = start_tag_end(raw)? + 1;
    let close = raw.rfind("</")?;
    if close < start {
        return None;
    }
    let closing_name = raw[close + 2..].trim_end_matches(|c: char| c == '>' || c.is_whitespace());
    closing_name
        .eq_ignore_ascii_case(tag)
        .then(|| &raw[start..close])
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert!(matches!(escape_text("hello"), Cow::Borrowed(_)));
        assert!(matches!(escape_attr("hello"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape_text("a < b > c"), "a &lt; b &gt; c");
        assert_eq!(escape_text("fish & chips"), "fish &amp; chips");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_escape_ampersand_always() {
        assert_eq!(escape_text("&copy; 2024"), "&amp;copy; 2024");
        assert_eq!(escape_attr("?a=1&amp;b=2"), "?a=1&amp;amp;b=2");
        assert_eq!(escape_attr("?a=1&b=2"), "?a=1&amp;b=2");
        assert_eq!(escape_text("&#39;"), "&amp;#39;");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("&lt;p&gt;"), "<p>");
        assert_eq!(unescape("a &amp; b"), "a & b");
        assert_eq!(unescape("&#39;&#x41;"), "'A");
        assert_eq!(unescape("&copy;"), "&copy;");
        assert_eq!(unescape("a & b"), "a & b");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn test_escape_unescape_is_stable() {
        for source in ["x&amp;y", "Use &amp;lt;b&amp;gt; tags", "&amp;amp;"] {
            let once = escape_attr(&unescape(source)).into_owned();
            assert_eq!(once, source);
            let twice = escape_attr(&unescape(&once)).into_owned();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("img"));
        assert!(is_void_element("link"));
        assert!(!is_void_element("amp-img"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn test_raw_text_elements() {
        assert!(is_raw_text_element("style"));
        assert!(is_raw_text_element("script"));
        assert!(!is_raw_text_element("noscript"));
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"width="300" Class='a b' hidden data-x=1"#);
        assert_eq!(
            attrs,
            vec![
                ("width".to_string(), "300".to_string()),
                ("class".to_string(), "a b".to_string()),
                ("hidden".to_string(), String::new()),
                ("data-x".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_attributes_first_wins_and_decodes() {
        let attrs = parse_attributes(r#"alt="a &amp; b" alt="c""#);
        assert_eq!(attrs, vec![("alt".to_string(), "a & b".to_string())]);
    }

    #[test]
    fn test_start_tag_attributes() {
        let attrs = start_tag_attributes(r#"<amp-img src="a>b.png" width="10"/>"#).unwrap();
        assert_eq!(attrs[0], ("src".to_string(), "a>b.png".to_string()));
        assert_eq!(attrs[1], ("width".to_string(), "10".to_string()));

        assert!(start_tag_attributes("plain text").is_none());
        assert!(start_tag_attributes("<br>").unwrap().is_empty());
    }

    #[test]
    fn test_raw_inner() {
        let raw = "<style amp-custom>a > b { color: red }</style>";
        assert_eq!(raw_inner(raw, "style"), Some("a > b { color: red }"));
        assert_eq!(raw_inner("<style></style>", "style"), Some(""));
        assert_eq!(raw_inner("<style>", "style"), None);
    }
}
