//! Owned node tree and HTML serialization.

use std::borrow::Cow;
use std::fmt::Write;

// =============================================================================
// Node Tree
// =============================================================================

/// A single node in an owned document fragment.
///
/// Comments are dropped at parse time; they carry nothing a reload needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes and children.
///
/// Children are an owned `Vec`, so a walk always iterates the child list as
/// it stood when the walk reached the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The last child, if it is an element.
    ///
    /// Trailing text or a childless parent yields `None`; the caller decides
    /// what that means.
    pub fn last_child_element(&self) -> Option<&Element> {
        match self.children.last() {
            Some(Node::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Serialize this element (and subtree) back to HTML.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        write!(out, "<{}", self.tag).ok();
        for (key, value) in &self.attrs {
            if value.is_empty() {
                write!(out, " {key}").ok();
            } else {
                write!(out, " {}=\"{}\"", key, escape_attr(value)).ok();
            }
        }
        out.push('>');

        if is_void_element(&self.tag) {
            return;
        }

        let raw_text = is_raw_text_element(&self.tag);
        for child in &self.children {
            match child {
                Node::Element(el) => el.render_into(out),
                Node::Text(text) if raw_text => out.push_str(text),
                Node::Text(text) => out.push_str(&escape(text)),
            }
        }

        write!(out, "</{}>", self.tag).ok();
    }
}

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape HTML attribute values.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// Check if an HTML tag is a void element (no children, no closing tag).
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
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag is a raw text element (content is not HTML-escaped).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

// =============================================================================
// Tests
// =============================================================================
