//! Node-kind classification for the preload walk.
//!
//! The walk cares about exactly two shapes: script elements that pull in a
//! source file and link elements that point at one. Everything else is a
//! container to descend into.

use super::node::Element;

/// What the preload walk should do with an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    /// `<script src=...>` - refresh the source, do not descend.
    Script { src: &'a str },
    /// `<link href=...>` - refresh the target, do not descend.
    Stylesheet { href: &'a str },
    /// Anything else - recurse into children.
    Container,
}

/// Classify an element for the preload walk.
///
/// Inline scripts (no `src`) and bare links (no `href`) carry nothing to
/// refresh and classify as containers.
pub fn classify(el: &Element) -> NodeKind<'_> {
    match el.tag.as_str() {
        "script" => match el.attr("src") {
            Some(src) if !src.is_empty() => NodeKind::Script { src },
            _ => NodeKind::Container,
        },
        "link" => match el.attr("href") {
            Some(href) if !href.is_empty() => NodeKind::Stylesheet { href },
            _ => NodeKind::Container,
        },
        _ => NodeKind::Container,
    }
}

// =============================================================================
// Tests
// =============================================================================
