//! Parsing server responses into owned head/body fragments.

use thiserror::Error;

use super::node::{Element, Node};

// =============================================================================
// Errors
// =============================================================================

/// A response body that cannot yield a usable document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is not parsable HTML")]
    Syntax,

    #[error("document has no <{0}> element")]
    MissingContainer(&'static str),
}

// =============================================================================
// Parsed Document
// =============================================================================

/// The two top-level containers of a parsed page.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub head: Element,
    pub body: Element,
}

/// Parse a full HTML document into owned head and body fragments.
///
/// Whitespace-only text and comments are dropped during conversion, so a
/// fragment's child list holds only nodes that matter to the reload pass.
pub fn parse_document(html: &str) -> Result<ParsedDocument, ParseError> {
    let dom = tl::parse(html, tl::ParserOptions::default()).map_err(|_| ParseError::Syntax)?;
    let parser = dom.parser();

    let mut roots = Vec::new();
    for handle in dom.children() {
        if let Some(node) = convert(*handle, parser) {
            roots.push(node);
        }
    }

    let head = find_element(&roots, "head")
        .cloned()
        .ok_or(ParseError::MissingContainer("head"))?;
    let body = find_element(&roots, "body")
        .cloned()
        .ok_or(ParseError::MissingContainer("body"))?;

    Ok(ParsedDocument { head, body })
}

/// Convert a tl node handle to an owned node.
fn convert(handle: tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let tag_name = tag.name().as_utf8_str().to_lowercase();

            let mut el = Element::new(tag_name);
            for (key, value) in tag.attributes().iter() {
                let key: &str = key.as_ref();
                let value = value.map(|v| v.to_string()).unwrap_or_default();
                el.attrs.push((key.to_string(), value));
            }

            for child_handle in tag.children().top().iter() {
                if let Some(child) = convert(*child_handle, parser) {
                    el.children.push(child);
                }
            }

            Some(Node::Element(el))
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str().to_string();
            // Skip whitespace-only text
            if text.trim().is_empty() {
                None
            } else {
                Some(Node::Text(text))
            }
        }
        tl::Node::Comment(_) => None,
    }
}

/// Depth-first search for the first element with the given tag.
fn find_element<'a>(nodes: &'a [Node], tag: &str) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(el) = node {
            if el.tag == tag {
                return Some(el);
            }
            if let Some(found) = find_element(&el.children, tag) {
                return Some(found);
            }
        }
    }
    None
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = concat!(
        "<!DOCTYPE html><html><head>",
        "<title>Demo</title>",
        "<link rel=\"stylesheet\" href=\"/style.css\">",
        "<meta name=\"live-server\" content=\"reload\">",
        "</head><body><h1>Demo</h1><script src=\"/app.js\"></script></body></html>",
    );

    #[test]
    fn test_parse_full_document() {
        let doc = parse_document(PAGE).unwrap();

        assert_eq!(doc.head.tag, "head");
        assert_eq!(doc.head.children.len(), 3);
        assert_eq!(doc.body.tag, "body");
        assert_eq!(doc.body.children.len(), 2);
    }

    #[test]
    fn test_parse_keeps_attributes() {
        let doc = parse_document(PAGE).unwrap();

        let meta = doc.head.last_child_element().unwrap();
        assert_eq!(meta.tag, "meta");
        assert_eq!(meta.attr("name"), Some("live-server"));
        assert_eq!(meta.attr("content"), Some("reload"));
    }

    #[test]
    fn test_parse_drops_whitespace_and_comments() {
        let doc = parse_document(
            "<html><head>\n  <!-- build marker -->\n  <title>t</title>\n</head><body>\n</body></html>",
        )
        .unwrap();

        assert_eq!(doc.head.children.len(), 1);
        assert!(doc.body.children.is_empty());
    }

    #[test]
    fn test_parse_missing_containers() {
        // A bare error string, the shape a dev server returns for a 404
        let err = parse_document("Not Found").unwrap_err();
        assert!(matches!(err, ParseError::MissingContainer("head")));

        let err = parse_document("<head><title>t</title></head>").unwrap_err();
        assert!(matches!(err, ParseError::MissingContainer("body")));
    }

    #[test]
    fn test_parse_lowercases_tags() {
        let doc = parse_document("<HTML><HEAD><TITLE>t</TITLE></HEAD><BODY></BODY></HTML>").unwrap();
        assert_eq!(doc.head.tag, "head");
        assert_eq!(doc.head.children.len(), 1);
    }
}
