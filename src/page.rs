//! The held page.
//!
//! A `LivePage` is the client's copy of the document a browser would be
//! displaying: the page URL plus owned head and body fragments. Reload
//! passes read it to discover assets and mutate it at finalize; nothing
//! else touches it.

use anyhow::{Context, Result};
use url::Url;

use crate::dom::{Element, ParsedDocument, parse::parse_document};

/// The client's in-memory copy of the page.
#[derive(Debug)]
pub struct LivePage {
    url: Url,
    head: Element,
    body: Element,
}

impl LivePage {
    /// Fetch and parse the page at `url`.
    ///
    /// This is the bootstrap load, the analogue of the browser having the
    /// page open before the reload script starts. Unlike everything inside
    /// the reload loops, a failure here is surfaced to the caller.
    pub async fn load(http: &reqwest::Client, url: Url) -> Result<Self> {
        let response = http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?;
        let html = response
            .text()
            .await
            .with_context(|| format!("failed to read body of {url}"))?;
        let doc = parse_document(&html).with_context(|| format!("failed to parse {url}"))?;

        Ok(Self::from_parts(url, doc))
    }

    /// Assemble a page from already-parsed fragments.
    pub fn from_parts(url: Url, doc: ParsedDocument) -> Self {
        Self {
            url,
            head: doc.head,
            body: doc.body,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn head(&self) -> &Element {
        &self.head
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Swap in new head and body fragments (soft reload).
    ///
    /// Both containers are replaced together; there is no partial swap.
    pub fn replace_containers(&mut self, head: Element, body: Element) {
        self.head = head;
        self.body = body;
    }

    /// Replace the whole held document (hard reload).
    pub fn replace_document(&mut self, doc: ParsedDocument) {
        self.head = doc.head;
        self.body = doc.body;
    }

    /// Serialize the held document back to HTML.
    pub fn render(&self) -> String {
        format!(
            "<!DOCTYPE html><html>{}{}</html>",
            self.head.render(),
            self.body.render()
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
