//! Snapshot fetching and handshake validation.
//!
//! A reload never mutates the page from the signal alone: the client first
//! loads a fresh copy of the current URL with the `?reload` query marker and
//! checks that the server answered with the handshake meta element. A dev
//! server that just restarted, a stale proxy, or a 404 page all fail that
//! check and are retried rather than swapped in.

use thiserror::Error;
use url::Url;

use crate::dom::{Element, parse::ParseError, parse::parse_document};

/// Query marker appended to the snapshot request.
pub const RELOAD_QUERY: &str = "reload";

/// `name` of the handshake meta element the server appends to the head.
pub const MARKER_NAME: &str = "live-server";

/// `content` of the handshake meta element.
pub const MARKER_CONTENT: &str = "reload";

// =============================================================================
// Errors
// =============================================================================

/// A snapshot load that did not produce a document at all.
///
/// A document without the handshake marker is not an error; that is an
/// invalid [`Snapshot`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("snapshot document unusable: {0}")]
    Malformed(#[from] ParseError),
}

// =============================================================================
// Snapshot
// =============================================================================

/// The outcome of one off-screen page load.
#[derive(Debug)]
pub enum Snapshot {
    /// The served page carried the handshake marker; its fragments may be
    /// swapped into the live document.
    Valid(ValidSnapshot),
    /// The served page lacked the marker (error page, foreign server).
    Invalid,
}

/// Head and body fragments of a validated snapshot.
///
/// The handshake meta element stays in the head, exactly as served.
#[derive(Debug)]
pub struct ValidSnapshot {
    pub head: Element,
    pub body: Element,
}

impl Snapshot {
    pub fn is_valid(&self) -> bool {
        matches!(self, Snapshot::Valid(_))
    }
}

/// Check the handshake: the head's last child must be the marker element.
///
/// Anything after the marker, including text, invalidates the snapshot.
fn has_reload_marker(head: &Element) -> bool {
    head.last_child_element().is_some_and(|el| {
        el.tag == "meta"
            && el.attr("name") == Some(MARKER_NAME)
            && el.attr("content") == Some(MARKER_CONTENT)
    })
}

// =============================================================================
// Fetcher
// =============================================================================

/// Loads snapshot copies of the current page.
pub struct SnapshotFetcher {
    http: reqwest::Client,
}

impl SnapshotFetcher {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetch one snapshot of `page_url`.
    ///
    /// The request goes to the page's path with the query replaced by the
    /// `?reload` marker and the fragment stripped. HTTP error statuses are
    /// not failures here: their bodies are parsed and fail marker
    /// validation instead, which is what distinguishes "server is back but
    /// serving an error page" from "server unreachable".
    pub async fn fetch(&self, page_url: &Url) -> Result<Snapshot, SnapshotError> {
        let url = snapshot_url(page_url);
        let html = self.http.get(url).send().await?.text().await?;
        let doc = parse_document(&html)?;

        if !has_reload_marker(&doc.head) {
            return Ok(Snapshot::Invalid);
        }

        Ok(Snapshot::Valid(ValidSnapshot {
            head: doc.head,
            body: doc.body,
        }))
    }
}

/// `<origin><path>?reload` - existing query and fragment are dropped.
fn snapshot_url(page_url: &Url) -> Url {
    let mut url = page_url.clone();
    url.set_query(Some(RELOAD_QUERY));
    url.set_fragment(None);
    url
}

// =============================================================================
// Tests
// =============================================================================
