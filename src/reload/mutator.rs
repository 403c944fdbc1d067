//! Applying a validated snapshot to the held page.

use parking_lot::Mutex;
use url::Url;

use crate::dom::{ParsedDocument, parse::parse_document};
use crate::page::LivePage;

use super::snapshot::{SnapshotError, ValidSnapshot};

/// Applies reload results to the live document.
///
/// Only called with a validated snapshot; an invalid one never gets this
/// far, so the page is either fully replaced or untouched.
pub struct PageMutator {
    http: reqwest::Client,
}

impl PageMutator {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Apply a reload.
    ///
    /// `hard` refetches the page URL plain (no query marker) and replaces
    /// the whole held document, the headless analogue of a full navigation
    /// discarding all page state. Soft swaps in the snapshot's head and
    /// body together.
    ///
    /// The page lock is never held across an await; the hard-path fetch
    /// completes before the document is touched.
    pub async fn apply(
        &self,
        page: &Mutex<LivePage>,
        snapshot: ValidSnapshot,
        hard: bool,
    ) -> Result<(), SnapshotError> {
        if hard {
            let url = page.lock().url().clone();
            let doc = self.fetch_document(&url).await?;
            page.lock().replace_document(doc);
            return Ok(());
        }

        let mut page = page.lock();
        page.replace_containers(snapshot.head, snapshot.body);
        Ok(())
    }

    /// Plain fetch+parse of the page for the hard path.
    async fn fetch_document(&self, url: &Url) -> Result<ParsedDocument, SnapshotError> {
        let html = self.http.get(url.clone()).send().await?.text().await?;
        Ok(parse_document(&html)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
