//! Speculative asset cache refresh.
//!
//! Before swapping in a snapshot, the client re-fetches every script and
//! stylesheet the current page references, with cache-bypass headers, so
//! that intermediaries drop stale copies ahead of the reload. The whole
//! step is best-effort: a missing asset must never block the reload.

use futures::future::join_all;
use reqwest::header;
use rustc_hash::FxHashSet;
use thiserror::Error;
use url::Url;

use crate::dom::{Element, Node, NodeKind, classify::classify};

// =============================================================================
// Requests and Errors
// =============================================================================

/// One pending asset refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadRequest {
    /// Absolute URL of the asset.
    pub url: String,
    /// Whether a failed refresh is an error for the caller. The reload
    /// pass never sets this; every preload it issues is fire-and-forget.
    pub required: bool,
}

/// A failed asset refresh. Ignored unless the request was `required`.
#[derive(Debug, Error)]
pub enum PreloadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

// =============================================================================
// Preloader
// =============================================================================

/// Collects and issues asset refresh requests.
pub struct AssetPreloader {
    http: reqwest::Client,
}

impl AssetPreloader {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Walk the given fragments and collect one refresh request per
    /// distinct asset URL.
    ///
    /// Script and link nodes with a target URL are leaves: their request is
    /// recorded and the walk does not descend into them. Relative targets
    /// resolve against `base`; unresolvable ones are skipped.
    pub fn collect(&self, base: &Url, roots: &[&Element]) -> Vec<PreloadRequest> {
        let mut seen = FxHashSet::default();
        let mut requests = Vec::new();
        for root in roots {
            Self::walk(base, root, &mut seen, &mut requests);
        }
        requests
    }

    fn walk(
        base: &Url,
        el: &Element,
        seen: &mut FxHashSet<String>,
        out: &mut Vec<PreloadRequest>,
    ) {
        let target = match classify(el) {
            NodeKind::Script { src } => Some(src),
            NodeKind::Stylesheet { href } => Some(href),
            NodeKind::Container => None,
        };

        if let Some(target) = target {
            match base.join(target) {
                Ok(url) => {
                    let url = url.to_string();
                    if seen.insert(url.clone()) {
                        out.push(PreloadRequest {
                            url,
                            required: false,
                        });
                    }
                }
                Err(_) => {
                    crate::debug!("preload"; "skipping unresolvable url: {}", target);
                }
            }
            return;
        }

        // The owned child list is the captured set for this node; async
        // completions elsewhere cannot reshape it mid-walk.
        for child in &el.children {
            if let Node::Element(child) = child {
                Self::walk(base, child, seen, out);
            }
        }
    }

    /// Issue every request concurrently and wait for all outcomes.
    ///
    /// The caller decides what failures mean; the reload pass ignores them.
    pub async fn preload(&self, requests: &[PreloadRequest]) -> Vec<Result<(), PreloadError>> {
        join_all(requests.iter().map(|request| self.refresh(request))).await
    }

    /// Refresh one asset with cache-bypass semantics.
    async fn refresh(&self, request: &PreloadRequest) -> Result<(), PreloadError> {
        let response = self
            .http
            .get(request.url.as_str())
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;

        if request.required && !response.status().is_success() {
            return Err(PreloadError::Status(response.status()));
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
