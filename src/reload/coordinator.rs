//! Reload pass orchestration.
//!
//! One pass: refresh asset caches, fetch a snapshot of the current URL,
//! validate the handshake, then swap the page. The pass loops until it
//! gets a validated snapshot and no newer trigger has superseded it; a
//! server mid-restart just makes the loop wait and try again.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::page::LivePage;

use super::mutator::PageMutator;
use super::preload::AssetPreloader;
use super::snapshot::{Snapshot, SnapshotFetcher};
use super::state::ReloadState;

/// Fixed wait before retrying a failed or invalid snapshot fetch.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Serializes reload passes over the held page.
pub struct ReloadCoordinator {
    state: Mutex<ReloadState>,
    page: Mutex<LivePage>,
    preloader: AssetPreloader,
    fetcher: SnapshotFetcher,
    mutator: PageMutator,
    hard: bool,
}

impl ReloadCoordinator {
    pub fn new(http: reqwest::Client, page: LivePage, hard: bool) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ReloadState::new()),
            page: Mutex::new(page),
            preloader: AssetPreloader::new(http.clone()),
            fetcher: SnapshotFetcher::new(http.clone()),
            mutator: PageMutator::new(http),
            hard,
        })
    }

    /// Request a reload. Callable from anywhere, any number of times.
    ///
    /// If a pass is already in flight the request is absorbed into it;
    /// otherwise a pass starts on a background task. Either way the latest
    /// request is eventually honored by exactly one visible mutation.
    pub fn trigger(self: &Arc<Self>) {
        if !self.state.lock().request() {
            crate::debug!("reload"; "pass in flight, rescheduled");
            return;
        }

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            coordinator.run_pass().await;
        });
    }

    /// Whether no pass is currently in flight.
    pub fn is_idle(&self) -> bool {
        !self.state.lock().in_progress()
    }

    /// Serialize the held document (for inspection and tests).
    pub fn render_page(&self) -> String {
        self.page.lock().render()
    }

    /// The pass loop. Runs until a validated snapshot gets finalized.
    async fn run_pass(&self) {
        loop {
            self.state.lock().arm();

            // Best-effort cache refresh over the current document
            let (url, requests) = {
                let page = self.page.lock();
                let roots = [page.head(), page.body()];
                (page.url().clone(), self.preloader.collect(page.url(), &roots))
            };
            let outcomes = self.preloader.preload(&requests).await;
            let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
            if failed > 0 {
                crate::debug!("preload"; "{}/{} asset refreshes failed", failed, outcomes.len());
            }

            // Snapshot must load and carry the handshake marker
            let snapshot = match self.fetcher.fetch(&url).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    crate::debug!("snapshot"; "fetch failed: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };
            let valid = match snapshot {
                Snapshot::Valid(valid) => valid,
                Snapshot::Invalid => {
                    crate::debug!("snapshot"; "handshake marker missing");
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            // A trigger that arrived mid-pass owns the final word; this
            // iteration's snapshot is discarded and the loop re-runs.
            if self.state.lock().rescheduled() {
                continue;
            }

            if let Err(e) = self.mutator.apply(&self.page, valid, self.hard).await {
                crate::debug!("snapshot"; "apply failed: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
            crate::log!("reload"; "reloaded");

            // A trigger that landed while the swap was finalizing gets a
            // fresh iteration of its own; nothing is lost between the
            // decision point and the swap.
            let finished = {
                let mut state = self.state.lock();
                if state.rescheduled() {
                    false
                } else {
                    state.finish();
                    true
                }
            };
            if finished {
                return;
            }
        }
    }
}
