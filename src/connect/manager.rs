//! The reconnect loop.
//!
//! Owns the transport and keeps one session open to the reload endpoint,
//! forever. Two outward signals leave this module: a reload was requested
//! by the server, or the connection came back after an interruption (which
//! also means reload - the server restarted under us).

use std::time::Duration;

use tokio::sync::mpsc;

use super::transport::{SessionEvent, Transport};

/// Fixed wait between reconnect attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Why a reload is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadTrigger {
    /// The server sent a message.
    Message,
    /// The connection reopened after an earlier interruption.
    Reconnected,
}

/// Keeps the reload channel alive and emits triggers.
pub struct ConnectionManager<T> {
    transport: T,
    /// False only until the first connection loss (or failed attempt);
    /// a successful open after that emits a reload trigger.
    had_prior_connection: bool,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            had_prior_connection: false,
        }
    }

    /// Run the reconnect loop. Never returns; Ctrl+C exits the process.
    ///
    /// No failure is fatal here: a failed connect, a transport error and a
    /// clean close all end the same way - wait the fixed delay, retry.
    pub async fn run(mut self, address: &str, triggers: mpsc::Sender<ReloadTrigger>) {
        loop {
            match self.transport.connect(address).await {
                Ok(mut session) => {
                    crate::log!("connect"; "connection established");
                    if self.had_prior_connection {
                        // The server restarted; whatever the page holds is stale
                        let _ = triggers.send(ReloadTrigger::Reconnected).await;
                    }

                    loop {
                        match session.next_event().await {
                            SessionEvent::Message => {
                                let _ = triggers.send(ReloadTrigger::Message).await;
                            }
                            SessionEvent::Closed => break,
                        }
                    }
                    crate::debug!("connect"; "connection closed");
                }
                Err(e) => {
                    crate::debug!("connect"; "{}", e);
                }
            }

            self.had_prior_connection = true;
            tokio::time::sleep(RECONNECT_DELAY).await;
            crate::log!("connect"; "reconnecting...");
        }
    }
}
