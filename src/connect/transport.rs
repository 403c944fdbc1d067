//! Transport seam for the reload channel.
//!
//! The concrete WebSocket machinery lives behind a small trait so the
//! reconnect loop is testable with scripted sessions. A session is just a
//! stream of two event kinds: a data message arrived, or the connection is
//! gone. Everything subtler (errors, pings, handshake details) is the
//! transport's problem and collapses into one of the two.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// A connection attempt that could not produce a session.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),
}

/// Event emitted by a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A data message arrived. Content is never parsed; any message is an
    /// unconditional reload signal.
    Message,
    /// The connection closed (including error-forced closure).
    Closed,
}

/// One established connection.
///
/// Exclusively owned by the reconnect loop; dropped on closure.
pub struct ConnectionSession {
    events: mpsc::Receiver<SessionEvent>,
}

impl ConnectionSession {
    pub fn new(events: mpsc::Receiver<SessionEvent>) -> Self {
        Self { events }
    }

    /// Next event. A transport that went away without saying so (sender
    /// dropped) reads as closure.
    pub async fn next_event(&mut self) -> SessionEvent {
        self.events.recv().await.unwrap_or(SessionEvent::Closed)
    }
}

/// Opens sessions to the reload endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, address: &str) -> Result<ConnectionSession, TransportError>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_yields_queued_events() {
        let (tx, rx) = mpsc::channel(4);
        let mut session = ConnectionSession::new(rx);

        tx.send(SessionEvent::Message).await.unwrap();
        tx.send(SessionEvent::Closed).await.unwrap();

        assert_eq!(session.next_event().await, SessionEvent::Message);
        assert_eq!(session.next_event().await, SessionEvent::Closed);
    }

    #[tokio::test]
    async fn test_dropped_sender_reads_as_closure() {
        let (tx, rx) = mpsc::channel::<SessionEvent>(4);
        let mut session = ConnectionSession::new(rx);
        drop(tx);

        assert_eq!(session.next_event().await, SessionEvent::Closed);
    }
}
