//! WebSocket transport over tungstenite.
//!
//! The blocking socket is serviced on its own thread which pumps events
//! into the session channel; the async side only ever sees the channel.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tungstenite::protocol::Message;

use super::transport::{ConnectionSession, SessionEvent, Transport, TransportError};

/// Buffered events per session before the pump thread blocks.
const SESSION_BUFFER: usize = 16;

/// The production transport: one tungstenite client per session.
pub struct WsTransport;

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self, address: &str) -> Result<ConnectionSession, TransportError> {
        let address = address.to_string();
        let (socket, _response) = tokio::task::spawn_blocking(move || tungstenite::connect(address))
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        std::thread::spawn(move || read_pump(socket, tx));

        Ok(ConnectionSession::new(rx))
    }
}

/// Drain the socket until it closes or errors.
///
/// Errors force closure: whatever went wrong, the reconnect loop's answer
/// is the same. Control frames are tungstenite's business and carry no
/// signal for us.
fn read_pump<S>(mut socket: tungstenite::WebSocket<S>, tx: mpsc::Sender<SessionEvent>)
where
    S: std::io::Read + std::io::Write,
{
    loop {
        match socket.read() {
            Ok(Message::Text(_)) | Ok(Message::Binary(_)) => {
                if tx.blocking_send(SessionEvent::Message).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => {
                let _ = tx.blocking_send(SessionEvent::Closed);
                break;
            }
            Ok(_) => {} // ping/pong/frame
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    /// Accept one WebSocket client and run `script` against it.
    fn ws_server(
        script: impl FnOnce(&mut tungstenite::WebSocket<std::net::TcpStream>) + Send + 'static,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                if let Ok(mut ws) = tungstenite::accept(stream) {
                    script(&mut ws);
                }
            }
        });
        format!("ws://{addr}/live-server-ws")
    }

    #[tokio::test]
    async fn test_messages_become_events() {
        let address = ws_server(|ws| {
            ws.send(Message::text("reload")).unwrap();
            ws.send(Message::binary(vec![1, 2, 3])).unwrap();
            ws.close(None).ok();
            // Service the close handshake until the peer is done
            while ws.read().is_ok() {}
        });

        let mut session = WsTransport.connect(&address).await.unwrap();
        assert_eq!(session.next_event().await, SessionEvent::Message);
        assert_eq!(session.next_event().await, SessionEvent::Message);
        assert_eq!(session.next_event().await, SessionEvent::Closed);
    }

    #[tokio::test]
    async fn test_abrupt_drop_reads_as_closure() {
        let address = ws_server(|_ws| {
            // Drop the socket without a close handshake
        });

        let mut session = WsTransport.connect(&address).await.unwrap();
        assert_eq!(session.next_event().await, SessionEvent::Closed);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = WsTransport.connect(&format!("ws://{addr}/live-server-ws")).await;
        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
