//! Peer-to-peer plumbing: the datagram channel, wire packets, the session

pub mod packets;
pub mod session;

pub use packets::{Packet, PacketError};
pub use session::{Lockstep, Session, SessionError};

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("data channel closed")]
    Closed,
}

/// An ordered, reliable datagram channel. In production this wraps the
/// WebRTC data channel set up by the signaling layer; tests wire two ends
/// of an in-memory pair together.
pub struct DataChannel {
    tx: mpsc::Sender<Vec<u8>>,
    rx: Mutex<mpsc::Receiver<Vec<u8>>>,
}

impl DataChannel {
    /// Build a channel from raw halves supplied by an external transport
    pub fn from_parts(tx: mpsc::Sender<Vec<u8>>, rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Two loopback-connected ends
    pub fn pair(capacity: usize) -> (DataChannel, DataChannel) {
        let (a_tx, b_rx) = mpsc::channel(capacity);
        let (b_tx, a_rx) = mpsc::channel(capacity);
        (
            DataChannel::from_parts(a_tx, a_rx),
            DataChannel::from_parts(b_tx, b_rx),
        )
    }

    pub async fn send(&self, frame: Vec<u8>) -> Result<(), TransportError> {
        self.tx.send(frame).await.map_err(|_| TransportError::Closed)
    }

    pub async fn recv(&self) -> Result<Vec<u8>, TransportError> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(TransportError::Closed)
    }
}
