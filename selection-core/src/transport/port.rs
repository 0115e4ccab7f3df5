//! Framing and the outbound half of a channel.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised while moving a message across the boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to encode message: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode message: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("the other side of the channel is gone")]
    Closed,
}

/// Encode a message as a MessagePack frame with named fields.
pub fn encode<M: Serialize>(message: &M) -> Result<Vec<u8>, TransportError> {
    Ok(rmp_serde::to_vec_named(message)?)
}

/// Decode a MessagePack frame.
pub fn decode<M: DeserializeOwned>(frame: &[u8]) -> Result<M, TransportError> {
    Ok(rmp_serde::from_slice(frame)?)
}

/// The sending end of one direction of the boundary.
#[derive(Debug, Clone)]
pub struct Port {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl Port {
    pub fn new(tx: mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self { tx }
    }

    /// Encode and send a message. Never blocks.
    pub fn send<M: Serialize>(&self, message: &M) -> Result<(), TransportError> {
        let frame = encode(message)?;
        self.tx.send(frame).map_err(|_| TransportError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Create one direction of the boundary.
pub fn channel() -> (Port, mpsc::UnboundedReceiver<Vec<u8>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Port::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_arrive_in_order() {
        let (port, mut rx) = channel();
        port.send(&"first").unwrap();
        port.send(&"second").unwrap();

        let first: String = decode(&rx.try_recv().unwrap()).unwrap();
        let second: String = decode(&rx.try_recv().unwrap()).unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("first", "second"));
    }

    #[test]
    fn closed_channel_is_reported() {
        let (port, rx) = channel();
        drop(rx);
        assert!(port.is_closed());
        assert!(matches!(port.send(&1u8), Err(TransportError::Closed)));
    }

    #[test]
    fn garbage_frames_fail_to_decode() {
        let result: Result<String, _> = decode(&[0xc1]);
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }
}
