//! Body codecs for the access-control command family (`0x01xx`).

use std::collections::HashMap;

use super::body::{Body, BodyEntry};
use super::command::Command;
use super::error::ProtocolError;

/// Request body of [`Command::RemoteUnlock`]: which lock to release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockRequest {
    position: u8,
}

impl UnlockRequest {
    /// Door position released when none is given.
    pub const DEFAULT_POSITION: u8 = 4;

    /// Request releasing the lock at `position`.
    pub fn new(position: u8) -> Self {
        Self { position }
    }

    /// Door/position index.
    pub fn position(&self) -> u8 {
        self.position
    }

    pub(crate) fn len(&self) -> usize {
        1
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.position);
    }

    fn unpack(buf: &[u8]) -> Result<Body, ProtocolError> {
        if buf.len() != 1 {
            return Err(ProtocolError::BodyLength {
                expected: 1,
                actual: buf.len(),
            });
        }
        Ok(Body::Unlock(Self::new(buf[0])))
    }
}

impl Default for UnlockRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POSITION)
    }
}

/// Contribute this family's codecs to the shared registry table.
pub(crate) fn register(table: &mut HashMap<u16, BodyEntry>) {
    table.insert(
        Command::RemoteUnlock.code(),
        BodyEntry {
            request: Some(UnlockRequest::unpack),
            ack: None,
        },
    );
}
