//! Frame bodies and the command/body dispatch registry.
//!
//! Each command family contributes its body codecs to one shared table,
//! composed once at first use. The frame codec only ever goes through
//! [`resolve`], so new families extend the table without touching it.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::access::{self, UnlockRequest};
use super::error::ProtocolError;
use super::maintenance::{self, DateTimeAck, VersionInfoAck};

/// Unpacks one body variant from its wire bytes.
pub type UnpackFn = fn(&[u8]) -> Result<Body, ProtocolError>;

/// Body codecs for one command, one optional slot per direction.
#[derive(Clone, Copy)]
pub struct BodyEntry {
    /// Codec for the request direction (ack flag clear).
    pub request: Option<UnpackFn>,
    /// Codec for the acknowledgement direction (ack flag set).
    pub ack: Option<UnpackFn>,
}

/// Payload of a control frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No payload.
    Empty,
    /// Remote unlock request.
    Unlock(UnlockRequest),
    /// Version information reply.
    VersionInfo(VersionInfoAck),
    /// Station clock reply.
    DateTime(DateTimeAck),
}

impl Body {
    /// Serialized length in bytes.
    pub fn len(&self) -> usize {
        match self {
            Body::Empty => 0,
            Body::Unlock(body) => body.len(),
            Body::VersionInfo(body) => body.len(),
            Body::DateTime(body) => body.len(),
        }
    }

    /// True when the body serializes to no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the body's wire form to `buf`.
    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Body::Empty => {}
            Body::Unlock(body) => body.encode(buf),
            Body::VersionInfo(body) => body.encode(buf),
            Body::DateTime(body) => body.encode(buf),
        }
    }
}

/// The composed registry, built once and shared by all lookups.
fn registry() -> &'static HashMap<u16, BodyEntry> {
    static REGISTRY: OnceLock<HashMap<u16, BodyEntry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut table = HashMap::new();
        access::register(&mut table);
        maintenance::register(&mut table);
        table
    })
}

/// Resolve the body codec for a command code and direction.
///
/// `Ok(None)` means the direction carries no body; the caller substitutes
/// the empty body. An unregistered command code fails.
pub(crate) fn resolve(code: u16, is_ack: bool) -> Result<Option<UnpackFn>, ProtocolError> {
    let entry = registry()
        .get(&code)
        .ok_or(ProtocolError::UnknownCommand(code))?;
    Ok(if is_ack { entry.ack } else { entry.request })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Command;

    #[test]
    fn resolves_registered_directions() {
        assert!(resolve(Command::RemoteUnlock.code(), false)
            .unwrap()
            .is_some());
        // No acknowledgement body is defined for remote unlock.
        assert!(resolve(Command::RemoteUnlock.code(), true)
            .unwrap()
            .is_none());
        assert!(resolve(Command::GetSetVersionInfo.code(), true)
            .unwrap()
            .is_some());
        assert!(resolve(Command::GetSetDateTime.code(), true)
            .unwrap()
            .is_some());
    }

    #[test]
    fn unregistered_commands_fail() {
        assert_eq!(
            resolve(Command::CallLift.code(), false),
            Err(ProtocolError::UnknownCommand(0x0201))
        );
        assert_eq!(resolve(0x0999, false), Err(ProtocolError::UnknownCommand(0x0999)));
    }
}
