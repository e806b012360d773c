//! Control frame codec.
//!
//! Stations exchange fixed-layout binary frames, one per UDP datagram.
//! All integers are little-endian:
//!
//! ```text
//! offset  size  field
//! 0       3     magic D1 D2 D5
//! 3       1     protocol version
//! 4       2     command code
//! 6       2     transaction id
//! 8       1     is-ack
//! 9       1     is-encrypt
//! 10      4     total frame length
//! 14      5     source identifier
//! 19      5     destination identifier
//! 24      N     body
//! 24+N    2     reserved trailer (FF FF)
//! 26+N    1     checksum
//! ```
//!
//! The checksum is the additive complement of every preceding byte, so the
//! bytes of a whole frame sum to zero modulo 256. Encoding and decoding are
//! pure functions with no shared state.

mod access;
mod body;
mod command;
mod error;
mod maintenance;

pub use access::UnlockRequest;
pub use body::{Body, BodyEntry, UnpackFn};
pub use command::Command;
pub use error::ProtocolError;
pub use maintenance::{DateTimeAck, VersionInfoAck};

use crate::number::{self, Number};

/// Frame magic.
pub const MAGIC: [u8; 3] = [0xD1, 0xD2, 0xD5];

/// Protocol version byte carried in every frame.
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Reserved trailer written when the caller does not override it.
pub const RESERVED: [u8; 2] = [0xFF, 0xFF];

/// Fixed header length in bytes.
const HEADER_LEN: usize = 24;

/// Fixed trailer length: reserved field plus checksum byte.
const TRAILER_LEN: usize = 3;

/// Smallest well-formed frame: header and trailer around an empty body.
pub const MIN_FRAME_LEN: usize = HEADER_LEN + TRAILER_LEN;

/// One complete control frame.
///
/// Built either by the sender (all fields supplied) or by [`decode`]
/// (all fields derived); treated as immutable once built.
///
/// [`decode`]: ControlMessage::decode
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMessage {
    /// Protocol version byte.
    pub version: u8,
    /// Command; selects the body codec together with `is_ack`.
    pub command: Command,
    /// Transaction id echoed by acknowledgements.
    pub transaction: u16,
    /// Acknowledgement flag.
    pub is_ack: bool,
    /// Body encryption flag. Carried on the wire; no cipher is applied.
    pub is_encrypt: bool,
    /// Sending station.
    pub src: Number,
    /// Receiving station.
    pub dst: Number,
    /// Command payload.
    pub body: Body,
}

impl ControlMessage {
    /// A request frame with the current protocol version and clear flags.
    pub fn new(command: Command, transaction: u16, src: Number, dst: Number, body: Body) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            command,
            transaction,
            is_ack: false,
            is_encrypt: false,
            src,
            dst,
            body,
        }
    }

    /// Total serialized length of the frame.
    pub fn frame_len(&self) -> usize {
        HEADER_LEN + self.body.len() + TRAILER_LEN
    }

    /// Additive complement checksum: `(0x100 - sum(buf)) mod 256`.
    pub fn checksum(buf: &[u8]) -> u8 {
        buf.iter()
            .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
            .wrapping_neg()
    }

    /// Serialize the frame with the default reserved trailer.
    pub fn encode(&self) -> Vec<u8> {
        self.encode_with_reserved(RESERVED)
    }

    /// Serialize the frame with an explicit reserved trailer value.
    ///
    /// The length field is always computed from the actual header, body and
    /// trailer sizes; the checksum covers everything written before it,
    /// reserved trailer included.
    pub fn encode_with_reserved(&self, reserved: [u8; 2]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.frame_len());
        buf.extend_from_slice(&MAGIC);
        buf.push(self.version);
        buf.extend_from_slice(&self.command.code().to_le_bytes());
        buf.extend_from_slice(&self.transaction.to_le_bytes());
        buf.push(u8::from(self.is_ack));
        buf.push(u8::from(self.is_encrypt));
        buf.extend_from_slice(&(self.frame_len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.src.encode());
        buf.extend_from_slice(&self.dst.encode());
        self.body.encode(&mut buf);
        buf.extend_from_slice(&reserved);
        buf.push(Self::checksum(&buf));
        buf
    }

    /// Parse and validate one frame.
    ///
    /// Checks run in a fixed order: minimum size, magic, length field, body
    /// codec resolution, checksum, identifiers, body. Each failure maps to
    /// its own [`ProtocolError`] variant.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < MIN_FRAME_LEN {
            return Err(ProtocolError::Truncated {
                expected: MIN_FRAME_LEN,
                actual: buf.len(),
            });
        }
        if buf[0..3] != MAGIC {
            return Err(ProtocolError::BadMagic([buf[0], buf[1], buf[2]]));
        }
        let declared = u32::from_le_bytes([buf[10], buf[11], buf[12], buf[13]]) as usize;
        if declared != buf.len() {
            return Err(ProtocolError::LengthMismatch {
                declared,
                actual: buf.len(),
            });
        }

        let code = u16::from_le_bytes([buf[4], buf[5]]);
        let command = Command::from_code(code).ok_or(ProtocolError::UnknownCommand(code))?;
        let is_ack = buf[8] != 0;
        let unpack = body::resolve(code, is_ack)?;

        let expected = Self::checksum(&buf[..buf.len() - 1]);
        let actual = buf[buf.len() - 1];
        if expected != actual {
            return Err(ProtocolError::Checksum { expected, actual });
        }

        let mut wire = [0u8; number::WIRE_LEN];
        wire.copy_from_slice(&buf[14..19]);
        let src = Number::decode(&wire)?;
        wire.copy_from_slice(&buf[19..24]);
        let dst = Number::decode(&wire)?;

        let body_bytes = &buf[HEADER_LEN..buf.len() - TRAILER_LEN];
        let body = match unpack {
            Some(unpack) => unpack(body_bytes)?,
            None => Body::Empty,
        };

        Ok(Self {
            version: buf[3],
            command,
            transaction: u16::from_le_bytes([buf[6], buf[7]]),
            is_ack,
            is_encrypt: buf[9] != 0,
            src,
            dst,
            body,
        })
    }
}
