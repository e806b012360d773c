//! Error types for the control frame codec.

use std::error::Error;
use std::fmt;

use crate::number::FormatError;

/// Errors raised while decoding control frames and their bodies.
///
/// All variants are raised synchronously at decode time; nothing is retried
/// internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The buffer is smaller than the fixed frame overhead.
    Truncated {
        /// Smallest acceptable buffer length.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },
    /// The frame did not start with the protocol magic.
    BadMagic([u8; 3]),
    /// The header's length field disagrees with the buffer length.
    LengthMismatch {
        /// Length claimed by the header.
        declared: usize,
        /// Actual buffer length.
        actual: usize,
    },
    /// The trailing checksum byte did not match the frame contents.
    Checksum {
        /// Checksum recomputed from the frame bytes.
        expected: u8,
        /// Checksum byte carried by the frame.
        actual: u8,
    },
    /// The command code has no registered body codec.
    UnknownCommand(u16),
    /// A body's length disagrees with the bytes actually present.
    BodyLength {
        /// Length the body codec requires or the body itself declares.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },
    /// A body field held a value that cannot be represented.
    InvalidData(String),
    /// A source or destination identifier field was invalid.
    Identifier(FormatError),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Truncated { expected, actual } => {
                write!(
                    f,
                    "frame too short: expected at least {} bytes, got {}",
                    expected, actual
                )
            }
            ProtocolError::BadMagic(magic) => {
                write!(
                    f,
                    "bad frame magic: {:02X} {:02X} {:02X}",
                    magic[0], magic[1], magic[2]
                )
            }
            ProtocolError::LengthMismatch { declared, actual } => {
                write!(
                    f,
                    "length field mismatch: header declares {} bytes, got {}",
                    declared, actual
                )
            }
            ProtocolError::Checksum { expected, actual } => {
                write!(
                    f,
                    "checksum mismatch: expected 0x{:02X}, got 0x{:02X}",
                    expected, actual
                )
            }
            ProtocolError::UnknownCommand(code) => {
                write!(f, "unknown command code: 0x{:04X}", code)
            }
            ProtocolError::BodyLength { expected, actual } => {
                write!(
                    f,
                    "body length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
            ProtocolError::InvalidData(msg) => write!(f, "invalid body data: {}", msg),
            ProtocolError::Identifier(err) => write!(f, "invalid identifier: {}", err),
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProtocolError::Identifier(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FormatError> for ProtocolError {
    fn from(err: FormatError) -> Self {
        ProtocolError::Identifier(err)
    }
}
