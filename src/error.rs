//! Crate-level error types.

use std::io;

use crate::number::FormatError;
use crate::protocol::ProtocolError;

/// Crate-level error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A frame failed to decode.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An identifier was malformed.
    #[error("identifier error: {0}")]
    Format(#[from] FormatError),
}

/// Crate-level result type.
pub type Result<T> = std::result::Result<T, Error>;
