//! Error types for the decode core

use std::io;
use thiserror::Error;

/// Errors raised by format handling and the decode entry points
///
/// Malformed ADPCM blocks are not errors: the block decoder skips them and
/// keeps going, so a damaged packet never stops playback.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading or writing a wire format record
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Compressed length exceeds what a peer may legitimately send
    #[error("Compressed length {0} exceeds the representable range")]
    SizeOverflow(u64),

    /// Caller-provided output buffer cannot hold the decoded samples
    #[error("Buffer too small: expected at least {expected} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes the decoder will write
        expected: usize,
        /// Bytes available in the output buffer
        actual: usize,
    },

    /// Only mono and stereo streams are decodable
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    /// Format descriptor is inconsistent or cannot be encoded
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl Error {
    /// Create an invalid format error
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Error::InvalidFormat(msg.into())
    }
}

/// Result type for decode operations
pub type Result<T> = std::result::Result<T, Error>;
