use std::fmt;

use crate::header::MessageType;

/// Which section of a frame a short read hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePart {
    Header,
    Body,
}

impl fmt::Display for FramePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramePart::Header => f.write_str("header"),
            FramePart::Body => f.write_str("body"),
        }
    }
}

/// Errors that can occur during frame encoding/decoding.
///
/// Any error returned from a decode leaves the stream at an unknown frame
/// boundary. Resynchronizing is up to the connection layer.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended before the frame section was complete.
    #[error("short read in frame {part} ({read} of {expected} bytes)")]
    ShortRead {
        part: FramePart,
        expected: usize,
        read: usize,
    },

    /// The writer stopped accepting bytes before the frame was complete.
    #[error("short write ({written} of {expected} bytes accepted)")]
    ShortWrite { expected: usize, written: usize },

    /// The declared total size is smaller than the header itself.
    #[error("invalid frame: declared size {size} is smaller than the header")]
    InvalidFrame { size: u32 },

    /// The frame exceeds the configured maximum size.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The type id is not present in the bound registry.
    #[error("unknown message type {0}")]
    UnknownMessageType(MessageType),

    /// The registry has no wire type for this message value.
    #[error("message has no registered wire type")]
    UnregisteredMessage,

    /// The body does not satisfy the target message's encoding rules.
    #[error("malformed message body: {0}")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The message could not serialize itself.
    #[error("message encoding failed: {0}")]
    Encode(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An I/O error from the underlying stream.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// True when the stream ended exactly on a frame boundary.
    pub fn is_clean_eof(&self) -> bool {
        matches!(
            self,
            FrameError::ShortRead {
                part: FramePart::Header,
                read: 0,
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
