use std::fmt;
use std::io::Read;

use bytes::{Buf, BufMut};

use crate::codec::read_full;
use crate::error::{FrameError, FramePart, Result};

/// Frame header: size (4) + type (1) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Wire discriminant identifying which message a frame body encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageType(pub u8);

impl From<u8> for MessageType {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        value.0
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded frame header.
///
/// ```text
/// ┌──────────────────┬──────────┬──────────────────────┐
/// │ Size (4B LE)     │ Type     │ Body                 │
/// │ header + body    │ (1B)     │ (Size - 5 bytes)     │
/// └──────────────────┴──────────┴──────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Total frame size, header included.
    pub size: u32,
    /// Raw type identifier.
    pub message_type: MessageType,
}

impl FrameHeader {
    /// Parse a header from its 5 wire bytes. Never fails.
    pub fn parse(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut src = &bytes[..];
        let size = src.get_u32_le();
        let message_type = MessageType(src.get_u8());
        Self { size, message_type }
    }

    /// Serialize the header into its 5 wire bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut dst = &mut out[..];
        dst.put_u32_le(self.size);
        dst.put_u8(self.message_type.0);
        out
    }

    /// Body length declared by this header.
    ///
    /// Rejects sizes smaller than the header instead of wrapping around.
    pub fn body_len(&self) -> Result<usize> {
        match (self.size as usize).checked_sub(HEADER_SIZE) {
            Some(len) => Ok(len),
            None => Err(FrameError::InvalidFrame { size: self.size }),
        }
    }
}

/// Read exactly one header from the stream.
///
/// Consumes 5 bytes on success. On failure the bytes already read are not
/// given back; the stream should be considered unsynchronized.
pub fn decode_header<R: Read + ?Sized>(reader: &mut R) -> Result<FrameHeader> {
    let mut buf = [0u8; HEADER_SIZE];
    let read = read_full(reader, &mut buf)?;
    if read < HEADER_SIZE {
        return Err(FrameError::ShortRead {
            part: FramePart::Header,
            expected: HEADER_SIZE,
            read,
        });
    }
    Ok(FrameHeader::parse(&buf))
}
