//! Length-prefixed 9P message framing.
//!
//! # Crate Structure
//!
//! - [`frame`]: framing core (header codec, type registry, frame codec)
//! - [`ninep`]: the 9P2000 message catalog
//!
//! The free [`decode`] and [`encode`] functions use the 9P2000 binding with
//! default configuration. Callers that need another catalog or a different
//! frame size limit build their own [`Codec`](frame::Codec) and call it
//! directly; nothing in this crate depends on the default.

use std::io::{Read, Write};

use qwire_9p::{Message, NineP2000, NINE_P_2000};
use qwire_frame::{Protocol, Result};

/// Re-export frame types.
pub mod frame {
    pub use qwire_frame::*;
}

/// Re-export 9P2000 catalog types.
pub mod ninep {
    pub use qwire_9p::*;
}

/// The process-wide default protocol (9P2000, default frame config).
pub fn default_protocol() -> &'static NineP2000 {
    &NINE_P_2000
}

/// Decode one frame from `reader` with the default protocol.
pub fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Message> {
    default_protocol().decode(reader)
}

/// Encode one frame to `writer` with the default protocol.
pub fn encode<W: Write + ?Sized>(writer: &mut W, message: &Message) -> Result<()> {
    default_protocol().encode(writer, message)
}
