//! Length-prefixed, type-tagged message framing.
//!
//! Every frame on the wire is:
//! - A 4-byte little-endian total size (header included)
//! - A 1-byte message type
//! - The message body (`size - 5` bytes)
//!
//! The framing core knows nothing about concrete messages. A protocol
//! catalog plugs in through [`TypeRegistry`] (type id <-> message) and the
//! [`Message`] trait (body encoding). Decoding is all-or-nothing: callers
//! get a complete message or an error, never a partial value.

pub mod codec;
pub mod error;
pub mod header;
pub mod message;
pub mod reader;
pub mod registry;
pub mod writer;

pub use codec::{Codec, FrameConfig, Protocol, DEFAULT_MAX_FRAME_SIZE};
pub use error::{FrameError, FramePart, Result};
pub use header::{decode_header, FrameHeader, MessageType, HEADER_SIZE};
pub use message::Message;
pub use reader::MessageReader;
pub use registry::{FnRegistry, TypeRegistry};
pub use writer::MessageWriter;
