//! 9P2000 message catalog for the qwire frame codec.
//!
//! This crate supplies what the framing core leaves open: the concrete
//! message variants, their body encodings, and the type id table. Bind it
//! with [`NINE_P_2000`], or build your own [`Codec`] with a different
//! [`FrameConfig`](qwire_frame::FrameConfig):
//!
//! ```
//! use qwire_9p::{registry, Message, Tclunk};
//! use qwire_frame::{Codec, FrameConfig, Protocol};
//!
//! let codec = Codec::with_config(registry(), FrameConfig { max_frame_size: 8192 });
//! let mut wire = Vec::new();
//! codec.encode(&mut wire, &Message::from(Tclunk { tag: 1, fid: 7 })).unwrap();
//! assert_eq!(wire.len(), 5 + 2 + 4);
//! ```

pub mod error;
pub mod message;
pub mod types;
mod wire;

use qwire_frame::{Codec, FnRegistry, MessageType};

pub use error::{CodecError, Result};
pub use message::{
    Message, Rattach, Rauth, Rclunk, Rcreate, Rerror, Rflush, Ropen, Rread, Rremove, Rstat,
    Rversion, Rwalk, Rwrite, Rwstat, Tattach, Tauth, Tclunk, Tcreate, Tflush, Topen, Tread,
    Tremove, Tstat, Tversion, Twalk, Twrite, Twstat,
};
pub use types::{Fid, Qid, Stat, Tag, MAXWELEM, NOFID, NOTAG, VERSION_9P2000};

/// The 9P2000 codec type.
pub type NineP2000 = Codec<FnRegistry<Message>>;

/// 9P2000 bound with the default frame configuration.
pub static NINE_P_2000: NineP2000 = Codec::new(registry());

/// The 9P2000 type registry.
pub const fn registry() -> FnRegistry<Message> {
    FnRegistry::new(classify, Message::empty)
}

fn classify(message: &Message) -> Option<MessageType> {
    Some(message.message_type())
}
