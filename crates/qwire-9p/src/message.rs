//! The 9P2000 message catalog.
//!
//! Every body starts with `tag[2]`. Field layouts follow the Plan 9
//! `intro(5)` manual pages; integers are little-endian.

use bytes::{BufMut, BytesMut};
use qwire_frame::MessageType;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::types::{put_stat_field, stat_field, Fid, Qid, Stat, Tag, MAXWELEM};
use crate::wire::{put_data, put_string, WireReader};

/// Body encoding for one message variant.
trait Body: Sized {
    fn encode(&self, dst: &mut BytesMut) -> Result<()>;
    fn decode(src: &mut WireReader<'_>) -> Result<Self>;
}

/// Declares a message struct whose body is `tag[2]` plus the listed
/// fixed-width or string fields, in order.
macro_rules! simple_body {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident : $ty:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name {
            pub tag: Tag,
            $(pub $field: simple_body!(@type $ty),)*
        }

        impl Body for $name {
            fn encode(&self, dst: &mut BytesMut) -> Result<()> {
                dst.put_u16_le(self.tag);
                $(simple_body!(@put dst, self.$field, $ty);)*
                Ok(())
            }

            fn decode(src: &mut WireReader<'_>) -> Result<Self> {
                Ok(Self {
                    tag: src.u16()?,
                    $($field: simple_body!(@get src, $ty),)*
                })
            }
        }
    };

    (@type u8) => { u8 };
    (@type u16) => { u16 };
    (@type u32) => { u32 };
    (@type u64) => { u64 };
    (@type string) => { String };
    (@type qid) => { Qid };

    (@put $dst:ident, $value:expr, u8) => { $dst.put_u8($value) };
    (@put $dst:ident, $value:expr, u16) => { $dst.put_u16_le($value) };
    (@put $dst:ident, $value:expr, u32) => { $dst.put_u32_le($value) };
    (@put $dst:ident, $value:expr, u64) => { $dst.put_u64_le($value) };
    (@put $dst:ident, $value:expr, string) => { put_string($dst, &$value)? };
    (@put $dst:ident, $value:expr, qid) => { $value.encode($dst) };

    (@get $src:ident, u8) => { $src.u8()? };
    (@get $src:ident, u16) => { $src.u16()? };
    (@get $src:ident, u32) => { $src.u32()? };
    (@get $src:ident, u64) => { $src.u64()? };
    (@get $src:ident, string) => { $src.string()? };
    (@get $src:ident, qid) => { Qid::decode($src)? };
}

simple_body! {
    /// Negotiate protocol version and maximum message size.
    Tversion { msize: u32, version: string }
}

simple_body! {
    /// Server's answer to `Tversion`.
    Rversion { msize: u32, version: string }
}

simple_body! {
    /// Establish an authentication fid.
    Tauth { afid: u32, uname: string, aname: string }
}

simple_body! {
    Rauth { aqid: qid }
}

simple_body! {
    /// Attach to a file tree as `uname`.
    Tattach { fid: u32, afid: u32, uname: string, aname: string }
}

simple_body! {
    Rattach { qid: qid }
}

simple_body! {
    /// Failure response to any request.
    Rerror { ename: string }
}

simple_body! {
    /// Abort the request tagged `oldtag`.
    Tflush { oldtag: u16 }
}

simple_body! {
    Rflush {}
}

simple_body! {
    Topen { fid: u32, mode: u8 }
}

simple_body! {
    Ropen { qid: qid, iounit: u32 }
}

simple_body! {
    /// Create `name` in the directory `fid` and open it.
    Tcreate { fid: u32, name: string, perm: u32, mode: u8 }
}

simple_body! {
    Rcreate { qid: qid, iounit: u32 }
}

simple_body! {
    Tread { fid: u32, offset: u64, count: u32 }
}

simple_body! {
    Rwrite { count: u32 }
}

simple_body! {
    /// Forget a fid.
    Tclunk { fid: u32 }
}

simple_body! {
    Rclunk {}
}

simple_body! {
    /// Remove the file and clunk the fid.
    Tremove { fid: u32 }
}

simple_body! {
    Rremove {}
}

simple_body! {
    Tstat { fid: u32 }
}

simple_body! {
    Rwstat {}
}

/// Walk `wnames` from `fid`, binding the result to `newfid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Twalk {
    pub tag: Tag,
    pub fid: Fid,
    pub newfid: Fid,
    pub wnames: Vec<String>,
}

impl Body for Twalk {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let count = walk_count(self.wnames.len())?;
        dst.put_u16_le(self.tag);
        dst.put_u32_le(self.fid);
        dst.put_u32_le(self.newfid);
        dst.put_u16_le(count);
        for name in &self.wnames {
            put_string(dst, name)?;
        }
        Ok(())
    }

    fn decode(src: &mut WireReader<'_>) -> Result<Self> {
        let tag = src.u16()?;
        let fid = src.u32()?;
        let newfid = src.u32()?;
        let count = walk_count(src.u16()? as usize)?;
        let wnames = (0..count)
            .map(|_| src.string())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            tag,
            fid,
            newfid,
            wnames,
        })
    }
}

/// Qids of each successfully walked element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rwalk {
    pub tag: Tag,
    pub wqids: Vec<Qid>,
}

impl Body for Rwalk {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let count = walk_count(self.wqids.len())?;
        dst.put_u16_le(self.tag);
        dst.put_u16_le(count);
        for qid in &self.wqids {
            qid.encode(dst);
        }
        Ok(())
    }

    fn decode(src: &mut WireReader<'_>) -> Result<Self> {
        let tag = src.u16()?;
        let count = walk_count(src.u16()? as usize)?;
        let wqids = (0..count)
            .map(|_| Qid::decode(src))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tag, wqids })
    }
}

fn walk_count(len: usize) -> Result<u16> {
    if len > MAXWELEM {
        return Err(CodecError::TooManyWalkElements(len));
    }
    Ok(len as u16)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rread {
    pub tag: Tag,
    pub data: Vec<u8>,
}

impl Body for Rread {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_u16_le(self.tag);
        put_data(dst, &self.data)
    }

    fn decode(src: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            tag: src.u16()?,
            data: src.data()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Twrite {
    pub tag: Tag,
    pub fid: Fid,
    pub offset: u64,
    pub data: Vec<u8>,
}

impl Body for Twrite {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_u16_le(self.tag);
        dst.put_u32_le(self.fid);
        dst.put_u64_le(self.offset);
        put_data(dst, &self.data)
    }

    fn decode(src: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            tag: src.u16()?,
            fid: src.u32()?,
            offset: src.u64()?,
            data: src.data()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rstat {
    pub tag: Tag,
    pub stat: Stat,
}

impl Body for Rstat {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_u16_le(self.tag);
        put_stat_field(dst, &self.stat)
    }

    fn decode(src: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            tag: src.u16()?,
            stat: stat_field(src)?,
        })
    }
}

/// Rewrite the metadata of `fid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Twstat {
    pub tag: Tag,
    pub fid: Fid,
    pub stat: Stat,
}

impl Body for Twstat {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_u16_le(self.tag);
        dst.put_u32_le(self.fid);
        put_stat_field(dst, &self.stat)
    }

    fn decode(src: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            tag: src.u16()?,
            fid: src.u32()?,
            stat: stat_field(src)?,
        })
    }
}

/// Builds the closed [`Message`] enum and its type id table.
macro_rules! catalog {
    ($($name:ident = $id:literal,)+) => {
        /// Any 9P2000 message.
        #[derive(Debug, Clone, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(tag = "type"))]
        pub enum Message {
            $($name($name),)+
        }

        impl Message {
            /// Wire type id of this message.
            pub fn message_type(&self) -> MessageType {
                match self {
                    $(Message::$name(_) => MessageType($id),)+
                }
            }

            /// A fresh empty message for `message_type`, or `None` if the
            /// id is not part of 9P2000.
            pub fn empty(message_type: MessageType) -> Option<Self> {
                match message_type.0 {
                    $($id => Some(Message::$name($name::default())),)+
                    _ => None,
                }
            }

            /// Variant name, e.g. `"Twalk"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Message::$name(_) => stringify!($name),)+
                }
            }

            /// The message's tag.
            pub fn tag(&self) -> Tag {
                match self {
                    $(Message::$name(m) => m.tag,)+
                }
            }

            fn encode_variant(&self, dst: &mut BytesMut) -> Result<()> {
                match self {
                    $(Message::$name(m) => m.encode(dst),)+
                }
            }

            fn decode_variant(&self, src: &mut WireReader<'_>) -> Result<Self> {
                Ok(match self {
                    $(Message::$name(_) => Message::$name($name::decode(src)?),)+
                })
            }
        }

        $(
            impl From<$name> for Message {
                fn from(message: $name) -> Self {
                    Message::$name(message)
                }
            }
        )+
    };
}

catalog! {
    Tversion = 100,
    Rversion = 101,
    Tauth = 102,
    Rauth = 103,
    Tattach = 104,
    Rattach = 105,
    Rerror = 107,
    Tflush = 108,
    Rflush = 109,
    Twalk = 110,
    Rwalk = 111,
    Topen = 112,
    Ropen = 113,
    Tcreate = 114,
    Rcreate = 115,
    Tread = 116,
    Rread = 117,
    Twrite = 118,
    Rwrite = 119,
    Tclunk = 120,
    Rclunk = 121,
    Tremove = 122,
    Rremove = 123,
    Tstat = 124,
    Rstat = 125,
    Twstat = 126,
    Rwstat = 127,
}

impl Message {
    /// True for T-messages (client requests).
    pub fn is_request(&self) -> bool {
        self.message_type().0 % 2 == 0
    }
}

impl qwire_frame::Message for Message {
    type Tag = Tag;
    type Error = CodecError;

    fn encode_body(&self, dst: &mut BytesMut) -> Result<()> {
        self.encode_variant(dst)
    }

    fn decode_body(&mut self, src: &[u8]) -> Result<()> {
        let mut reader = WireReader::new(src);
        let decoded = self.decode_variant(&mut reader)?;
        reader.finish()?;
        *self = decoded;
        Ok(())
    }

    fn tag(&self) -> Tag {
        Message::tag(self)
    }
}
