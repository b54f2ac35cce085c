use bytes::{BufMut, BytesMut};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::wire::{put_string, string_size, WireReader};

/// Request/response correlation tag.
pub type Tag = u16;

/// File identifier chosen by the client.
pub type Fid = u32;

/// Tag used by `Tversion`, which precedes tag allocation.
pub const NOTAG: Tag = 0xffff;

/// Fid meaning "no fid" (e.g. `Tattach` without authentication).
pub const NOFID: Fid = 0xffff_ffff;

/// Maximum number of path elements in a single walk.
pub const MAXWELEM: usize = 16;

/// Protocol version string for this catalog.
pub const VERSION_9P2000: &str = "9P2000";

/// Qid type bits.
pub const QTDIR: u8 = 0x80;
pub const QTAPPEND: u8 = 0x40;
pub const QTEXCL: u8 = 0x20;
pub const QTAUTH: u8 = 0x08;
pub const QTTMP: u8 = 0x04;
pub const QTFILE: u8 = 0x00;

/// Directory bit in `Stat::mode` and `Tcreate::perm`.
pub const DMDIR: u32 = 0x8000_0000;

/// Open modes.
pub const OREAD: u8 = 0;
pub const OWRITE: u8 = 1;
pub const ORDWR: u8 = 2;
pub const OEXEC: u8 = 3;
pub const OTRUNC: u8 = 0x10;
pub const ORCLOSE: u8 = 0x40;

/// Server-side unique file identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Qid {
    /// Qid type bits (`QTDIR`, `QTFILE`, ...).
    pub kind: u8,
    pub version: u32,
    pub path: u64,
}

impl Qid {
    /// Encoded size: type[1] version[4] path[8].
    pub const SIZE: usize = 13;

    pub(crate) fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(self.kind);
        dst.put_u32_le(self.version);
        dst.put_u64_le(self.path);
    }

    pub(crate) fn decode(src: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            kind: src.u8()?,
            version: src.u32()?,
            path: src.u64()?,
        })
    }

    /// True when the qid names a directory.
    pub fn is_dir(&self) -> bool {
        self.kind & QTDIR != 0
    }
}

/// A directory entry as carried by `Rstat` and `Twstat`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stat {
    /// Server type.
    pub kind: u16,
    /// Server subtype.
    pub dev: u32,
    pub qid: Qid,
    /// Permissions and flags (`DMDIR`, ...).
    pub mode: u32,
    pub atime: u32,
    pub mtime: u32,
    pub length: u64,
    pub name: String,
    pub uid: String,
    pub gid: String,
    /// Name of the user who last modified the file.
    pub muid: String,
}

impl Stat {
    /// type[2] dev[4] qid[13] mode[4] atime[4] mtime[4] length[8]
    const FIXED_SIZE: usize = 2 + 4 + Qid::SIZE + 4 + 4 + 4 + 8;

    /// Encoded size, excluding the leading size[2] field.
    pub fn size(&self) -> usize {
        Self::FIXED_SIZE
            + string_size(&self.name)
            + string_size(&self.uid)
            + string_size(&self.gid)
            + string_size(&self.muid)
    }

    /// size[2] followed by the entry.
    pub(crate) fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let size = self.size();
        let size = u16::try_from(size).map_err(|_| CodecError::DataTooLong(size))?;
        dst.put_u16_le(size);
        dst.put_u16_le(self.kind);
        dst.put_u32_le(self.dev);
        self.qid.encode(dst);
        dst.put_u32_le(self.mode);
        dst.put_u32_le(self.atime);
        dst.put_u32_le(self.mtime);
        dst.put_u64_le(self.length);
        put_string(dst, &self.name)?;
        put_string(dst, &self.uid)?;
        put_string(dst, &self.gid)?;
        put_string(dst, &self.muid)
    }

    pub(crate) fn decode(src: &mut WireReader<'_>) -> Result<Self> {
        let declared = src.u16()? as usize;
        let mut entry = WireReader::new(src.take(declared)?);
        let stat = Self {
            kind: entry.u16()?,
            dev: entry.u32()?,
            qid: Qid::decode(&mut entry)?,
            mode: entry.u32()?,
            atime: entry.u32()?,
            mtime: entry.u32()?,
            length: entry.u64()?,
            name: entry.string()?,
            uid: entry.string()?,
            gid: entry.string()?,
            muid: entry.string()?,
        };
        check_consumed(declared, entry)?;
        Ok(stat)
    }
}

/// The `stat[n]` field of `Rstat`/`Twstat`: n[2] then a size-prefixed stat.
pub(crate) fn put_stat_field(dst: &mut BytesMut, stat: &Stat) -> Result<()> {
    let n = stat.size() + 2;
    let n = u16::try_from(n).map_err(|_| CodecError::DataTooLong(n))?;
    dst.put_u16_le(n);
    stat.encode(dst)
}

pub(crate) fn stat_field(src: &mut WireReader<'_>) -> Result<Stat> {
    let declared = src.u16()? as usize;
    let mut field = WireReader::new(src.take(declared)?);
    let stat = Stat::decode(&mut field)?;
    check_consumed(declared, field)?;
    Ok(stat)
}

fn check_consumed(declared: usize, src: WireReader<'_>) -> Result<()> {
    match src.remaining() {
        0 => Ok(()),
        left => Err(CodecError::StatSizeMismatch {
            declared,
            actual: declared - left,
        }),
    }
}
