//! Little-endian field primitives shared by every 9P2000 message.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{CodecError, Result};

/// Bounds-checked cursor over a message body.
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(CodecError::Truncated {
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.buf.get_u16_le())
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.buf.get_u64_le())
    }

    /// Take the next `len` bytes as a sub-slice.
    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    /// `len[2]` followed by UTF-8 bytes.
    pub(crate) fn string(&mut self) -> Result<String> {
        let len = self.u16()? as usize;
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    /// `count[4]` followed by opaque bytes.
    pub(crate) fn data(&mut self) -> Result<Vec<u8>> {
        let len = self.u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Require that every byte has been consumed.
    pub(crate) fn finish(self) -> Result<()> {
        match self.buf.len() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

pub(crate) fn put_string(dst: &mut BytesMut, value: &str) -> Result<()> {
    let len = u16::try_from(value.len()).map_err(|_| CodecError::StringTooLong(value.len()))?;
    dst.put_u16_le(len);
    dst.put_slice(value.as_bytes());
    Ok(())
}

pub(crate) fn put_data(dst: &mut BytesMut, value: &[u8]) -> Result<()> {
    let len = u32::try_from(value.len()).map_err(|_| CodecError::DataTooLong(value.len()))?;
    dst.put_u32_le(len);
    dst.put_slice(value);
    Ok(())
}

/// Encoded size of a string field, length prefix included.
pub(crate) fn string_size(value: &str) -> usize {
    2 + value.len()
}
