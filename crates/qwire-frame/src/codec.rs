use std::io::{ErrorKind, Read, Write};

use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::error::{FrameError, FramePart, Result};
use crate::header::{decode_header, FrameHeader, MessageType, HEADER_SIZE};
use crate::message::Message;
use crate::registry::TypeRegistry;

/// Default maximum frame size (header included): 16 MiB.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Configuration for the frame codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum total frame size in bytes, header included. Default: 16 MiB.
    pub max_frame_size: u32,
}

impl FrameConfig {
    pub const DEFAULT: Self = Self {
        max_frame_size: DEFAULT_MAX_FRAME_SIZE,
    };
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A message encoder/decoder over byte streams.
pub trait Protocol {
    type Message;

    /// Decode one complete frame, header included, into a message.
    fn decode<R: Read + ?Sized>(&self, reader: &mut R) -> Result<Self::Message>;

    /// Encode one message as a complete frame.
    fn encode<W: Write + ?Sized>(&self, writer: &mut W, message: &Self::Message) -> Result<()>;
}

impl<P: Protocol + ?Sized> Protocol for &P {
    type Message = P::Message;

    fn decode<R: Read + ?Sized>(&self, reader: &mut R) -> Result<Self::Message> {
        (**self).decode(reader)
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W, message: &Self::Message) -> Result<()> {
        (**self).encode(writer, message)
    }
}

/// Frame codec bound to a type registry.
///
/// Holds no mutable state: one instance can serve any number of streams
/// concurrently. A single stream must still have one reader and one
/// writer at a time.
#[derive(Debug, Clone, Copy)]
pub struct Codec<R> {
    registry: R,
    config: FrameConfig,
}

impl<R> Codec<R> {
    /// Create a codec with default configuration.
    pub const fn new(registry: R) -> Self {
        Self::with_config(registry, FrameConfig::DEFAULT)
    }

    /// Create a codec with explicit configuration.
    pub const fn with_config(registry: R, config: FrameConfig) -> Self {
        Self { registry, config }
    }

    /// The bound registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Current codec configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<R: TypeRegistry> Codec<R> {
    /// Encode a message into a buffer as one complete frame.
    pub fn encode_to(&self, message: &R::Message, dst: &mut BytesMut) -> Result<()> {
        let message_type = self
            .registry
            .message_type(message)
            .ok_or(FrameError::UnregisteredMessage)?;

        let start = dst.len();
        dst.put_bytes(0, HEADER_SIZE);
        if let Err(err) = message.encode_body(dst) {
            dst.truncate(start);
            return Err(FrameError::Encode(Box::new(err)));
        }

        let total = dst.len() - start;
        let max = self.config.max_frame_size as usize;
        if total > max {
            dst.truncate(start);
            return Err(FrameError::FrameTooLarge { size: total, max });
        }

        let header = FrameHeader {
            size: total as u32,
            message_type,
        };
        dst[start..start + HEADER_SIZE].copy_from_slice(&header.to_bytes());
        Ok(())
    }

    fn resolve(&self, message_type: MessageType) -> Result<R::Message> {
        self.registry
            .empty_message(message_type)
            .ok_or(FrameError::UnknownMessageType(message_type))
    }
}

impl<R: TypeRegistry> Protocol for Codec<R> {
    type Message = R::Message;

    fn decode<Rd: Read + ?Sized>(&self, reader: &mut Rd) -> Result<R::Message> {
        let header = decode_header(reader)?;
        let body_len = header.body_len().inspect_err(|_| {
            debug!(size = header.size, "rejecting frame smaller than its header");
        })?;

        if header.size > self.config.max_frame_size {
            debug!(
                size = header.size,
                max = self.config.max_frame_size,
                "rejecting oversized frame"
            );
            return Err(FrameError::FrameTooLarge {
                size: header.size as usize,
                max: self.config.max_frame_size as usize,
            });
        }

        let mut body = vec![0u8; body_len];
        let read = read_full(reader, &mut body)?;
        if read < body_len {
            return Err(FrameError::ShortRead {
                part: FramePart::Body,
                expected: body_len,
                read,
            });
        }

        // The body is consumed before type resolution so an unknown type
        // still leaves the stream at the next frame boundary.
        let mut message = self.resolve(header.message_type)?;
        message
            .decode_body(&body)
            .map_err(|err| FrameError::Decode(Box::new(err)))?;

        trace!(
            message_type = %header.message_type,
            size = header.size,
            tag = ?message.tag(),
            "decoded frame"
        );
        Ok(message)
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W, message: &R::Message) -> Result<()> {
        let mut buf = BytesMut::new();
        self.encode_to(message, &mut buf)?;
        write_full(writer, &buf)?;

        trace!(
            message_type = buf[HEADER_SIZE - 1],
            size = buf.len(),
            tag = ?message.tag(),
            "encoded frame"
        );
        Ok(())
    }
}

/// Read until `buf` is full or the stream ends.
///
/// Returns the number of bytes read; less than `buf.len()` only at end of
/// stream. `Interrupted` is retried; any other error is returned as is.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(filled)
}

/// Write all of `buf`, looping over partial writes.
pub(crate) fn write_full<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match writer.write(&buf[offset..]) {
            Ok(0) => {
                return Err(FrameError::ShortWrite {
                    expected: buf.len(),
                    written: offset,
                })
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::registry::tests::{TestMessage, TEST_REGISTRY};
    use crate::registry::FnRegistry;

    fn codec() -> Codec<FnRegistry<TestMessage>> {
        Codec::new(TEST_REGISTRY)
    }

    fn encode_vec(message: &TestMessage) -> Vec<u8> {
        let mut out = Vec::new();
        codec().encode(&mut out, message).unwrap();
        out
    }

    #[test]
    fn empty_body_frame_is_five_bytes() {
        let wire = encode_vec(&TestMessage::Ping);
        assert_eq!(wire, [0x05, 0x00, 0x00, 0x00, 0x01]);

        let decoded = codec().decode(&mut Cursor::new(wire)).unwrap();
        assert_eq!(decoded, TestMessage::Ping);
    }

    #[test]
    fn roundtrip_with_body() {
        let message = TestMessage::Data {
            tag: 0x0102,
            bytes: b"hello".to_vec(),
        };
        let wire = encode_vec(&message);

        assert_eq!(wire.len(), HEADER_SIZE + 2 + 5);
        assert_eq!(&wire[..5], &[12, 0, 0, 0, 2]);

        let decoded = codec().decode(&mut Cursor::new(wire)).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn decode_multiple_frames_in_sequence() {
        let first = TestMessage::Data {
            tag: 1,
            bytes: b"one".to_vec(),
        };
        let second = TestMessage::Ping;
        let third = TestMessage::Data {
            tag: 3,
            bytes: Vec::new(),
        };

        let mut wire = Vec::new();
        for message in [&first, &second, &third] {
            codec().encode(&mut wire, message).unwrap();
        }

        let mut cursor = Cursor::new(wire);
        assert_eq!(codec().decode(&mut cursor).unwrap(), first);
        assert_eq!(codec().decode(&mut cursor).unwrap(), second);
        assert_eq!(codec().decode(&mut cursor).unwrap(), third);
        assert!(codec().decode(&mut cursor).unwrap_err().is_clean_eof());
    }

    #[test]
    fn undersized_frame_rejected_without_further_reads() {
        for size in 0..HEADER_SIZE as u32 {
            let mut bytes = size.to_le_bytes().to_vec();
            bytes.push(2);
            bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

            let mut reader = CountingReader::new(bytes);
            let err = codec().decode(&mut reader).unwrap_err();

            assert!(matches!(err, FrameError::InvalidFrame { size: s } if s == size));
            assert_eq!(reader.consumed(), HEADER_SIZE);
        }
    }

    #[test]
    fn oversized_frame_rejected_before_body_read() {
        let small = Codec::with_config(TEST_REGISTRY, FrameConfig { max_frame_size: 16 });
        let mut bytes = 1024u32.to_le_bytes().to_vec();
        bytes.push(2);
        bytes.extend(std::iter::repeat(0u8).take(64));

        let mut reader = CountingReader::new(bytes);
        let err = small.decode(&mut reader).unwrap_err();

        assert!(matches!(err, FrameError::FrameTooLarge { size: 1024, max: 16 }));
        assert_eq!(reader.consumed(), HEADER_SIZE);
    }

    #[test]
    fn oversized_frame_rejected_on_encode() {
        let small = Codec::with_config(TEST_REGISTRY, FrameConfig { max_frame_size: 8 });
        let message = TestMessage::Data {
            tag: 1,
            bytes: vec![0u8; 32],
        };

        let mut out = Vec::new();
        let err = small.encode(&mut out, &message).unwrap_err();

        assert!(matches!(err, FrameError::FrameTooLarge { size: 39, max: 8 }));
        assert!(out.is_empty());
    }

    #[test]
    fn short_header_is_short_read() {
        let err = codec()
            .decode(&mut Cursor::new(vec![0x05, 0x00]))
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::ShortRead {
                part: FramePart::Header,
                read: 2,
                ..
            }
        ));
    }

    #[test]
    fn short_body_is_short_read() {
        let mut wire = encode_vec(&TestMessage::Data {
            tag: 9,
            bytes: b"truncated".to_vec(),
        });
        wire.truncate(HEADER_SIZE + 4);

        let err = codec().decode(&mut Cursor::new(wire)).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ShortRead {
                part: FramePart::Body,
                expected: 11,
                read: 4
            }
        ));
    }

    #[test]
    fn unknown_type_consumes_body() {
        let mut wire = vec![0x08, 0x00, 0x00, 0x00, 0x2a, 0x01, 0x02, 0x03];
        wire.extend(encode_vec(&TestMessage::Ping));

        let mut cursor = Cursor::new(wire);
        let err = codec().decode(&mut cursor).unwrap_err();
        assert!(matches!(err, FrameError::UnknownMessageType(MessageType(0x2a))));
        assert_eq!(cursor.position(), 8);

        assert_eq!(codec().decode(&mut cursor).unwrap(), TestMessage::Ping);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let wire = vec![0x06, 0x00, 0x00, 0x00, 0x01, 0xff];
        let err = codec().decode(&mut Cursor::new(wire)).unwrap_err();

        assert!(matches!(err, FrameError::Decode(_)));
        assert!(err.to_string().contains("ping body must be empty"));
    }

    #[test]
    fn unregistered_message_rejected_on_encode() {
        let mut out = Vec::new();
        let err = codec().encode(&mut out, &TestMessage::Orphan).unwrap_err();
        assert!(matches!(err, FrameError::UnregisteredMessage));
        assert!(out.is_empty());
    }

    #[test]
    fn encode_to_appends_after_existing_bytes() {
        let mut buf = BytesMut::from(&b"prefix"[..]);
        codec().encode_to(&TestMessage::Ping, &mut buf).unwrap();
        assert_eq!(&buf[..], b"prefix\x05\x00\x00\x00\x01");
    }

    #[test]
    fn partial_writes_deliver_complete_frame() {
        let message = TestMessage::Data {
            tag: 0xbeef,
            bytes: (0u8..=200).collect(),
        };
        for chunk in [1usize, 2, 3, 7] {
            let mut writer = ChunkedWriter::new(chunk);
            codec().encode(&mut writer, &message).unwrap();

            assert_eq!(writer.data, encode_vec(&message));
            let decoded = codec().decode(&mut Cursor::new(writer.data)).unwrap();
            assert_eq!(decoded, message);
        }
    }

    #[test]
    fn byte_by_byte_reads_decode() {
        let message = TestMessage::Data {
            tag: 4,
            bytes: b"slow".to_vec(),
        };
        let mut reader = ByteByByteReader {
            bytes: encode_vec(&message),
            pos: 0,
        };
        assert_eq!(codec().decode(&mut reader).unwrap(), message);
    }

    #[test]
    fn interrupted_read_retries() {
        let mut reader = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(encode_vec(&TestMessage::Ping)),
        };
        assert_eq!(codec().decode(&mut reader).unwrap(), TestMessage::Ping);
    }

    #[test]
    fn would_block_read_propagates_io_error() {
        struct WouldBlock;

        impl Read for WouldBlock {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::WouldBlock))
            }
        }

        let err = codec().decode(&mut WouldBlock).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn zero_write_is_short_write() {
        let mut writer = ZeroAfter {
            accepted: 0,
            limit: 3,
        };
        let err = codec().encode(&mut writer, &TestMessage::Ping).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ShortWrite {
                expected: 5,
                written: 3
            }
        ));
    }

    #[test]
    fn write_error_passes_through() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::BrokenPipe))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = codec().encode(&mut Broken, &TestMessage::Ping).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn shared_codec_across_threads() {
        static CODEC: Codec<FnRegistry<TestMessage>> = Codec::new(TEST_REGISTRY);

        let handles: Vec<_> = (0..4u16)
            .map(|i| {
                std::thread::spawn(move || {
                    let message = TestMessage::Data {
                        tag: i,
                        bytes: vec![i as u8; i as usize],
                    };
                    let mut wire = Vec::new();
                    CODEC.encode(&mut wire, &message).unwrap();
                    let decoded = CODEC.decode(&mut Cursor::new(wire)).unwrap();
                    assert_eq!(decoded, message);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn protocol_by_reference() {
        let codec = codec();
        let by_ref = &codec;
        let mut wire = Vec::new();
        by_ref.encode(&mut wire, &TestMessage::Ping).unwrap();
        assert_eq!(by_ref.decode(&mut Cursor::new(wire)).unwrap(), TestMessage::Ping);
    }

    struct CountingReader {
        inner: Cursor<Vec<u8>>,
    }

    impl CountingReader {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                inner: Cursor::new(bytes),
            }
        }

        fn consumed(&self) -> usize {
            self.inner.position() as usize
        }
    }

    impl Read for CountingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    struct ChunkedWriter {
        chunk: usize,
        data: Vec<u8>,
    }

    impl ChunkedWriter {
        fn new(chunk: usize) -> Self {
            Self {
                chunk,
                data: Vec::new(),
            }
        }
    }

    impl Write for ChunkedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.chunk);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroAfter {
        accepted: usize,
        limit: usize,
    }

    impl Write for ZeroAfter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.limit - self.accepted);
            self.accepted += n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
