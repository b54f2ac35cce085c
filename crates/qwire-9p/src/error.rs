/// Errors raised while encoding or decoding a 9P2000 message body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The body ended before a field was complete.
    #[error("body truncated (needed {needed} bytes, {remaining} left)")]
    Truncated { needed: usize, remaining: usize },

    /// Bytes were left over after the last field.
    #[error("{0} trailing bytes after message body")]
    TrailingBytes(usize),

    /// A string field is not valid UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    /// A string does not fit its 2-byte length prefix.
    #[error("string too long ({0} bytes, max 65535)")]
    StringTooLong(usize),

    /// A walk carries more elements than the protocol allows.
    #[error("too many walk elements ({0}, max 16)")]
    TooManyWalkElements(usize),

    /// A data payload does not fit its 4-byte count prefix.
    #[error("data too long ({0} bytes)")]
    DataTooLong(usize),

    /// A stat's declared size disagrees with its contents.
    #[error("stat size mismatch (declared {declared}, actual {actual})")]
    StatSizeMismatch { declared: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
