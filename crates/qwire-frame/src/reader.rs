use std::io::Read;

use crate::codec::Protocol;
use crate::error::Result;

/// Reads complete messages from any `Read` stream.
///
/// Owning the stream keeps reads for it in one place, so frame boundaries
/// cannot be split between callers.
pub struct MessageReader<T, P> {
    inner: T,
    protocol: P,
}

impl<T: Read, P: Protocol> MessageReader<T, P> {
    /// Create a new message reader over `inner`.
    pub fn new(inner: T, protocol: P) -> Self {
        Self { inner, protocol }
    }

    /// Read the next complete message (blocking).
    ///
    /// A stream that ends exactly between frames yields an error for which
    /// [`FrameError::is_clean_eof`](crate::FrameError::is_clean_eof) is true.
    pub fn read_message(&mut self) -> Result<P::Message> {
        self.protocol.decode(&mut self.inner)
    }

    /// Read the next message, mapping a clean end of stream to `None`.
    pub fn next_message(&mut self) -> Result<Option<P::Message>> {
        match self.read_message() {
            Ok(message) => Ok(Some(message)),
            Err(err) if err.is_clean_eof() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// The protocol used to decode frames.
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
