use std::io::{ErrorKind, Write};

use crate::codec::Protocol;
use crate::error::{FrameError, Result};

/// Writes complete messages to any `Write` stream.
pub struct MessageWriter<T, P> {
    inner: T,
    protocol: P,
}

impl<T: Write, P: Protocol> MessageWriter<T, P> {
    /// Create a new message writer over `inner`.
    pub fn new(inner: T, protocol: P) -> Self {
        Self { inner, protocol }
    }

    /// Encode one message as a frame and flush it (blocking).
    pub fn write_message(&mut self, message: &P::Message) -> Result<()> {
        self.protocol.encode(&mut self.inner, message)?;
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// The protocol used to encode frames.
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

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
