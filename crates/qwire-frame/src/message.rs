use std::fmt::Debug;

use bytes::BytesMut;

/// A protocol message that can carry itself through a frame body.
///
/// Implementations come from the protocol catalog, not from this crate.
/// The framing core only calls these three capabilities and never looks
/// inside the tag.
pub trait Message {
    /// Correlation identifier the higher-level protocol uses to pair
    /// requests with responses.
    type Tag: Copy + Debug;

    /// Error produced when a body cannot be encoded or decoded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append the encoded body (header excluded) to `dst`.
    fn encode_body(&self, dst: &mut BytesMut) -> Result<(), Self::Error>;

    /// Populate `self` from a complete body.
    ///
    /// `self` is a freshly constructed empty instance from the registry.
    fn decode_body(&mut self, src: &[u8]) -> Result<(), Self::Error>;

    /// The message's correlation tag.
    fn tag(&self) -> Self::Tag;
}
