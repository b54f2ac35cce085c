use std::fmt;

use crate::header::MessageType;
use crate::message::Message;

/// Bidirectional mapping between wire type ids and message values.
///
/// Implementations must be pure: resolving the same type id twice yields
/// two independent, freshly initialized messages.
pub trait TypeRegistry {
    type Message: Message;

    /// Wire type id for a message value, or `None` if unrecognized.
    fn message_type(&self, message: &Self::Message) -> Option<MessageType>;

    /// A new empty message ready to be decoded into, or `None` if the
    /// type id is not part of this protocol.
    fn empty_message(&self, message_type: MessageType) -> Option<Self::Message>;
}

impl<T: TypeRegistry + ?Sized> TypeRegistry for &T {
    type Message = T::Message;

    fn message_type(&self, message: &Self::Message) -> Option<MessageType> {
        (**self).message_type(message)
    }

    fn empty_message(&self, message_type: MessageType) -> Option<Self::Message> {
        (**self).empty_message(message_type)
    }
}

/// A registry built from two plain functions.
///
/// `const` constructible, so a protocol binding can live in a `static`.
pub struct FnRegistry<M> {
    message_type: fn(&M) -> Option<MessageType>,
    empty_message: fn(MessageType) -> Option<M>,
}

impl<M> FnRegistry<M> {
    /// Create a registry from a classifier and a constructor.
    pub const fn new(
        message_type: fn(&M) -> Option<MessageType>,
        empty_message: fn(MessageType) -> Option<M>,
    ) -> Self {
        Self {
            message_type,
            empty_message,
        }
    }
}

impl<M: Message> TypeRegistry for FnRegistry<M> {
    type Message = M;

    fn message_type(&self, message: &M) -> Option<MessageType> {
        (self.message_type)(message)
    }

    fn empty_message(&self, message_type: MessageType) -> Option<M> {
        (self.empty_message)(message_type)
    }
}

impl<M> Clone for FnRegistry<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for FnRegistry<M> {}

impl<M> fmt::Debug for FnRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRegistry").finish_non_exhaustive()
    }
}
