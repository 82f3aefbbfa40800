use core::{error, fmt};

use crate::info::{MetaType, ReflectableId};
use crate::ops::HandlerError;

/// Errors of the binary codec.
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryError {
    /// The input has no bytes at all.
    Empty,
    /// The input ended in the middle of a header or value.
    UnexpectedEnd { offset: usize },
    /// The serialized type is not the target type or one of its ancestors.
    Incompatible,
    /// A header disagrees with the declared property, element or entry.
    LayoutMismatch { offset: usize },
    /// A header carries a byte that is not a [`MetaType`].
    InvalidMetaType { offset: usize, byte: u8 },
    /// A value of a tag the codec cannot encode.
    UnmanagedMetaType(MetaType),
    /// The value or a nested object is not registered.
    NotReflectable,
    /// No instantiator of the class accepts `&()`.
    Instantiate { id: ReflectableId },
    Handler(HandlerError),
}

impl fmt::Display for BinaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("The binary string is empty."),
            Self::UnexpectedEnd { offset } => {
                write!(f, "The binary string ended unexpectedly at byte {offset}.")
            }
            Self::Incompatible => f.write_str(
                "The serialized data is incompatible with the reflectable to be deserialized into.",
            ),
            Self::LayoutMismatch { offset } => write!(
                f,
                "The serialized layout at byte {offset} does not match the declared type."
            ),
            Self::InvalidMetaType { offset, byte } => {
                write!(f, "Invalid meta type {byte} at byte {offset}.")
            }
            Self::UnmanagedMetaType(meta) => write!(f, "Unmanaged meta type `{meta}`."),
            Self::NotReflectable => f.write_str("The value is not a registered reflectable."),
            Self::Instantiate { id } => {
                write!(f, "No instantiator of reflectable {id} accepts these arguments.")
            }
            Self::Handler(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for BinaryError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Handler(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HandlerError> for BinaryError {
    #[inline]
    fn from(value: HandlerError) -> Self {
        Self::Handler(value)
    }
}
