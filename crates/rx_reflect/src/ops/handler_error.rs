use alloc::string::String;
use core::{error, fmt};

use super::ConvertError;

/// Errors reported by the container and enum handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerError {
    /// The container, element or value was not of the handler's concrete type.
    TypeMismatch { expected: &'static str },
    /// An index past the end of a fixed-size array, or past what a dynamic
    /// array can grow to.
    OutOfBounds { index: usize, len: usize },
    /// A key or enum name could not be converted from its text form.
    Convert(ConvertError),
    /// Raw key bytes did not have the width of the key type.
    KeyWidth { expected: usize, found: usize },
    /// An integer does not name a value of the enum.
    InvalidEnumValue { type_name: &'static str, bits: u64 },
    /// A string does not name a value of the enum.
    InvalidEnumName { type_name: &'static str, text: String },
}

impl HandlerError {
    #[inline]
    pub(crate) fn mismatch<T>() -> Self {
        Self::TypeMismatch {
            expected: core::any::type_name::<T>(),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected } => {
                write!(f, "handler was used with a value that is not a `{expected}`")
            }
            Self::OutOfBounds { index, len } => write!(
                f,
                "array handler was used with an index out of range (index: {index} vs. array size: {len})"
            ),
            Self::Convert(err) => fmt::Display::fmt(err, f),
            Self::KeyWidth { expected, found } => {
                write!(f, "binary key has {found} bytes, expected {expected}")
            }
            Self::InvalidEnumValue { type_name, bits } => {
                write!(f, "{bits} is not a value of enum `{type_name}`")
            }
            Self::InvalidEnumName { type_name, text } => {
                write!(f, "'{text}' is not a value of enum `{type_name}`")
            }
        }
    }
}

impl error::Error for HandlerError {}

impl From<ConvertError> for HandlerError {
    #[inline]
    fn from(value: ConvertError) -> Self {
        Self::Convert(value)
    }
}
