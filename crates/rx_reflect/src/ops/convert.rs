//! Text and wire conversions for scalar values.
//!
//! [`FromChars`] and [`ToChars`] give the string form used for map keys and
//! path segments. [`WireScalar`] is the raw little-endian form written by the
//! binary codec.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::{error, fmt};

// -----------------------------------------------------------------------------
// ConvertError

/// A failed text conversion.
///
/// # Examples
///
/// ```
/// # use rx_reflect::ops::FromChars;
/// let err = i32::from_chars("12a").unwrap_err();
/// assert!(err.to_string().starts_with("Converting '12a' failed: '"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertError {
    input: String,
    reason: Cow<'static, str>,
}

impl ConvertError {
    pub fn new(input: &str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converting '{}' failed: '{}'.", self.input, self.reason)
    }
}

impl error::Error for ConvertError {}

// -----------------------------------------------------------------------------
// Traits

/// Parses a value from its text form without panicking.
pub trait FromChars: Sized {
    fn from_chars(text: &str) -> Result<Self, ConvertError>;
}

/// Produces the text form parsed back by [`FromChars`].
pub trait ToChars {
    fn to_chars(&self) -> String;
}

/// Fixed-width little-endian encoding.
pub trait WireScalar: Sized {
    const WIRE_SIZE: usize;

    fn write_wire(&self, out: &mut Vec<u8>);

    /// Decodes exactly [`WIRE_SIZE`](Self::WIRE_SIZE) bytes.
    ///
    /// Returns `None` when `bytes` has the wrong length.
    fn read_wire(bytes: &[u8]) -> Option<Self>;
}

// -----------------------------------------------------------------------------
// Implementations

impl FromChars for bool {
    fn from_chars(text: &str) -> Result<Self, ConvertError> {
        match text {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConvertError::new(text, "invalid boolean")),
        }
    }
}

impl ToChars for bool {
    fn to_chars(&self) -> String {
        if *self { "true".into() } else { "false".into() }
    }
}

impl WireScalar for bool {
    const WIRE_SIZE: usize = 1;

    fn write_wire(&self, out: &mut Vec<u8>) {
        out.push(*self as u8);
    }

    fn read_wire(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b] => Some(*b != 0),
            _ => None,
        }
    }
}

macro_rules! impl_numeric {
    ($($ty:ty),* $(,)?) => {$(
        impl FromChars for $ty {
            fn from_chars(text: &str) -> Result<Self, ConvertError> {
                text.parse::<$ty>()
                    .map_err(|e| ConvertError::new(text, e.to_string()))
            }
        }

        impl ToChars for $ty {
            #[inline]
            fn to_chars(&self) -> String {
                self.to_string()
            }
        }

        impl WireScalar for $ty {
            const WIRE_SIZE: usize = size_of::<$ty>();

            #[inline]
            fn write_wire(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_wire(bytes: &[u8]) -> Option<Self> {
                let raw: [u8; size_of::<$ty>()] = bytes.try_into().ok()?;
                Some(<$ty>::from_le_bytes(raw))
            }
        }
    )*};
}

impl_numeric!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FromChars, ToChars, WireScalar};
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn parse_scalars() {
        assert_eq!(i32::from_chars("-42"), Ok(-42));
        assert_eq!(u8::from_chars("255"), Ok(255));
        assert!(u8::from_chars("256").is_err());
        assert_eq!(bool::from_chars("1"), Ok(true));
        assert_eq!(bool::from_chars("false"), Ok(false));
        assert!(bool::from_chars("yes").is_err());
        assert_eq!(f64::from_chars("2.5"), Ok(2.5));
    }

    #[test]
    fn error_message() {
        let err = i32::from_chars("abc").unwrap_err();
        assert_eq!(err.input(), "abc");
        assert_eq!(
            err.to_string(),
            "Converting 'abc' failed: 'invalid digit found in string'."
        );
    }

    #[test]
    fn text_forms() {
        assert_eq!(true.to_chars(), "true");
        assert_eq!(7u16.to_chars(), "7");
        assert_eq!(i64::from_chars(&(-9i64).to_chars()), Ok(-9));
    }

    #[test]
    fn wire_forms() {
        let mut out = Vec::new();
        1337i32.write_wire(&mut out);
        true.write_wire(&mut out);
        assert_eq!(out, [0x39, 0x05, 0, 0, 1]);
        assert_eq!(i32::read_wire(&out[..4]), Some(1337));
        assert_eq!(bool::read_wire(&out[4..]), Some(true));
        assert_eq!(i32::read_wire(&out[..3]), None);
    }
}
