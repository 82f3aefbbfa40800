use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use super::{HandlerError, WireScalar};
use crate::Reflected;
use crate::info::MetaType;

// -----------------------------------------------------------------------------
// EnumRepr

/// The integer types an enum can be represented by.
pub trait EnumRepr: Copy + PartialEq + WireScalar + Send + Sync + 'static {
    const META_TYPE: MetaType;

    /// Zero- or sign-extends the value to 64 bits.
    fn to_bits(self) -> u64;

    /// Truncates 64 bits back to the representation.
    fn from_bits(bits: u64) -> Self;

    fn is_zero(self) -> bool;

    fn bit_and(self, other: Self) -> Self;

    fn bit_or(self, other: Self) -> Self;
}

macro_rules! impl_enum_repr {
    ($($ty:ty => $meta:ident, $wide:ty;)*) => {$(
        impl EnumRepr for $ty {
            const META_TYPE: MetaType = MetaType::$meta;

            #[inline]
            fn to_bits(self) -> u64 {
                self as $wide as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                bits as $ty
            }

            #[inline]
            fn is_zero(self) -> bool {
                self == 0
            }

            #[inline]
            fn bit_and(self, other: Self) -> Self {
                self & other
            }

            #[inline]
            fn bit_or(self, other: Self) -> Self {
                self | other
            }
        }
    )*};
}

impl_enum_repr! {
    i8 => Char, i64;
    u8 => UChar, u64;
    i16 => Short, i64;
    u16 => UShort, u64;
    i32 => Int, i64;
    u32 => Uint, u64;
    i64 => Int64, i64;
    u64 => Uint64, u64;
}

// -----------------------------------------------------------------------------
// ReflectEnum

/// How the values of an enum combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    /// Exactly one named value at a time.
    Sequential,
    /// Any combination of named flags.
    Bitmask,
}

/// A closed set of named integer values.
///
/// Usually implemented through [`sequential_enum!`] or [`bitmask_enum!`].
///
/// [`sequential_enum!`]: crate::sequential_enum
/// [`bitmask_enum!`]: crate::bitmask_enum
pub trait ReflectEnum: Reflected + Copy + Default {
    type Repr: EnumRepr;

    const TYPE_NAME: &'static str;
    const KIND: EnumKind;
    /// Values of the named constants, parallel to [`NAMES`](Self::NAMES).
    const VALUES: &'static [Self::Repr];
    const NAMES: &'static [&'static str];

    fn to_repr(self) -> Self::Repr;

    /// Returns `None` if `repr` is not a value of a sequential enum.
    /// A bitmask accepts every integer.
    fn from_repr(repr: Self::Repr) -> Option<Self>;

    /// The text form. Bitmask flags are joined by `" | "`.
    ///
    /// Returns `None` for an unnamed sequential value.
    fn to_enum_string(self) -> Option<String> {
        let repr = self.to_repr();
        match Self::KIND {
            EnumKind::Sequential => Self::VALUES
                .iter()
                .position(|v| *v == repr)
                .map(|i| Self::NAMES[i].into()),
            EnumKind::Bitmask => {
                let names: Vec<&str> = Self::VALUES
                    .iter()
                    .zip(Self::NAMES)
                    .filter(|(v, _)| !v.is_zero() && repr.bit_and(**v) == **v)
                    .map(|(_, n)| *n)
                    .collect();
                Some(names.join(" | "))
            }
        }
    }

    /// Parses the form produced by [`to_enum_string`](Self::to_enum_string).
    fn from_enum_string(text: &str) -> Option<Self> {
        let lookup = |name: &str| {
            let name = name.trim();
            Self::NAMES
                .iter()
                .position(|n| *n == name)
                .map(|i| Self::VALUES[i])
        };
        match Self::KIND {
            EnumKind::Sequential => Self::from_repr(lookup(text)?),
            EnumKind::Bitmask => {
                let mut bits = <Self::Repr as EnumRepr>::from_bits(0);
                if !text.trim().is_empty() {
                    for part in text.split('|') {
                        bits = bits.bit_or(lookup(part)?);
                    }
                }
                Self::from_repr(bits)
            }
        }
    }

    /// Every named value in declaration order.
    fn enumerate() -> impl Iterator<Item = (&'static str, Self)> {
        Self::NAMES
            .iter()
            .zip(Self::VALUES)
            .filter_map(|(n, v)| Self::from_repr(*v).map(|e| (*n, e)))
    }
}

// -----------------------------------------------------------------------------
// EnumHandler

/// Type-erased operations over an enum value.
pub trait EnumHandler: Send + Sync + 'static {
    fn type_name(&self) -> &'static str;

    /// The MetaType of the underlying integer.
    fn enum_meta_type(&self) -> MetaType;

    fn names(&self) -> &'static [&'static str];

    fn enum_to_string(&self, value: &dyn Any) -> Result<String, HandlerError>;

    fn set_from_string(&self, value: &mut dyn Any, text: &str) -> Result<(), HandlerError>;

    fn to_bits(&self, value: &dyn Any) -> Result<u64, HandlerError>;

    fn set_from_bits(&self, value: &mut dyn Any, bits: u64) -> Result<(), HandlerError>;
}

/// Handler for any [`ReflectEnum`].
pub struct EnumHandlerImpl<E>(PhantomData<fn() -> E>);

impl<E: ReflectEnum> EnumHandlerImpl<E> {
    pub const INSTANCE: &'static Self = &Self(PhantomData);

    #[inline]
    fn value(value: &dyn Any) -> Result<E, HandlerError> {
        value
            .downcast_ref::<E>()
            .copied()
            .ok_or_else(HandlerError::mismatch::<E>)
    }

    #[inline]
    fn value_mut(value: &mut dyn Any) -> Result<&mut E, HandlerError> {
        value
            .downcast_mut::<E>()
            .ok_or_else(HandlerError::mismatch::<E>)
    }
}

impl<E: ReflectEnum> EnumHandler for EnumHandlerImpl<E> {
    fn type_name(&self) -> &'static str {
        E::TYPE_NAME
    }

    fn enum_meta_type(&self) -> MetaType {
        <E::Repr as EnumRepr>::META_TYPE
    }

    fn names(&self) -> &'static [&'static str] {
        E::NAMES
    }

    fn enum_to_string(&self, value: &dyn Any) -> Result<String, HandlerError> {
        let value = Self::value(value)?;
        value
            .to_enum_string()
            .ok_or(HandlerError::InvalidEnumValue {
                type_name: E::TYPE_NAME,
                bits: value.to_repr().to_bits(),
            })
    }

    fn set_from_string(&self, value: &mut dyn Any, text: &str) -> Result<(), HandlerError> {
        let slot = Self::value_mut(value)?;
        *slot = E::from_enum_string(text).ok_or_else(|| HandlerError::InvalidEnumName {
            type_name: E::TYPE_NAME,
            text: text.into(),
        })?;
        Ok(())
    }

    fn to_bits(&self, value: &dyn Any) -> Result<u64, HandlerError> {
        Ok(Self::value(value)?.to_repr().to_bits())
    }

    fn set_from_bits(&self, value: &mut dyn Any, bits: u64) -> Result<(), HandlerError> {
        let slot = Self::value_mut(value)?;
        *slot = E::from_repr(<E::Repr as EnumRepr>::from_bits(bits)).ok_or(
            HandlerError::InvalidEnumValue {
                type_name: E::TYPE_NAME,
                bits,
            },
        )?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
