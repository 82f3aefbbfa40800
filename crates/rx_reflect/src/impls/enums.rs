//! Declaration macros for reflected enums.

/// Declares a `#[repr(int)]` enum whose values are numbered from zero.
///
/// The first variant is the default. The enum can be used as a property,
/// an array element, a map value and a map key.
///
/// # Examples
///
/// ```
/// use rx_reflect::ops::ReflectEnum;
///
/// rx_reflect::sequential_enum! {
///     pub enum Kings: i32 { Philippe, Alexandre, Cesar, Charles }
/// }
///
/// assert_eq!(Kings::default(), Kings::Philippe);
/// assert_eq!(Kings::Cesar.to_enum_string().as_deref(), Some("Cesar"));
/// assert_eq!(Kings::from_enum_string("Charles"), Some(Kings::Charles));
/// ```
#[macro_export]
macro_rules! sequential_enum {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident : $repr:ty { $first:ident $(, $rest:ident)* $(,)? }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr($repr)]
        $vis enum $name {
            #[default]
            $first,
            $($rest,)*
        }

        impl $name {
            const ALL: &'static [$name] = &[$name::$first $(, $name::$rest)*];
        }

        impl $crate::ops::ReflectEnum for $name {
            type Repr = $repr;

            const TYPE_NAME: &'static str = stringify!($name);
            const KIND: $crate::ops::EnumKind = $crate::ops::EnumKind::Sequential;
            const VALUES: &'static [$repr] = &[$name::$first as $repr $(, $name::$rest as $repr)*];
            const NAMES: &'static [&'static str] = &[stringify!($first) $(, stringify!($rest))*];

            #[inline]
            fn to_repr(self) -> $repr {
                self as $repr
            }

            fn from_repr(repr: $repr) -> ::core::option::Option<Self> {
                Self::ALL.iter().copied().find(|v| *v as $repr == repr)
            }
        }

        $crate::__reflected_enum_common!($name);
    };
}

/// Declares a flag set over an integer.
///
/// Flags get consecutive powers of two in declaration order. The text form
/// joins the set flags with `" | "`.
///
/// # Examples
///
/// ```
/// use rx_reflect::ops::ReflectEnum;
///
/// rx_reflect::bitmask_enum! {
///     pub struct BitEnum: i32 { one, two, four, eight }
/// }
///
/// let mut v = BitEnum::two;
/// v.set_bit(BitEnum::eight);
/// assert!(v.is_bit_set(BitEnum::two) && !v.is_bit_set(BitEnum::one));
/// assert_eq!(v.to_enum_string().as_deref(), Some("two | eight"));
/// assert_eq!(BitEnum::from_enum_string("one | four"), Some(BitEnum::one | BitEnum::four));
/// ```
#[macro_export]
macro_rules! bitmask_enum {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident : $repr:ty { $($flag:ident),+ $(,)? }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr(transparent)]
        $vis struct $name(pub $repr);

        #[allow(non_upper_case_globals)]
        impl $name {
            $crate::__bitmask_flags!($repr; 0; $($flag),+);

            /// The raw bits.
            #[inline]
            pub const fn bits(self) -> $repr {
                self.0
            }

            /// Returns `true` if every bit of `flag` is set.
            #[inline]
            pub const fn is_bit_set(self, flag: Self) -> bool {
                self.0 & flag.0 == flag.0
            }

            #[inline]
            pub fn set_bit(&mut self, flag: Self) {
                self.0 |= flag.0;
            }

            #[inline]
            pub fn clear_bit(&mut self, flag: Self) {
                self.0 &= !flag.0;
            }
        }

        impl $crate::ops::ReflectEnum for $name {
            type Repr = $repr;

            const TYPE_NAME: &'static str = stringify!($name);
            const KIND: $crate::ops::EnumKind = $crate::ops::EnumKind::Bitmask;
            const VALUES: &'static [$repr] = &[$($name::$flag.0),+];
            const NAMES: &'static [&'static str] = &[$(stringify!($flag)),+];

            #[inline]
            fn to_repr(self) -> $repr {
                self.0
            }

            #[inline]
            fn from_repr(repr: $repr) -> ::core::option::Option<Self> {
                ::core::option::Option::Some(Self(repr))
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let text = $crate::ops::ReflectEnum::to_enum_string(*self).unwrap_or_default();
                write!(f, "{}({})", stringify!($name), text)
            }
        }

        $crate::__bitmask_ops!($name, BitOr, bitor, BitOrAssign, bitor_assign, |);
        $crate::__bitmask_ops!($name, BitAnd, bitand, BitAndAssign, bitand_assign, &);
        $crate::__bitmask_ops!($name, BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

        impl ::core::ops::Not for $name {
            type Output = Self;

            #[inline]
            fn not(self) -> Self {
                Self(!self.0)
            }
        }

        impl ::core::ops::Shl<u32> for $name {
            type Output = Self;

            #[inline]
            fn shl(self, rhs: u32) -> Self {
                Self(self.0 << rhs)
            }
        }

        impl ::core::ops::ShlAssign<u32> for $name {
            #[inline]
            fn shl_assign(&mut self, rhs: u32) {
                self.0 <<= rhs;
            }
        }

        impl ::core::ops::Shr<u32> for $name {
            type Output = Self;

            #[inline]
            fn shr(self, rhs: u32) -> Self {
                Self(self.0 >> rhs)
            }
        }

        impl ::core::ops::ShrAssign<u32> for $name {
            #[inline]
            fn shr_assign(&mut self, rhs: u32) {
                self.0 >>= rhs;
            }
        }

        $crate::__reflected_enum_common!($name);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __bitmask_flags {
    ($repr:ty; $shift:expr; $flag:ident $(, $rest:ident)*) => {
        pub const $flag: Self = Self((1 as $repr) << ($shift));
        $crate::__bitmask_flags!($repr; $shift + 1; $($rest),*);
    };
    ($repr:ty; $shift:expr;) => {};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __bitmask_ops {
    ($name:ident, $tr:ident, $f:ident, $tr_assign:ident, $f_assign:ident, $op:tt) => {
        impl ::core::ops::$tr for $name {
            type Output = Self;

            #[inline]
            fn $f(self, rhs: Self) -> Self {
                Self(self.0 $op rhs.0)
            }
        }

        impl ::core::ops::$tr_assign for $name {
            #[inline]
            fn $f_assign(&mut self, rhs: Self) {
                *self = Self(self.0 $op rhs.0);
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflected_enum_common {
    ($name:ident) => {
        impl $crate::Reflected for $name {
            const META_TYPE: $crate::info::MetaType = $crate::info::MetaType::Enum;

            #[inline]
            fn data_handler() -> $crate::ops::DataStructureHandler {
                $crate::ops::DataStructureHandler::Enum($crate::ops::EnumHandlerImpl::<$name>::INSTANCE)
            }
        }

        impl $crate::ops::FromChars for $name {
            fn from_chars(text: &str) -> ::core::result::Result<Self, $crate::ops::ConvertError> {
                <$name as $crate::ops::ReflectEnum>::from_enum_string(text).ok_or_else(|| {
                    $crate::ops::ConvertError::new(text, concat!("not a value of ", stringify!($name)))
                })
            }
        }

        impl $crate::ops::ToChars for $name {
            fn to_chars(&self) -> $crate::__macro_exports::String {
                $crate::ops::ReflectEnum::to_enum_string(*self).unwrap_or_default()
            }
        }

        impl $crate::ops::WireScalar for $name {
            const WIRE_SIZE: usize = <<$name as $crate::ops::ReflectEnum>::Repr as $crate::ops::WireScalar>::WIRE_SIZE;

            #[inline]
            fn write_wire(&self, out: &mut $crate::__macro_exports::Vec<u8>) {
                $crate::ops::WireScalar::write_wire(&$crate::ops::ReflectEnum::to_repr(*self), out);
            }

            fn read_wire(bytes: &[u8]) -> ::core::option::Option<Self> {
                let repr = <<$name as $crate::ops::ReflectEnum>::Repr as $crate::ops::WireScalar>::read_wire(bytes)?;
                <$name as $crate::ops::ReflectEnum>::from_repr(repr)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::ops::{FromChars, ReflectEnum, ToChars, WireScalar};
    use crate::tests_support::{BitEnum, Faces, Jacks, Kings};
    use alloc::format;
    use alloc::vec::Vec;

    #[test]
    fn bitmask_values() {
        assert_eq!(BitEnum::one.bits(), 1);
        assert_eq!(BitEnum::two.bits(), 2);
        assert_eq!(BitEnum::four.bits(), 4);
        assert_eq!(BitEnum::eight.bits(), 8);
        assert_eq!(Jacks::Lancelot.bits(), 8i16);
        assert_eq!(BitEnum::NAMES, ["one", "two", "four", "eight"]);
    }

    #[test]
    fn bitmask_ops() {
        let mut be = BitEnum::two;
        assert!(!be.is_bit_set(BitEnum::one));
        be.set_bit(BitEnum::eight);
        assert!(be.is_bit_set(BitEnum::two) && be.is_bit_set(BitEnum::eight));
        be.clear_bit(BitEnum::eight);
        be.set_bit(BitEnum::one);
        assert_eq!(be, BitEnum::one | BitEnum::two);

        let mut ops = BitEnum::one;
        ops |= BitEnum::two;
        ops &= BitEnum::two;
        assert_eq!(ops, BitEnum::two);
        assert_eq!(BitEnum::one & BitEnum::two, BitEnum::default());

        ops = BitEnum::one;
        ops <<= 1;
        assert_eq!(ops, BitEnum::two);
        assert_eq!(BitEnum::one << 2, BitEnum::four);
        ops = BitEnum::eight;
        ops >>= 1;
        assert_eq!(ops, BitEnum::four);

        let test = BitEnum::one | BitEnum::two;
        ops = BitEnum::two | BitEnum::four;
        ops ^= test;
        assert_eq!(ops, BitEnum::one | BitEnum::four);

        let inverted = !BitEnum::two;
        assert!(inverted.is_bit_set(BitEnum::one));
        assert!(!inverted.is_bit_set(BitEnum::two));
        assert!(inverted.is_bit_set(BitEnum::eight));

        assert_eq!(format!("{:?}", test), "BitEnum(one | two)");
    }

    #[test]
    fn sequential_values() {
        assert_eq!(Kings::default(), Kings::Philippe);
        assert_eq!(Kings::Charles.to_repr(), 3);
        assert_eq!(Faces::King.to_repr(), 2u8);
        assert_eq!(size_of::<Faces>(), 1);
    }

    #[test]
    fn key_forms() {
        assert_eq!(Kings::from_chars("Cesar"), Ok(Kings::Cesar));
        assert!(Kings::from_chars("2").is_err());
        assert_eq!(BitEnum(3).to_chars(), "one | two");

        let mut out = Vec::new();
        Kings::Cesar.write_wire(&mut out);
        assert_eq!(out, [2, 0, 0, 0]);
        assert_eq!(Kings::read_wire(&out), Some(Kings::Cesar));
        assert_eq!(Kings::read_wire(&[9, 0, 0, 0]), None);
    }
}
