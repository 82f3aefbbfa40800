use core::fmt;

// -----------------------------------------------------------------------------
// Ids

/// Numeric identifier of a registered reflectable type.
///
/// Assigned sequentially by the [`TypeInfoDatabase`] and possibly rewritten
/// by an id-file import.
///
/// [`TypeInfoDatabase`]: crate::registry::TypeInfoDatabase
pub type ReflectableId = u32;

/// The id carried by properties that are not reflectable objects.
pub const INVALID_REFLECTABLE_ID: ReflectableId = ReflectableId::MAX;

// -----------------------------------------------------------------------------
// MetaType

/// The closed tag describing how to interpret a value.
///
/// The discriminant is the byte written to the binary wire format, so the
/// order of variants is part of the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum MetaType {
    #[default]
    Unknown = 0,
    Void,
    Bool,
    Int,
    Uint,
    Int64,
    Uint64,
    Float,
    Double,
    Array,
    Map,
    Enum,
    Object,
    Char,
    UChar,
    Short,
    UShort,
    Reference,
}

impl MetaType {
    const ALL: [MetaType; 18] = [
        Self::Unknown,
        Self::Void,
        Self::Bool,
        Self::Int,
        Self::Uint,
        Self::Int64,
        Self::Uint64,
        Self::Float,
        Self::Double,
        Self::Array,
        Self::Map,
        Self::Enum,
        Self::Object,
        Self::Char,
        Self::UChar,
        Self::Short,
        Self::UShort,
        Self::Reference,
    ];

    /// Decodes a wire byte.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rx_reflect::info::MetaType;
    /// assert_eq!(MetaType::from_u8(12), Some(MetaType::Object));
    /// assert_eq!(MetaType::from_u8(200), None);
    /// ```
    #[inline]
    pub const fn from_u8(byte: u8) -> Option<MetaType> {
        if (byte as usize) < Self::ALL.len() {
            Some(Self::ALL[byte as usize])
        } else {
            None
        }
    }

    /// The wire byte.
    #[inline(always)]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` for the tags that map onto a Rust primitive.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Char
                | Self::UChar
                | Self::Short
                | Self::UShort
                | Self::Int
                | Self::Uint
                | Self::Int64
                | Self::Uint64
                | Self::Float
                | Self::Double
        )
    }

    /// Returns `true` for the signed integer tags.
    pub const fn is_signed_integer(self) -> bool {
        matches!(self, Self::Char | Self::Short | Self::Int | Self::Int64)
    }

    /// Byte width of the scalar encoding, `None` for non-scalars.
    pub const fn scalar_width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Char | Self::UChar => Some(1),
            Self::Short | Self::UShort => Some(2),
            Self::Int | Self::Uint | Self::Float => Some(4),
            Self::Int64 | Self::Uint64 | Self::Double => Some(8),
            _ => None,
        }
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::Void => "Void",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Uint => "Uint",
            Self::Int64 => "Int64",
            Self::Uint64 => "Uint64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::Enum => "Enum",
            Self::Object => "Object",
            Self::Char => "Char",
            Self::UChar => "UChar",
            Self::Short => "Short",
            Self::UShort => "UShort",
            Self::Reference => "Reference",
        };
        f.pad(name)
    }
}

// -----------------------------------------------------------------------------
// Tests
