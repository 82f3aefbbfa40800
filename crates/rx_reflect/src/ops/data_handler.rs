use core::fmt;

use super::{ArrayHandler, EnumHandler, MapHandler};

/// The capability attached to an array, map or enum property.
///
/// At most one handler is present. Scalars and objects carry
/// [`DataStructureHandler::None`].
#[derive(Clone, Copy, Default)]
pub enum DataStructureHandler {
    #[default]
    None,
    Array(&'static dyn ArrayHandler),
    Map(&'static dyn MapHandler),
    Enum(&'static dyn EnumHandler),
}

impl DataStructureHandler {
    #[inline]
    pub fn array_handler(&self) -> Option<&'static dyn ArrayHandler> {
        match *self {
            Self::Array(h) => Some(h),
            _ => None,
        }
    }

    #[inline]
    pub fn map_handler(&self) -> Option<&'static dyn MapHandler> {
        match *self {
            Self::Map(h) => Some(h),
            _ => None,
        }
    }

    #[inline]
    pub fn enum_handler(&self) -> Option<&'static dyn EnumHandler> {
        match *self {
            Self::Enum(h) => Some(h),
            _ => None,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for DataStructureHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Array(h) => f
                .debug_struct("Array")
                .field("element", &h.element_type())
                .field("fixed", &h.is_fixed_size())
                .finish(),
            Self::Map(h) => f
                .debug_struct("Map")
                .field("key", &h.key_meta_type())
                .field("value", &h.value_meta_type())
                .finish(),
            Self::Enum(h) => f.debug_tuple("Enum").field(&h.type_name()).finish(),
        }
    }
}
