use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::info::{MetaType, TypeInfoBuilder};
use crate::ops::DataStructureHandler;

// -----------------------------------------------------------------------------
// Reflected

/// A type that can be the value of a reflected property.
///
/// Implemented for the scalars, `Vec<T>`, `[T; N]`, the map types, every
/// enum declared through [`sequential_enum!`] or [`bitmask_enum!`] and every
/// [`Reflectable`] object.
///
/// [`sequential_enum!`]: crate::sequential_enum
/// [`bitmask_enum!`]: crate::bitmask_enum
pub trait Reflected: Any {
    const META_TYPE: MetaType;

    /// The container or enum handler of this type.
    #[inline]
    fn data_handler() -> DataStructureHandler {
        DataStructureHandler::None
    }
}

// -----------------------------------------------------------------------------
// Reflectable

/// A struct whose properties, parents and functions are described to a
/// [`TypeInfoDatabase`](crate::registry::TypeInfoDatabase).
///
/// Usually implemented with [`reflectable!`](crate::reflectable).
///
/// Parents are embedded fields declared with [`parent!`](crate::parent).
/// Types should be `#[repr(C)]` so that declaration order and offset order
/// agree.
pub trait Reflectable: Reflected + Sized {
    /// The display name, which is also the key of the id file.
    const NAME: &'static str;

    fn describe(info: &mut TypeInfoBuilder<'_, Self>);
}

// -----------------------------------------------------------------------------
// Reflect

/// Object-safe view of a [`Reflectable`] instance.
///
/// Every `Reflectable` implements it, so `Box<dyn Reflect>` is the type
/// returned by the factory and [`ReflectableExt`](crate::ReflectableExt)
/// works on both concrete values and trait objects.
pub trait Reflect: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// The [`TypeId`] of the concrete type, not of a box around it.
    fn reflect_type_id(&self) -> TypeId;

    fn reflect_type_name(&self) -> &'static str;
}

impl<T: Reflectable> Reflect for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn reflect_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        T::NAME
    }
}

impl dyn Reflect {
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.reflect_type_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Returns `None` and drops the value if it is not a `T`.
    #[inline]
    pub fn downcast<T: Any>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast().ok()
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dyn Reflect({})", self.reflect_type_name())
    }
}

// -----------------------------------------------------------------------------
// Declaration macros

/// Implements [`Reflectable`] for a struct.
///
/// The body receives a [`TypeInfoBuilder`] and declares the members with
/// [`property!`](crate::property), [`parent!`](crate::parent) and the builder
/// methods.
///
/// # Examples
///
/// ```
/// use rx_reflect::registry::TypeInfoDatabase;
/// use rx_reflect::{parent, property, reflectable};
///
/// #[repr(C)]
/// #[derive(Clone, Default)]
/// struct Shape {
///     sides: u32,
/// }
///
/// #[repr(C)]
/// #[derive(Clone, Default)]
/// struct Square {
///     base: Shape,
///     width: f32,
/// }
///
/// reflectable!(Shape => "Shape" |info| {
///     property!(info, sides);
///     info.default_instantiator();
/// });
///
/// reflectable!(Square => "geometry::Square" |info| {
///     parent!(info, base);
///     property!(info, width);
///     info.default_instantiator();
/// });
///
/// let mut db = TypeInfoDatabase::new();
/// db.register::<Shape>().unwrap();
/// db.register::<Square>().unwrap();
/// db.seal().unwrap();
///
/// let square = db.get_of::<Square>().unwrap();
/// assert!(square.find_property_in_hierarchy(&db, "sides").is_some());
/// ```
#[macro_export]
macro_rules! reflectable {
    ($ty:ty => $name:literal |$info:ident| $body:block) => {
        impl $crate::Reflected for $ty {
            const META_TYPE: $crate::info::MetaType = $crate::info::MetaType::Object;
        }

        impl $crate::Reflectable for $ty {
            const NAME: &'static str = $name;

            fn describe($info: &mut $crate::info::TypeInfoBuilder<'_, Self>) $body
        }
    };
}

/// Declares a field of `Self` as a copyable property.
///
/// The property is named after the field unless a name is given with `as`:
///
/// ```ignore
/// property!(info, leet);
/// property!(info, useless_prop as "aUselessProp");
/// property!(info, xp, meta = &[Attribute::IValueRange { min: 1, max: 10 }]);
/// ```
///
/// The field type must be [`Reflected`] and `Clone`. Use
/// [`TypeInfoBuilder::property_at_no_copy`] for fields that cannot be cloned.
#[macro_export]
macro_rules! property {
    (@emit $info:ident, $field:ident, $name:expr, $meta:expr) => {
        #[allow(unsafe_code)]
        // SAFETY: the offset and the projection name the same field of `Self`.
        unsafe {
            $info.property_at(
                $name,
                ::core::mem::offset_of!(Self, $field),
                |this: &Self| &this.$field,
                $crate::info::Metadata::new($meta),
            )
        };
    };
    ($info:ident, $field:ident) => {
        $crate::property!(@emit $info, $field, ::core::stringify!($field), &[])
    };
    ($info:ident, $field:ident, meta = $meta:expr) => {
        $crate::property!(@emit $info, $field, ::core::stringify!($field), $meta)
    };
    ($info:ident, $field:ident as $name:literal) => {
        $crate::property!(@emit $info, $field, $name, &[])
    };
    ($info:ident, $field:ident as $name:literal, meta = $meta:expr) => {
        $crate::property!(@emit $info, $field, $name, $meta)
    };
}

/// Declares an embedded field of `Self` as the parent class.
#[macro_export]
macro_rules! parent {
    ($info:ident, $field:ident) => {
        #[allow(unsafe_code)]
        // SAFETY: the offset and the projection name the same field of `Self`.
        unsafe {
            $info.parent_at(
                ::core::mem::offset_of!(Self, $field),
                |this: &Self| &this.$field,
            )
        };
    };
}

// -----------------------------------------------------------------------------
// Tests
