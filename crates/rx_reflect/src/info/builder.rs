#![expect(unsafe_code, reason = "properties are declared by byte offset")]

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::marker::PhantomData;

use super::{FunctionInfo, IntoInvoker, Metadata, ParentClass, PropertyInfo};
use super::{ReflectableId, TypeInfo};
use crate::access::FieldAccessor;
use crate::registry::{Instantiator, RegistrationError, TypeInfoDatabase};
use crate::{Reflect, Reflectable, Reflected};

/// Collects the description of `T` during
/// [`TypeInfoDatabase::register`].
///
/// Passed to [`Reflectable::describe`]. Properties and parents are usually
/// declared with the [`property!`](crate::property) and
/// [`parent!`](crate::parent) macros, which compute the offsets.
pub struct TypeInfoBuilder<'a, T: Reflectable> {
    db: &'a TypeInfoDatabase,
    properties: Vec<PropertyInfo>,
    functions: Vec<FunctionInfo>,
    parents: Vec<ParentClass>,
    instantiators: Vec<Instantiator>,
    error: Option<RegistrationError>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Reflectable> TypeInfoBuilder<'a, T> {
    pub(crate) fn new(db: &'a TypeInfoDatabase) -> Self {
        Self {
            db,
            properties: Vec::new(),
            functions: Vec::new(),
            parents: Vec::new(),
            instantiators: Vec::new(),
            error: None,
            _marker: PhantomData,
        }
    }

    /// Declares a copyable property.
    ///
    /// `field` only ties `F` to the field type.
    ///
    /// # Safety
    ///
    /// `offset` is the offset of a field of type `F` inside `T`.
    pub unsafe fn property_at<F: Reflected + Clone>(
        &mut self,
        name: &'static str,
        offset: usize,
        field: fn(&T) -> &F,
        metadata: Metadata,
    ) -> &mut Self {
        let _ = field;
        self.properties.push(PropertyInfo::new::<F>(
            name,
            offset,
            metadata,
            FieldAccessor::copyable::<F>(),
        ));
        self
    }

    /// Declares a property that is skipped when cloning.
    ///
    /// # Safety
    ///
    /// `offset` is the offset of a field of type `F` inside `T`.
    pub unsafe fn property_at_no_copy<F: Reflected>(
        &mut self,
        name: &'static str,
        offset: usize,
        field: fn(&T) -> &F,
        metadata: Metadata,
    ) -> &mut Self {
        let _ = field;
        self.properties.push(PropertyInfo::new::<F>(
            name,
            offset,
            metadata,
            FieldAccessor::of::<F>(),
        ));
        self
    }

    /// Declares the embedded field at `offset` as a parent.
    ///
    /// `P` must already be registered. Its own ancestors are inherited with
    /// their offsets shifted by `offset`.
    ///
    /// # Safety
    ///
    /// `offset` is the offset of a field of type `P` inside `T`.
    pub unsafe fn parent_at<P: Reflectable>(
        &mut self,
        offset: usize,
        field: fn(&T) -> &P,
    ) -> &mut Self {
        let _ = field;
        let Some(parent) = self.db.get_of::<P>() else {
            self.error.get_or_insert(RegistrationError::UnregisteredParent {
                name: T::NAME,
                parent: P::NAME,
            });
            return self;
        };

        self.parents.push(ParentClass {
            id: parent.id(),
            type_id: TypeId::of::<P>(),
            offset,
        });
        self.parents
            .extend(parent.parents().iter().map(|ancestor| ParentClass {
                offset: offset + ancestor.offset,
                ..*ancestor
            }));
        self
    }

    /// Declares a callable function. See [`IntoInvoker`] for the accepted shapes.
    pub fn function<M, F: IntoInvoker<T, M>>(&mut self, name: &'static str, func: F) -> &mut Self {
        self.functions.push(FunctionInfo::new(name, func));
        self
    }

    /// Registers `T::default()` as the instantiator for `&()` arguments.
    pub fn default_instantiator(&mut self) -> &mut Self
    where
        T: Default,
    {
        self.instantiators.push(Box::new(|args: &dyn Any| {
            args.is::<()>()
                .then(|| Box::new(T::default()) as Box<dyn Reflect>)
        }));
        self
    }

    /// Registers an instantiator that accepts `&A` arguments.
    pub fn instantiator<A: Any>(&mut self, ctor: fn(&A) -> T) -> &mut Self {
        self.instantiators.push(Box::new(move |args: &dyn Any| {
            args.downcast_ref::<A>()
                .map(|args| Box::new(ctor(args)) as Box<dyn Reflect>)
        }));
        self
    }

    pub(crate) fn build(
        self,
        id: ReflectableId,
    ) -> Result<(TypeInfo, Vec<Instantiator>), RegistrationError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if self
            .properties
            .windows(2)
            .any(|pair| pair[1].offset() < pair[0].offset())
        {
            log::warn!(
                "property offsets of `{}` are not ascending, declare it `#[repr(C)]` in field order",
                T::NAME
            );
        }

        let info = TypeInfo::new(
            id,
            T::NAME,
            TypeId::of::<T>(),
            core::any::type_name::<T>(),
            size_of::<T>(),
            self.properties,
            self.functions,
            self.parents,
            FieldAccessor::of::<T>(),
        );
        Ok((info, self.instantiators))
    }
}
