use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::marker::PhantomData;

use super::{DataStructureHandler, HandlerError};
use crate::Reflected;
use crate::info::MetaType;

// -----------------------------------------------------------------------------
// ArrayHandler

/// Type-erased operations over an array-like container.
///
/// The container is passed per call and downcast inside the handler, so a
/// single `'static` handler instance serves every property of its type.
///
/// # ReadOrGrow
///
/// [`read`](ArrayHandler::read) is the mutable accessor used by path
/// resolution and deserialization. On a dynamic array it first grows the
/// container to `index + 1` elements, filling with defaults, and never
/// shrinks it. [`get`](ArrayHandler::get) is the pure read.
pub trait ArrayHandler: Send + Sync + 'static {
    fn element_type(&self) -> MetaType;

    fn element_size(&self) -> usize;

    fn element_handler(&self) -> DataStructureHandler;

    fn element_type_id(&self) -> TypeId;

    /// `true` for `[T; N]`, `false` for growable arrays.
    fn is_fixed_size(&self) -> bool;

    fn size(&self, array: &dyn Any) -> Result<usize, HandlerError>;

    /// Returns the element at `index` without modifying the array.
    fn get<'a>(&self, array: &'a dyn Any, index: usize) -> Result<&'a dyn Any, HandlerError>;

    /// Returns the element at `index`, growing a dynamic array if needed.
    fn read<'a>(&self, array: &'a mut dyn Any, index: usize)
    -> Result<&'a mut dyn Any, HandlerError>;

    /// Assigns `value` (or the default) to `index`.
    fn update(
        &self,
        array: &mut dyn Any,
        index: usize,
        value: Option<&dyn Any>,
    ) -> Result<(), HandlerError>;

    /// Same as [`update`](ArrayHandler::update).
    fn create(
        &self,
        array: &mut dyn Any,
        index: usize,
        value: Option<&dyn Any>,
    ) -> Result<(), HandlerError>;

    /// Removes (dynamic) or resets (fixed) the element at `index`.
    ///
    /// A dynamic array returns `Ok(false)` when `index` is out of range.
    fn erase(&self, array: &mut dyn Any, index: usize) -> Result<bool, HandlerError>;

    /// Empties a dynamic array, resets every slot of a fixed one.
    fn clear(&self, array: &mut dyn Any) -> Result<(), HandlerError>;
}

#[inline]
fn downcast<C: Any>(array: &dyn Any) -> Result<&C, HandlerError> {
    array.downcast_ref::<C>().ok_or_else(HandlerError::mismatch::<C>)
}

#[inline]
fn downcast_mut<C: Any>(array: &mut dyn Any) -> Result<&mut C, HandlerError> {
    array
        .downcast_mut::<C>()
        .ok_or_else(HandlerError::mismatch::<C>)
}

fn value_or_default<T: Any + Clone + Default>(value: Option<&dyn Any>) -> Result<T, HandlerError> {
    match value {
        Some(v) => v
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(HandlerError::mismatch::<T>),
        None => Ok(T::default()),
    }
}

// -----------------------------------------------------------------------------
// VecHandler

/// Handler for `Vec<T>`.
pub struct VecHandler<T>(PhantomData<fn() -> T>);

impl<T: Reflected + Clone + Default> VecHandler<T> {
    pub const INSTANCE: &'static Self = &Self(PhantomData);
}

impl<T: Reflected + Clone + Default> ArrayHandler for VecHandler<T> {
    fn element_type(&self) -> MetaType {
        T::META_TYPE
    }

    fn element_size(&self) -> usize {
        size_of::<T>()
    }

    fn element_handler(&self) -> DataStructureHandler {
        T::data_handler()
    }

    fn element_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_fixed_size(&self) -> bool {
        false
    }

    fn size(&self, array: &dyn Any) -> Result<usize, HandlerError> {
        Ok(downcast::<Vec<T>>(array)?.len())
    }

    fn get<'a>(&self, array: &'a dyn Any, index: usize) -> Result<&'a dyn Any, HandlerError> {
        let vec = downcast::<Vec<T>>(array)?;
        let len = vec.len();
        match vec.get(index) {
            Some(v) => Ok(v),
            None => Err(HandlerError::OutOfBounds { index, len }),
        }
    }

    fn read<'a>(
        &self,
        array: &'a mut dyn Any,
        index: usize,
    ) -> Result<&'a mut dyn Any, HandlerError> {
        let vec = downcast_mut::<Vec<T>>(array)?;
        grow_to(vec, index)?;
        Ok(&mut vec[index])
    }

    fn update(
        &self,
        array: &mut dyn Any,
        index: usize,
        value: Option<&dyn Any>,
    ) -> Result<(), HandlerError> {
        let value = value_or_default::<T>(value)?;
        let vec = downcast_mut::<Vec<T>>(array)?;
        grow_to(vec, index)?;
        vec[index] = value;
        Ok(())
    }

    fn create(
        &self,
        array: &mut dyn Any,
        index: usize,
        value: Option<&dyn Any>,
    ) -> Result<(), HandlerError> {
        self.update(array, index, value)
    }

    fn erase(&self, array: &mut dyn Any, index: usize) -> Result<bool, HandlerError> {
        let vec = downcast_mut::<Vec<T>>(array)?;
        if index < vec.len() {
            vec.remove(index);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn clear(&self, array: &mut dyn Any) -> Result<(), HandlerError> {
        downcast_mut::<Vec<T>>(array)?.clear();
        Ok(())
    }
}

/// Appends defaults until `index` is in range.
///
/// Fails without changing `vec` when the new length overflows or cannot be
/// allocated.
fn grow_to<T: Default>(vec: &mut Vec<T>, index: usize) -> Result<(), HandlerError> {
    let len = vec.len();
    if index < len {
        return Ok(());
    }
    let out_of_range = HandlerError::OutOfBounds { index, len };
    let new_len = index.checked_add(1).ok_or_else(|| out_of_range.clone())?;
    vec.try_reserve_exact(new_len - len).map_err(|_| out_of_range)?;
    vec.resize_with(new_len, T::default);
    Ok(())
}

// -----------------------------------------------------------------------------
// StaticArrayHandler

/// Handler for `[T; N]`. Every index is bounds-checked.
pub struct StaticArrayHandler<T, const N: usize>(PhantomData<fn() -> T>);

impl<T: Reflected + Clone + Default, const N: usize> StaticArrayHandler<T, N> {
    pub const INSTANCE: &'static Self = &Self(PhantomData);

    #[inline]
    fn check(index: usize) -> Result<(), HandlerError> {
        if index < N {
            Ok(())
        } else {
            Err(HandlerError::OutOfBounds { index, len: N })
        }
    }
}

impl<T: Reflected + Clone + Default, const N: usize> ArrayHandler for StaticArrayHandler<T, N> {
    fn element_type(&self) -> MetaType {
        T::META_TYPE
    }

    fn element_size(&self) -> usize {
        size_of::<T>()
    }

    fn element_handler(&self) -> DataStructureHandler {
        T::data_handler()
    }

    fn element_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_fixed_size(&self) -> bool {
        true
    }

    fn size(&self, array: &dyn Any) -> Result<usize, HandlerError> {
        downcast::<[T; N]>(array)?;
        Ok(N)
    }

    fn get<'a>(&self, array: &'a dyn Any, index: usize) -> Result<&'a dyn Any, HandlerError> {
        let arr = downcast::<[T; N]>(array)?;
        Self::check(index)?;
        Ok(&arr[index])
    }

    fn read<'a>(
        &self,
        array: &'a mut dyn Any,
        index: usize,
    ) -> Result<&'a mut dyn Any, HandlerError> {
        let arr = downcast_mut::<[T; N]>(array)?;
        Self::check(index)?;
        Ok(&mut arr[index])
    }

    fn update(
        &self,
        array: &mut dyn Any,
        index: usize,
        value: Option<&dyn Any>,
    ) -> Result<(), HandlerError> {
        let arr = downcast_mut::<[T; N]>(array)?;
        Self::check(index)?;
        arr[index] = value_or_default::<T>(value)?;
        Ok(())
    }

    fn create(
        &self,
        array: &mut dyn Any,
        index: usize,
        value: Option<&dyn Any>,
    ) -> Result<(), HandlerError> {
        self.update(array, index, value)
    }

    fn erase(&self, array: &mut dyn Any, index: usize) -> Result<bool, HandlerError> {
        let arr = downcast_mut::<[T; N]>(array)?;
        Self::check(index)?;
        arr[index] = T::default();
        Ok(true)
    }

    fn clear(&self, array: &mut dyn Any) -> Result<(), HandlerError> {
        downcast_mut::<[T; N]>(array)?.fill_with(T::default);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
