//! Lifetime-carrying, type-erased pointers for field projection.
//!
//! A reflected object is described as "a base address plus a list of byte
//! offsets". [`Ptr<'a>`] and [`PtrMut<'a>`] are the base addresses: they
//! behave like `&'a T` / `&'a mut T` whose `T` has been forgotten, and
//! [`Ptr::field`] / [`PtrMut::field`] move them to a member.
//!
//! Turning a pointer back into a reference is `unsafe`: the caller must know
//! the real pointee type. Everything else (creation from references, offset
//! arithmetic inside a borrowed object, alignment checks) is kept as close
//! to the reference rules as possible.
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

// -----------------------------------------------------------------------------
// Shared helpers

macro_rules! erased_common {
    ($ptr:ident) => {
        impl $ptr<'_> {
            /// Returns `true` if the address satisfies the alignment of `T`.
            #[inline]
            pub fn is_aligned<T>(&self) -> bool {
                self.0.as_ptr().cast::<T>().is_aligned()
            }

            /// Panics in debug builds if the address is misaligned for `T`.
            #[cfg_attr(debug_assertions, track_caller)]
            #[cfg_attr(not(debug_assertions), inline(always))]
            pub fn debug_assert_aligned<T>(&self) {
                debug_assert!(
                    self.is_aligned::<T>(),
                    "misaligned field pointer {:p} for `{}` (align {})",
                    self.0,
                    core::any::type_name::<T>(),
                    align_of::<T>(),
                );
            }

            /// Address as an integer, for diagnostics and comparisons.
            #[inline]
            pub fn addr(&self) -> usize {
                self.0.as_ptr().addr()
            }
        }

        impl fmt::Pointer for $ptr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $ptr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($ptr), self.0)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Ptr

/// A shared, type-erased pointer into a borrowed object.
///
/// `Ptr<'a>` is what `&'a T` becomes once `T` is erased. It is `Copy`, and
/// the pointee must not be mutated while it is alive.
///
/// # Examples
///
/// ```
/// # use rx_ptr::Ptr;
/// #[repr(C)]
/// struct Pair { a: u32, b: u16 }
///
/// let pair = Pair { a: 1, b: 2 };
/// let base = Ptr::from_ref(&pair);
///
/// // SAFETY: `b` lives at that offset inside `pair`.
/// let b = unsafe { base.field(core::mem::offset_of!(Pair, b)) };
/// b.debug_assert_aligned::<u16>();
/// assert_eq!(unsafe { *b.as_ref::<u16>() }, 2);
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Ptr<'a>(NonNull<u8>, PhantomData<&'a u8>);

erased_common!(Ptr);

impl<'a> Ptr<'a> {
    /// Wraps a raw non-null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live value that stays unmodified for `'a`.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Self {
        Self(ptr, PhantomData)
    }

    /// Erases the type of a shared reference.
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(val: &'a T) -> Self {
        Self(NonNull::from_ref(val).cast(), PhantomData)
    }

    /// Returns the raw address, dropping the lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Moves the pointer `offset` bytes forward, onto a member of the pointee.
    ///
    /// # Safety
    ///
    /// `offset` must stay inside the object this pointer was created from.
    #[inline]
    pub const unsafe fn field(self, offset: usize) -> Self {
        // SAFETY: the caller keeps the result inside the same allocation.
        Self(unsafe { self.0.add(offset) }, PhantomData)
    }

    /// Reads the pointee as `&'a T`.
    ///
    /// # Safety
    ///
    /// - The pointee is a valid `T`.
    /// - The address is aligned for `T`.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(self) -> &'a T {
        // SAFETY: guaranteed by the caller.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a T> for Ptr<'a> {
    #[inline]
    fn from(val: &'a T) -> Self {
        Self::from_ref(val)
    }
}

// -----------------------------------------------------------------------------
// PtrMut

/// An exclusive, type-erased pointer into a borrowed object.
///
/// `PtrMut<'a>` is what `&'a mut T` becomes once `T` is erased. It is not
/// `Copy`; use [`reborrow`](Self::reborrow) and [`borrow`](Self::borrow) to
/// hand out shorter-lived pointers.
///
/// # Examples
///
/// ```
/// # use rx_ptr::PtrMut;
/// let mut arr = [1u8, 2, 3];
/// let base = PtrMut::from_mut(&mut arr);
///
/// // SAFETY: index 2 of a `[u8; 3]`.
/// let last = unsafe { base.field(2).consume::<u8>() };
/// *last = 9;
/// assert_eq!(arr, [1, 2, 9]);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

erased_common!(PtrMut);

impl<'a> PtrMut<'a> {
    /// Wraps a raw non-null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live value that nothing else accesses for `'a`.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Self {
        Self(ptr, PhantomData)
    }

    /// Erases the type of an exclusive reference.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(val: &'a mut T) -> Self {
        Self(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Returns the raw address, dropping the lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Moves the pointer `offset` bytes forward, onto a member of the pointee.
    ///
    /// # Safety
    ///
    /// `offset` must stay inside the object this pointer was created from.
    #[inline]
    pub const unsafe fn field(self, offset: usize) -> Self {
        // SAFETY: the caller keeps the result inside the same allocation.
        Self(unsafe { self.0.add(offset) }, PhantomData)
    }

    /// A shared pointer for the duration of the borrow of `self`.
    #[inline(always)]
    pub const fn borrow(&self) -> Ptr<'_> {
        // SAFETY: exclusive access is suspended while the result lives.
        unsafe { Ptr::new(self.0) }
    }

    /// A shorter-lived exclusive pointer, leaving `self` usable afterwards.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> PtrMut<'_> {
        // SAFETY: `self` is mutably borrowed while the result lives.
        unsafe { PtrMut::new(self.0) }
    }

    /// Converts into `&'a mut T`, consuming the pointer.
    ///
    /// # Safety
    ///
    /// - The pointee is a valid `T`.
    /// - The address is aligned for `T`.
    #[inline(always)]
    pub const unsafe fn consume<T>(self) -> &'a mut T {
        // SAFETY: guaranteed by the caller.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for PtrMut<'a> {
    #[inline]
    fn from(val: &'a mut T) -> Self {
        Self::from_mut(val)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Ptr, PtrMut};
    use core::mem::offset_of;

    #[repr(C)]
    struct Sample {
        flag: bool,
        value: u32,
        tail: [u16; 2],
    }

    #[test]
    fn field_projection() {
        let s = Sample {
            flag: true,
            value: 77,
            tail: [3, 4],
        };
        let base = Ptr::from_ref(&s);
        let value = unsafe { base.field(offset_of!(Sample, value)) };
        assert!(value.is_aligned::<u32>());
        assert_eq!(unsafe { *value.as_ref::<u32>() }, 77);
        assert_eq!(value.addr() - base.addr(), offset_of!(Sample, value));
        assert!(unsafe { *base.as_ref::<bool>() });
    }

    #[test]
    fn mutate_through_field() {
        let mut s = Sample {
            flag: false,
            value: 0,
            tail: [0, 0],
        };
        let mut base = PtrMut::from_mut(&mut s);
        {
            let tail = unsafe { base.reborrow().field(offset_of!(Sample, tail)) };
            let tail = unsafe { tail.consume::<[u16; 2]>() };
            tail[1] = 12;
        }
        assert_eq!(unsafe { base.borrow().as_ref::<Sample>() }.tail[1], 12);
        unsafe { base.consume::<Sample>() }.value = 5;
        assert_eq!(s.value, 5);
        assert_eq!(s.tail, [0, 12]);
    }
}
