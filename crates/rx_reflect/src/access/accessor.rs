#![expect(unsafe_code, reason = "reads typed fields through erased pointers")]

use core::any::Any;
use core::fmt;

use rx_ptr::{Ptr, PtrMut};

// -----------------------------------------------------------------------------
// FieldAccessor

type GetFn = for<'a> unsafe fn(Ptr<'a>) -> &'a dyn Any;
type GetMutFn = for<'a> unsafe fn(PtrMut<'a>) -> &'a mut dyn Any;
type CopyFn = for<'a, 'b> unsafe fn(PtrMut<'a>, Ptr<'b>);

/// Monomorphized functions that turn an erased pointer back into a typed value.
///
/// One is built per property (for the field type) and per type info (for the
/// type itself, used to upcast into parents).
#[derive(Clone, Copy)]
pub(crate) struct FieldAccessor {
    get: GetFn,
    get_mut: GetMutFn,
    copy: Option<CopyFn>,
}

impl FieldAccessor {
    pub(crate) const fn of<F: Any>() -> Self {
        Self {
            get: read_field::<F>,
            get_mut: write_field::<F>,
            copy: None,
        }
    }

    pub(crate) const fn copyable<F: Any + Clone>() -> Self {
        Self {
            get: read_field::<F>,
            get_mut: write_field::<F>,
            copy: Some(copy_field::<F>),
        }
    }

    #[inline]
    pub(crate) fn is_copyable(&self) -> bool {
        self.copy.is_some()
    }

    /// # Safety
    ///
    /// `ptr` points to a valid, aligned value of the accessor's type.
    #[inline]
    pub(crate) unsafe fn get<'a>(&self, ptr: Ptr<'a>) -> &'a dyn Any {
        // SAFETY: forwarded to the caller.
        unsafe { (self.get)(ptr) }
    }

    /// # Safety
    ///
    /// `ptr` points to a valid, aligned value of the accessor's type.
    #[inline]
    pub(crate) unsafe fn get_mut<'a>(&self, ptr: PtrMut<'a>) -> &'a mut dyn Any {
        // SAFETY: forwarded to the caller.
        unsafe { (self.get_mut)(ptr) }
    }

    /// Clone-assigns `src` into `dest`. Returns `false` for a non-copyable field.
    ///
    /// # Safety
    ///
    /// Both pointers point to valid, aligned values of the accessor's type.
    #[inline]
    pub(crate) unsafe fn copy(&self, dest: PtrMut<'_>, src: Ptr<'_>) -> bool {
        match self.copy {
            Some(copy) => {
                // SAFETY: forwarded to the caller.
                unsafe { copy(dest, src) };
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("copyable", &self.is_copyable())
            .finish_non_exhaustive()
    }
}

unsafe fn read_field<F: Any>(ptr: Ptr<'_>) -> &dyn Any {
    ptr.debug_assert_aligned::<F>();
    // SAFETY: the pointee is a valid `F`.
    unsafe { ptr.as_ref::<F>() }
}

unsafe fn write_field<F: Any>(ptr: PtrMut<'_>) -> &mut dyn Any {
    ptr.debug_assert_aligned::<F>();
    // SAFETY: the pointee is a valid `F`, exclusively borrowed.
    unsafe { ptr.consume::<F>() }
}

unsafe fn copy_field<F: Any + Clone>(dest: PtrMut<'_>, src: Ptr<'_>) {
    // SAFETY: both pointees are valid `F`s and `dest` is exclusive,
    // so the two do not overlap.
    unsafe { dest.consume::<F>().clone_from(src.as_ref::<F>()) }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::FieldAccessor;
    use core::mem::offset_of;
    use rx_ptr::{Ptr, PtrMut};

    #[repr(C)]
    struct Pair {
        flag: bool,
        values: alloc::vec::Vec<u16>,
    }

    #[test]
    fn typed_round_trip() {
        let acc = FieldAccessor::copyable::<alloc::vec::Vec<u16>>();
        let src = Pair { flag: true, values: alloc::vec![1, 2] };
        let mut dest = Pair { flag: false, values: alloc::vec![] };
        let off = offset_of!(Pair, values);

        // SAFETY: `off` is the offset of a `Vec<u16>` inside `Pair`.
        unsafe {
            let value = acc.get(Ptr::from_ref(&src).field(off));
            assert_eq!(value.downcast_ref::<alloc::vec::Vec<u16>>().unwrap(), &[1, 2]);
            assert!(acc.copy(PtrMut::from_mut(&mut dest).field(off), Ptr::from_ref(&src).field(off)));
        }
        assert_eq!(dest.values, [1, 2]);
        assert!(!dest.flag && src.flag);
        assert!(!FieldAccessor::of::<bool>().is_copyable());
    }
}
