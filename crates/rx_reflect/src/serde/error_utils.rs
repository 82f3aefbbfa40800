use core::fmt::Display;

crate::cfg::debug! {
    std::thread_local! {
        static TYPE_NAME_STACK: core::cell::RefCell<super::info_stack::TypeNameStack> =
            const { core::cell::RefCell::new(super::info_stack::TypeNameStack::new()) };
    }
}

/// A custom serialization error.
///
/// Prefer it over [`serde_core::ser::Error::custom`]: debug builds append
/// the stack of types being processed.
#[inline]
pub(super) fn ser_error<E: serde_core::ser::Error>(msg: impl Display) -> E {
    crate::cfg::debug! {
        if {
            TYPE_NAME_STACK.with_borrow(|stack|
                E::custom(format_args!("{msg} (stack:\n{stack:?})"))
            )
        } else {
            E::custom(msg)
        }
    }
}

/// The deserialization counterpart of [`ser_error`].
#[inline]
pub(super) fn de_error<E: serde_core::de::Error>(msg: impl Display) -> E {
    crate::cfg::debug! {
        if {
            TYPE_NAME_STACK.with_borrow(|stack|
                E::custom(format_args!("{msg} (stack:\n{stack:?})"))
            )
        } else {
            E::custom(msg)
        }
    }
}

#[inline]
pub(super) fn push_type(name: &'static str) {
    crate::cfg::debug! {
        TYPE_NAME_STACK.with_borrow_mut(|stack| stack.push(name));
    }
    let _ = name;
}

#[inline]
pub(super) fn pop_type() {
    crate::cfg::debug! {
        TYPE_NAME_STACK.with_borrow_mut(|stack| stack.pop());
    }
}

/// Clears what an earlier traversal left behind after returning early.
#[inline]
pub(super) fn reset_types() {
    crate::cfg::debug! {
        TYPE_NAME_STACK.with_borrow_mut(|stack| stack.clear());
    }
}
