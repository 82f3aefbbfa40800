use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

/// The names of the reflectable types being traversed, outermost first.
///
/// Only kept in debug builds, where serde errors print it.
#[derive(Default, Clone)]
pub(super) struct TypeNameStack {
    stack: Vec<&'static str>,
}

impl TypeNameStack {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, name: &'static str) {
        self.stack.push(name);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

impl Debug for TypeNameStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut iter = self.stack.iter();

        if let Some(first) = iter.next() {
            writeln!(f, "`{first}`")?;
        }

        for name in iter {
            writeln!(f, " -> `{name}`")?;
        }

        Ok(())
    }
}
