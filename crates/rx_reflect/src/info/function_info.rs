use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::{error, fmt};

// -----------------------------------------------------------------------------
// InvokeError

/// Errors returned when invoking a reflected function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    ArgumentCount { expected: usize, found: usize },
    /// The argument at `index` is not of the declared type.
    ArgumentType { index: usize },
    /// The receiver is not of the type that declared the function.
    ReceiverType,
    UnknownFunction { name: String },
    /// The instance's type is not registered in the database.
    NotReflectable,
    /// The return value is not of the requested type.
    ReturnType,
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgumentCount { expected, found } => {
                write!(f, "expected {expected} arguments, found {found}")
            }
            Self::ArgumentType { index } => write!(f, "argument {index} has the wrong type"),
            Self::ReceiverType => f.write_str("the receiver has the wrong type"),
            Self::UnknownFunction { name } => write!(f, "no function named `{name}`"),
            Self::NotReflectable => f.write_str("the instance is not a registered reflectable"),
            Self::ReturnType => f.write_str("the return value has a different type"),
        }
    }
}

impl error::Error for InvokeError {}

// -----------------------------------------------------------------------------
// IntoInvoker

/// Erased call signature of a reflected function.
pub type Invoker =
    dyn Fn(&mut dyn Any, &[&dyn Any]) -> Result<Box<dyn Any>, InvokeError> + Send + Sync;

/// Functions of the form `Fn(&mut T, A0, .., An) -> R` with up to three
/// arguments.
///
/// `Marker` only keeps the arity impls apart.
pub trait IntoInvoker<T, Marker>: Send + Sync + 'static {
    const ARITY: usize;

    fn into_invoker(self) -> Box<Invoker>;
}

macro_rules! impl_into_invoker {
    ($arity:literal $(, $arg:ident $index:tt)*) => {
        impl<T, R, Func $(, $arg)*> IntoInvoker<T, fn($($arg),*) -> R> for Func
        where
            T: Any,
            R: Any,
            Func: Fn(&mut T $(, $arg)*) -> R + Send + Sync + 'static,
            $($arg: Any + Clone,)*
        {
            const ARITY: usize = $arity;

            fn into_invoker(self) -> Box<Invoker> {
                Box::new(move |receiver: &mut dyn Any, args: &[&dyn Any]| -> Result<Box<dyn Any>, InvokeError> {
                    if args.len() != $arity {
                        return Err(InvokeError::ArgumentCount {
                            expected: $arity,
                            found: args.len(),
                        });
                    }
                    let receiver = receiver
                        .downcast_mut::<T>()
                        .ok_or(InvokeError::ReceiverType)?;
                    let result = (self)(
                        receiver
                        $(, args[$index]
                            .downcast_ref::<$arg>()
                            .ok_or(InvokeError::ArgumentType { index: $index })?
                            .clone())*
                    );
                    Ok(Box::new(result) as Box<dyn Any>)
                })
            }
        }
    };
}

impl_into_invoker!(0);
impl_into_invoker!(1, A0 0);
impl_into_invoker!(2, A0 0, A1 1);
impl_into_invoker!(3, A0 0, A1 1, A2 2);

// -----------------------------------------------------------------------------
// FunctionInfo

/// A named function declared on a reflectable type.
pub struct FunctionInfo {
    name: &'static str,
    arity: usize,
    invoker: Box<Invoker>,
}

impl FunctionInfo {
    pub fn new<T, M, F: IntoInvoker<T, M>>(name: &'static str, func: F) -> Self {
        Self {
            name,
            arity: F::ARITY,
            invoker: func.into_invoker(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Calls the function on `receiver`, which must be the declaring type.
    ///
    /// Arguments are downcast and cloned.
    #[inline]
    pub fn invoke(
        &self,
        receiver: &mut dyn Any,
        args: &[&dyn Any],
    ) -> Result<Box<dyn Any>, InvokeError> {
        (self.invoker)(receiver, args)
    }
}

impl fmt::Debug for FunctionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionInfo")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
