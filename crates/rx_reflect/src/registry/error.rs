use core::{error, fmt};

// -----------------------------------------------------------------------------
// RegistrationError

/// Errors returned by [`TypeInfoDatabase::register`] and
/// [`TypeInfoDatabase::seal`].
///
/// [`TypeInfoDatabase::register`]: super::TypeInfoDatabase::register
/// [`TypeInfoDatabase::seal`]: super::TypeInfoDatabase::seal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    AlreadyRegistered { name: &'static str },
    /// The database was sealed before this registration.
    Sealed { name: &'static str },
    /// A parent must be registered before its children.
    UnregisteredParent {
        name: &'static str,
        parent: &'static str,
    },
    /// Every valid id below [`INVALID_REFLECTABLE_ID`] is taken.
    ///
    /// [`INVALID_REFLECTABLE_ID`]: crate::info::INVALID_REFLECTABLE_ID
    IdsExhausted { name: &'static str },
    /// An object property refers to a type that was never registered.
    UnregisteredNested {
        owner: &'static str,
        property: &'static str,
        type_name: &'static str,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered { name } => write!(f, "`{name}` is already registered"),
            Self::Sealed { name } => {
                write!(f, "cannot register `{name}`: the database is sealed")
            }
            Self::UnregisteredParent { name, parent } => {
                write!(f, "cannot register `{name}`: parent `{parent}` is not registered")
            }
            Self::IdsExhausted { name } => {
                write!(f, "cannot register `{name}`: no reflectable id is left")
            }
            Self::UnregisteredNested {
                owner,
                property,
                type_name,
            } => write!(
                f,
                "property `{owner}::{property}` has type `{type_name}`, which is not registered"
            ),
        }
    }
}

impl error::Error for RegistrationError {}

// -----------------------------------------------------------------------------
// DatabaseFileError

/// Errors returned while importing an id file.
#[derive(Debug)]
pub enum DatabaseFileError {
    VersionMismatch { expected: i32, found: i32 },
    /// The data ends inside a header or a name.
    Truncated { offset: usize },
    /// A name is not valid UTF-8.
    InvalidName { offset: usize },
    /// An entry uses the reserved invalid id.
    InvalidId { offset: usize },
    /// A local type missing from the file has no free id left.
    IdsExhausted { name: &'static str },
    #[cfg(feature = "std")]
    Io(std::io::Error),
}

impl fmt::Display for DatabaseFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionMismatch { expected, found } => write!(
                f,
                "database file version {found} does not match the current version {expected}"
            ),
            Self::Truncated { offset } => {
                write!(f, "database file is truncated at offset {offset}")
            }
            Self::InvalidName { offset } => {
                write!(f, "database file has an invalid type name at offset {offset}")
            }
            Self::InvalidId { offset } => {
                write!(f, "database file has the reserved invalid id at offset {offset}")
            }
            Self::IdsExhausted { name } => {
                write!(f, "no reflectable id is left for `{name}` after the imported ids")
            }
            #[cfg(feature = "std")]
            Self::Io(err) => write!(f, "database file could not be read: {err}"),
        }
    }
}

impl error::Error for DatabaseFileError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            #[cfg(feature = "std")]
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

crate::cfg::std! {
    impl From<std::io::Error> for DatabaseFileError {
        #[inline]
        fn from(value: std::io::Error) -> Self {
            Self::Io(value)
        }
    }
}
