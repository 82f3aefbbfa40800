//! Property paths.
//!
//! A path names a property of an object and walks into nested objects and
//! containers:
//!
//! ```text
//! ctoto
//! mega.toto[1].titi[4]
//! aMultiArray[2][7]
//! aMapInMap[3][true]
//! ```
//!
//! Members are separated by `.`. A subscript is an array index (unsigned
//! decimal) or a map key in the text form of the key type. Key text is not
//! quoted.

use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::{error, fmt};

use super::{ObjectMut, ObjectRef};
use crate::info::{MetaType, PropertyInfo};
use crate::ops::{DataStructureHandler, HandlerError};
use crate::registry::TypeInfoDatabase;

// -----------------------------------------------------------------------------
// PathError

/// Errors returned by property path resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// The path is not well formed.
    Syntax { path: String },
    /// No property with this name exists in the object's hierarchy.
    UnknownProperty(String),
    /// A `.` follows a value that is not an object.
    NotAnObject(String),
    /// A `[..]` follows a value that is neither an array nor a map.
    NotAContainer(String),
    /// A map has no entry for this key.
    MissingKey(String),
    /// The object type is not registered in the database.
    NotReflectable,
    /// An array subscript is not an unsigned integer.
    InvalidIndex(String),
    Handler(HandlerError),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { path } => write!(f, "malformed property path `{path}`"),
            Self::UnknownProperty(name) => write!(f, "no property named `{name}`"),
            Self::NotAnObject(name) => write!(f, "`{name}` is not an object"),
            Self::NotAContainer(name) => write!(f, "`{name}` is not an array or a map"),
            Self::MissingKey(key) => write!(f, "the map has no key `{key}`"),
            Self::NotReflectable => f.write_str("the object type is not registered"),
            Self::InvalidIndex(index) => write!(f, "`{index}` is not an array index"),
            Self::Handler(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for PathError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Handler(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HandlerError> for PathError {
    #[inline]
    fn from(value: HandlerError) -> Self {
        Self::Handler(value)
    }
}

// -----------------------------------------------------------------------------
// Tokenizer

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'p> {
    Member(&'p str),
    Subscript(&'p str),
}

pub(crate) fn parse(path: &str) -> Result<Vec<Segment<'_>>, PathError> {
    let syntax = || PathError::Syntax { path: path.into() };

    let mut segments = Vec::new();
    let mut rest = path;
    loop {
        let end = rest.find(['.', '[']).unwrap_or(rest.len());
        let name = &rest[..end];
        if name.is_empty() || name.contains(']') {
            return Err(syntax());
        }
        segments.push(Segment::Member(name));
        rest = &rest[end..];

        while let Some(inner) = rest.strip_prefix('[') {
            let close = inner.find(']').ok_or_else(syntax)?;
            let key = &inner[..close];
            if key.is_empty() || key.contains('[') {
                return Err(syntax());
            }
            segments.push(Segment::Subscript(key));
            rest = &inner[close + 1..];
        }

        match rest.strip_prefix('.') {
            Some(next) => rest = next,
            None if rest.is_empty() => return Ok(segments),
            None => return Err(syntax()),
        }
    }
}

/// Splits `prefix[key]` into `prefix` and `key`.
///
/// Returns `None` unless the path ends with a non-empty subscript.
pub(crate) fn split_last_subscript(path: &str) -> Option<(&str, &str)> {
    let inner = path.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let key = &inner[open + 1..];
    (!key.is_empty() && open > 0).then(|| (&inner[..open], key))
}

fn parse_index(key: &str) -> Result<usize, PathError> {
    key.parse()
        .map_err(|_| PathError::InvalidIndex(key.into()))
}

// -----------------------------------------------------------------------------
// Resolved values

/// A value found by [`resolve`].
#[derive(Clone, Copy)]
pub struct PropertyRef<'a> {
    value: &'a dyn Any,
    meta_type: MetaType,
    handler: DataStructureHandler,
    property: Option<&'a PropertyInfo>,
}

impl<'a> PropertyRef<'a> {
    #[inline]
    pub fn value(&self) -> &'a dyn Any {
        self.value
    }

    #[inline]
    pub fn meta_type(&self) -> MetaType {
        self.meta_type
    }

    #[inline]
    pub fn handler(&self) -> DataStructureHandler {
        self.handler
    }

    /// The declared property, `None` for a container element.
    #[inline]
    pub fn property(&self) -> Option<&'a PropertyInfo> {
        self.property
    }
}

/// A value found by [`resolve_mut`].
pub struct PropertyMut<'a> {
    value: &'a mut dyn Any,
    meta_type: MetaType,
    handler: DataStructureHandler,
    property: Option<&'a PropertyInfo>,
}

impl<'a> PropertyMut<'a> {
    #[inline]
    pub fn value(&self) -> &dyn Any {
        &*self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut dyn Any {
        &mut *self.value
    }

    #[inline]
    pub fn into_value(self) -> &'a mut dyn Any {
        self.value
    }

    #[inline]
    pub fn meta_type(&self) -> MetaType {
        self.meta_type
    }

    #[inline]
    pub fn handler(&self) -> DataStructureHandler {
        self.handler
    }

    #[inline]
    pub fn property(&self) -> Option<&'a PropertyInfo> {
        self.property
    }
}

impl fmt::Debug for PropertyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRef")
            .field("meta_type", &self.meta_type)
            .field("property", &self.property.map(PropertyInfo::name))
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for PropertyMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMut")
            .field("meta_type", &self.meta_type)
            .field("property", &self.property.map(PropertyInfo::name))
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Resolution

/// Resolves `path` inside `root`, which must be a registered object.
///
/// Never modifies anything: an array index past the end is an error.
///
/// # Examples
///
/// ```
/// use rx_reflect::access::resolve;
/// use rx_reflect::registry::TypeInfoDatabase;
/// use rx_reflect::{property, reflectable};
///
/// #[derive(Clone, Default)]
/// struct Deck {
///     cards: Vec<i32>,
/// }
///
/// reflectable!(Deck => "Deck" |info| {
///     property!(info, cards);
/// });
///
/// let mut db = TypeInfoDatabase::new();
/// db.register::<Deck>().unwrap();
/// db.seal().unwrap();
///
/// let deck = Deck { cards: vec![7, 8] };
/// let card = resolve(&db, &deck, "cards[1]").unwrap();
/// assert_eq!(card.value().downcast_ref::<i32>(), Some(&8));
/// assert!(resolve(&db, &deck, "cards[2]").is_err());
/// ```
pub fn resolve<'a>(
    db: &'a TypeInfoDatabase,
    root: &'a dyn Any,
    path: &str,
) -> Result<PropertyRef<'a>, PathError> {
    debug_assert!(db.is_sealed(), "resolving a path before the database is sealed");

    let mut current = PropertyRef {
        value: root,
        meta_type: MetaType::Object,
        handler: DataStructureHandler::None,
        property: None,
    };
    let mut last = "";

    for segment in parse(path)? {
        current = match segment {
            Segment::Member(name) => {
                if current.meta_type != MetaType::Object {
                    return Err(PathError::NotAnObject(last.into()));
                }
                let object = ObjectRef::new(db, current.value).ok_or(PathError::NotReflectable)?;
                let found = object
                    .info()
                    .find_property_in_hierarchy(db, name)
                    .ok_or_else(|| PathError::UnknownProperty(name.into()))?;
                let property = found.property();
                PropertyRef {
                    value: object.field(&found).ok_or(PathError::NotReflectable)?,
                    meta_type: property.meta_type(),
                    handler: property.handler(),
                    property: Some(property),
                }
            }
            Segment::Subscript(key) => match current.handler {
                DataStructureHandler::Array(array) => PropertyRef {
                    value: array.get(current.value, parse_index(key)?)?,
                    meta_type: array.element_type(),
                    handler: array.element_handler(),
                    property: None,
                },
                DataStructureHandler::Map(map) => PropertyRef {
                    value: map
                        .read(current.value, key)?
                        .ok_or_else(|| PathError::MissingKey(key.into()))?,
                    meta_type: map.value_meta_type(),
                    handler: map.value_handler(),
                    property: None,
                },
                _ => return Err(PathError::NotAContainer(last.into())),
            },
        };
        last = match segment {
            Segment::Member(name) | Segment::Subscript(name) => name,
        };
    }
    Ok(current)
}

/// Resolves `path` inside `root` for writing.
///
/// An index past the end of a dynamic array grows the array. Map keys are
/// never inserted.
pub fn resolve_mut<'a>(
    db: &'a TypeInfoDatabase,
    root: &'a mut dyn Any,
    path: &str,
) -> Result<PropertyMut<'a>, PathError> {
    debug_assert!(db.is_sealed(), "resolving a path before the database is sealed");

    let mut current = PropertyMut {
        value: root,
        meta_type: MetaType::Object,
        handler: DataStructureHandler::None,
        property: None,
    };
    let mut last = "";

    for segment in parse(path)? {
        current = match segment {
            Segment::Member(name) => {
                if current.meta_type != MetaType::Object {
                    return Err(PathError::NotAnObject(last.into()));
                }
                let object =
                    ObjectMut::new(db, current.value).ok_or(PathError::NotReflectable)?;
                let found = object
                    .info()
                    .find_property_in_hierarchy(db, name)
                    .ok_or_else(|| PathError::UnknownProperty(name.into()))?;
                let property = found.property();
                PropertyMut {
                    value: object.into_field_mut(&found).ok_or(PathError::NotReflectable)?,
                    meta_type: property.meta_type(),
                    handler: property.handler(),
                    property: Some(property),
                }
            }
            Segment::Subscript(key) => match current.handler {
                DataStructureHandler::Array(array) => PropertyMut {
                    value: array.read(current.value, parse_index(key)?)?,
                    meta_type: array.element_type(),
                    handler: array.element_handler(),
                    property: None,
                },
                DataStructureHandler::Map(map) => PropertyMut {
                    value: map
                        .read_mut(current.value, key)?
                        .ok_or_else(|| PathError::MissingKey(key.into()))?,
                    meta_type: map.value_meta_type(),
                    handler: map.value_handler(),
                    property: None,
                },
                _ => return Err(PathError::NotAContainer(last.into())),
            },
        };
        last = match segment {
            Segment::Member(name) | Segment::Subscript(name) => name,
        };
    }
    Ok(current)
}

// -----------------------------------------------------------------------------
// Tests
