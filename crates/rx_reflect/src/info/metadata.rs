use core::fmt;

// -----------------------------------------------------------------------------
// Attribute

/// A static annotation attached to a property.
///
/// Attributes drive the serialization policy and are echoed by the JSON
/// serializer as a `"<name>_metadata"` object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attribute {
    /// Opts the property in when the policy is [`SerializationPolicy::OptIn`].
    Serializable,
    /// Opts the property out when the policy is [`SerializationPolicy::OptOut`].
    NotSerializable,
    /// A hint that the value is not meant to persist.
    Transient,
    IValueRange { min: i64, max: i64 },
    FValueRange { min: f64, max: f64 },
    DisplayName(&'static str),
}

impl Attribute {
    /// The key used when the attribute is written out.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Serializable => "Serializable",
            Self::NotSerializable => "NotSerializable",
            Self::Transient => "Transient",
            Self::IValueRange { .. } => "IValueRange",
            Self::FValueRange { .. } => "FValueRange",
            Self::DisplayName(_) => "DisplayName",
        }
    }

    /// Policy markers carry no payload and are never written out.
    pub const fn is_policy_marker(&self) -> bool {
        matches!(self, Self::Serializable | Self::NotSerializable)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IValueRange { min, max } => write!(f, "IValueRange({min}..={max})"),
            Self::FValueRange { min, max } => write!(f, "FValueRange({min}..={max})"),
            Self::DisplayName(name) => write!(f, "DisplayName({name:?})"),
            other => f.pad(other.name()),
        }
    }
}

// -----------------------------------------------------------------------------
// Metadata

/// The attribute list of one property.
///
/// # Examples
///
/// ```
/// # use rx_reflect::info::{Attribute, Metadata};
/// const RANGE: Metadata = Metadata::new(&[Attribute::IValueRange { min: 1, max: 10 }]);
/// assert!(RANGE.contains(|a| matches!(a, Attribute::IValueRange { .. })));
/// assert!(Metadata::EMPTY.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metadata(&'static [Attribute]);

impl Metadata {
    pub const EMPTY: Metadata = Metadata(&[]);

    #[inline]
    pub const fn new(attributes: &'static [Attribute]) -> Self {
        Self(attributes)
    }

    #[inline]
    pub const fn attributes(&self) -> &'static [Attribute] {
        self.0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, f: impl Fn(&Attribute) -> bool) -> bool {
        self.0.iter().any(f)
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'static, Attribute> {
        self.0.iter()
    }

    /// Computes whether the property is written under `policy`.
    pub fn serialization_state(&self, policy: SerializationPolicy) -> SerializationState {
        let is_serializable = match policy {
            SerializationPolicy::OptOut => {
                !self.contains(|a| matches!(a, Attribute::NotSerializable))
            }
            SerializationPolicy::OptIn => self.contains(|a| matches!(a, Attribute::Serializable)),
        };
        SerializationState {
            is_serializable,
            has_attributes_to_serialize: !self.is_empty(),
        }
    }
}

// -----------------------------------------------------------------------------
// Policy

/// Which properties a text serializer writes by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializationPolicy {
    /// Everything is written unless marked [`Attribute::NotSerializable`].
    #[default]
    OptOut,
    /// Only properties marked [`Attribute::Serializable`] are written.
    OptIn,
}

/// The outcome of [`Metadata::serialization_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializationState {
    pub is_serializable: bool,
    pub has_attributes_to_serialize: bool,
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Attribute, Metadata, SerializationPolicy};

    const OPTED_OUT: Metadata = Metadata::new(&[Attribute::NotSerializable]);
    const OPTED_IN: Metadata = Metadata::new(&[Attribute::Serializable]);
    const RANGED: Metadata = Metadata::new(&[
        Attribute::IValueRange { min: 1, max: 10 },
        Attribute::Transient,
    ]);

    #[test]
    fn opt_out_policy() {
        let p = SerializationPolicy::OptOut;
        assert!(Metadata::EMPTY.serialization_state(p).is_serializable);
        assert!(!OPTED_OUT.serialization_state(p).is_serializable);
        assert!(OPTED_IN.serialization_state(p).is_serializable);
        assert!(RANGED.serialization_state(p).has_attributes_to_serialize);
        assert!(!Metadata::EMPTY.serialization_state(p).has_attributes_to_serialize);
    }

    #[test]
    fn opt_in_policy() {
        let p = SerializationPolicy::OptIn;
        assert!(!Metadata::EMPTY.serialization_state(p).is_serializable);
        assert!(!RANGED.serialization_state(p).is_serializable);
        assert!(OPTED_IN.serialization_state(p).is_serializable);
    }

    #[test]
    fn attribute_names() {
        assert_eq!(RANGED.attributes()[0].name(), "IValueRange");
        assert!(OPTED_OUT.attributes()[0].is_policy_marker());
        assert!(!Attribute::Transient.is_policy_marker());
    }
}
