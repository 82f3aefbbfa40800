use crate::info::SerializationPolicy;

/// Options of the text serializer.
///
/// The binary codec ignores both: it writes every property and no metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeConfig {
    /// Which properties are written and read back.
    pub policy: SerializationPolicy,
    /// Emit `"<name>_metadata"` entries for properties carrying attributes.
    pub serialize_metadata: bool,
}

impl SerializeConfig {
    pub const DEFAULT: Self = Self {
        policy: SerializationPolicy::OptOut,
        serialize_metadata: true,
    };

    #[inline]
    pub const fn with_policy(mut self, policy: SerializationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub const fn with_metadata(mut self, serialize_metadata: bool) -> Self {
        self.serialize_metadata = serialize_metadata;
        self
    }
}

impl Default for SerializeConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
