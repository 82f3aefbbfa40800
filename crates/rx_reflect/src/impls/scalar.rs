use crate::Reflected;
use crate::info::MetaType;

macro_rules! impl_scalar {
    ($($ty:ty => $meta:ident),* $(,)?) => {$(
        impl Reflected for $ty {
            const META_TYPE: MetaType = MetaType::$meta;
        }
    )*};
}

impl_scalar! {
    bool => Bool,
    i8 => Char,
    u8 => UChar,
    i16 => Short,
    u16 => UShort,
    i32 => Int,
    u32 => Uint,
    i64 => Int64,
    u64 => Uint64,
    f32 => Float,
    f64 => Double,
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflected;
    use crate::info::MetaType;

    #[test]
    fn scalar_tags() {
        assert_eq!(bool::META_TYPE, MetaType::Bool);
        assert_eq!(i8::META_TYPE, MetaType::Char);
        assert_eq!(u16::META_TYPE, MetaType::UShort);
        assert_eq!(u64::META_TYPE, MetaType::Uint64);
        assert_eq!(f32::META_TYPE, MetaType::Float);
        assert!(f64::data_handler().is_none());
    }
}
