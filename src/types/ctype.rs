//! Named C arithmetic types and their mapping onto [`TypeDescriptor`].

use strum::{Display, EnumIter, EnumString};

use crate::{
    config::TargetConfig,
    types::{IntWidth, Signedness, TypeDescriptor},
};

/// A C basic type as spelled in source.
///
/// Front ends hand type names to the engine as strings; `CType` parses the
/// common spellings and resolves them against a [`TargetConfig`], which decides
/// the width of `long` and the signedness of plain `char`.
///
/// # Examples
///
/// ```rust
/// use std::str::FromStr;
/// use ccast::{CType, IntWidth, TargetConfig, TypeDescriptor};
///
/// let ty = CType::from_str("unsigned char").unwrap();
/// assert_eq!(
///     ty.descriptor(&TargetConfig::default()),
///     TypeDescriptor::unsigned(IntWidth::W8)
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum CType {
    /// `void`
    #[strum(to_string = "void")]
    Void,
    /// `_Bool`
    #[strum(to_string = "_Bool", serialize = "bool")]
    Bool,
    /// Plain `char`; signedness comes from the target.
    #[strum(to_string = "char")]
    Char,
    /// `signed char`
    #[strum(to_string = "signed char")]
    SignedChar,
    /// `unsigned char`
    #[strum(to_string = "unsigned char")]
    UnsignedChar,
    /// `short`
    #[strum(
        to_string = "short",
        serialize = "short int",
        serialize = "signed short",
        serialize = "signed short int"
    )]
    Short,
    /// `unsigned short`
    #[strum(to_string = "unsigned short", serialize = "unsigned short int")]
    UnsignedShort,
    /// `int`
    #[strum(to_string = "int", serialize = "signed", serialize = "signed int")]
    Int,
    /// `unsigned int`
    #[strum(to_string = "unsigned int", serialize = "unsigned")]
    UnsignedInt,
    /// `long`
    #[strum(
        to_string = "long",
        serialize = "long int",
        serialize = "signed long",
        serialize = "signed long int"
    )]
    Long,
    /// `unsigned long`
    #[strum(to_string = "unsigned long", serialize = "unsigned long int")]
    UnsignedLong,
    /// `long long`
    #[strum(
        to_string = "long long",
        serialize = "long long int",
        serialize = "signed long long",
        serialize = "signed long long int"
    )]
    LongLong,
    /// `unsigned long long`
    #[strum(to_string = "unsigned long long", serialize = "unsigned long long int")]
    UnsignedLongLong,
    /// `float`
    #[strum(to_string = "float")]
    Float,
    /// `double`
    #[strum(to_string = "double")]
    Double,
}

impl CType {
    /// Resolves this type name on the given target.
    #[must_use]
    pub fn descriptor(self, config: &TargetConfig) -> TypeDescriptor {
        let long = config.data_model.long_width();
        match self {
            CType::Void => TypeDescriptor::Void,
            CType::Bool => TypeDescriptor::Bool,
            CType::Char => TypeDescriptor::integer(IntWidth::W8, config.char_signedness),
            CType::SignedChar => TypeDescriptor::signed(IntWidth::W8),
            CType::UnsignedChar => TypeDescriptor::unsigned(IntWidth::W8),
            CType::Short => TypeDescriptor::signed(IntWidth::W16),
            CType::UnsignedShort => TypeDescriptor::unsigned(IntWidth::W16),
            CType::Int => TypeDescriptor::signed(IntWidth::W32),
            CType::UnsignedInt => TypeDescriptor::unsigned(IntWidth::W32),
            CType::Long => TypeDescriptor::integer(long, Signedness::Signed),
            CType::UnsignedLong => TypeDescriptor::integer(long, Signedness::Unsigned),
            CType::LongLong => TypeDescriptor::signed(IntWidth::W64),
            CType::UnsignedLongLong => TypeDescriptor::unsigned(IntWidth::W64),
            CType::Float => TypeDescriptor::float(),
            CType::Double => TypeDescriptor::double(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_spellings() {
        assert_eq!(CType::from_str("short int").unwrap(), CType::Short);
        assert_eq!(CType::from_str("unsigned").unwrap(), CType::UnsignedInt);
        assert_eq!(CType::from_str("long long int").unwrap(), CType::LongLong);
        assert_eq!(CType::from_str("bool").unwrap(), CType::Bool);
        assert!(CType::from_str("quad").is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for ty in CType::iter() {
            assert_eq!(CType::from_str(&ty.to_string()).unwrap(), ty);
        }
    }

    #[test]
    fn test_long_follows_data_model() {
        assert_eq!(
            CType::Long.descriptor(&TargetConfig::lp64()),
            TypeDescriptor::signed(IntWidth::W64)
        );
        assert_eq!(
            CType::Long.descriptor(&TargetConfig::llp64()),
            TypeDescriptor::signed(IntWidth::W32)
        );
        assert_eq!(
            CType::UnsignedLong.descriptor(&TargetConfig::ilp32()),
            TypeDescriptor::unsigned(IntWidth::W32)
        );
    }

    #[test]
    fn test_plain_char_follows_target() {
        let arm = TargetConfig::lp64().with_char_signedness(Signedness::Unsigned);
        assert_eq!(
            CType::Char.descriptor(&TargetConfig::lp64()),
            TypeDescriptor::signed(IntWidth::W8)
        );
        assert_eq!(
            CType::Char.descriptor(&arm),
            TypeDescriptor::unsigned(IntWidth::W8)
        );
        assert_eq!(
            CType::SignedChar.descriptor(&arm),
            TypeDescriptor::signed(IntWidth::W8)
        );
    }
}
