//! Closed tagged union describing every C type the conversion rules understand.

use std::fmt;

use bitflags::bitflags;
use strum::{EnumCount, EnumIter};

use crate::{config::PointerSize, Error, Result};

/// Width of an integer type.
///
/// Only the four widths C implementations use for `char`, `short`, `int`,
/// `long` and `long long` exist; anything else is rejected by
/// [`IntWidth::from_bits`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum IntWidth {
    /// 8 bits (`char`).
    W8,
    /// 16 bits (`short`).
    W16,
    /// 32 bits (`int`).
    W32,
    /// 64 bits (`long long`).
    W64,
}

impl IntWidth {
    /// Creates a width from a bit count.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWidth`] for anything other than 8, 16, 32 or 64.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(IntWidth::W8),
            16 => Ok(IntWidth::W16),
            32 => Ok(IntWidth::W32),
            64 => Ok(IntWidth::W64),
            other => Err(Error::InvalidWidth(other)),
        }
    }

    /// Number of bits.
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    /// Number of bytes.
    #[must_use]
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Bit mask selecting the low `bits()` bits.
    #[must_use]
    pub fn mask(self) -> u64 {
        match self {
            IntWidth::W64 => u64::MAX,
            other => (1u64 << other.bits()) - 1,
        }
    }
}

/// Width of a floating point type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum FloatWidth {
    /// IEEE-754 binary32 (`float`).
    F32,
    /// IEEE-754 binary64 (`double`).
    F64,
}

impl FloatWidth {
    /// Number of bytes.
    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            FloatWidth::F32 => 4,
            FloatWidth::F64 => 8,
        }
    }
}

/// Signedness of an integer type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Signedness {
    /// Two's complement signed.
    Signed,
    /// Unsigned, arithmetic modulo 2^width.
    Unsigned,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// Qualifiers applied to the pointee of a pointer type
    pub struct Qualifiers: u8 {
        /// `const`
        const CONST = 0x01;
        /// `volatile`
        const VOLATILE = 0x02;
        /// `restrict`
        const RESTRICT = 0x04;
    }
}

/// A C type as seen by the conversion rules.
///
/// The union is closed on purpose: every rule in [`crate::convert`] matches on
/// the (source, target) pair exhaustively, so adding a variant forces every
/// rule to decide what it means.
///
/// # Invariants
///
/// - Integer widths are always one of [`IntWidth`].
/// - A pointer's size depends only on the target's [`PointerSize`], never on
///   the pointee.
/// - `Void` only appears as a pointee or as the target of a discarded value;
///   no [`crate::TypedValue`] has type `Void`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// `void`.
    Void,

    /// `_Bool`, one byte holding 0 or 1.
    Bool,

    /// A signed or unsigned integer.
    Int {
        /// Width in bits.
        width: IntWidth,
        /// Signed or unsigned.
        signedness: Signedness,
    },

    /// `float` or `double`.
    Float(FloatWidth),

    /// Pointer to `pointee`; `void` pointee means an untyped memory handle.
    Pointer {
        /// The pointed-to type.
        pointee: Box<TypeDescriptor>,
        /// Qualifiers on the pointee (`const char*` has `CONST`).
        qualifiers: Qualifiers,
    },

    /// Fixed-size array `element[len]`.
    Array {
        /// Element type.
        element: Box<TypeDescriptor>,
        /// Number of elements.
        len: usize,
    },
}

impl TypeDescriptor {
    /// An integer type of the given width and signedness.
    #[must_use]
    pub fn integer(width: IntWidth, signedness: Signedness) -> Self {
        TypeDescriptor::Int { width, signedness }
    }

    /// A signed integer of the given width.
    #[must_use]
    pub fn signed(width: IntWidth) -> Self {
        Self::integer(width, Signedness::Signed)
    }

    /// An unsigned integer of the given width.
    #[must_use]
    pub fn unsigned(width: IntWidth) -> Self {
        Self::integer(width, Signedness::Unsigned)
    }

    /// `int`.
    #[must_use]
    pub fn int() -> Self {
        Self::signed(IntWidth::W32)
    }

    /// `unsigned int`.
    #[must_use]
    pub fn uint() -> Self {
        Self::unsigned(IntWidth::W32)
    }

    /// `float`.
    #[must_use]
    pub fn float() -> Self {
        TypeDescriptor::Float(FloatWidth::F32)
    }

    /// `double`.
    #[must_use]
    pub fn double() -> Self {
        TypeDescriptor::Float(FloatWidth::F64)
    }

    /// Unqualified pointer to `pointee`.
    #[must_use]
    pub fn pointer_to(pointee: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer {
            pointee: Box::new(pointee),
            qualifiers: Qualifiers::empty(),
        }
    }

    /// Pointer to a qualified `pointee` (`const T*` and friends).
    #[must_use]
    pub fn qualified_pointer_to(pointee: TypeDescriptor, qualifiers: Qualifiers) -> Self {
        TypeDescriptor::Pointer {
            pointee: Box::new(pointee),
            qualifiers,
        }
    }

    /// `void*`, the untyped memory handle.
    #[must_use]
    pub fn void_pointer() -> Self {
        Self::pointer_to(TypeDescriptor::Void)
    }

    /// `element[len]`.
    #[must_use]
    pub fn array_of(element: TypeDescriptor, len: usize) -> Self {
        TypeDescriptor::Array {
            element: Box::new(element),
            len,
        }
    }

    /// Returns `true` for integers and `_Bool`.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, TypeDescriptor::Int { .. } | TypeDescriptor::Bool)
    }

    /// Returns `true` for `float` and `double`.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, TypeDescriptor::Float(_))
    }

    /// Returns `true` for integers, `_Bool` and floating types.
    #[must_use]
    pub fn is_arithmetic(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    /// Returns `true` for any pointer type.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeDescriptor::Pointer { .. })
    }

    /// Returns `true` for `void*` (with any qualifiers).
    #[must_use]
    pub fn is_void_pointer(&self) -> bool {
        matches!(self, TypeDescriptor::Pointer { pointee, .. } if **pointee == TypeDescriptor::Void)
    }

    /// Returns `true` for arithmetic and pointer types.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.is_arithmetic() || self.is_pointer()
    }

    /// Returns the integer signedness, treating `_Bool` as unsigned.
    #[must_use]
    pub fn signedness(&self) -> Option<Signedness> {
        match self {
            TypeDescriptor::Int { signedness, .. } => Some(*signedness),
            TypeDescriptor::Bool => Some(Signedness::Unsigned),
            _ => None,
        }
    }

    /// Returns the pointee of a pointer type.
    #[must_use]
    pub fn pointee(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Pointer { pointee, .. } => Some(pointee),
            _ => None,
        }
    }

    /// `sizeof` this type in bytes.
    ///
    /// `None` for `void`, which has no size.
    #[must_use]
    pub fn size_of(&self, ptr_size: PointerSize) -> Option<usize> {
        match self {
            TypeDescriptor::Void => None,
            TypeDescriptor::Bool => Some(1),
            TypeDescriptor::Int { width, .. } => Some(width.bytes()),
            TypeDescriptor::Float(width) => Some(width.bytes()),
            TypeDescriptor::Pointer { .. } => Some(ptr_size.bytes()),
            TypeDescriptor::Array { element, len } => element
                .size_of(ptr_size)
                .and_then(|size| size.checked_mul(*len)),
        }
    }

    /// Integer conversion rank (C11 6.3.1.1), `None` for non-integers.
    ///
    /// `_Bool` ranks below every other integer type; widths rank in order.
    #[must_use]
    pub fn integer_rank(&self) -> Option<u8> {
        match self {
            TypeDescriptor::Bool => Some(0),
            TypeDescriptor::Int { width, .. } => Some(match width {
                IntWidth::W8 => 1,
                IntWidth::W16 => 2,
                IntWidth::W32 => 3,
                IntWidth::W64 => 4,
            }),
            _ => None,
        }
    }

    /// Returns the type with pointee qualifiers removed.
    #[must_use]
    pub fn unqualified(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::Pointer { pointee, .. } => TypeDescriptor::Pointer {
                pointee: pointee.clone(),
                qualifiers: Qualifiers::empty(),
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Void => write!(f, "void"),
            TypeDescriptor::Bool => write!(f, "_Bool"),
            TypeDescriptor::Int { width, signedness } => match signedness {
                Signedness::Signed => write!(f, "int{}_t", width.bits()),
                Signedness::Unsigned => write!(f, "uint{}_t", width.bits()),
            },
            TypeDescriptor::Float(FloatWidth::F32) => write!(f, "float"),
            TypeDescriptor::Float(FloatWidth::F64) => write!(f, "double"),
            TypeDescriptor::Pointer {
                pointee,
                qualifiers,
            } => {
                if qualifiers.contains(Qualifiers::CONST) {
                    write!(f, "const ")?;
                }
                if qualifiers.contains(Qualifiers::VOLATILE) {
                    write!(f, "volatile ")?;
                }
                write!(f, "{pointee}*")?;
                if qualifiers.contains(Qualifiers::RESTRICT) {
                    write!(f, " restrict")?;
                }
                Ok(())
            }
            TypeDescriptor::Array { element, len } => write!(f, "{element}[{len}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_width_from_bits() {
        for width in IntWidth::iter() {
            assert_eq!(IntWidth::from_bits(width.bits()).unwrap(), width);
        }
        assert_eq!(IntWidth::from_bits(24), Err(Error::InvalidWidth(24)));
        assert_eq!(IntWidth::from_bits(128), Err(Error::InvalidWidth(128)));
    }

    #[test]
    fn test_width_mask() {
        assert_eq!(IntWidth::W8.mask(), 0xFF);
        assert_eq!(IntWidth::W16.mask(), 0xFFFF);
        assert_eq!(IntWidth::W32.mask(), 0xFFFF_FFFF);
        assert_eq!(IntWidth::W64.mask(), u64::MAX);
    }

    #[test]
    fn test_pointer_size_is_pointee_independent() {
        let pointees = [
            TypeDescriptor::Void,
            TypeDescriptor::signed(IntWidth::W8),
            TypeDescriptor::double(),
            TypeDescriptor::array_of(TypeDescriptor::double(), 16),
        ];
        for pointee in pointees {
            let ptr = TypeDescriptor::pointer_to(pointee);
            assert_eq!(ptr.size_of(PointerSize::Bit64), Some(8));
            assert_eq!(ptr.size_of(PointerSize::Bit32), Some(4));
        }
    }

    #[test]
    fn test_size_of() {
        assert_eq!(TypeDescriptor::Void.size_of(PointerSize::Bit64), None);
        assert_eq!(TypeDescriptor::Bool.size_of(PointerSize::Bit64), Some(1));
        assert_eq!(TypeDescriptor::double().size_of(PointerSize::Bit64), Some(8));
        assert_eq!(
            TypeDescriptor::array_of(TypeDescriptor::int(), 10).size_of(PointerSize::Bit64),
            Some(40)
        );
    }

    #[test]
    fn test_classification() {
        assert!(TypeDescriptor::Bool.is_integer());
        assert!(TypeDescriptor::float().is_arithmetic());
        assert!(!TypeDescriptor::float().is_integer());
        assert!(TypeDescriptor::void_pointer().is_void_pointer());
        assert!(!TypeDescriptor::pointer_to(TypeDescriptor::int()).is_void_pointer());
        assert!(TypeDescriptor::pointer_to(TypeDescriptor::int()).is_scalar());
        assert!(!TypeDescriptor::array_of(TypeDescriptor::int(), 1).is_scalar());
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeDescriptor::signed(IntWidth::W8).to_string(), "int8_t");
        assert_eq!(TypeDescriptor::unsigned(IntWidth::W64).to_string(), "uint64_t");
        assert_eq!(
            TypeDescriptor::qualified_pointer_to(
                TypeDescriptor::signed(IntWidth::W8),
                Qualifiers::CONST
            )
            .to_string(),
            "const int8_t*"
        );
        assert_eq!(
            TypeDescriptor::array_of(TypeDescriptor::double(), 2).to_string(),
            "double[2]"
        );
    }

    #[test]
    fn test_unqualified() {
        let const_ptr =
            TypeDescriptor::qualified_pointer_to(TypeDescriptor::int(), Qualifiers::CONST);
        assert_eq!(
            const_ptr.unqualified(),
            TypeDescriptor::pointer_to(TypeDescriptor::int())
        );
    }
}
