//! Core value representation: a bit pattern tagged with its C type.

use std::{fmt, num::NonZeroU64};

use crate::{
    config::PointerSize,
    convert::{sign_extend, truncate},
    types::{FloatWidth, IntWidth, Signedness, TypeDescriptor},
    Error, Result,
};

/// A C value: a bit pattern plus the type that gives it meaning.
///
/// `TypedValue` is immutable; every conversion produces a new value. The bit
/// pattern is always canonical for its type, so two values of the same type
/// are equal exactly when their patterns are equal.
///
/// # Representation
///
/// | Type | `bits` |
/// |------|--------|
/// | `Int { width, .. }` | two's complement pattern, masked to `width` (upper bits zero) |
/// | `Bool` | `0` or `1` |
/// | `Float(F32)` | `f32::to_bits`, zero-extended |
/// | `Float(F64)` | `f64::to_bits` |
/// | `Pointer { .. }` | address, `0` is null |
/// | `Array { .. }` | address of the first element |
///
/// An `int8_t` holding `-1` is therefore stored as `0xFF`; reading it with
/// [`TypedValue::as_i64`] sign-extends, reading the same pattern as `uint8_t`
/// zero-extends to `255`.
///
/// # Equality
///
/// Pointers compare by address only. A null `double*` equals a null `char*`,
/// which is the identity C requires of the null pointer.
///
/// # Examples
///
/// ```rust
/// use ccast::{IntWidth, TypeDescriptor, TypedValue};
///
/// let c = TypedValue::i8(-1);
/// assert_eq!(c.bits(), 0xFF);
/// assert_eq!(c.as_i64(), Some(-1));
///
/// let null_double = TypedValue::null(TypeDescriptor::double());
/// let null_char = TypedValue::null(TypeDescriptor::signed(IntWidth::W8));
/// assert_eq!(null_double, null_char);
/// assert!(null_double.non_null().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct TypedValue {
    bits: u64,
    ty: TypeDescriptor,
}

impl TypedValue {
    /// Creates a value from a raw bit pattern, canonicalising it for `ty`.
    ///
    /// Integer patterns are masked to their width and `_Bool` becomes `0`/`1`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOperands`] for `void`, which has no values.
    pub fn from_bits(bits: u64, ty: TypeDescriptor) -> Result<Self> {
        let bits = match &ty {
            TypeDescriptor::Void => {
                return Err(Error::InvalidOperands {
                    operation: "value construction",
                    operands: "void".to_string(),
                })
            }
            TypeDescriptor::Bool => u64::from(bits & 0xFF != 0),
            TypeDescriptor::Int { width, .. } => bits & width.mask(),
            TypeDescriptor::Float(FloatWidth::F32) => bits & 0xFFFF_FFFF,
            TypeDescriptor::Float(FloatWidth::F64)
            | TypeDescriptor::Pointer { .. }
            | TypeDescriptor::Array { .. } => bits,
        };
        Ok(TypedValue { bits, ty })
    }

    /// An integer of the given width holding `value` modulo 2^width.
    #[must_use]
    pub fn int(value: i64, width: IntWidth, signedness: Signedness) -> Self {
        Self::wrapping_int(i128::from(value), width, signedness)
    }

    /// An integer of the given width holding `value` modulo 2^width.
    ///
    /// Accepts the full `i128` range so both `i64` and `u64` sources wrap
    /// without loss.
    #[must_use]
    pub fn wrapping_int(value: i128, width: IntWidth, signedness: Signedness) -> Self {
        TypedValue {
            bits: truncate(value, width),
            ty: TypeDescriptor::integer(width, signedness),
        }
    }

    /// `signed char` / `int8_t`.
    #[must_use]
    pub fn i8(value: i8) -> Self {
        Self::int(i64::from(value), IntWidth::W8, Signedness::Signed)
    }

    /// `unsigned char` / `uint8_t`.
    #[must_use]
    pub fn u8(value: u8) -> Self {
        Self::int(i64::from(value), IntWidth::W8, Signedness::Unsigned)
    }

    /// `short` / `int16_t`.
    #[must_use]
    pub fn i16(value: i16) -> Self {
        Self::int(i64::from(value), IntWidth::W16, Signedness::Signed)
    }

    /// `unsigned short` / `uint16_t`.
    #[must_use]
    pub fn u16(value: u16) -> Self {
        Self::int(i64::from(value), IntWidth::W16, Signedness::Unsigned)
    }

    /// `int` / `int32_t`.
    #[must_use]
    pub fn i32(value: i32) -> Self {
        Self::int(i64::from(value), IntWidth::W32, Signedness::Signed)
    }

    /// `unsigned int` / `uint32_t`.
    #[must_use]
    pub fn u32(value: u32) -> Self {
        Self::int(i64::from(value), IntWidth::W32, Signedness::Unsigned)
    }

    /// `long long` / `int64_t`.
    #[must_use]
    pub fn i64(value: i64) -> Self {
        Self::int(value, IntWidth::W64, Signedness::Signed)
    }

    /// `unsigned long long` / `uint64_t`.
    #[must_use]
    pub fn u64(value: u64) -> Self {
        TypedValue {
            bits: value,
            ty: TypeDescriptor::unsigned(IntWidth::W64),
        }
    }

    /// `float`.
    #[must_use]
    pub fn f32(value: f32) -> Self {
        TypedValue {
            bits: u64::from(value.to_bits()),
            ty: TypeDescriptor::float(),
        }
    }

    /// `double`.
    #[must_use]
    pub fn f64(value: f64) -> Self {
        TypedValue {
            bits: value.to_bits(),
            ty: TypeDescriptor::double(),
        }
    }

    /// `_Bool`.
    #[must_use]
    pub fn bool(value: bool) -> Self {
        TypedValue {
            bits: u64::from(value),
            ty: TypeDescriptor::Bool,
        }
    }

    /// A C character constant such as `'a'`.
    ///
    /// Character constants have type `int` in C; the value is the code point.
    #[must_use]
    pub fn char_literal(value: char) -> Self {
        Self::int(i64::from(u32::from(value)), IntWidth::W32, Signedness::Signed)
    }

    /// The null pointer to `pointee`.
    ///
    /// Null has one representation, independent of `pointee`.
    #[must_use]
    pub fn null(pointee: TypeDescriptor) -> Self {
        Self::pointer(0, pointee)
    }

    /// A pointer to `pointee` holding `address`.
    #[must_use]
    pub fn pointer(address: u64, pointee: TypeDescriptor) -> Self {
        TypedValue {
            bits: address,
            ty: TypeDescriptor::pointer_to(pointee),
        }
    }

    /// An array designator: `len` elements of `element` starting at `address`.
    #[must_use]
    pub fn array(address: u64, element: TypeDescriptor, len: usize) -> Self {
        TypedValue {
            bits: address,
            ty: TypeDescriptor::array_of(element, len),
        }
    }

    /// Returns the type of this value.
    #[must_use]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Returns the canonical bit pattern.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Returns the mathematical value of an integer or `_Bool`.
    ///
    /// The stored pattern is sign-extended for signed types and zero-extended
    /// for unsigned ones. `None` for every other type.
    #[must_use]
    pub fn integer_value(&self) -> Option<i128> {
        match &self.ty {
            TypeDescriptor::Bool => Some(i128::from(self.bits)),
            TypeDescriptor::Int { width, signedness } => Some(match signedness {
                Signedness::Unsigned => i128::from(self.bits),
                Signedness::Signed => i128::from(sign_extend(self.bits, *width)),
            }),
            _ => None,
        }
    }

    /// Returns an integer value as `i64` if it fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.integer_value().and_then(|v| i64::try_from(v).ok())
    }

    /// Returns an integer value as `u64` if it fits.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.integer_value().and_then(|v| u64::try_from(v).ok())
    }

    /// Returns a floating value widened to `f64`; `None` for non-floating types.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_f64(&self) -> Option<f64> {
        match self.ty {
            TypeDescriptor::Float(FloatWidth::F32) => {
                Some(f64::from(f32::from_bits(self.bits as u32)))
            }
            TypeDescriptor::Float(FloatWidth::F64) => Some(f64::from_bits(self.bits)),
            _ => None,
        }
    }

    /// Returns a `float` value; `None` for every other type.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_f32(&self) -> Option<f32> {
        match self.ty {
            TypeDescriptor::Float(FloatWidth::F32) => Some(f32::from_bits(self.bits as u32)),
            _ => None,
        }
    }

    /// Returns the address held by a pointer or array designator.
    #[must_use]
    pub fn address(&self) -> Option<u64> {
        match self.ty {
            TypeDescriptor::Pointer { .. } | TypeDescriptor::Array { .. } => Some(self.bits),
            _ => None,
        }
    }

    /// Maps a pointer onto the target language's optional reference.
    ///
    /// Null becomes `None`, whatever the pointee type; non-pointers are `None` too.
    #[must_use]
    pub fn non_null(&self) -> Option<NonZeroU64> {
        match self.ty {
            TypeDescriptor::Pointer { .. } | TypeDescriptor::Array { .. } => {
                NonZeroU64::new(self.bits)
            }
            _ => None,
        }
    }

    /// Returns `true` for a null pointer of any pointee type.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.ty.is_pointer() && self.bits == 0
    }

    /// Returns `true` if this scalar compares equal to zero.
    ///
    /// `-0.0` is zero, NaN is not, a null pointer is.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self.ty {
            TypeDescriptor::Float(_) => self.as_f64().is_some_and(|f| f == 0.0),
            _ => self.bits == 0,
        }
    }

    /// Converts this value to its little-endian storage bytes.
    ///
    /// The output size is `sizeof` the value's type; arrays have no scalar
    /// storage and produce the address at pointer width.
    #[must_use]
    pub fn to_le_bytes(&self, ptr_size: PointerSize) -> Vec<u8> {
        let size = match &self.ty {
            TypeDescriptor::Array { .. } => ptr_size.bytes(),
            other => other.size_of(ptr_size).unwrap_or(0),
        };
        self.bits.to_le_bytes()[..size.min(8)].to_vec()
    }

    /// Creates a value of type `ty` from little-endian storage bytes.
    ///
    /// This is the inverse of [`to_le_bytes`](Self::to_le_bytes); exactly
    /// `sizeof(ty)` bytes are consumed.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `bytes` is shorter than `sizeof(ty)`,
    /// and [`Error::InvalidOperands`] for `void` and array types.
    pub fn from_le_bytes(bytes: &[u8], ty: &TypeDescriptor, ptr_size: PointerSize) -> Result<Self> {
        let size = match ty {
            TypeDescriptor::Void | TypeDescriptor::Array { .. } => {
                return Err(Error::InvalidOperands {
                    operation: "load",
                    operands: ty.to_string(),
                })
            }
            other => other.size_of(ptr_size).unwrap_or(0),
        };
        if bytes.len() < size {
            return Err(Error::OutOfBounds);
        }

        let mut raw = [0u8; 8];
        raw[..size].copy_from_slice(&bytes[..size]);
        Self::from_bits(u64::from_le_bytes(raw), ty.clone())
    }
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        match (&self.ty, &other.ty) {
            (TypeDescriptor::Pointer { .. }, TypeDescriptor::Pointer { .. }) => {
                self.bits == other.bits
            }
            (a, b) => a == b && self.bits == other.bits,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            TypeDescriptor::Bool | TypeDescriptor::Int { .. } => {
                write!(f, "{}", self.integer_value().unwrap_or_default())
            }
            TypeDescriptor::Float(_) => write!(f, "{}", self.as_f64().unwrap_or_default()),
            TypeDescriptor::Pointer { .. } if self.bits == 0 => write!(f, "NULL"),
            TypeDescriptor::Pointer { .. } | TypeDescriptor::Array { .. } => {
                write!(f, "0x{:X}", self.bits)
            }
            TypeDescriptor::Void => write!(f, "void"),
        }
    }
}

impl From<i8> for TypedValue {
    fn from(value: i8) -> Self {
        TypedValue::i8(value)
    }
}

impl From<u8> for TypedValue {
    fn from(value: u8) -> Self {
        TypedValue::u8(value)
    }
}

impl From<i16> for TypedValue {
    fn from(value: i16) -> Self {
        TypedValue::i16(value)
    }
}

impl From<u16> for TypedValue {
    fn from(value: u16) -> Self {
        TypedValue::u16(value)
    }
}

impl From<i32> for TypedValue {
    fn from(value: i32) -> Self {
        TypedValue::i32(value)
    }
}

impl From<u32> for TypedValue {
    fn from(value: u32) -> Self {
        TypedValue::u32(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::i64(value)
    }
}

impl From<u64> for TypedValue {
    fn from(value: u64) -> Self {
        TypedValue::u64(value)
    }
}

impl From<f32> for TypedValue {
    fn from(value: f32) -> Self {
        TypedValue::f32(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::f64(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_pattern_is_masked() {
        let v = TypedValue::i8(-1);
        assert_eq!(v.bits(), 0xFF);
        assert_eq!(v.integer_value(), Some(-1));

        let v = TypedValue::i16(-2);
        assert_eq!(v.bits(), 0xFFFE);
        assert_eq!(v.as_i64(), Some(-2));
    }

    #[test]
    fn test_from_bits_canonicalises() {
        let v = TypedValue::from_bits(0x1FF, TypeDescriptor::unsigned(IntWidth::W8)).unwrap();
        assert_eq!(v.as_u64(), Some(0xFF));

        let b = TypedValue::from_bits(0x40, TypeDescriptor::Bool).unwrap();
        assert_eq!(b.bits(), 1);

        assert!(TypedValue::from_bits(0, TypeDescriptor::Void).is_err());
    }

    #[test]
    fn test_u64_max() {
        let v = TypedValue::u64(u64::MAX);
        assert_eq!(v.as_u64(), Some(u64::MAX));
        assert_eq!(v.as_i64(), None);
    }

    #[test]
    fn test_char_literal_is_int() {
        let a = TypedValue::char_literal('a');
        assert_eq!(a.ty(), &TypeDescriptor::int());
        assert_eq!(a.as_i64(), Some(97));
    }

    #[test]
    fn test_floats() {
        assert_eq!(TypedValue::f64(1.0).as_f64(), Some(1.0));
        assert_eq!(TypedValue::f32(67.0).as_f32(), Some(67.0));
        assert_eq!(TypedValue::f32(0.5).as_f64(), Some(0.5));
        assert_eq!(TypedValue::i32(1).as_f64(), None);
        assert!(TypedValue::f64(-0.0).is_zero());
        assert!(!TypedValue::f64(f64::NAN).is_zero());
    }

    #[test]
    fn test_null_identity_across_pointees() {
        let pointees = [
            TypeDescriptor::double(),
            TypeDescriptor::int(),
            TypeDescriptor::float(),
            TypeDescriptor::signed(IntWidth::W8),
            TypeDescriptor::Void,
        ];
        for a in &pointees {
            for b in &pointees {
                assert_eq!(TypedValue::null(a.clone()), TypedValue::null(b.clone()));
            }
            let null = TypedValue::null(a.clone());
            assert!(null.is_null());
            assert_eq!(null.non_null(), None);
        }
    }

    #[test]
    fn test_equality_is_typed_for_scalars() {
        assert_ne!(TypedValue::i32(1), TypedValue::u32(1));
        assert_ne!(TypedValue::i8(-1), TypedValue::u8(255));
        assert_eq!(TypedValue::i32(7), TypedValue::from(7i32));
    }

    #[test]
    fn test_le_bytes_roundtrip_widths() {
        let ptr = PointerSize::Bit64;
        assert_eq!(TypedValue::i32(0x1234_5678).to_le_bytes(ptr), vec![0x78, 0x56, 0x34, 0x12]);
        assert_eq!(TypedValue::i16(-1).to_le_bytes(ptr), vec![0xFF, 0xFF]);
        let handle = TypedValue::pointer(0x10, TypeDescriptor::Void);
        assert_eq!(handle.to_le_bytes(PointerSize::Bit32).len(), 4);

        let bytes = [0x78, 0x56, 0x34, 0x12];
        assert_eq!(
            TypedValue::from_le_bytes(&bytes, &TypeDescriptor::int(), ptr).unwrap(),
            TypedValue::i32(0x1234_5678)
        );
        assert_eq!(
            TypedValue::from_le_bytes(&bytes, &TypeDescriptor::signed(IntWidth::W8), ptr).unwrap(),
            TypedValue::i8(0x78)
        );
        assert_eq!(
            TypedValue::from_le_bytes(&bytes[..2], &TypeDescriptor::int(), ptr),
            Err(Error::OutOfBounds)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TypedValue::i8(-1).to_string(), "-1");
        assert_eq!(TypedValue::u8(255).to_string(), "255");
        assert_eq!(TypedValue::f64(1.5).to_string(), "1.5");
        assert_eq!(TypedValue::null(TypeDescriptor::int()).to_string(), "NULL");
        assert_eq!(TypedValue::pointer(0x20, TypeDescriptor::int()).to_string(), "0x20");
    }
}
