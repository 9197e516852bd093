//! Configured entry point.
//!
//! [`Converter`] binds a [`TargetConfig`] once so callers do not thread it
//! through every conversion. It holds no other state: two converters with the
//! same configuration are interchangeable, and one converter may be shared
//! across threads by reference.

use crate::{
    config::TargetConfig,
    convert::{self, ConversionKind},
    ops::{BinaryOp, CompareOp, UnaryOp},
    types::TypeDescriptor,
    value::TypedValue,
    Result,
};

/// C conversion and operator semantics for one target.
///
/// # Example
///
/// ```rust
/// use ccast::{Converter, IntWidth, TypeDescriptor, TypedValue};
///
/// let conv = Converter::default();
/// let uchar = TypeDescriptor::unsigned(IntWidth::W8);
///
/// assert_eq!(conv.convert(&TypedValue::i32(-1), &uchar)?, TypedValue::u8(255));
/// assert_eq!(conv.cast(&TypedValue::f64(300.7), &uchar)?, TypedValue::u8(44));
/// # Ok::<(), ccast::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Converter {
    config: TargetConfig,
}

impl Converter {
    /// Creates a converter for `config`.
    #[must_use]
    pub fn new(config: TargetConfig) -> Self {
        Converter { config }
    }

    /// Returns the target configuration.
    #[must_use]
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Implicit conversion, as on assignment or initialisation.
    ///
    /// # Errors
    /// See [`convert::convert`].
    pub fn convert(&self, value: &TypedValue, target: &TypeDescriptor) -> Result<TypedValue> {
        convert::convert(value, target, ConversionKind::Implicit, &self.config)
    }

    /// Explicit cast `(target)value`.
    ///
    /// # Errors
    /// See [`convert::convert`].
    pub fn cast(&self, value: &TypedValue, target: &TypeDescriptor) -> Result<TypedValue> {
        convert::convert(value, target, ConversionKind::Explicit, &self.config)
    }

    /// Conversion of the given kind.
    ///
    /// # Errors
    /// See [`convert::convert`].
    pub fn convert_with(
        &self,
        value: &TypedValue,
        target: &TypeDescriptor,
        kind: ConversionKind,
    ) -> Result<TypedValue> {
        convert::convert(value, target, kind, &self.config)
    }

    /// The null pointer to `pointee`.
    #[must_use]
    pub fn null_pointer(&self, pointee: &TypeDescriptor) -> TypedValue {
        convert::null_pointer(pointee)
    }

    /// Reinterprets an untyped handle as a pointer to `pointee`.
    ///
    /// # Errors
    /// See [`convert::reinterpret`].
    pub fn reinterpret(&self, handle: &TypedValue, pointee: &TypeDescriptor) -> Result<TypedValue> {
        convert::reinterpret(handle, pointee)
    }

    /// Decays an array designator into a pointer to its first element.
    ///
    /// # Errors
    /// See [`convert::decay_array`].
    pub fn decay_array(&self, array: &TypedValue, element: &TypeDescriptor) -> Result<TypedValue> {
        convert::decay_array(array, element)
    }

    /// Applies a binary operator.
    ///
    /// # Errors
    /// See [`TypedValue::binary_op`].
    pub fn binary(&self, lhs: &TypedValue, op: BinaryOp, rhs: &TypedValue) -> Result<TypedValue> {
        lhs.binary_op(rhs, op, &self.config)
    }

    /// Applies a comparison; the result is an `int` 0 or 1.
    ///
    /// # Errors
    /// See [`TypedValue::compare`].
    pub fn compare(&self, lhs: &TypedValue, op: CompareOp, rhs: &TypedValue) -> Result<TypedValue> {
        lhs.compare(rhs, op, &self.config)
    }

    /// Applies a unary operator.
    ///
    /// # Errors
    /// See [`TypedValue::unary_op`].
    pub fn unary(&self, op: UnaryOp, operand: &TypedValue) -> Result<TypedValue> {
        operand.unary_op(op)
    }
}

impl From<TargetConfig> for Converter {
    fn from(config: TargetConfig) -> Self {
        Converter::new(config)
    }
}
