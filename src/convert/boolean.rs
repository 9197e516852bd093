//! Boolean coercion.
//!
//! C has no separate boolean outcome at run time: a comparison or logical
//! operator yields the `int` 0 or 1, and storing that into any arithmetic
//! location keeps it as 0 or 1 at the target's full width. The reverse
//! direction, converting a scalar to `_Bool`, tests against zero.

use crate::{
    types::{FloatWidth, TypeDescriptor},
    value::TypedValue,
    Result,
};

/// Stores a true/false outcome into an arithmetic type.
///
/// `true` becomes 1 and `false` becomes 0, at the width and signedness of
/// `target`. Coercing an already-coerced 0/1 value again leaves it unchanged.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedConversion`] if `target` is not
/// arithmetic.
///
/// # Examples
///
/// ```rust
/// use ccast::{convert::coerce_boolean, IntWidth, TypeDescriptor, TypedValue};
///
/// let one = coerce_boolean(true, &TypeDescriptor::unsigned(IntWidth::W64))?;
/// assert_eq!(one, TypedValue::u64(1));
///
/// let zero = coerce_boolean(false, &TypeDescriptor::double())?;
/// assert_eq!(zero.as_f64(), Some(0.0));
/// # Ok::<(), ccast::Error>(())
/// ```
pub fn coerce_boolean(outcome: bool, target: &TypeDescriptor) -> Result<TypedValue> {
    let numeral = i64::from(outcome);
    match target {
        TypeDescriptor::Bool => Ok(TypedValue::bool(outcome)),
        TypeDescriptor::Int { width, signedness } => {
            Ok(TypedValue::int(numeral, *width, *signedness))
        }
        TypeDescriptor::Float(FloatWidth::F32) => {
            Ok(TypedValue::f32(if outcome { 1.0 } else { 0.0 }))
        }
        TypeDescriptor::Float(FloatWidth::F64) => {
            Ok(TypedValue::f64(if outcome { 1.0 } else { 0.0 }))
        }
        _ => Err(unsupported!(&TypeDescriptor::Bool, target)),
    }
}

/// Converts a scalar to `_Bool`: 0 if it compares equal to zero, else 1.
///
/// A null pointer is 0, NaN is 1, `-0.0` is 0.
#[must_use]
pub fn truth_value(value: &TypedValue) -> TypedValue {
    TypedValue::bool(!value.is_zero())
}
