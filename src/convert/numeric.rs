//! Arithmetic conversions between integer and floating types.
//!
//! All of these are total over arithmetic sources: narrowing wraps, float to
//! integer truncates toward zero, integer to float rounds to nearest with ties
//! to even. A non-arithmetic source is a caller error.

use crate::{
    convert::boolean,
    types::{FloatWidth, IntWidth, Signedness, TypeDescriptor},
    value::TypedValue,
    Result,
};

/// Converts an arithmetic value to an arithmetic target type.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedConversion`] if either side is not
/// arithmetic.
///
/// # Examples
///
/// ```rust
/// use ccast::{convert::convert_numeric, IntWidth, TypeDescriptor, TypedValue};
///
/// let narrowed = convert_numeric(&TypedValue::i32(300), &TypeDescriptor::unsigned(IntWidth::W8))?;
/// assert_eq!(narrowed.as_u64(), Some(44));
///
/// let one = convert_numeric(&TypedValue::i32(1), &TypeDescriptor::double())?;
/// assert_eq!(one.as_f64(), Some(1.0));
/// # Ok::<(), ccast::Error>(())
/// ```
pub fn convert_numeric(value: &TypedValue, target: &TypeDescriptor) -> Result<TypedValue> {
    match target {
        TypeDescriptor::Bool if value.ty().is_arithmetic() => Ok(boolean::truth_value(value)),
        TypeDescriptor::Int { width, signedness } => match value.ty() {
            TypeDescriptor::Float(_) => float_to_int(value, *width, *signedness),
            _ => int_to_int(value, *width, *signedness),
        },
        TypeDescriptor::Float(width) => match value.ty() {
            TypeDescriptor::Float(_) => float_to_float(value, *width),
            _ => int_to_float(value, *width),
        },
        _ => Err(unsupported!(value.ty(), target)),
    }
}

/// Integer (or `_Bool`) to integer.
///
/// Widening preserves the value: signed sources sign-extend, unsigned sources
/// zero-extend. Narrowing keeps the value modulo 2^width, read back with the
/// target signedness.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedConversion`] if `value` is not an integer.
pub fn int_to_int(
    value: &TypedValue,
    width: IntWidth,
    signedness: Signedness,
) -> Result<TypedValue> {
    let Some(v) = value.integer_value() else {
        return Err(unsupported!(
            value.ty(),
            &TypeDescriptor::integer(width, signedness)
        ));
    };
    Ok(TypedValue::wrapping_int(v, width, signedness))
}

/// Integer (or `_Bool`) to floating.
///
/// The exact mathematical value is rounded once to the nearest representable
/// value, ties to even. Unsigned sources are read as unsigned.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedConversion`] if `value` is not an integer.
#[allow(clippy::cast_precision_loss)]
pub fn int_to_float(value: &TypedValue, width: FloatWidth) -> Result<TypedValue> {
    let Some(v) = value.integer_value() else {
        return Err(unsupported!(value.ty(), &TypeDescriptor::Float(width)));
    };
    Ok(match width {
        FloatWidth::F32 => TypedValue::f32(v as f32),
        FloatWidth::F64 => TypedValue::f64(v as f64),
    })
}

/// Floating to integer.
///
/// The fractional part is discarded (truncation toward zero). Values outside
/// the target range, which C leaves undefined, saturate into `i128` and then
/// wrap modulo 2^width; NaN becomes 0.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedConversion`] if `value` is not floating.
#[allow(clippy::cast_possible_truncation)]
pub fn float_to_int(
    value: &TypedValue,
    width: IntWidth,
    signedness: Signedness,
) -> Result<TypedValue> {
    let Some(f) = value.as_f64() else {
        return Err(unsupported!(
            value.ty(),
            &TypeDescriptor::integer(width, signedness)
        ));
    };
    // `as` truncates toward zero, saturates, and maps NaN to 0
    Ok(TypedValue::wrapping_int(f as i128, width, signedness))
}

/// Floating to floating.
///
/// `float` to `double` is exact; `double` to `float` rounds to nearest.
/// Same-width conversions keep the bit pattern, NaN payload included.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedConversion`] if `value` is not floating.
#[allow(clippy::cast_possible_truncation)]
pub fn float_to_float(value: &TypedValue, width: FloatWidth) -> Result<TypedValue> {
    if value.ty() == &TypeDescriptor::Float(width) {
        return Ok(value.clone());
    }
    let Some(f) = value.as_f64() else {
        return Err(unsupported!(value.ty(), &TypeDescriptor::Float(width)));
    };
    Ok(match width {
        FloatWidth::F32 => TypedValue::f32(f as f32),
        FloatWidth::F64 => TypedValue::f64(f),
    })
}
