//! The conversion rule table.
//!
//! [`convert`] is the single entry point a code generator needs: hand it a
//! [`TypedValue`] and a target [`TypeDescriptor`] and it returns the value the
//! C program would hold after the assignment or cast. Dispatch is an
//! exhaustive match over the (source, target) type pair; each family of rules
//! lives in its own submodule and is usable on its own.
//!
//! # Architecture
//!
//! | Source \ Target | `_Bool` | integer | floating | pointer |
//! |-----------------|---------|---------|----------|---------|
//! | `_Bool` / integer | [`truth_value`] | [`int_to_int`] | [`int_to_float`] | [`int_to_pointer`] |
//! | floating | [`truth_value`] | [`float_to_int`] | [`float_to_float`] | rejected |
//! | pointer | [`truth_value`] | [`pointer_to_int`] | rejected | [`pointer_to_pointer`] |
//! | array | [`truth_value`] | rejected | rejected | [`decay_array`] |
//!
//! Converting anything to `void` or to an array type is rejected. Rejected
//! pairs return [`crate::Error::UnsupportedConversion`] immediately.
//!
//! # Key Components
//!
//! - [`convert_numeric`] - integer and floating conversions
//! - [`reinterpret_signed`] and friends - modulo 2^n wraparound
//! - [`coerce_boolean`] - true/false outcome stored as 0/1
//! - [`null_pointer`], [`reinterpret`], [`decay_array`] - pointer identity
//!
//! # Thread Safety
//!
//! Every function here is pure. There is no shared state and no caching, so
//! conversions may run concurrently from any number of threads.
//!
//! # Example
//!
//! ```rust
//! use ccast::{
//!     convert::convert, ConversionKind, IntWidth, TargetConfig, TypeDescriptor, TypedValue,
//! };
//!
//! let config = TargetConfig::default();
//! let c = convert(
//!     &TypedValue::i32(-1),
//!     &TypeDescriptor::unsigned(IntWidth::W8),
//!     ConversionKind::Implicit,
//!     &config,
//! )?;
//! assert_eq!(c.as_u64(), Some(255));
//! # Ok::<(), ccast::Error>(())
//! ```

mod boolean;
mod numeric;
mod pointer;
mod wrap;

pub use boolean::{coerce_boolean, truth_value};
pub use numeric::{convert_numeric, float_to_float, float_to_int, int_to_float, int_to_int};
pub use pointer::{
    decay_array, int_to_pointer, null_pointer, pointer_to_int, pointer_to_pointer, reinterpret,
};
pub use wrap::{reinterpret_signed, reinterpret_unsigned, sign_extend, truncate};

use strum::Display;

use crate::{config::TargetConfig, types::TypeDescriptor, value::TypedValue, Result};

/// How a conversion arises in the source program.
///
/// Arithmetic rules are identical for both kinds. Pointer rules are stricter
/// for implicit conversions: only the constant `0` becomes a pointer, pointers
/// never become integers, and pointee qualifiers cannot be dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
pub enum ConversionKind {
    /// Assignment, initialisation, argument passing or return.
    #[default]
    #[strum(to_string = "implicit")]
    Implicit,
    /// A cast expression `(T)expr`.
    #[strum(to_string = "explicit")]
    Explicit,
}

/// Converts `value` to `target` following C's conversion rules.
///
/// # Arguments
///
/// * `value` - The source value
/// * `target` - The type to convert to
/// * `kind` - Whether the conversion is an implicit assignment or an explicit cast
/// * `config` - Target representation choices (pointer width)
///
/// # Errors
///
/// - [`crate::Error::UnsupportedConversion`] for a pair outside the rule table
/// - [`crate::Error::QualifierDiscarded`] for an implicit pointer conversion
///   that drops `const` or `volatile`
pub fn convert(
    value: &TypedValue,
    target: &TypeDescriptor,
    kind: ConversionKind,
    config: &TargetConfig,
) -> Result<TypedValue> {
    use TypeDescriptor as T;

    let (rule, result) = match (value.ty(), target) {
        (T::Void, _) | (_, T::Void | T::Array { .. }) => {
            return Err(unsupported!(value.ty(), target))
        }

        (_, T::Bool) => ("truth value", Ok(truth_value(value))),

        (T::Bool | T::Int { .. }, T::Int { width, signedness }) => (
            "integer to integer",
            int_to_int(value, *width, *signedness),
        ),
        (T::Bool | T::Int { .. }, T::Float(width)) => {
            ("integer to floating", int_to_float(value, *width))
        }
        (T::Bool | T::Int { .. }, T::Pointer { .. }) => (
            "integer to pointer",
            int_to_pointer(value, target, kind, config),
        ),

        (T::Float(_), T::Int { width, signedness }) => (
            "floating to integer",
            float_to_int(value, *width, *signedness),
        ),
        (T::Float(_), T::Float(width)) => ("floating to floating", float_to_float(value, *width)),

        (T::Pointer { .. }, T::Int { width, signedness }) => (
            "pointer to integer",
            pointer_to_int(value, *width, *signedness, kind, config),
        ),
        (T::Pointer { .. }, T::Pointer { .. }) => (
            "pointer to pointer",
            pointer_to_pointer(value, target, kind),
        ),

        (T::Array { .. }, T::Pointer { .. }) => (
            "array decay",
            pointer::array_to_pointer(value, target, kind),
        ),

        (T::Float(_), T::Pointer { .. })
        | (T::Pointer { .. } | T::Array { .. }, T::Int { .. } | T::Float(_)) => {
            return Err(unsupported!(value.ty(), target))
        }
    };

    log::trace!("{kind} {} -> {target} via {rule}", value.ty());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        types::{IntWidth, Qualifiers},
        Error,
    };

    fn implicit(value: &TypedValue, target: &TypeDescriptor) -> Result<TypedValue> {
        convert(value, target, ConversionKind::Implicit, &TargetConfig::default())
    }

    fn explicit(value: &TypedValue, target: &TypeDescriptor) -> Result<TypedValue> {
        convert(value, target, ConversionKind::Explicit, &TargetConfig::default())
    }

    #[test]
    fn test_arithmetic_identical_for_both_kinds() {
        let sources = [
            TypedValue::i32(-1),
            TypedValue::u8(200),
            TypedValue::f64(-13.75),
            TypedValue::bool(true),
        ];
        let targets = [
            TypeDescriptor::unsigned(IntWidth::W8),
            TypeDescriptor::signed(IntWidth::W16),
            TypeDescriptor::double(),
            TypeDescriptor::float(),
            TypeDescriptor::Bool,
        ];
        for source in &sources {
            for target in &targets {
                assert_eq!(
                    implicit(source, target).unwrap(),
                    explicit(source, target).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_same_type_is_identity() {
        let values = [
            TypedValue::i8(-3),
            TypedValue::u64(u64::MAX),
            TypedValue::f32(2.5),
            TypedValue::pointer(0x10, TypeDescriptor::int()),
        ];
        for v in &values {
            assert_eq!(&implicit(v, v.ty()).unwrap(), v);
        }
    }

    #[test]
    fn test_char_literal_to_int() {
        let v = implicit(&TypedValue::char_literal('a'), &TypeDescriptor::int()).unwrap();
        assert_eq!(v.as_i64(), Some(97));
    }

    #[test]
    fn test_to_bool() {
        assert_eq!(
            implicit(&TypedValue::i32(2), &TypeDescriptor::Bool).unwrap(),
            TypedValue::bool(true)
        );
        assert_eq!(
            implicit(&TypedValue::null(TypeDescriptor::int()), &TypeDescriptor::Bool).unwrap(),
            TypedValue::bool(false)
        );
    }

    #[test]
    fn test_rejected_pairs() {
        let unsupported =
            |r: Result<TypedValue>| matches!(r, Err(Error::UnsupportedConversion { .. }));

        assert!(unsupported(explicit(&TypedValue::i32(1), &TypeDescriptor::Void)));
        assert!(unsupported(explicit(
            &TypedValue::i32(1),
            &TypeDescriptor::array_of(TypeDescriptor::int(), 1)
        )));
        assert!(unsupported(explicit(
            &TypedValue::f64(1.0),
            &TypeDescriptor::void_pointer()
        )));
        assert!(unsupported(explicit(
            &TypedValue::pointer(8, TypeDescriptor::int()),
            &TypeDescriptor::double()
        )));
        assert!(unsupported(explicit(
            &TypedValue::array(8, TypeDescriptor::int(), 2),
            &TypeDescriptor::int()
        )));
        assert!(unsupported(implicit(
            &TypedValue::pointer(8, TypeDescriptor::int()),
            &TypeDescriptor::signed(IntWidth::W64)
        )));
    }

    #[test]
    fn test_pointer_dispatch() {
        let handle = implicit(
            &TypedValue::pointer(0x100, TypeDescriptor::double()),
            &TypeDescriptor::void_pointer(),
        )
        .unwrap();
        assert_eq!(handle.address(), Some(0x100));

        let const_void =
            TypeDescriptor::qualified_pointer_to(TypeDescriptor::Void, Qualifiers::CONST);
        let c = implicit(&handle, &const_void).unwrap();
        assert!(matches!(
            implicit(&c, &TypeDescriptor::void_pointer()),
            Err(Error::QualifierDiscarded { .. })
        ));

        let decayed = implicit(
            &TypedValue::array(0x200, TypeDescriptor::int(), 4),
            &TypeDescriptor::pointer_to(TypeDescriptor::int()),
        )
        .unwrap();
        assert_eq!(decayed, TypedValue::pointer(0x200, TypeDescriptor::int()));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ConversionKind::Implicit.to_string(), "implicit");
        assert_eq!(ConversionKind::Explicit.to_string(), "explicit");
        assert_eq!(ConversionKind::default(), ConversionKind::Implicit);
    }
}
