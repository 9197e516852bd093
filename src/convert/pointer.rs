//! Pointer identity and reinterpretation.
//!
//! Pointers carry an address and nothing else at run time. The pointee type
//! only decides which conversions are permitted and how typed loads read
//! memory, so:
//!
//! - null has one representation for every pointee type
//! - `void*` converts to and from any object pointer without changing the address
//! - an array designator decays to a pointer to its first element
//! - a typed pointer never converts directly to an unrelated typed pointer;
//!   the caller must go through `void*`

use crate::{
    config::TargetConfig,
    convert::{wrap::truncate, ConversionKind},
    types::{IntWidth, Qualifiers, Signedness, TypeDescriptor},
    value::TypedValue,
    Error, Result,
};

/// Returns the canonical null pointer for `pointee`.
///
/// Every null compares equal to every other null, whatever the pointee type.
///
/// # Examples
///
/// ```rust
/// use ccast::{convert::null_pointer, TypeDescriptor};
///
/// assert_eq!(
///     null_pointer(&TypeDescriptor::double()),
///     null_pointer(&TypeDescriptor::float())
/// );
/// ```
#[must_use]
pub fn null_pointer(pointee: &TypeDescriptor) -> TypedValue {
    TypedValue::null(pointee.clone())
}

/// Integer to pointer.
///
/// The null pointer constant `0` converts implicitly and always yields null.
/// Any other integer needs an explicit cast and is truncated to the pointer
/// width.
///
/// # Errors
/// - [`Error::UnsupportedConversion`] for an implicit non-zero source, a
///   non-integer source or a non-pointer target
pub fn int_to_pointer(
    value: &TypedValue,
    target: &TypeDescriptor,
    kind: ConversionKind,
    config: &TargetConfig,
) -> Result<TypedValue> {
    let (Some(v), true) = (value.integer_value(), target.is_pointer()) else {
        return Err(unsupported!(value.ty(), target));
    };
    if v != 0 && kind == ConversionKind::Implicit {
        return Err(unsupported!(value.ty(), target));
    }

    let address = truncate(v, config.pointer_size().int_width());
    TypedValue::from_bits(address, target.clone())
}

/// Pointer to integer.
///
/// Requires an explicit cast. The address is read as an unsigned
/// pointer-width integer and then converted like any other integer, so
/// narrowing wraps.
///
/// # Errors
/// - [`Error::UnsupportedConversion`] for an implicit conversion or a
///   non-pointer source
pub fn pointer_to_int(
    value: &TypedValue,
    width: IntWidth,
    signedness: Signedness,
    kind: ConversionKind,
    config: &TargetConfig,
) -> Result<TypedValue> {
    let target = TypeDescriptor::integer(width, signedness);
    let Some(address) = value.address() else {
        return Err(unsupported!(value.ty(), &target));
    };
    if kind == ConversionKind::Implicit {
        return Err(unsupported!(value.ty(), &target));
    }

    let address = config.pointer_size().mask_unsigned(address);
    Ok(TypedValue::wrapping_int(
        i128::from(address),
        width,
        signedness,
    ))
}

/// Pointer to pointer.
///
/// Permitted when the pointees are identical or either side is `void`.
/// Implicitly adding qualifiers is fine; implicitly dropping `const` or
/// `volatile` is not. The address never changes.
///
/// # Errors
/// - [`Error::UnsupportedConversion`] for unrelated typed pointees
/// - [`Error::QualifierDiscarded`] for an implicit conversion losing qualifiers
pub fn pointer_to_pointer(
    value: &TypedValue,
    target: &TypeDescriptor,
    kind: ConversionKind,
) -> Result<TypedValue> {
    let (
        TypeDescriptor::Pointer {
            pointee: from,
            qualifiers: from_quals,
        },
        TypeDescriptor::Pointer {
            pointee: to,
            qualifiers: to_quals,
        },
    ) = (value.ty(), target)
    else {
        return Err(unsupported!(value.ty(), target));
    };

    if !pointees_compatible(from, to) {
        return Err(unsupported!(value.ty(), target));
    }

    let checked = Qualifiers::CONST | Qualifiers::VOLATILE;
    if kind == ConversionKind::Implicit && !to_quals.contains(*from_quals & checked) {
        log::debug!("implicit {} -> {} discards qualifiers", value.ty(), target);
        return Err(Error::QualifierDiscarded {
            from: Box::new(value.ty().clone()),
            to: Box::new(target.clone()),
        });
    }

    TypedValue::from_bits(value.bits(), target.clone())
}

/// Reinterprets an untyped handle as a pointer to `pointee`.
///
/// The address is unchanged; reading through the result with
/// [`crate::memory::Memory::load`] recovers whatever was stored there.
/// Typed handles are accepted only when they already point to `pointee`.
///
/// # Errors
/// Returns [`Error::UnsupportedConversion`] if `handle` is not a pointer or
/// points to an unrelated type.
///
/// # Examples
///
/// ```rust
/// use ccast::{convert::reinterpret, TypeDescriptor, TypedValue};
///
/// let handle = TypedValue::pointer(0x7FFF_0000_0000, TypeDescriptor::Void);
/// let typed = reinterpret(&handle, &TypeDescriptor::double())?;
/// assert_eq!(typed.address(), Some(0x7FFF_0000_0000));
/// assert_eq!(typed.ty().pointee(), Some(&TypeDescriptor::double()));
/// # Ok::<(), ccast::Error>(())
/// ```
pub fn reinterpret(handle: &TypedValue, pointee: &TypeDescriptor) -> Result<TypedValue> {
    let target = TypeDescriptor::pointer_to(pointee.clone());
    match handle.ty().pointee() {
        Some(from) if pointees_compatible(from, pointee) => {
            Ok(TypedValue::pointer(handle.bits(), pointee.clone()))
        }
        _ => Err(unsupported!(handle.ty(), &target)),
    }
}

/// Decays an array designator into a pointer to its first element.
///
/// # Errors
/// Returns [`Error::UnsupportedConversion`] if `array` is not an array of
/// `element`.
///
/// # Examples
///
/// ```rust
/// use ccast::{convert::decay_array, TypeDescriptor, TypedValue};
///
/// let triorg = TypedValue::array(0x1000, TypeDescriptor::double(), 2);
/// let ptr = decay_array(&triorg, &TypeDescriptor::double())?;
/// assert_eq!(ptr, TypedValue::pointer(0x1000, TypeDescriptor::double()));
/// # Ok::<(), ccast::Error>(())
/// ```
pub fn decay_array(array: &TypedValue, element: &TypeDescriptor) -> Result<TypedValue> {
    match array.ty() {
        TypeDescriptor::Array { element: actual, .. } if **actual == *element => {
            Ok(TypedValue::pointer(array.bits(), element.clone()))
        }
        other => Err(unsupported!(
            other,
            &TypeDescriptor::pointer_to(element.clone())
        )),
    }
}

/// Array designator to pointer, as used by the dispatcher.
///
/// The array first decays to a pointer to its element type, which may then
/// convert to `void*` or gain qualifiers.
pub(crate) fn array_to_pointer(
    array: &TypedValue,
    target: &TypeDescriptor,
    kind: ConversionKind,
) -> Result<TypedValue> {
    let TypeDescriptor::Array { element, .. } = array.ty() else {
        return Err(unsupported!(array.ty(), target));
    };
    let decayed = decay_array(array, element)?;
    pointer_to_pointer(&decayed, target, kind)
}

fn pointees_compatible(from: &TypeDescriptor, to: &TypeDescriptor) -> bool {
    from == to || *from == TypeDescriptor::Void || *to == TypeDescriptor::Void
}
