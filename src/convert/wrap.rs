//! Modulo 2^n wraparound and signed/unsigned reinterpretation.
//!
//! Every integer narrowing in C is defined: the result is the source value
//! modulo 2^width, then read back with the target's signedness. These helpers
//! work on plain Rust integers so the same arithmetic backs conversions,
//! operators and the memory model.

use crate::types::IntWidth;

/// Reduces `value` modulo 2^width, returning the low `width` bits.
///
/// The result is the unsigned reading of the truncated pattern, i.e. a value
/// in `[0, 2^width - 1]`.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn truncate(value: i128, width: IntWidth) -> u64 {
    (value as u64) & width.mask()
}

/// Reads the low `width` bits of `bits` as a two's complement signed value.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn sign_extend(bits: u64, width: IntWidth) -> i64 {
    let shift = 64 - width.bits();
    ((bits << shift) as i64) >> shift
}

/// Reinterprets a signed value stored in `width` bits as unsigned.
///
/// For negative `value` the result is `2^width + value`; non-negative values
/// in range are unchanged. Values outside the signed range of `width` are
/// first narrowed modulo 2^width.
///
/// # Examples
///
/// ```rust
/// use ccast::{convert::reinterpret_signed, IntWidth};
///
/// assert_eq!(reinterpret_signed(-1, IntWidth::W8), 255);
/// assert_eq!(reinterpret_signed(-1, IntWidth::W16), 65_535);
/// assert_eq!(reinterpret_signed(-2, IntWidth::W32), 4_294_967_294);
/// ```
#[must_use]
pub fn reinterpret_signed(value: i64, width: IntWidth) -> u64 {
    truncate(i128::from(value), width)
}

/// Reinterprets an unsigned value stored in `width` bits as signed.
///
/// The inverse of [`reinterpret_signed`]: `255` at 8 bits reads back as `-1`.
#[must_use]
pub fn reinterpret_unsigned(value: u64, width: IntWidth) -> i64 {
    sign_extend(value & width.mask(), width)
}
