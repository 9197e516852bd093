//! Character counting over C strings.
//!
//! A C program that counts UTF-8 code points walks the bytes of a
//! NUL-terminated `char` array and skips continuation bytes (`10xxxxxx`).
//! The walk is only correct if each byte is read at `char` width, promoted
//! to `int` and then masked; on a signed-`char` target a lead byte such as
//! `0xC3` becomes the negative `int` `-61`, whose low byte still masks to
//! `0xC0`. [`count_chars`] performs that walk with the engine's own
//! conversion and operator rules, so a wrong `char` width or promotion shows
//! up as a wrong count.

use crate::{
    config::TargetConfig,
    ops::{BinaryOp, CompareOp},
    types::CType,
    value::TypedValue,
    Result,
};

/// `(0xc0 & c) != 0x80`
const LEAD_MASK: i32 = 0xc0;
const CONTINUATION: i32 = 0x80;

/// Counts UTF-8 code points in a NUL-terminated byte string.
///
/// Counting stops at the first NUL byte, or at the end of `bytes` if there
/// is none. Malformed sequences are not validated; every byte that is not a
/// continuation byte counts as one character.
///
/// # Errors
/// Propagates operator errors; none occur for well-typed `char` input.
///
/// # Examples
///
/// ```rust
/// use ccast::{text::count_chars, TargetConfig};
///
/// assert_eq!(count_chars("Hello, c4gö\0".as_bytes(), &TargetConfig::default())?, 11);
/// # Ok::<(), ccast::Error>(())
/// ```
pub fn count_chars(bytes: &[u8], config: &TargetConfig) -> Result<usize> {
    let plain_char = CType::Char.descriptor(config);
    let mask = TypedValue::i32(LEAD_MASK);
    let continuation = TypedValue::i32(CONTINUATION);

    let mut count = 0;
    for &byte in bytes.iter().take_while(|&&b| b != 0) {
        let c = TypedValue::from_bits(u64::from(byte), plain_char.clone())?;
        let lead = c
            .binary_op(&mask, BinaryOp::And, config)?
            .compare(&continuation, CompareOp::Ne, config)?;
        if !lead.is_zero() {
            count += 1;
        }
    }
    Ok(count)
}
