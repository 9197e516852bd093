//! Typed C values.
//!
//! A [`TypedValue`] is a bit pattern paired with the [`crate::TypeDescriptor`]
//! that interprets it. Values are immutable: the conversion rules in
//! [`crate::convert`] and the operators in [`crate::ops`] always produce new
//! values.
//!
//! # Example
//!
//! ```rust
//! use ccast::TypedValue;
//!
//! let x = TypedValue::i16(-2);
//! assert_eq!(x.bits(), 0xFFFE);
//! assert_eq!(x.as_i64(), Some(-2));
//! assert_eq!(x.to_string(), "-2");
//! ```

mod typed;

pub use typed::TypedValue;
